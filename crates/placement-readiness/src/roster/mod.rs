//! Roster CSV intake.
//!
//! Parses the placement cell's student roster export into registration
//! profiles. Applying the parsed roster to the signal store is the readiness
//! service's job; this module only reads and normalizes.

mod normalizer;
mod parser;

use std::io::Read;
use std::path::Path;

use crate::readiness::domain::StudentProfile;

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Row { line: usize, reason: String },
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster export: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
            RosterImportError::Row { line, reason } => {
                write!(f, "rejected roster row at line {}: {}", line, reason)
            }
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            RosterImportError::Row { .. } => None,
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<StudentProfile>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<StudentProfile>, RosterImportError> {
        parser::parse_students(reader)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    const ROSTER: &str = "\
Student ID,Name,Branch,Year,CGPA,Skills
s-101,Vedant Patil,Computer Science,TY,8.4,Python; SQL; React
s-102,Riya Sharma,it,2nd Year,7.1,\"Java, DSA\"
s-103,Om Jadhav,ENTC,1,6.0,
";

    #[test]
    fn parses_and_normalizes_roster_rows() {
        let students = RosterImporter::from_reader(Cursor::new(ROSTER)).expect("roster parses");
        assert_eq!(students.len(), 3);

        assert_eq!(students[0].student_id.0, "s-101");
        assert_eq!(students[0].branch, "CSE");
        assert_eq!(students[0].year, 3);
        assert_eq!(
            students[0].skills,
            vec!["Python".to_string(), "SQL".to_string(), "React".to_string()],
        );

        assert_eq!(students[1].branch, "IT");
        assert_eq!(students[1].year, 2);
        assert_eq!(students[1].skills, vec!["Java".to_string(), "DSA".to_string()]);

        assert_eq!(students[2].branch, "ECS");
        assert_eq!(students[2].year, 1);
        assert!(students[2].skills.is_empty());
    }

    #[test]
    fn rejects_unrecognized_year_with_line_number() {
        let csv = "\
Student ID,Name,Branch,Year,CGPA,Skills
s-201,Aman Singh,CSE,TY,8.0,Python
s-202,Neha Gupta,CSE,fifth,7.0,SQL
";
        match RosterImporter::from_reader(Cursor::new(csv)) {
            Err(RosterImportError::Row { line, reason }) => {
                assert_eq!(line, 3);
                assert!(reason.contains("fifth"));
            }
            other => panic!("expected row rejection, got {other:?}"),
        }
    }

    #[test]
    fn rejects_blank_student_id() {
        let csv = "\
Student ID,Name,Branch,Year,CGPA,Skills
  ,Aman Singh,CSE,TY,8.0,Python
";
        match RosterImporter::from_reader(Cursor::new(csv)) {
            Err(RosterImportError::Row { line, reason }) => {
                assert_eq!(line, 2);
                assert!(reason.contains("student id"));
            }
            other => panic!("expected row rejection, got {other:?}"),
        }
    }

    #[test]
    fn rejects_out_of_range_cgpa() {
        let csv = "\
Student ID,Name,Branch,Year,CGPA,Skills
s-301,Tejas Naik,CSE,TY,11.2,Python
";
        match RosterImporter::from_reader(Cursor::new(csv)) {
            Err(RosterImportError::Row { reason, .. }) => {
                assert!(reason.contains("11.2"));
            }
            other => panic!("expected row rejection, got {other:?}"),
        }
    }

    #[test]
    fn year_aliases_cover_seeded_export_forms() {
        for (raw, expected) in [("FY", 1), ("SY", 2), ("ty", 3), ("FINAL", 4), ("3rd Year", 3)] {
            assert_eq!(super::normalizer::normalize_year(raw), Some(expected), "{raw}");
        }
        assert_eq!(super::normalizer::normalize_year("graduate"), None);
    }

    #[test]
    fn branch_aliases_collapse_to_canonical_codes() {
        for (raw, expected) in [
            ("CS", "CSE"),
            (" computer   science ", "CSE"),
            ("Information Technology", "IT"),
            ("electronics", "ECS"),
            ("MECH", "MECH"),
        ] {
            assert_eq!(super::normalizer::normalize_branch(raw), expected, "{raw}");
        }
    }
}
