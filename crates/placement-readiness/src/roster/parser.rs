use std::io::Read;

use serde::{Deserialize, Deserializer};

use crate::readiness::domain::{StudentId, StudentProfile};

use super::normalizer::{normalize_branch, normalize_year, split_skills};
use super::RosterImportError;

pub(crate) fn parse_students<R: Read>(
    reader: R,
) -> Result<Vec<StudentProfile>, RosterImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut students = Vec::new();

    for (index, record) in csv_reader.deserialize::<RosterRow>().enumerate() {
        let row = record?;
        // Header occupies the first line of the file.
        let line = index + 2;
        students.push(row.into_profile(line)?);
    }

    Ok(students)
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(rename = "Student ID")]
    student_id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Branch")]
    branch: String,
    #[serde(rename = "Year")]
    year: String,
    #[serde(rename = "CGPA")]
    cgpa: f64,
    #[serde(rename = "Skills", default, deserialize_with = "empty_string_as_none")]
    skills: Option<String>,
}

impl RosterRow {
    fn into_profile(self, line: usize) -> Result<StudentProfile, RosterImportError> {
        if self.student_id.trim().is_empty() {
            return Err(RosterImportError::Row {
                line,
                reason: "student id is blank".to_string(),
            });
        }
        if self.name.trim().is_empty() {
            return Err(RosterImportError::Row {
                line,
                reason: "name is blank".to_string(),
            });
        }

        let branch = normalize_branch(&self.branch);
        if branch.is_empty() {
            return Err(RosterImportError::Row {
                line,
                reason: "branch is blank".to_string(),
            });
        }

        let year = normalize_year(&self.year).ok_or_else(|| RosterImportError::Row {
            line,
            reason: format!("unrecognized year '{}'", self.year),
        })?;

        if !(0.0..=10.0).contains(&self.cgpa) {
            return Err(RosterImportError::Row {
                line,
                reason: format!("cgpa {} outside 0-10", self.cgpa),
            });
        }

        let skills = self.skills.as_deref().map(split_skills).unwrap_or_default();

        Ok(StudentProfile {
            student_id: StudentId(self.student_id.trim().to_string()),
            name: self.name.trim().to_string(),
            branch,
            year,
            cgpa: self.cgpa,
            skills,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
