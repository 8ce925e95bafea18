use serde::{Deserialize, Serialize};

use super::domain::{
    CompanyCriteria, CompanyId, PrsResult, SignalPayload, SignalRecord, SignalSet, StudentId,
    StudentProfile,
};

/// Repository record pairing a student's registration data with their signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub profile: StudentProfile,
    pub signals: SignalSet,
}

impl StudentRecord {
    pub fn new(profile: StudentProfile) -> Self {
        Self {
            profile,
            signals: SignalSet::default(),
        }
    }

    /// Slots a signal into its category, keeping `profile.skills` mirrored to
    /// the latest skills signal.
    pub fn apply_signal(&mut self, record: SignalRecord) {
        if let SignalPayload::Skills(skills) = &record.payload {
            self.profile.skills = skills.skills.clone();
        }
        self.signals.replace(record);
    }

    pub fn view(&self) -> StudentView {
        StudentView {
            student_id: self.profile.student_id.clone(),
            name: self.profile.name.clone(),
            branch: self.profile.branch.clone(),
            year: self.profile.year,
            cgpa: self.profile.cgpa,
            skills: self.profile.skills.clone(),
            signals_present: self
                .signals
                .categories()
                .into_iter()
                .map(|category| category.label())
                .collect(),
        }
    }
}

/// Snapshot row for aggregation: the stored record plus whatever score the
/// cache held at snapshot time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentStanding {
    pub record: StudentRecord,
    pub prs: Option<PrsResult>,
}

impl StudentStanding {
    /// Score used for population rollups; unscored students count as zero.
    pub fn effective_score(&self) -> u8 {
        self.prs.as_ref().map(|result| result.score).unwrap_or(0)
    }
}

/// Storage abstraction over the student roster and signal store. `store_signal`
/// must replace the category slot atomically with respect to other writers.
pub trait StudentRepository: Send + Sync {
    fn register(&self, profile: StudentProfile) -> Result<StudentRecord, RepositoryError>;
    fn fetch(&self, student_id: &StudentId) -> Result<Option<StudentRecord>, RepositoryError>;
    fn store_signal(
        &self,
        student_id: &StudentId,
        record: SignalRecord,
    ) -> Result<StudentRecord, RepositoryError>;
    /// Point-in-time copy of every record; rows must not reflect writes that
    /// land after the call returns.
    fn snapshot(&self) -> Result<Vec<StudentRecord>, RepositoryError>;
}

/// Storage abstraction over published company criteria.
pub trait CompanyRepository: Send + Sync {
    fn upsert(&self, criteria: CompanyCriteria) -> Result<(), RepositoryError>;
    fn fetch(&self, company_id: &CompanyId) -> Result<Option<CompanyCriteria>, RepositoryError>;
    fn all(&self) -> Result<Vec<CompanyCriteria>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Sanitized registration snapshot returned by intake endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct StudentView {
    pub student_id: StudentId,
    pub name: String,
    pub branch: String,
    pub year: u8,
    pub cgpa: f64,
    pub skills: Vec<String>,
    pub signals_present: Vec<&'static str>,
}
