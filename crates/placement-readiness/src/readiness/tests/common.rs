use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::readiness::cohort::BenchmarkConfig;
use crate::readiness::domain::{
    AcademicSignal, ActivitySummary, AssessmentSignal, CompanyCriteria, CompanyId, GithubSignal,
    PrsResult, ResumeSignal, ScoreBreakdown, SignalPayload, SignalRecord, SignalSet, SkillsSignal,
    StudentId, StudentProfile, Tier,
};
use crate::readiness::hash;
use crate::readiness::repository::{
    CompanyRepository, RepositoryError, StudentRecord, StudentRepository, StudentStanding,
};
use crate::readiness::scoring::{CategoryWeights, ScoringConfig, TierThresholds};
use crate::readiness::service::{CoordinatorConfig, ReadinessService};

pub(super) type TestService = ReadinessService<MemoryStudents, MemoryCompanies>;

pub(super) fn profile(id: &str, branch: &str, year: u8, cgpa: f64) -> StudentProfile {
    StudentProfile {
        student_id: StudentId(id.to_string()),
        name: format!("Student {id}"),
        branch: branch.to_string(),
        year,
        cgpa,
        skills: Vec::new(),
    }
}

pub(super) fn github(score: f64) -> SignalPayload {
    SignalPayload::Github(GithubSignal {
        public_repos: 12,
        github_score: score,
        followers: 0,
        following: 0,
        top_languages: vec!["Python".to_string()],
        activity_summary: ActivitySummary::default(),
        repo_analysis: Vec::new(),
    })
}

pub(super) fn resume(ats_score: f64) -> SignalPayload {
    SignalPayload::Resume(ResumeSignal {
        resume_score: ats_score,
        ats_score,
        missing_sections: Vec::new(),
        profile_mismatches: Vec::new(),
        suggestions: Vec::new(),
    })
}

pub(super) fn academic(cgpa: f64) -> SignalPayload {
    SignalPayload::Academic(AcademicSignal { cgpa })
}

pub(super) fn skills_of(names: &[&str]) -> SignalPayload {
    SignalPayload::Skills(SkillsSignal {
        skills: names.iter().map(|name| name.to_string()).collect(),
    })
}

pub(super) fn aptitude(score: f64) -> SignalPayload {
    SignalPayload::Aptitude(AssessmentSignal { score })
}

pub(super) fn soft_skills(score: f64) -> SignalPayload {
    SignalPayload::SoftSkills(AssessmentSignal { score })
}

pub(super) fn record_of(payload: SignalPayload) -> SignalRecord {
    let input_hash = hash::content_fingerprint(&payload).expect("payload encodes");
    SignalRecord {
        category: payload.category(),
        payload,
        input_hash,
        updated_at: Utc::now(),
    }
}

pub(super) fn signal_set(payloads: Vec<SignalPayload>) -> SignalSet {
    let mut signals = SignalSet::default();
    for payload in payloads {
        signals.replace(record_of(payload));
    }
    signals
}

/// Snapshot row with an optional already-cached score; the embedded breakdown
/// is irrelevant to aggregation, which reclassifies from the integer score.
pub(super) fn standing(
    id: &str,
    branch: &str,
    year: u8,
    cgpa: f64,
    score: Option<u8>,
) -> StudentStanding {
    let mut record = StudentRecord::new(profile(id, branch, year, cgpa));
    record.apply_signal(record_of(academic(cgpa)));
    let prs = score.map(|score| PrsResult {
        student_id: StudentId(id.to_string()),
        score,
        breakdown: ScoreBreakdown::default(),
        tier: if f64::from(score) < 40.0 {
            Tier::Red
        } else if f64::from(score) >= 75.0 {
            Tier::Green
        } else {
            Tier::Yellow
        },
        input_hash: hash::combined_input_hash(&record.signals),
        computed_at: Utc::now(),
    });
    StudentStanding { record, prs }
}

pub(super) fn company(
    id: &str,
    name: &str,
    branches: &[&str],
    min_cgpa: f64,
    min_prs: u8,
    required: &[&str],
) -> CompanyCriteria {
    CompanyCriteria {
        company_id: CompanyId(id.to_string()),
        company_name: name.to_string(),
        role: "Software Engineer".to_string(),
        tier: "Tier-2".to_string(),
        allowed_branches: branches.iter().map(|branch| branch.to_string()).collect(),
        min_cgpa,
        min_prs,
        required_skills: required.iter().map(|skill| skill.to_string()).collect(),
    }
}

pub(super) fn no_debounce() -> CoordinatorConfig {
    CoordinatorConfig {
        debounce: None,
        ..CoordinatorConfig::default()
    }
}

pub(super) fn build_service() -> (Arc<TestService>, Arc<MemoryStudents>, Arc<MemoryCompanies>) {
    build_service_with(ScoringConfig::default(), no_debounce())
}

pub(super) fn build_service_with(
    scoring: ScoringConfig,
    coordinator: CoordinatorConfig,
) -> (Arc<TestService>, Arc<MemoryStudents>, Arc<MemoryCompanies>) {
    let students = Arc::new(MemoryStudents::default());
    let companies = Arc::new(MemoryCompanies::default());
    let service = ReadinessService::new(
        students.clone(),
        companies.clone(),
        scoring,
        BenchmarkConfig::default(),
        coordinator,
    )
    .expect("scoring config validates");
    (service, students, companies)
}

/// Rubric from the drive that weighted assessments over academics: a ten-entry
/// taxonomy and a zero academic weight.
pub(super) fn assessment_heavy_config() -> ScoringConfig {
    ScoringConfig {
        weights: CategoryWeights {
            github: 0.25,
            resume: 0.20,
            academic: 0.0,
            skills: 0.20,
            aptitude: 0.20,
            soft_skills: 0.15,
        },
        tiers: TierThresholds::default(),
        skill_taxonomy: [
            "Python", "Java", "SQL", "DSA", "React", "Git", "AWS", "Docker", "Linux", "C++",
        ]
        .iter()
        .map(|skill| skill.to_string())
        .collect(),
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryStudents {
    pub(super) records: Arc<Mutex<HashMap<StudentId, StudentRecord>>>,
}

impl StudentRepository for MemoryStudents {
    fn register(&self, profile: StudentProfile) -> Result<StudentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&profile.student_id) {
            return Err(RepositoryError::Conflict);
        }
        let record = StudentRecord::new(profile);
        guard.insert(record.profile.student_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, student_id: &StudentId) -> Result<Option<StudentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(student_id).cloned())
    }

    fn store_signal(
        &self,
        student_id: &StudentId,
        record: SignalRecord,
    ) -> Result<StudentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let student = guard.get_mut(student_id).ok_or(RepositoryError::NotFound)?;
        student.apply_signal(record);
        Ok(student.clone())
    }

    fn snapshot(&self) -> Result<Vec<StudentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<_> = guard.values().cloned().collect();
        records.sort_by(|a, b| a.profile.student_id.cmp(&b.profile.student_id));
        Ok(records)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryCompanies {
    pub(super) records: Arc<Mutex<HashMap<CompanyId, CompanyCriteria>>>,
}

impl CompanyRepository for MemoryCompanies {
    fn upsert(&self, criteria: CompanyCriteria) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("company mutex poisoned");
        guard.insert(criteria.company_id.clone(), criteria);
        Ok(())
    }

    fn fetch(&self, company_id: &CompanyId) -> Result<Option<CompanyCriteria>, RepositoryError> {
        let guard = self.records.lock().expect("company mutex poisoned");
        Ok(guard.get(company_id).cloned())
    }

    fn all(&self) -> Result<Vec<CompanyCriteria>, RepositoryError> {
        let guard = self.records.lock().expect("company mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

/// Stalls every fetch so one caller can hold the compute slot long past
/// another caller's wait budget.
#[derive(Clone)]
pub(super) struct SlowStudents {
    pub(super) inner: MemoryStudents,
    pub(super) delay: Duration,
}

impl StudentRepository for SlowStudents {
    fn register(&self, profile: StudentProfile) -> Result<StudentRecord, RepositoryError> {
        self.inner.register(profile)
    }

    fn fetch(&self, student_id: &StudentId) -> Result<Option<StudentRecord>, RepositoryError> {
        std::thread::sleep(self.delay);
        self.inner.fetch(student_id)
    }

    fn store_signal(
        &self,
        student_id: &StudentId,
        record: SignalRecord,
    ) -> Result<StudentRecord, RepositoryError> {
        self.inner.store_signal(student_id, record)
    }

    fn snapshot(&self) -> Result<Vec<StudentRecord>, RepositoryError> {
        self.inner.snapshot()
    }
}

pub(super) struct UnavailableStudents;

impl StudentRepository for UnavailableStudents {
    fn register(&self, _profile: StudentProfile) -> Result<StudentRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("signal store offline".to_string()))
    }

    fn fetch(&self, _student_id: &StudentId) -> Result<Option<StudentRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("signal store offline".to_string()))
    }

    fn store_signal(
        &self,
        _student_id: &StudentId,
        _record: SignalRecord,
    ) -> Result<StudentRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("signal store offline".to_string()))
    }

    fn snapshot(&self) -> Result<Vec<StudentRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("signal store offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
