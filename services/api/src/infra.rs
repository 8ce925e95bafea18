use metrics_exporter_prometheus::PrometheusHandle;
use placement_readiness::readiness::{
    BenchmarkConfig, CompanyCriteria, CompanyId, CompanyRepository, RepositoryError, ScoringConfig,
    SignalRecord, StudentId, StudentProfile, StudentRecord, StudentRepository,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryStudentRepository {
    records: Arc<Mutex<HashMap<StudentId, StudentRecord>>>,
}

impl StudentRepository for InMemoryStudentRepository {
    fn register(&self, profile: StudentProfile) -> Result<StudentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("student mutex poisoned");
        if guard.contains_key(&profile.student_id) {
            return Err(RepositoryError::Conflict);
        }
        let record = StudentRecord::new(profile);
        guard.insert(record.profile.student_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, student_id: &StudentId) -> Result<Option<StudentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("student mutex poisoned");
        Ok(guard.get(student_id).cloned())
    }

    fn store_signal(
        &self,
        student_id: &StudentId,
        record: SignalRecord,
    ) -> Result<StudentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("student mutex poisoned");
        let student = guard.get_mut(student_id).ok_or(RepositoryError::NotFound)?;
        student.apply_signal(record);
        Ok(student.clone())
    }

    fn snapshot(&self) -> Result<Vec<StudentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("student mutex poisoned");
        let mut records: Vec<_> = guard.values().cloned().collect();
        records.sort_by(|a, b| a.profile.student_id.cmp(&b.profile.student_id));
        Ok(records)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryCompanyRepository {
    records: Arc<Mutex<HashMap<CompanyId, CompanyCriteria>>>,
}

impl CompanyRepository for InMemoryCompanyRepository {
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

pub(crate) fn default_scoring_config() -> ScoringConfig {
    ScoringConfig::default()
}

/// Placement cell targets for the cohorts it is actively coaching; every
/// other cohort falls back to the global default.
pub(crate) fn default_benchmarks() -> BenchmarkConfig {
    BenchmarkConfig::default()
        .with_target("CSE", 3, 65.0)
        .with_target("CSE", 4, 70.0)
        .with_target("IT", 4, 65.0)
}

/// Criteria for the recruiting partners of the current drive.
pub(crate) fn seed_companies() -> Vec<CompanyCriteria> {
    vec![
        CompanyCriteria {
            company_id: CompanyId("tcs".to_string()),
            company_name: "TCS".to_string(),
            role: "Software Developer".to_string(),
            tier: "Tier-2".to_string(),
            allowed_branches: vec!["CSE".to_string(), "IT".to_string(), "ECS".to_string()],
            min_cgpa: 6.5,
            min_prs: 55,
            required_skills: vec!["DSA".to_string(), "Java".to_string(), "SQL".to_string()],
        },
        CompanyCriteria {
            company_id: CompanyId("accenture".to_string()),
            company_name: "Accenture".to_string(),
            role: "Associate Software Engineer".to_string(),
            tier: "Tier-2".to_string(),
            allowed_branches: vec!["CSE".to_string(), "IT".to_string()],
            min_cgpa: 7.0,
            min_prs: 55,
            required_skills: vec![
                "Java".to_string(),
                "SQL".to_string(),
                "Communication".to_string(),
            ],
        },
        CompanyCriteria {
            company_id: CompanyId("capgemini".to_string()),
            company_name: "Capgemini".to_string(),
            role: "Analyst".to_string(),
            tier: "Tier-2".to_string(),
            allowed_branches: vec!["CSE".to_string(), "IT".to_string(), "ECS".to_string()],
            min_cgpa: 6.0,
            min_prs: 50,
            required_skills: vec!["Python".to_string(), "SQL".to_string()],
        },
        CompanyCriteria {
            company_id: CompanyId("jp-morgan".to_string()),
            company_name: "JP Morgan".to_string(),
            role: "SDE Intern".to_string(),
            tier: "Tier-1".to_string(),
            allowed_branches: vec!["CSE".to_string(), "IT".to_string()],
            min_cgpa: 8.0,
            min_prs: 70,
            required_skills: vec![
                "DSA".to_string(),
                "Java".to_string(),
                "System Design".to_string(),
            ],
        },
        CompanyCriteria {
            company_id: CompanyId("lti-mindtree".to_string()),
            company_name: "LTI Mindtree".to_string(),
            role: "Software Engineer".to_string(),
            tier: "Tier-2".to_string(),
            allowed_branches: vec!["CSE".to_string(), "IT".to_string(), "ECS".to_string()],
            min_cgpa: 7.0,
            min_prs: 55,
            required_skills: vec!["Java".to_string(), "DSA".to_string()],
        },
    ]
}
