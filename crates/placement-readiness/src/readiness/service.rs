use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::cohort::views::{
    BatchRiskRow, CohortReport, CompanyFunnel, DashboardSummary, SkillFrequency,
};
use super::cohort::{self, BenchmarkConfig};
use super::domain::{
    AcademicSignal, CompanyId, EligibilityResult, PrsResult, SignalPayload, SignalRecord,
    SkillsSignal, StudentId, StudentProfile,
};
use super::hash;
use super::matching;
use super::repository::{
    CompanyRepository, RepositoryError, StudentRecord, StudentRepository, StudentStanding,
};
use super::scoring::{PrsScorer, ScoreError, ScoringConfig, ScoringConfigError};

/// One guard per student; whoever holds it is the only task allowed to invoke
/// the scorer for that student.
type ComputeSlot = Arc<tokio::sync::Mutex<()>>;

/// Cache and recompute tuning.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Quiet window after a signal write before the background recompute
    /// fires; `None` disables background recomputes entirely.
    pub debounce: Option<Duration>,
    /// How long a caller waits on another task's in-flight computation before
    /// giving up with a retryable timeout.
    pub compute_wait: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            debounce: Some(Duration::from_millis(500)),
            compute_wait: Duration::from_secs(5),
        }
    }
}

/// Cache telemetry counters, readable at any point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub computations: u64,
}

/// Outcome of applying a parsed roster to the signal store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RosterSummary {
    pub registered: usize,
    pub signals_recorded: usize,
}

/// Service composing the signal store, scorer, score cache, eligibility
/// matcher, and cohort aggregation behind one facade.
///
/// Shared mutable state is confined to the score cache, the per-student
/// compute slots, and the per-student debounce deadlines; none of the locks
/// guarding them is held across an await point.
pub struct ReadinessService<S, C> {
    students: Arc<S>,
    companies: Arc<C>,
    scorer: PrsScorer,
    benchmarks: BenchmarkConfig,
    coordinator: CoordinatorConfig,
    cache: Mutex<HashMap<StudentId, PrsResult>>,
    inflight: Mutex<HashMap<StudentId, ComputeSlot>>,
    pending: Mutex<HashMap<StudentId, Instant>>,
    cache_hits: AtomicU64,
    computations: AtomicU64,
    /// Weak self-reference handed to spawned debounce timers; upgrading fails
    /// only during teardown, when a recompute would be pointless anyway.
    handle: Weak<Self>,
}

impl<S, C> ReadinessService<S, C>
where
    S: StudentRepository + 'static,
    C: CompanyRepository + 'static,
{
    /// Builds the service, rejecting an invalid scoring rubric before any
    /// request can be served.
    pub fn new(
        students: Arc<S>,
        companies: Arc<C>,
        scoring: ScoringConfig,
        benchmarks: BenchmarkConfig,
        coordinator: CoordinatorConfig,
    ) -> Result<Arc<Self>, ScoringConfigError> {
        let scorer = PrsScorer::new(scoring)?;
        Ok(Arc::new_cyclic(|handle| Self {
            students,
            companies,
            scorer,
            benchmarks,
            coordinator,
            cache: Mutex::new(HashMap::new()),
            inflight: Mutex::new(HashMap::new()),
            pending: Mutex::new(HashMap::new()),
            cache_hits: AtomicU64::new(0),
            computations: AtomicU64::new(0),
            handle: handle.clone(),
        }))
    }

    pub fn scoring_config(&self) -> &ScoringConfig {
        self.scorer.config()
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.cache_hits.load(Ordering::Relaxed),
            computations: self.computations.load(Ordering::Relaxed),
        }
    }

    /// Registers a new student after basic shape checks. The branch code is
    /// upper-cased so cohort grouping does not split on caller casing.
    pub fn register_student(
        &self,
        mut profile: StudentProfile,
    ) -> Result<StudentRecord, ReadinessError> {
        validate_profile(&profile)?;
        profile.branch = profile.branch.trim().to_uppercase();
        let record = self.students.register(profile)?;
        debug!(student = %record.profile.student_id, branch = %record.profile.branch, "student registered");
        Ok(record)
    }

    /// Accepts a producer's signal write: fingerprint, store, and schedule a
    /// debounced recompute. The write itself never waits on scoring.
    pub fn record_signal(
        &self,
        student_id: &StudentId,
        payload: SignalPayload,
    ) -> Result<SignalRecord, ReadinessError> {
        let input_hash = hash::content_fingerprint(&payload)?;
        let record = SignalRecord {
            category: payload.category(),
            payload,
            input_hash,
            updated_at: Utc::now(),
        };
        self.students.store_signal(student_id, record.clone())?;
        debug!(student = %student_id, category = %record.category, "signal stored");
        self.schedule_recompute(student_id.clone());
        Ok(record)
    }

    /// Returns the cached score when it still matches the student's current
    /// signals, otherwise recomputes exactly once per student at a time.
    ///
    /// Concurrent callers for the same student coalesce on a per-student slot:
    /// the first to acquire it runs the scorer, later callers find the fresh
    /// cache entry after the slot frees. A failed computation leaves the cache
    /// untouched.
    pub async fn get_or_compute(
        &self,
        student_id: &StudentId,
    ) -> Result<PrsResult, ReadinessError> {
        let record = self.fetch_student(student_id)?;
        if record.signals.is_empty() {
            return Err(ScoreError::InsufficientData {
                student_id: student_id.clone(),
            }
            .into());
        }
        let current_hash = hash::combined_input_hash(&record.signals);
        if let Some(cached) = self.cached_if_fresh(student_id, &current_hash) {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
            return Ok(cached);
        }

        let slot = self.compute_slot(student_id);
        let _guard = match tokio::time::timeout(self.coordinator.compute_wait, slot.lock()).await {
            Ok(guard) => guard,
            Err(_) => {
                return Err(ReadinessError::ComputeTimeout {
                    student_id: student_id.clone(),
                    waited: self.coordinator.compute_wait,
                })
            }
        };

        // Signals may have changed while we waited; re-read both before
        // deciding whether the winner of the slot already scored for us.
        let record = self.fetch_student(student_id)?;
        let current_hash = hash::combined_input_hash(&record.signals);
        if let Some(cached) = self.cached_if_fresh(student_id, &current_hash) {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
            return Ok(cached);
        }

        self.computations.fetch_add(1, Ordering::Relaxed);
        let result = self
            .scorer
            .compute(&record.profile.student_id, &record.signals)?;

        let stored_fresh = {
            let mut cache = self.cache.lock().expect("score cache mutex poisoned");
            cache.insert(student_id.clone(), result.clone());
            cache
                .get(student_id)
                .map_or(false, |stored| stored.input_hash == current_hash)
        };
        if !stored_fresh {
            return Err(ReadinessError::StaleCache {
                student_id: student_id.clone(),
            });
        }

        debug!(student = %student_id, score = result.score, tier = result.tier.label(), "readiness score recomputed");
        Ok(result)
    }

    /// Matches one student against one company. The readiness score comes
    /// through the cache, computing it first if needed.
    pub async fn company_match(
        &self,
        student_id: &StudentId,
        company_id: &CompanyId,
    ) -> Result<EligibilityResult, ReadinessError> {
        let criteria = self
            .companies
            .fetch(company_id)?
            .ok_or_else(|| ReadinessError::CompanyNotFound(company_id.clone()))?;
        let result = self.get_or_compute(student_id).await?;
        let record = self.fetch_student(student_id)?;
        Ok(matching::evaluate(&record.profile, result.score, &criteria))
    }

    /// Matches one student against every published company, strongest match
    /// first.
    pub async fn company_matches(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<EligibilityResult>, ReadinessError> {
        let criteria = self.companies.all()?;
        let result = self.get_or_compute(student_id).await?;
        let record = self.fetch_student(student_id)?;
        Ok(matching::match_all(&record.profile, result.score, &criteria))
    }

    /// Point-in-time population snapshot: stored records joined with whatever
    /// the score cache held when the snapshot was taken.
    pub fn standings(&self) -> Result<Vec<StudentStanding>, ReadinessError> {
        let records = self.students.snapshot()?;
        let cache = self.cache.lock().expect("score cache mutex poisoned");
        Ok(records
            .into_iter()
            .map(|record| {
                let prs = cache.get(&record.profile.student_id).cloned();
                StudentStanding { record, prs }
            })
            .collect())
    }

    pub fn cohort_report(&self) -> Result<CohortReport, ReadinessError> {
        let standings = self.standings()?;
        Ok(cohort::aggregate(
            &standings,
            &self.benchmarks,
            self.scorer.config(),
        ))
    }

    pub fn dashboard_summary(&self) -> Result<DashboardSummary, ReadinessError> {
        let standings = self.standings()?;
        Ok(cohort::dashboard_summary(
            &standings,
            &self.scorer.config().tiers,
        ))
    }

    pub fn skills_analytics(&self, top: usize) -> Result<Vec<SkillFrequency>, ReadinessError> {
        let standings = self.standings()?;
        Ok(cohort::skills_analytics(&standings, top))
    }

    pub fn batch_risks(&self, branch: Option<&str>) -> Result<Vec<BatchRiskRow>, ReadinessError> {
        let mut standings = self.standings()?;
        if let Some(branch) = branch {
            standings.retain(|standing| {
                standing
                    .record
                    .profile
                    .branch
                    .eq_ignore_ascii_case(branch)
            });
        }
        Ok(cohort::batch_risks(&standings, &self.scorer.config().tiers))
    }

    /// Recruitment funnel for one company, or for the first company by id
    /// when none is named.
    pub fn company_funnel(
        &self,
        company_id: Option<&CompanyId>,
    ) -> Result<CompanyFunnel, ReadinessError> {
        let criteria = match company_id {
            Some(id) => self
                .companies
                .fetch(id)?
                .ok_or_else(|| ReadinessError::CompanyNotFound(id.clone()))?,
            None => {
                let mut all = self.companies.all()?;
                all.sort_by(|a, b| a.company_id.cmp(&b.company_id));
                all.into_iter()
                    .next()
                    .ok_or(ReadinessError::NoCompaniesConfigured)?
            }
        };

        let standings = self.standings()?;
        let funnel = matching::funnel(&standings, &criteria);
        Ok(CompanyFunnel {
            company_id: criteria.company_id,
            company_name: criteria.company_name,
            role: criteria.role,
            min_cgpa: criteria.min_cgpa,
            min_prs: criteria.min_prs,
            funnel,
        })
    }

    /// Registers a parsed roster, writing an academic signal per row and a
    /// skills signal where the row declared any.
    pub fn import_roster(
        &self,
        students: Vec<StudentProfile>,
    ) -> Result<RosterSummary, ReadinessError> {
        let mut registered = 0usize;
        let mut signals_recorded = 0usize;

        for profile in students {
            let student_id = profile.student_id.clone();
            let cgpa = profile.cgpa;
            let skills = profile.skills.clone();

            self.register_student(profile)?;
            registered += 1;

            self.record_signal(&student_id, SignalPayload::Academic(AcademicSignal { cgpa }))?;
            signals_recorded += 1;

            if !skills.is_empty() {
                self.record_signal(&student_id, SignalPayload::Skills(SkillsSignal { skills }))?;
                signals_recorded += 1;
            }
        }

        Ok(RosterSummary {
            registered,
            signals_recorded,
        })
    }

    fn fetch_student(&self, student_id: &StudentId) -> Result<StudentRecord, ReadinessError> {
        let record = self
            .students
            .fetch(student_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    fn cached_if_fresh(&self, student_id: &StudentId, current_hash: &str) -> Option<PrsResult> {
        let cache = self.cache.lock().expect("score cache mutex poisoned");
        cache
            .get(student_id)
            .filter(|cached| cached.input_hash == current_hash)
            .cloned()
    }

    fn compute_slot(&self, student_id: &StudentId) -> ComputeSlot {
        let mut inflight = self.inflight.lock().expect("compute slot mutex poisoned");
        inflight
            .entry(student_id.clone())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    /// Pushes the student's recompute deadline out by the debounce window.
    /// The first write for a quiet student spawns the timer task; later
    /// writes only move the deadline.
    fn schedule_recompute(&self, student_id: StudentId) {
        let Some(window) = self.coordinator.debounce else {
            return;
        };

        let deadline = Instant::now() + window;
        let spawn_timer = {
            let mut pending = self.pending.lock().expect("debounce mutex poisoned");
            pending.insert(student_id.clone(), deadline).is_none()
        };

        if spawn_timer {
            if let Some(service) = self.handle.upgrade() {
                tokio::spawn(async move {
                    service.run_debounce(student_id).await;
                });
            }
        }
    }

    /// Sleeps until the deadline stops moving, then recomputes once. Errors
    /// are logged, never propagated; the next on-demand read will retry.
    async fn run_debounce(&self, student_id: StudentId) {
        loop {
            let deadline = {
                let pending = self.pending.lock().expect("debounce mutex poisoned");
                match pending.get(&student_id) {
                    Some(deadline) => *deadline,
                    None => return,
                }
            };
            if Instant::now() >= deadline {
                break;
            }
            tokio::time::sleep_until(deadline).await;
        }

        self.pending
            .lock()
            .expect("debounce mutex poisoned")
            .remove(&student_id);

        if let Err(error) = self.get_or_compute(&student_id).await {
            warn!(student = %student_id, error = %error, "debounced recompute failed");
        }
    }
}

fn validate_profile(profile: &StudentProfile) -> Result<(), ReadinessError> {
    if profile.student_id.0.trim().is_empty() {
        return Err(ReadinessError::InvalidProfile {
            reason: "student id is blank".to_string(),
        });
    }
    if profile.name.trim().is_empty() {
        return Err(ReadinessError::InvalidProfile {
            reason: "name is blank".to_string(),
        });
    }
    if profile.branch.trim().is_empty() {
        return Err(ReadinessError::InvalidProfile {
            reason: "branch is blank".to_string(),
        });
    }
    if !(1..=4).contains(&profile.year) {
        return Err(ReadinessError::InvalidProfile {
            reason: format!("year {} outside 1-4", profile.year),
        });
    }
    if !(0.0..=10.0).contains(&profile.cgpa) {
        return Err(ReadinessError::InvalidProfile {
            reason: format!("cgpa {} outside 0-10", profile.cgpa),
        });
    }
    Ok(())
}

/// Error raised by the readiness service.
#[derive(Debug, thiserror::Error)]
pub enum ReadinessError {
    #[error(transparent)]
    Score(#[from] ScoreError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("company {0} not found")]
    CompanyNotFound(CompanyId),
    #[error("no company criteria configured")]
    NoCompaniesConfigured,
    #[error("invalid student profile: {reason}")]
    InvalidProfile { reason: String },
    #[error("timed out after {waited:?} waiting for in-flight computation for student {student_id}")]
    ComputeTimeout {
        student_id: StudentId,
        waited: Duration,
    },
    #[error("cache entry for student {student_id} does not match the signals just scored")]
    StaleCache { student_id: StudentId },
    #[error("could not encode signal payload: {0}")]
    Encoding(#[from] serde_json::Error),
}
