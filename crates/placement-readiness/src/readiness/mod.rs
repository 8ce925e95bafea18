//! Placement readiness scoring, eligibility matching, and cohort analytics.
//!
//! Producers (GitHub/resume analyzers, assessment pipelines, roster import)
//! write signals; the service owns the score cache and recompute
//! coordination; consumers read scores, company matches, and cohort rollups
//! through the service facade or the HTTP router.

pub mod cohort;
pub mod domain;
mod hash;
pub(crate) mod matching;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use cohort::views::{
    BatchRiskRow, CohortBucket, CohortReport, CompanyFunnel, DashboardSummary, FunnelStage,
    GapRow, GapStatus, RiskSegmentation, SkillFrequency,
};
pub use cohort::BenchmarkConfig;
pub use domain::{
    AcademicSignal, ActivitySummary, AssessmentSignal, CategoryContribution, CompanyCriteria,
    CompanyId, EligibilityResult, GithubSignal, PrsResult, RepoSnapshot, ResumeSignal,
    ScoreBreakdown, SignalCategory, SignalPayload, SignalRecord, SignalSet, SkillsSignal,
    StudentId, StudentProfile, Tier,
};
pub use repository::{
    CompanyRepository, RepositoryError, StudentRecord, StudentRepository, StudentStanding,
    StudentView,
};
pub use router::{readiness_router, RegisterStudentRequest};
pub use scoring::{
    CategoryWeights, PrsScorer, ScoreError, ScoringConfig, ScoringConfigError, TierThresholds,
};
pub use service::{
    CacheStats, CoordinatorConfig, ReadinessError, ReadinessService, RosterSummary,
};
