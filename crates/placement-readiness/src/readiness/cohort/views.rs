use serde::Serialize;

use super::super::domain::CompanyId;

#[derive(Debug, Clone, Serialize)]
pub struct CohortBucket {
    pub branch: String,
    pub year: u8,
    pub count: usize,
    pub avg_prs: f64,
    pub avg_cgpa: f64,
    pub avg_github: f64,
    pub avg_resume: f64,
    pub avg_skills: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GapStatus {
    Above,
    Below,
}

#[derive(Debug, Clone, Serialize)]
pub struct GapRow {
    pub branch: String,
    pub year: u8,
    pub actual_prs: f64,
    pub target_prs: f64,
    pub gap: f64,
    pub status: GapStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RiskSegmentation {
    pub red: usize,
    pub yellow: usize,
    pub green: usize,
}

/// Snapshot-consistent cohort rollup: heatmap buckets, benchmark gaps, and
/// tier counts all derive from the same pass over the same rows.
#[derive(Debug, Clone, Serialize)]
pub struct CohortReport {
    pub heatmap: Vec<CohortBucket>,
    pub gap_analysis: Vec<GapRow>,
    pub risk_segmentation: RiskSegmentation,
    /// Malformed rows skipped during aggregation, surfaced as a data-quality
    /// warning instead of failing the pipeline.
    pub skipped: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub total_students: usize,
    pub avg_prs: f64,
    pub red_count: usize,
    pub yellow_count: usize,
    pub green_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillFrequency {
    pub skill: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchRiskRow {
    pub batch: String,
    pub branch: String,
    pub year: u8,
    pub total: usize,
    pub avg_prs: f64,
    pub red: usize,
    pub yellow: usize,
    pub green: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunnelStage {
    pub stage: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyFunnel {
    pub company_id: CompanyId,
    pub company_name: String,
    pub role: String,
    pub min_cgpa: f64,
    pub min_prs: u8,
    pub funnel: Vec<FunnelStage>,
}

pub(crate) fn year_label(year: u8) -> &'static str {
    match year {
        1 => "1st Year",
        2 => "2nd Year",
        3 => "3rd Year",
        4 => "4th Year",
        _ => "Unknown Year",
    }
}
