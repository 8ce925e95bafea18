//! Cohort aggregation over snapshot rows.
//!
//! Every function here consumes an immutable slice of [`StudentStanding`]
//! rows taken at one instant, so concurrent signal writes cannot produce a
//! heatmap whose buckets disagree with its own totals.

pub mod views;

use std::collections::HashMap;

use tracing::warn;

use super::domain::{SignalCategory, SignalPayload, Tier};
use super::repository::StudentStanding;
use super::scoring::{classify, skill_coverage, ScoringConfig, TierThresholds};
use views::{
    BatchRiskRow, CohortBucket, CohortReport, DashboardSummary, GapRow, GapStatus,
    RiskSegmentation, SkillFrequency, year_label,
};

/// Target average PRS per (branch, year) cohort, with a global fallback for
/// cohorts no benchmark was published for.
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    targets: HashMap<(String, u8), f64>,
    pub default_target: f64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            targets: HashMap::new(),
            default_target: 60.0,
        }
    }
}

impl BenchmarkConfig {
    pub fn with_target(mut self, branch: &str, year: u8, target: f64) -> Self {
        self.targets.insert((branch.to_string(), year), target);
        self
    }

    pub fn target_for(&self, branch: &str, year: u8) -> f64 {
        self.targets
            .get(&(branch.to_string(), year))
            .copied()
            .unwrap_or(self.default_target)
    }
}

#[derive(Default)]
struct BucketAccumulator {
    count: usize,
    prs_total: f64,
    cgpa_total: f64,
    github_total: f64,
    github_count: usize,
    resume_total: f64,
    resume_count: usize,
    skills_total: f64,
    skills_count: usize,
}

fn malformed(standing: &StudentStanding) -> bool {
    let profile = &standing.record.profile;
    profile.branch.trim().is_empty() || !(1..=4).contains(&profile.year)
}

/// Groups the snapshot by (branch, year) and derives the heatmap, benchmark
/// gaps, and tier counts in a single pass.
///
/// A malformed row (blank branch or out-of-range year) is skipped and counted
/// rather than failing the whole rollup.
pub(crate) fn aggregate(
    standings: &[StudentStanding],
    benchmarks: &BenchmarkConfig,
    scoring: &ScoringConfig,
) -> CohortReport {
    let mut buckets: HashMap<(String, u8), BucketAccumulator> = HashMap::new();
    let mut risk_segmentation = RiskSegmentation::default();
    let mut skipped = 0usize;

    for standing in standings {
        let profile = &standing.record.profile;
        if malformed(standing) {
            skipped += 1;
            warn!(
                student = %profile.student_id,
                branch = %profile.branch,
                year = profile.year,
                "skipping malformed record during cohort aggregation"
            );
            continue;
        }

        let score = f64::from(standing.effective_score());
        match classify(score, &scoring.tiers) {
            Tier::Red => risk_segmentation.red += 1,
            Tier::Yellow => risk_segmentation.yellow += 1,
            Tier::Green => risk_segmentation.green += 1,
        }

        let accumulator = buckets
            .entry((profile.branch.clone(), profile.year))
            .or_default();
        accumulator.count += 1;
        accumulator.prs_total += score;
        accumulator.cgpa_total += profile.cgpa;

        if let Some(record) = standing.record.signals.get(SignalCategory::Github) {
            if let SignalPayload::Github(github) = &record.payload {
                accumulator.github_total += github.github_score.clamp(0.0, 100.0);
                accumulator.github_count += 1;
            }
        }
        if let Some(record) = standing.record.signals.get(SignalCategory::Resume) {
            if let SignalPayload::Resume(resume) = &record.payload {
                accumulator.resume_total += resume.ats_score.clamp(0.0, 100.0);
                accumulator.resume_count += 1;
            }
        }
        if let Some(record) = standing.record.signals.get(SignalCategory::Skills) {
            if let SignalPayload::Skills(skills) = &record.payload {
                accumulator.skills_total +=
                    skill_coverage(&skills.skills, &scoring.skill_taxonomy);
                accumulator.skills_count += 1;
            }
        }
    }

    let mut heatmap: Vec<CohortBucket> = buckets
        .into_iter()
        .map(|((branch, year), accumulator)| {
            let count = accumulator.count as f64;
            CohortBucket {
                branch,
                year,
                count: accumulator.count,
                avg_prs: round1(accumulator.prs_total / count),
                avg_cgpa: round2(accumulator.cgpa_total / count),
                avg_github: average(accumulator.github_total, accumulator.github_count),
                avg_resume: average(accumulator.resume_total, accumulator.resume_count),
                avg_skills: average(accumulator.skills_total, accumulator.skills_count),
            }
        })
        .collect();
    heatmap.sort_by(|a, b| a.branch.cmp(&b.branch).then(a.year.cmp(&b.year)));

    let gap_analysis = heatmap
        .iter()
        .map(|bucket| {
            let target_prs = benchmarks.target_for(&bucket.branch, bucket.year);
            GapRow {
                branch: bucket.branch.clone(),
                year: bucket.year,
                actual_prs: bucket.avg_prs,
                target_prs,
                gap: round1(bucket.avg_prs - target_prs),
                status: if bucket.avg_prs >= target_prs {
                    GapStatus::Above
                } else {
                    GapStatus::Below
                },
            }
        })
        .collect();

    CohortReport {
        heatmap,
        gap_analysis,
        risk_segmentation,
        skipped,
    }
}

/// Population-wide totals for the institutional dashboard. Unscored students
/// enter with an effective score of zero rather than vanishing.
pub(crate) fn dashboard_summary(
    standings: &[StudentStanding],
    thresholds: &TierThresholds,
) -> DashboardSummary {
    let mut summary = DashboardSummary {
        total_students: standings.len(),
        avg_prs: 0.0,
        red_count: 0,
        yellow_count: 0,
        green_count: 0,
    };

    if standings.is_empty() {
        return summary;
    }

    let mut total = 0.0;
    for standing in standings {
        let score = f64::from(standing.effective_score());
        total += score;
        match classify(score, thresholds) {
            Tier::Red => summary.red_count += 1,
            Tier::Yellow => summary.yellow_count += 1,
            Tier::Green => summary.green_count += 1,
        }
    }
    summary.avg_prs = round1(total / standings.len() as f64);
    summary
}

/// Most frequently declared skills across the population, ties alphabetical.
pub(crate) fn skills_analytics(standings: &[StudentStanding], top: usize) -> Vec<SkillFrequency> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for standing in standings {
        for skill in &standing.record.profile.skills {
            let normalized = skill.trim().to_lowercase();
            if normalized.is_empty() {
                continue;
            }
            *counts.entry(normalized).or_insert(0) += 1;
        }
    }

    let mut frequencies: Vec<SkillFrequency> = counts
        .into_iter()
        .map(|(skill, count)| SkillFrequency { skill, count })
        .collect();
    frequencies.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.skill.cmp(&b.skill)));
    frequencies.truncate(top);
    frequencies
}

/// Per-batch tier counts for the risk table, labelled "1st Year CSE" style.
pub(crate) fn batch_risks(
    standings: &[StudentStanding],
    thresholds: &TierThresholds,
) -> Vec<BatchRiskRow> {
    let mut buckets: HashMap<(String, u8), (usize, f64, RiskSegmentation)> = HashMap::new();

    for standing in standings {
        if malformed(standing) {
            continue;
        }
        let profile = &standing.record.profile;
        let score = f64::from(standing.effective_score());
        let (count, prs_total, segmentation) = buckets
            .entry((profile.branch.clone(), profile.year))
            .or_default();
        *count += 1;
        *prs_total += score;
        match classify(score, thresholds) {
            Tier::Red => segmentation.red += 1,
            Tier::Yellow => segmentation.yellow += 1,
            Tier::Green => segmentation.green += 1,
        }
    }

    let mut rows: Vec<BatchRiskRow> = buckets
        .into_iter()
        .map(|((branch, year), (total, prs_total, segmentation))| BatchRiskRow {
            batch: format!("{} {branch}", year_label(year)),
            branch,
            year,
            total,
            avg_prs: round1(prs_total / total as f64),
            red: segmentation.red,
            yellow: segmentation.yellow,
            green: segmentation.green,
        })
        .collect();
    rows.sort_by(|a, b| a.branch.cmp(&b.branch).then(a.year.cmp(&b.year)));
    rows
}

fn average(total: f64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    round1(total / count as f64)
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
