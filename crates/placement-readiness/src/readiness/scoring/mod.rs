mod config;
mod policy;
mod rules;

pub use config::{CategoryWeights, ScoringConfig, ScoringConfigError, TierThresholds};

pub(crate) use policy::classify;
pub(crate) use rules::skill_coverage;

use chrono::Utc;

use super::domain::{CategoryContribution, PrsResult, ScoreBreakdown, SignalCategory, StudentId};
use super::domain::SignalSet;
use super::hash;

/// Stateless scorer applying the weighted rubric to a student's signal set.
pub struct PrsScorer {
    config: ScoringConfig,
}

impl PrsScorer {
    /// Builds a scorer, rejecting invalid rubrics up front.
    pub fn new(config: ScoringConfig) -> Result<Self, ScoringConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Computes the composite score over every present signal.
    ///
    /// Absent categories contribute zero and are flagged `incomplete`; they are
    /// never an error. Only a fully empty signal set is unscorable.
    pub fn compute(
        &self,
        student_id: &StudentId,
        signals: &SignalSet,
    ) -> Result<PrsResult, ScoreError> {
        let mut breakdown = ScoreBreakdown::default();
        let mut weighted_total = 0.0;
        let mut present = 0usize;

        for category in SignalCategory::ALL {
            let Some(record) = signals.get(category) else {
                continue;
            };
            present += 1;

            let normalized = rules::normalized_value(record, &self.config.skill_taxonomy);
            let contribution = self.config.weights.get(category) * normalized;
            weighted_total += contribution;
            breakdown.set(
                category,
                CategoryContribution {
                    contribution,
                    incomplete: false,
                },
            );
        }

        if present == 0 {
            return Err(ScoreError::InsufficientData {
                student_id: student_id.clone(),
            });
        }

        let score = weighted_total.round().clamp(0.0, 100.0) as u8;

        Ok(PrsResult {
            student_id: student_id.clone(),
            score,
            tier: policy::classify(f64::from(score), &self.config.tiers),
            breakdown,
            input_hash: hash::combined_input_hash(signals),
            computed_at: Utc::now(),
        })
    }
}

/// Raised when a profile cannot produce a meaningful score.
#[derive(Debug, thiserror::Error)]
pub enum ScoreError {
    #[error("no signals recorded for student {student_id}")]
    InsufficientData { student_id: StudentId },
}
