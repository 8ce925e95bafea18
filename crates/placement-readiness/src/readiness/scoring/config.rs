use serde::{Deserialize, Serialize};

use super::super::domain::SignalCategory;

/// Weights must sum to 1.0 within this tolerance.
pub(crate) const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Per-category weights for the composite score. A zero weight keeps the
/// category in the breakdown while removing its influence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeights {
    pub github: f64,
    pub resume: f64,
    pub academic: f64,
    pub skills: f64,
    pub aptitude: f64,
    pub soft_skills: f64,
}

impl CategoryWeights {
    pub fn get(&self, category: SignalCategory) -> f64 {
        match category {
            SignalCategory::Github => self.github,
            SignalCategory::Resume => self.resume,
            SignalCategory::Academic => self.academic,
            SignalCategory::Skills => self.skills,
            SignalCategory::Aptitude => self.aptitude,
            SignalCategory::SoftSkills => self.soft_skills,
        }
    }

    pub fn sum(&self) -> f64 {
        SignalCategory::ALL
            .iter()
            .map(|category| self.get(*category))
            .sum()
    }
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            github: 0.25,
            resume: 0.20,
            academic: 0.10,
            skills: 0.20,
            aptitude: 0.15,
            soft_skills: 0.10,
        }
    }
}

/// Single canonical tier table: `Red < red_below <= Yellow < green_from <= Green`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub red_below: f64,
    pub green_from: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            red_below: 40.0,
            green_from: 75.0,
        }
    }
}

/// Scoring rubric: weights, tier cutoffs, and the skill taxonomy used for the
/// coverage ratio. Validated once at load time, never per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub weights: CategoryWeights,
    pub tiers: TierThresholds,
    pub skill_taxonomy: Vec<String>,
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ScoringConfigError> {
        for category in SignalCategory::ALL {
            let weight = self.weights.get(category);
            if weight < 0.0 {
                return Err(ScoringConfigError::NegativeWeight { category, weight });
            }
        }

        let sum = self.weights.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ScoringConfigError::WeightSum { sum });
        }

        for value in [self.tiers.red_below, self.tiers.green_from] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ScoringConfigError::ThresholdOutOfRange { value });
            }
        }
        if self.tiers.red_below > self.tiers.green_from {
            return Err(ScoringConfigError::ThresholdOrder {
                red_below: self.tiers.red_below,
                green_from: self.tiers.green_from,
            });
        }

        if self.skill_taxonomy.is_empty() {
            return Err(ScoringConfigError::EmptyTaxonomy);
        }

        Ok(())
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: CategoryWeights::default(),
            tiers: TierThresholds::default(),
            skill_taxonomy: default_skill_taxonomy(),
        }
    }
}

/// Skill names recognized by the coverage ratio, drawn from the skills the
/// placement cell tracks across drives. Matching is case-insensitive.
fn default_skill_taxonomy() -> Vec<String> {
    [
        "Python",
        "Java",
        "C++",
        "C",
        "JavaScript",
        "TypeScript",
        "HTML",
        "CSS",
        "MongoDB",
        "MySQL",
        "React",
        "Next.js",
        "Node.js",
        "FastAPI",
        "Firebase",
        "Git",
        "DSA",
        "Machine Learning",
        "Arduino",
        "ESP32",
        "SQL",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

/// Rejected rubric configuration. Raised at startup; a service must not come
/// up with an invalid rubric.
#[derive(Debug, thiserror::Error)]
pub enum ScoringConfigError {
    #[error("category weights sum to {sum:.6}, expected 1.0")]
    WeightSum { sum: f64 },
    #[error("negative weight {weight} for category {category}")]
    NegativeWeight {
        category: SignalCategory,
        weight: f64,
    },
    #[error("tier threshold {value} outside 0-100")]
    ThresholdOutOfRange { value: f64 },
    #[error("tier thresholds out of order: red_below {red_below} exceeds green_from {green_from}")]
    ThresholdOrder { red_below: f64, green_from: f64 },
    #[error("skill taxonomy is empty")]
    EmptyTaxonomy,
}
