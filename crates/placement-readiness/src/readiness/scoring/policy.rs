use super::super::domain::Tier;
use super::config::TierThresholds;

/// Classifies a composite score against the canonical tier table. Every
/// consumer (scorer, risk segmentation, dashboards) goes through here so the
/// cutoffs cannot drift between views.
pub(crate) fn classify(score: f64, thresholds: &TierThresholds) -> Tier {
    if score < thresholds.red_below {
        Tier::Red
    } else if score >= thresholds.green_from {
        Tier::Green
    } else {
        Tier::Yellow
    }
}
