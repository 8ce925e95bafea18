use std::collections::HashSet;

use super::super::domain::{SignalPayload, SignalRecord};

/// Maps one signal onto the 0-100 scale the weighted sum expects.
///
/// GitHub and assessment scores arrive already scaled; resume scoring uses the
/// ATS sub-score; academics stretch the 10-point CGPA; skills use the coverage
/// ratio against the taxonomy. Out-of-range inputs are clamped, not rejected.
pub(crate) fn normalized_value(record: &SignalRecord, taxonomy: &[String]) -> f64 {
    let raw = match &record.payload {
        SignalPayload::Github(github) => github.github_score,
        SignalPayload::Resume(resume) => resume.ats_score,
        SignalPayload::Academic(academic) => academic.cgpa / 10.0 * 100.0,
        SignalPayload::Skills(skills) => skill_coverage(&skills.skills, taxonomy),
        SignalPayload::Aptitude(assessment) | SignalPayload::SoftSkills(assessment) => {
            assessment.score
        }
    };
    raw.clamp(0.0, 100.0)
}

/// Share of the taxonomy the student's declared skills cover, 0-100.
/// Comparison is case-insensitive and whitespace-tolerant.
pub(crate) fn skill_coverage(skills: &[String], taxonomy: &[String]) -> f64 {
    if taxonomy.is_empty() {
        return 0.0;
    }

    let held: HashSet<String> = skills
        .iter()
        .map(|skill| skill.trim().to_lowercase())
        .filter(|skill| !skill.is_empty())
        .collect();

    let covered = taxonomy
        .iter()
        .filter(|entry| held.contains(&entry.trim().to_lowercase()))
        .count();

    covered as f64 * 100.0 / taxonomy.len() as f64
}
