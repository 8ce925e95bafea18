use std::collections::HashSet;

use super::cohort::views::FunnelStage;
use super::domain::{CompanyCriteria, EligibilityResult, StudentProfile};
use super::repository::StudentStanding;

/// Share of `required` skills present in `held`, rounded to one decimal.
/// An empty requirement list is a 100% match by definition.
pub(crate) fn match_percent(required: &[String], held: &[String]) -> f64 {
    if required.is_empty() {
        return 100.0;
    }

    let held = normalized_set(held);
    let matched = required
        .iter()
        .filter(|skill| held.contains(&normalize(skill)))
        .count();

    (matched as f64 * 100.0 / required.len() as f64 * 10.0).round() / 10.0
}

/// Matches one student against one company's criteria.
///
/// Partial skill credit feeds `match_percent`; the `eligible` flag stays a
/// hard conjunction of branch, CGPA, and readiness cutoffs.
pub(crate) fn evaluate(
    profile: &StudentProfile,
    prs_score: u8,
    criteria: &CompanyCriteria,
) -> EligibilityResult {
    let held = normalized_set(&profile.skills);
    let missing_skills = criteria
        .required_skills
        .iter()
        .filter(|skill| !held.contains(&normalize(skill)))
        .cloned()
        .collect();

    let branch_allowed = criteria
        .allowed_branches
        .iter()
        .any(|branch| branch.eq_ignore_ascii_case(&profile.branch));
    let eligible = branch_allowed
        && profile.cgpa >= criteria.min_cgpa
        && prs_score >= criteria.min_prs;

    EligibilityResult {
        company_id: criteria.company_id.clone(),
        company_name: criteria.company_name.clone(),
        role: criteria.role.clone(),
        student_id: profile.student_id.clone(),
        match_percent: match_percent(&criteria.required_skills, &profile.skills),
        eligible,
        missing_skills,
    }
}

/// Evaluates every company, strongest match first; ties break on company id
/// so repeated calls return the same order.
pub(crate) fn match_all(
    profile: &StudentProfile,
    prs_score: u8,
    criteria: &[CompanyCriteria],
) -> Vec<EligibilityResult> {
    let mut results: Vec<EligibilityResult> = criteria
        .iter()
        .map(|company| evaluate(profile, prs_score, company))
        .collect();
    results.sort_by(|a, b| {
        b.match_percent
            .total_cmp(&a.match_percent)
            .then_with(|| a.company_id.cmp(&b.company_id))
    });
    results
}

/// Cumulative recruitment funnel for one company over a population snapshot.
/// Each stage applies its cutoff on top of every earlier stage.
pub(crate) fn funnel(
    standings: &[StudentStanding],
    criteria: &CompanyCriteria,
) -> Vec<FunnelStage> {
    let mut branch_eligible = 0usize;
    let mut cgpa_cutoff = 0usize;
    let mut skills_match = 0usize;
    let mut readiness_cutoff = 0usize;

    for standing in standings {
        let profile = &standing.record.profile;
        let branch_allowed = criteria
            .allowed_branches
            .iter()
            .any(|branch| branch.eq_ignore_ascii_case(&profile.branch));
        if !branch_allowed {
            continue;
        }
        branch_eligible += 1;

        if profile.cgpa < criteria.min_cgpa {
            continue;
        }
        cgpa_cutoff += 1;

        let held = normalized_set(&profile.skills);
        let all_required = criteria
            .required_skills
            .iter()
            .all(|skill| held.contains(&normalize(skill)));
        if !all_required {
            continue;
        }
        skills_match += 1;

        if standing.effective_score() >= criteria.min_prs {
            readiness_cutoff += 1;
        }
    }

    vec![
        FunnelStage {
            stage: "Total Students",
            count: standings.len(),
        },
        FunnelStage {
            stage: "Branch Eligible",
            count: branch_eligible,
        },
        FunnelStage {
            stage: "CGPA Cutoff",
            count: cgpa_cutoff,
        },
        FunnelStage {
            stage: "Skills Match",
            count: skills_match,
        },
        FunnelStage {
            stage: "Readiness Cutoff",
            count: readiness_cutoff,
        },
    ]
}

fn normalize(skill: &str) -> String {
    skill.trim().to_lowercase()
}

fn normalized_set(skills: &[String]) -> HashSet<String> {
    skills
        .iter()
        .map(|skill| normalize(skill))
        .filter(|skill| !skill.is_empty())
        .collect()
}
