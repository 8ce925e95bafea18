use super::common::*;
use crate::readiness::domain::{CompanyId, StudentId};
use crate::readiness::matching;
use crate::readiness::repository::{CompanyRepository, StudentStanding};
use crate::readiness::service::ReadinessError;

fn skills(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

/// Snapshot row with declared skills, the inputs the funnel gates on.
fn row(id: &str, branch: &str, cgpa: f64, held: &[&str], score: Option<u8>) -> StudentStanding {
    let mut standing = standing(id, branch, 3, cgpa, score);
    standing.record.profile.skills = skills(held);
    standing
}

#[test]
fn partial_skill_credit_rounds_to_one_decimal() {
    let required = skills(&["DSA", "Java", "SQL"]);
    assert_eq!(matching::match_percent(&required, &skills(&["dsa", "java"])), 66.7);
    assert_eq!(matching::match_percent(&required, &skills(&["SQL"])), 33.3);
    assert_eq!(matching::match_percent(&required, &skills(&["C++"])), 0.0);
}

#[test]
fn empty_requirements_are_a_full_match() {
    assert_eq!(matching::match_percent(&[], &skills(&["Python"])), 100.0);
    assert_eq!(matching::match_percent(&[], &[]), 100.0);
}

#[test]
fn missing_skills_lower_the_match_without_blocking_eligibility() {
    let criteria = company("c-tcs", "TCS", &["CSE", "IT"], 6.5, 55, &["DSA", "Java", "SQL"]);
    let mut profile = profile("s-1", "CSE", 3, 8.0);
    profile.skills = skills(&["DSA", "Java"]);

    let result = matching::evaluate(&profile, 70, &criteria);

    assert!(result.eligible);
    assert_eq!(result.match_percent, 66.7);
    assert_eq!(result.missing_skills, vec!["SQL".to_string()]);
    assert_eq!(result.company_id, CompanyId("c-tcs".to_string()));
    assert_eq!(result.student_id, StudentId("s-1".to_string()));
}

#[test]
fn branch_gate_ignores_case() {
    let criteria = company("c-1", "Acme", &["CSE", "IT"], 6.0, 50, &[]);

    let lower = profile("s-1", "cse", 3, 8.0);
    assert!(matching::evaluate(&lower, 60, &criteria).eligible);

    let outside = profile("s-2", "ECS", 3, 8.0);
    assert!(!matching::evaluate(&outside, 60, &criteria).eligible);
}

#[test]
fn cgpa_below_cutoff_blocks_eligibility() {
    let criteria = company("c-1", "Acme", &["CSE"], 6.5, 50, &[]);
    assert!(!matching::evaluate(&profile("s-1", "CSE", 3, 6.4), 60, &criteria).eligible);
    assert!(matching::evaluate(&profile("s-2", "CSE", 3, 6.5), 60, &criteria).eligible);
}

#[test]
fn readiness_below_cutoff_blocks_eligibility() {
    let criteria = company("c-1", "Acme", &["CSE"], 6.0, 55, &[]);
    assert!(!matching::evaluate(&profile("s-1", "CSE", 3, 8.0), 54, &criteria).eligible);
    assert!(matching::evaluate(&profile("s-1", "CSE", 3, 8.0), 55, &criteria).eligible);
}

#[test]
fn match_all_orders_strongest_first_with_stable_ties() {
    let mut profile = profile("s-1", "CSE", 3, 8.0);
    profile.skills = skills(&["Python", "SQL"]);

    let criteria = vec![
        company("c-partial", "Partial", &["CSE"], 6.0, 50, &["Python", "Java", "SQL"]),
        company("c-open", "Open", &["CSE"], 6.0, 50, &[]),
        company("c-covered", "Covered", &["CSE"], 6.0, 50, &["Python", "SQL"]),
    ];

    let results = matching::match_all(&profile, 70, &criteria);

    let order: Vec<&str> = results
        .iter()
        .map(|result| result.company_id.0.as_str())
        .collect();
    // Both full matches sit ahead of the partial one; the tie breaks on id.
    assert_eq!(order, vec!["c-covered", "c-open", "c-partial"]);
    assert_eq!(results[0].match_percent, 100.0);
    assert_eq!(results[2].match_percent, 66.7);
}

#[test]
fn funnel_stages_apply_cumulative_cutoffs() {
    let criteria = company("c-1", "Acme", &["CSE", "IT"], 7.0, 60, &["Python"]);
    let standings = vec![
        row("s-1", "CSE", 8.0, &["Python"], Some(80)),
        row("s-2", "CSE", 7.5, &["Python"], Some(40)),
        row("s-3", "CSE", 6.0, &["Python"], Some(90)),
        row("s-4", "IT", 8.0, &[], Some(90)),
        row("s-5", "ECS", 9.0, &["Python"], Some(90)),
        row("s-6", "CSE", 8.0, &["Python"], None),
    ];

    let stages = matching::funnel(&standings, &criteria);

    let counts: Vec<(&str, usize)> = stages
        .iter()
        .map(|stage| (stage.stage, stage.count))
        .collect();
    assert_eq!(
        counts,
        vec![
            ("Total Students", 6),
            ("Branch Eligible", 5),
            ("CGPA Cutoff", 4),
            ("Skills Match", 3),
            ("Readiness Cutoff", 1),
        ]
    );
    assert!(stages.windows(2).all(|pair| pair[0].count >= pair[1].count));
}

#[tokio::test]
async fn service_matches_against_every_company() {
    let (service, _students, companies) = build_service();
    companies
        .upsert(company("c-b", "Beta", &["CSE"], 6.0, 50, &["Python", "Java"]))
        .expect("upserts");
    companies
        .upsert(company("c-a", "Alpha", &["CSE"], 6.0, 50, &[]))
        .expect("upserts");

    let mut candidate = profile("s-1", "CSE", 3, 8.0);
    candidate.skills = vec!["Python".to_string()];
    service.register_student(candidate).expect("registers");
    service
        .record_signal(&StudentId("s-1".to_string()), github(80.0))
        .expect("stores");

    let results = service
        .company_matches(&StudentId("s-1".to_string()))
        .await
        .expect("matches");

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].company_id, CompanyId("c-a".to_string()));
    assert_eq!(results[0].match_percent, 100.0);
    assert_eq!(results[1].match_percent, 50.0);
    assert_eq!(results[1].missing_skills, vec!["Java".to_string()]);
}

#[tokio::test]
async fn service_reports_unknown_company() {
    let (service, _students, _companies) = build_service();
    service
        .register_student(profile("s-1", "CSE", 3, 8.0))
        .expect("registers");
    service
        .record_signal(&StudentId("s-1".to_string()), github(80.0))
        .expect("stores");

    match service
        .company_match(&StudentId("s-1".to_string()), &CompanyId("c-ghost".to_string()))
        .await
    {
        Err(ReadinessError::CompanyNotFound(company_id)) => {
            assert_eq!(company_id, CompanyId("c-ghost".to_string()));
        }
        other => panic!("expected company not found, got {other:?}"),
    }
}

#[test]
fn funnel_defaults_to_the_first_company_by_id() {
    let (service, _students, companies) = build_service();
    companies
        .upsert(company("c-b", "Beta", &["CSE"], 6.0, 50, &[]))
        .expect("upserts");
    companies
        .upsert(company("c-a", "Alpha", &["CSE"], 6.0, 50, &[]))
        .expect("upserts");

    let funnel = service.company_funnel(None).expect("funnel");
    assert_eq!(funnel.company_id, CompanyId("c-a".to_string()));
    assert_eq!(funnel.funnel.len(), 5);
}

#[test]
fn funnel_without_companies_is_an_error() {
    let (service, _students, _companies) = build_service();
    match service.company_funnel(None) {
        Err(ReadinessError::NoCompaniesConfigured) => {}
        other => panic!("expected missing configuration, got {other:?}"),
    }
}
