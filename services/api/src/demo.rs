use crate::infra::{
    default_benchmarks, default_scoring_config, seed_companies, InMemoryCompanyRepository,
    InMemoryStudentRepository,
};
use chrono::Local;
use clap::Args;
use placement_readiness::error::AppError;
use placement_readiness::readiness::{
    ActivitySummary, AssessmentSignal, CompanyRepository, CoordinatorConfig, GithubSignal,
    ReadinessService, ResumeSignal, SignalPayload, StudentId, StudentProfile,
};
use placement_readiness::roster::RosterImporter;
use std::path::PathBuf;
use std::sync::Arc;

type DemoService = ReadinessService<InMemoryStudentRepository, InMemoryCompanyRepository>;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Optional roster CSV to seed the cohort instead of the built-in sample
    #[arg(long)]
    pub(crate) roster_csv: Option<PathBuf>,
    /// Skip the company matching portion of the demo output
    #[arg(long)]
    pub(crate) skip_matching: bool,
}

#[derive(Args, Debug)]
pub(crate) struct RosterReportArgs {
    /// Roster CSV export to import
    #[arg(long)]
    pub(crate) roster_csv: PathBuf,
    /// Restrict the batch risk listing to one branch code
    #[arg(long)]
    pub(crate) branch: Option<String>,
    /// Include a per-student score listing in the output
    #[arg(long)]
    pub(crate) list_students: bool,
}

/// One-shot commands disable the debounce window so no background recompute
/// outlives the run.
fn build_service() -> Result<Arc<DemoService>, AppError> {
    let students = Arc::new(InMemoryStudentRepository::default());
    let companies = Arc::new(InMemoryCompanyRepository::default());
    for criteria in seed_companies() {
        companies
            .upsert(criteria)
            .map_err(placement_readiness::readiness::ReadinessError::from)?;
    }

    let coordinator = CoordinatorConfig {
        debounce: None,
        ..CoordinatorConfig::default()
    };
    let service = ReadinessService::new(
        students,
        companies,
        default_scoring_config(),
        default_benchmarks(),
        coordinator,
    )?;
    Ok(service)
}

pub(crate) async fn run_roster_report(args: RosterReportArgs) -> Result<(), AppError> {
    let RosterReportArgs {
        roster_csv,
        branch,
        list_students,
    } = args;

    let students = RosterImporter::from_path(&roster_csv)?;
    let service = build_service()?;
    let summary = service.import_roster(students)?;
    println!(
        "Roster report generated {}",
        Local::now().format("%Y-%m-%d %H:%M")
    );
    println!(
        "Imported roster: {} students, {} signals",
        summary.registered, summary.signals_recorded
    );

    score_cohort(&service).await?;
    render_cohort(&service, branch.as_deref(), list_students).await?;
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        roster_csv,
        skip_matching,
    } = args;

    println!("Placement readiness demo");
    let service = build_service()?;

    match roster_csv {
        Some(path) => {
            let students = RosterImporter::from_path(&path)?;
            let summary = service.import_roster(students)?;
            println!(
                "Data source: roster CSV import ({} students)",
                summary.registered
            );
        }
        None => {
            seed_sample_cohort(&service)?;
            println!("Data source: built-in sample cohort");
        }
    }

    score_cohort(&service).await?;
    render_cohort(&service, None, true).await?;

    if !skip_matching {
        render_matching(&service).await?;
    }

    let stats = service.cache_stats();
    println!(
        "\nScore cache: {} hits, {} computations",
        stats.hits, stats.computations
    );
    Ok(())
}

fn seed_sample_cohort(service: &Arc<DemoService>) -> Result<(), AppError> {
    let roster = [
        ("s-001", "Aarav Mehta", "CSE", 3, 8.4),
        ("s-002", "Riya Sharma", "IT", 4, 7.1),
        ("s-003", "Om Jadhav", "ECS", 4, 6.2),
        ("s-004", "Sneha Kulkarni", "CSE", 4, 9.0),
    ];
    for (id, name, branch, year, cgpa) in roster {
        service.register_student(StudentProfile {
            student_id: StudentId(id.to_string()),
            name: name.to_string(),
            branch: branch.to_string(),
            year,
            cgpa,
            skills: Vec::new(),
        })?;
    }

    let signals: [(&str, SignalPayload); 14] = [
        ("s-001", github_signal(18, 72.0, &["Python", "TypeScript"])),
        ("s-001", resume_signal(70.0, 65.0)),
        ("s-001", academic_signal(8.4)),
        ("s-001", skills_signal(&["Python", "SQL", "DSA", "Java", "Git"])),
        ("s-001", SignalPayload::Aptitude(AssessmentSignal { score: 81.0 })),
        ("s-002", github_signal(6, 38.0, &["Java"])),
        ("s-002", resume_signal(55.0, 48.0)),
        ("s-002", academic_signal(7.1)),
        ("s-002", skills_signal(&["Java", "SQL", "Communication"])),
        ("s-003", academic_signal(6.2)),
        ("s-003", skills_signal(&["Python", "Arduino", "ESP32"])),
        ("s-004", github_signal(24, 88.0, &["Python", "C++"])),
        ("s-004", academic_signal(9.0)),
        (
            "s-004",
            skills_signal(&["Python", "SQL", "DSA", "Java", "System Design", "Machine Learning"]),
        ),
    ];
    for (id, payload) in signals {
        service.record_signal(&StudentId(id.to_string()), payload)?;
    }
    Ok(())
}

async fn score_cohort(service: &Arc<DemoService>) -> Result<(), AppError> {
    for standing in service.standings()? {
        let student_id = standing.record.profile.student_id.clone();
        if let Err(error) = service.get_or_compute(&student_id).await {
            println!("- {student_id}: not scored ({error})");
        }
    }
    Ok(())
}

async fn render_cohort(
    service: &Arc<DemoService>,
    branch: Option<&str>,
    list_students: bool,
) -> Result<(), AppError> {
    let summary = service.dashboard_summary()?;
    println!("\nCohort summary");
    println!(
        "- {} students, average PRS {:.1}",
        summary.total_students, summary.avg_prs
    );
    println!(
        "- Risk split: {} red / {} yellow / {} green",
        summary.red_count, summary.yellow_count, summary.green_count
    );

    let report = service.cohort_report()?;
    println!("\nBranch-year heatmap");
    for bucket in &report.heatmap {
        println!(
            "- {} year {}: {} students, avg PRS {:.1}, avg CGPA {:.2}",
            bucket.branch, bucket.year, bucket.count, bucket.avg_prs, bucket.avg_cgpa
        );
    }
    if report.skipped > 0 {
        println!("- {} malformed rows skipped", report.skipped);
    }

    println!("\nBenchmark gaps");
    for gap in &report.gap_analysis {
        println!(
            "- {} year {}: actual {:.1} vs target {:.1} ({:?})",
            gap.branch, gap.year, gap.actual_prs, gap.target_prs, gap.status
        );
    }

    println!("\nTop skills");
    for entry in service.skills_analytics(8)? {
        println!("- {}: {}", entry.skill, entry.count);
    }

    println!("\nBatch risk");
    for row in service.batch_risks(branch)? {
        println!(
            "- {}: {} students, avg PRS {:.1}, {} red / {} yellow / {} green",
            row.batch, row.total, row.avg_prs, row.red, row.yellow, row.green
        );
    }

    if list_students {
        println!("\nStudent scores");
        for standing in service.standings()? {
            let profile = &standing.record.profile;
            match &standing.prs {
                Some(prs) => println!(
                    "- {} | {} | {} year {} | PRS {} ({})",
                    profile.student_id,
                    profile.name,
                    profile.branch,
                    profile.year,
                    prs.score,
                    prs.tier.label()
                ),
                None => println!(
                    "- {} | {} | {} year {} | unscored",
                    profile.student_id, profile.name, profile.branch, profile.year
                ),
            }
        }
    }

    Ok(())
}

async fn render_matching(service: &Arc<DemoService>) -> Result<(), AppError> {
    let Some(standing) = service.standings()?.into_iter().max_by_key(|s| s.effective_score())
    else {
        return Ok(());
    };
    let student_id = standing.record.profile.student_id.clone();

    println!(
        "\nCompany matches for {} ({})",
        standing.record.profile.name, student_id
    );
    for result in service.company_matches(&student_id).await? {
        let verdict = if result.eligible { "eligible" } else { "not eligible" };
        if result.missing_skills.is_empty() {
            println!(
                "- {} {} | match {:.1}% | {}",
                result.company_name, result.role, result.match_percent, verdict
            );
        } else {
            println!(
                "- {} {} | match {:.1}% | {} | missing: {}",
                result.company_name,
                result.role,
                result.match_percent,
                verdict,
                result.missing_skills.join(", ")
            );
        }
    }

    let funnel = service.company_funnel(None)?;
    println!(
        "\nRecruitment funnel: {} ({})",
        funnel.company_name, funnel.role
    );
    for stage in &funnel.funnel {
        println!("- {}: {}", stage.stage, stage.count);
    }

    Ok(())
}

fn github_signal(public_repos: u32, github_score: f64, top_languages: &[&str]) -> SignalPayload {
    SignalPayload::Github(GithubSignal {
        public_repos,
        github_score,
        followers: 0,
        following: 0,
        top_languages: top_languages.iter().map(|s| s.to_string()).collect(),
        activity_summary: ActivitySummary::default(),
        repo_analysis: Vec::new(),
    })
}

fn resume_signal(resume_score: f64, ats_score: f64) -> SignalPayload {
    SignalPayload::Resume(ResumeSignal {
        resume_score,
        ats_score,
        missing_sections: Vec::new(),
        profile_mismatches: Vec::new(),
        suggestions: Vec::new(),
    })
}

fn academic_signal(cgpa: f64) -> SignalPayload {
    SignalPayload::Academic(placement_readiness::readiness::AcademicSignal { cgpa })
}

fn skills_signal(skills: &[&str]) -> SignalPayload {
    SignalPayload::Skills(placement_readiness::readiness::SkillsSignal {
        skills: skills.iter().map(|s| s.to_string()).collect(),
    })
}
