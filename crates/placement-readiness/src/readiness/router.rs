use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::domain::{CompanyId, SignalPayload, StudentId, StudentProfile};
use super::repository::{CompanyRepository, RepositoryError, StudentRepository};
use super::scoring::ScoreError;
use super::service::{ReadinessError, ReadinessService};

/// Router builder exposing the scoring, matching, and analytics endpoints.
pub fn readiness_router<S, C>(service: Arc<ReadinessService<S, C>>) -> Router
where
    S: StudentRepository + 'static,
    C: CompanyRepository + 'static,
{
    Router::new()
        .route("/api/v1/students", post(register_handler::<S, C>))
        .route(
            "/api/v1/students/:student_id/signals",
            post(signal_handler::<S, C>),
        )
        .route("/api/v1/students/:student_id/prs", get(prs_handler::<S, C>))
        .route(
            "/api/v1/students/:student_id/matches",
            get(matches_handler::<S, C>),
        )
        .route(
            "/api/v1/students/:student_id/matches/:company_id",
            get(company_match_handler::<S, C>),
        )
        .route("/api/v1/analytics/summary", get(summary_handler::<S, C>))
        .route("/api/v1/analytics/heatmap", get(heatmap_handler::<S, C>))
        .route(
            "/api/v1/analytics/gap-analysis",
            get(gap_analysis_handler::<S, C>),
        )
        .route("/api/v1/analytics/skills", get(skills_handler::<S, C>))
        .route(
            "/api/v1/analytics/batch-risks",
            get(batch_risks_handler::<S, C>),
        )
        .route(
            "/api/v1/analytics/company-funnel",
            get(company_funnel_handler::<S, C>),
        )
        .with_state(service)
}

/// Registration payload accepted by `POST /api/v1/students`.
#[derive(Debug, Deserialize)]
pub struct RegisterStudentRequest {
    pub student_id: String,
    pub name: String,
    pub branch: String,
    pub year: u8,
    pub cgpa: f64,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SkillsQuery {
    top: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BatchRisksQuery {
    branch: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FunnelQuery {
    company_id: Option<String>,
}

pub(crate) async fn register_handler<S, C>(
    State(service): State<Arc<ReadinessService<S, C>>>,
    axum::Json(request): axum::Json<RegisterStudentRequest>,
) -> Response
where
    S: StudentRepository + 'static,
    C: CompanyRepository + 'static,
{
    let profile = StudentProfile {
        student_id: StudentId(request.student_id),
        name: request.name,
        branch: request.branch,
        year: request.year,
        cgpa: request.cgpa,
        skills: request.skills,
    };

    match service.register_student(profile) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn signal_handler<S, C>(
    State(service): State<Arc<ReadinessService<S, C>>>,
    Path(student_id): Path<String>,
    axum::Json(payload): axum::Json<SignalPayload>,
) -> Response
where
    S: StudentRepository + 'static,
    C: CompanyRepository + 'static,
{
    let student_id = StudentId(student_id);
    match service.record_signal(&student_id, payload) {
        Ok(record) => {
            let body = json!({
                "student_id": student_id,
                "category": record.category,
                "input_hash": record.input_hash,
            });
            (StatusCode::ACCEPTED, axum::Json(body)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn prs_handler<S, C>(
    State(service): State<Arc<ReadinessService<S, C>>>,
    Path(student_id): Path<String>,
) -> Response
where
    S: StudentRepository + 'static,
    C: CompanyRepository + 'static,
{
    let student_id = StudentId(student_id);
    match service.get_or_compute(&student_id).await {
        Ok(result) => {
            let body = json!({
                "student_id": result.student_id,
                "prs_score": result.score,
                "prs_level": result.tier.label(),
                "prs_breakdown": result.breakdown,
                "input_hash": result.input_hash,
                "computed_at": result.computed_at,
            });
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn matches_handler<S, C>(
    State(service): State<Arc<ReadinessService<S, C>>>,
    Path(student_id): Path<String>,
) -> Response
where
    S: StudentRepository + 'static,
    C: CompanyRepository + 'static,
{
    let student_id = StudentId(student_id);
    match service.company_matches(&student_id).await {
        Ok(matches) => {
            let body = json!({
                "student_id": student_id,
                "matches": matches,
            });
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn company_match_handler<S, C>(
    State(service): State<Arc<ReadinessService<S, C>>>,
    Path((student_id, company_id)): Path<(String, String)>,
) -> Response
where
    S: StudentRepository + 'static,
    C: CompanyRepository + 'static,
{
    let student_id = StudentId(student_id);
    let company_id = CompanyId(company_id);
    match service.company_match(&student_id, &company_id).await {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn summary_handler<S, C>(
    State(service): State<Arc<ReadinessService<S, C>>>,
) -> Response
where
    S: StudentRepository + 'static,
    C: CompanyRepository + 'static,
{
    match service.dashboard_summary() {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn heatmap_handler<S, C>(
    State(service): State<Arc<ReadinessService<S, C>>>,
) -> Response
where
    S: StudentRepository + 'static,
    C: CompanyRepository + 'static,
{
    match service.cohort_report() {
        Ok(report) => {
            let body = json!({
                "heatmap": report.heatmap,
                "risk_segmentation": report.risk_segmentation,
                "skipped": report.skipped,
            });
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn gap_analysis_handler<S, C>(
    State(service): State<Arc<ReadinessService<S, C>>>,
) -> Response
where
    S: StudentRepository + 'static,
    C: CompanyRepository + 'static,
{
    match service.cohort_report() {
        Ok(report) => {
            let body = json!({ "gap_analysis": report.gap_analysis });
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn skills_handler<S, C>(
    State(service): State<Arc<ReadinessService<S, C>>>,
    Query(query): Query<SkillsQuery>,
) -> Response
where
    S: StudentRepository + 'static,
    C: CompanyRepository + 'static,
{
    let top = query.top.unwrap_or(20);
    match service.skills_analytics(top) {
        Ok(skills) => {
            let body = json!({ "top_skills": skills });
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn batch_risks_handler<S, C>(
    State(service): State<Arc<ReadinessService<S, C>>>,
    Query(query): Query<BatchRisksQuery>,
) -> Response
where
    S: StudentRepository + 'static,
    C: CompanyRepository + 'static,
{
    match service.batch_risks(query.branch.as_deref()) {
        Ok(batches) => {
            let body = json!({ "batches": batches });
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn company_funnel_handler<S, C>(
    State(service): State<Arc<ReadinessService<S, C>>>,
    Query(query): Query<FunnelQuery>,
) -> Response
where
    S: StudentRepository + 'static,
    C: CompanyRepository + 'static,
{
    let company_id = query.company_id.map(CompanyId);
    match service.company_funnel(company_id.as_ref()) {
        Ok(funnel) => (StatusCode::OK, axum::Json(funnel)).into_response(),
        Err(error) => error_response(error),
    }
}

/// Maps service failures onto the HTTP surface. A stale-cache hit is a bug in
/// the hashing logic, so it logs at error level before returning 500.
pub(crate) fn error_response(error: ReadinessError) -> Response {
    let status = match &error {
        ReadinessError::Score(ScoreError::InsufficientData { .. }) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ReadinessError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ReadinessError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ReadinessError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        ReadinessError::CompanyNotFound(_) | ReadinessError::NoCompaniesConfigured => {
            StatusCode::NOT_FOUND
        }
        ReadinessError::InvalidProfile { .. } => StatusCode::BAD_REQUEST,
        ReadinessError::ComputeTimeout { .. } => StatusCode::SERVICE_UNAVAILABLE,
        ReadinessError::StaleCache { student_id } => {
            error!(student = %student_id, "stale cache entry after store; input hash logic is suspect");
            StatusCode::INTERNAL_SERVER_ERROR
        }
        ReadinessError::Encoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let body = json!({ "error": error.to_string() });
    (status, axum::Json(body)).into_response()
}
