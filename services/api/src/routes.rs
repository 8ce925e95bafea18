use crate::infra::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Extension;
use axum::Json;
use axum::Router;
use placement_readiness::error::AppError;
use placement_readiness::readiness::{
    readiness_router, CompanyRepository, ReadinessService, RosterSummary, StudentRepository,
};
use placement_readiness::roster::RosterImporter;
use serde::Deserialize;
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct RosterImportRequest {
    pub(crate) csv: String,
}

pub(crate) fn with_readiness_routes<S, C>(service: Arc<ReadinessService<S, C>>) -> Router
where
    S: StudentRepository + 'static,
    C: CompanyRepository + 'static,
{
    let roster = Router::new()
        .route("/api/v1/roster/import", post(roster_import_endpoint))
        .with_state(service.clone());

    readiness_router(service)
        .merge(roster)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn roster_import_endpoint<S, C>(
    State(service): State<Arc<ReadinessService<S, C>>>,
    Json(payload): Json<RosterImportRequest>,
) -> Result<(StatusCode, Json<RosterSummary>), AppError>
where
    S: StudentRepository + 'static,
    C: CompanyRepository + 'static,
{
    let students = RosterImporter::from_reader(Cursor::new(payload.csv.into_bytes()))?;
    let summary = service.import_roster(students)?;
    Ok((StatusCode::CREATED, Json(summary)))
}
