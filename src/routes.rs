use crate::infra::AppState;
use axum::body::Bytes;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use grader_core::workflows::grading::{process_payload, RawPayload, SummaryStats, ViewModel};
use serde_json::json;
use tracing::debug;

pub(crate) fn results_router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/results/view", post(results_view_endpoint))
        .route("/api/v1/results/summary", post(results_summary_endpoint))
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

/// Any body is accepted; bodies that are not JSON come back as a
/// recognition view.
pub(crate) async fn results_view_endpoint(body: Bytes) -> Json<ViewModel> {
    Json(view_for(&body))
}

pub(crate) async fn results_summary_endpoint(body: Bytes) -> Json<Option<SummaryStats>> {
    Json(view_for(&body).summary().copied())
}

fn view_for(body: &[u8]) -> ViewModel {
    let text = String::from_utf8_lossy(body).into_owned();
    debug!(bytes = body.len(), "building view model from posted payload");
    process_payload(RawPayload::Text(text))
}
