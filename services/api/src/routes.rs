use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde_json::json;
use talent_ai::workflows::automation::{automation_router, RuleEngine, RuleRepository};
use talent_ai::workflows::shortlist::{shortlist_router, ScoringEngine, ShortlistGenerator};

use crate::infra::{AppState, InMemoryDispatcher};

pub(crate) fn build_router<R, S>(
    engine: Arc<RuleEngine<R>>,
    dispatcher: Arc<InMemoryDispatcher>,
    generator: Arc<ShortlistGenerator<S>>,
) -> Router
where
    R: RuleRepository + 'static,
    S: ScoringEngine + 'static,
{
    automation_router(engine, dispatcher)
        .merge(shortlist_router(generator))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/decisions", get(dispatch_log_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
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

pub(crate) async fn dispatch_log_endpoint(Extension(state): Extension<AppState>) -> Response {
    match state.dispatcher.snapshot() {
        Ok(log) => (StatusCode::OK, Json(log)).into_response(),
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
