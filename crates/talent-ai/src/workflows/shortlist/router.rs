use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;
use tracing::warn;

use super::domain::{EntityId, ShortlistOptions};
use super::service::{ShortlistError, ShortlistGenerator};
use super::source::ScoringEngine;

pub struct ShortlistState<S> {
    pub generator: Arc<ShortlistGenerator<S>>,
}

impl<S> Clone for ShortlistState<S> {
    fn clone(&self) -> Self {
        Self {
            generator: Arc::clone(&self.generator),
        }
    }
}

/// Router builder exposing shortlist generation for a scored entity.
pub fn shortlist_router<S>(generator: Arc<ShortlistGenerator<S>>) -> Router
where
    S: ScoringEngine + 'static,
{
    Router::new()
        .route(
            "/api/v1/entities/:entity_id/shortlist",
            post(generate_shortlist_handler::<S>),
        )
        .with_state(ShortlistState { generator })
}

pub(crate) async fn generate_shortlist_handler<S>(
    State(state): State<ShortlistState<S>>,
    Path(entity_id): Path<String>,
    axum::Json(options): axum::Json<ShortlistOptions>,
) -> Response
where
    S: ScoringEngine + 'static,
{
    let entity_id = EntityId(entity_id);
    match state.generator.generate_shortlist(&entity_id, &options) {
        Ok(shortlist) => {
            let summary = shortlist.summary();
            let payload = json!({
                "shortlist": shortlist,
                "summary": summary,
                "headline": summary.headline(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(ShortlistError::InvalidOptions(message)) => {
            let payload = json!({ "error": message });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(ShortlistError::Source(error)) => {
            warn!(%entity_id, %error, "score source failed");
            let payload = json!({ "error": error.to_string() });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
    }
}
