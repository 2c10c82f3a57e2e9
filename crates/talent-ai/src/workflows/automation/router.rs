use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use super::catalog::FieldDefinition;
use super::dispatch::ActionDispatcher;
use super::domain::{CandidateFields, Decision, RuleDraft, RuleId, WorkspaceId};
use super::engine::{RuleEngine, RuleEngineError};
use super::repository::{RepositoryError, RuleRepository};

/// Shared handler state: the engine plus the dispatcher decisions are handed to.
pub struct AutomationState<R, D> {
    pub engine: Arc<RuleEngine<R>>,
    pub dispatcher: Arc<D>,
}

impl<R, D> Clone for AutomationState<R, D> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            dispatcher: Arc::clone(&self.dispatcher),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct EvaluationRequest {
    #[serde(default)]
    pub fields: CandidateFields,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResponse {
    pub workspace_id: WorkspaceId,
    pub decisions: Vec<Decision>,
    pub dispatched: usize,
    #[serde(default)]
    pub failed: Vec<DispatchFailure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A decision the dispatcher could not apply.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchFailure {
    pub rule_id: RuleId,
    pub error: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct EnabledRequest {
    pub enabled: bool,
}

/// Router builder exposing rule administration and candidate evaluation.
pub fn automation_router<R, D>(engine: Arc<RuleEngine<R>>, dispatcher: Arc<D>) -> Router
where
    R: RuleRepository + 'static,
    D: ActionDispatcher + 'static,
{
    Router::new()
        .route("/api/v1/catalog/fields", get(catalog_handler::<R, D>))
        .route(
            "/api/v1/workspaces/:workspace_id/rules",
            post(create_rule_handler::<R, D>).get(list_rules_handler::<R, D>),
        )
        .route(
            "/api/v1/workspaces/:workspace_id/evaluate",
            post(evaluate_handler::<R, D>),
        )
        .route(
            "/api/v1/rules/:rule_id",
            get(get_rule_handler::<R, D>).delete(delete_rule_handler::<R, D>),
        )
        .route(
            "/api/v1/rules/:rule_id/enabled",
            put(set_enabled_handler::<R, D>),
        )
        .with_state(AutomationState { engine, dispatcher })
}

pub(crate) async fn catalog_handler<R, D>(
    State(state): State<AutomationState<R, D>>,
) -> axum::Json<Vec<FieldDefinition>>
where
    R: RuleRepository + 'static,
    D: ActionDispatcher + 'static,
{
    axum::Json(state.engine.catalog().fields().cloned().collect())
}

pub(crate) async fn create_rule_handler<R, D>(
    State(state): State<AutomationState<R, D>>,
    Path(workspace_id): Path<String>,
    axum::Json(mut draft): axum::Json<RuleDraft>,
) -> Response
where
    R: RuleRepository + 'static,
    D: ActionDispatcher + 'static,
{
    draft.workspace_id = WorkspaceId(workspace_id);
    match state.engine.add_rule(draft) {
        Ok(rule) => (StatusCode::CREATED, axum::Json(rule)).into_response(),
        Err(error) => engine_error_response(error),
    }
}

pub(crate) async fn list_rules_handler<R, D>(
    State(state): State<AutomationState<R, D>>,
    Path(workspace_id): Path<String>,
) -> Response
where
    R: RuleRepository + 'static,
    D: ActionDispatcher + 'static,
{
    match state.engine.list_rules(&WorkspaceId(workspace_id)) {
        Ok(rules) => (StatusCode::OK, axum::Json(rules)).into_response(),
        Err(error) => engine_error_response(error),
    }
}

pub(crate) async fn get_rule_handler<R, D>(
    State(state): State<AutomationState<R, D>>,
    Path(rule_id): Path<String>,
) -> Response
where
    R: RuleRepository + 'static,
    D: ActionDispatcher + 'static,
{
    let id = RuleId(rule_id);
    match state.engine.get_rule(&id) {
        Ok(Some(rule)) => (StatusCode::OK, axum::Json(rule)).into_response(),
        Ok(None) => rule_not_found(&id),
        Err(error) => engine_error_response(error),
    }
}

pub(crate) async fn delete_rule_handler<R, D>(
    State(state): State<AutomationState<R, D>>,
    Path(rule_id): Path<String>,
) -> Response
where
    R: RuleRepository + 'static,
    D: ActionDispatcher + 'static,
{
    let id = RuleId(rule_id);
    match state.engine.remove_rule(&id) {
        Ok(Some(_)) => StatusCode::NO_CONTENT.into_response(),
        Ok(None) => rule_not_found(&id),
        Err(error) => engine_error_response(error),
    }
}

pub(crate) async fn set_enabled_handler<R, D>(
    State(state): State<AutomationState<R, D>>,
    Path(rule_id): Path<String>,
    axum::Json(request): axum::Json<EnabledRequest>,
) -> Response
where
    R: RuleRepository + 'static,
    D: ActionDispatcher + 'static,
{
    let id = RuleId(rule_id);
    match state.engine.set_rule_enabled(&id, request.enabled) {
        Ok(rule) => (StatusCode::OK, axum::Json(rule)).into_response(),
        Err(RuleEngineError::Repository(RepositoryError::NotFound)) => rule_not_found(&id),
        Err(error) => engine_error_response(error),
    }
}

pub(crate) async fn evaluate_handler<R, D>(
    State(state): State<AutomationState<R, D>>,
    Path(workspace_id): Path<String>,
    axum::Json(request): axum::Json<EvaluationRequest>,
) -> Response
where
    R: RuleRepository + 'static,
    D: ActionDispatcher + 'static,
{
    let workspace_id = WorkspaceId(workspace_id);
    let decisions = match state.engine.evaluate(&request.fields, &workspace_id) {
        Ok(decisions) => decisions,
        Err(error) => return engine_error_response(error),
    };

    // Every decision is attempted; one failure does not hide the rest.
    let mut failed = Vec::new();
    for decision in &decisions {
        if let Err(error) = state.dispatcher.apply(decision) {
            warn!(rule_id = %decision.rule_id, %error, "decision dispatch failed");
            failed.push(DispatchFailure {
                rule_id: decision.rule_id.clone(),
                error: error.to_string(),
            });
        }
    }

    let dispatched = decisions.len() - failed.len();
    let (status, error) = if failed.is_empty() {
        (StatusCode::OK, None)
    } else {
        let error = format!("{} of {} decisions failed to dispatch", failed.len(), decisions.len());
        (StatusCode::BAD_GATEWAY, Some(error))
    };
    let body = EvaluationResponse {
        workspace_id,
        decisions,
        dispatched,
        failed,
        error,
    };
    (status, axum::Json(body)).into_response()
}

fn rule_not_found(id: &RuleId) -> Response {
    let payload = json!({
        "error": "rule not found",
        "rule_id": id.0,
    });
    (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
}

fn engine_error_response(error: RuleEngineError) -> Response {
    match error {
        RuleEngineError::Validation(error) => {
            let payload = json!({
                "error": error.to_string(),
                "kind": error.kind(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        RuleEngineError::Repository(RepositoryError::Conflict) => {
            let payload = json!({
                "error": "rule already exists",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        other => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
