use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::automation::dispatch::{ActionDispatcher, DispatchError};
use crate::workflows::automation::domain::{
    ActionKind, AutonomyLevel, CandidateFields, Condition, Decision, FieldValue, Operator, Rule,
    RuleAction, RuleDraft, RuleId, WorkspaceId,
};
use crate::workflows::automation::engine::RuleEngine;
use crate::workflows::automation::repository::{
    InMemoryRuleRepository, RepositoryError, RuleRepository,
};
use crate::workflows::automation::validation::RuleValidator;

pub(super) fn workspace() -> WorkspaceId {
    WorkspaceId("ws-acme".to_string())
}

pub(super) fn high_fit() -> Condition {
    Condition::leaf("fitScore", Operator::GreaterThan, 80)
}

pub(super) fn draft(name: &str, condition: Condition, action: RuleAction) -> RuleDraft {
    RuleDraft {
        id: None,
        workspace_id: workspace(),
        name: name.to_string(),
        description: None,
        condition,
        action,
        autonomy_level: AutonomyLevel::Confirm,
        priority: 0,
        enabled: true,
    }
}

pub(super) fn invite_high_fit() -> RuleDraft {
    draft(
        "Invite strong matches",
        high_fit(),
        RuleAction::new(ActionKind::Invite),
    )
}

pub(super) fn prioritized(name: &str, priority: i32, condition: Condition) -> RuleDraft {
    let mut draft = draft(name, condition, RuleAction::tag(name));
    draft.priority = priority;
    draft
}

pub(super) fn rule(id: &str, draft: RuleDraft) -> Rule {
    draft.into_rule(RuleId(id.to_string()))
}

pub(super) fn candidate<const N: usize>(pairs: [(&str, FieldValue); N]) -> CandidateFields {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

pub(super) fn validator() -> RuleValidator {
    RuleValidator::default()
}

pub(super) fn build_engine() -> (
    RuleEngine<InMemoryRuleRepository>,
    Arc<InMemoryRuleRepository>,
) {
    let repository = Arc::new(InMemoryRuleRepository::default());
    let engine = RuleEngine::new(repository.clone());
    (engine, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryDispatcher {
    applied: Arc<Mutex<Vec<Decision>>>,
}

impl MemoryDispatcher {
    pub(super) fn applied(&self) -> Vec<Decision> {
        self.applied.lock().expect("dispatcher mutex poisoned").clone()
    }
}

impl ActionDispatcher for MemoryDispatcher {
    fn apply(&self, decision: &Decision) -> Result<(), DispatchError> {
        self.applied
            .lock()
            .expect("dispatcher mutex poisoned")
            .push(decision.clone());
        Ok(())
    }
}

pub(super) struct OfflineDispatcher;

impl ActionDispatcher for OfflineDispatcher {
    fn apply(&self, _decision: &Decision) -> Result<(), DispatchError> {
        Err(DispatchError::Transport("queue offline".to_string()))
    }
}

/// Fails decisions from one rule and records the rest.
pub(super) struct RejectingDispatcher {
    pub(super) rejects: RuleId,
    pub(super) inner: MemoryDispatcher,
}

impl ActionDispatcher for RejectingDispatcher {
    fn apply(&self, decision: &Decision) -> Result<(), DispatchError> {
        if decision.rule_id == self.rejects {
            return Err(DispatchError::Transport("webhook refused".to_string()));
        }
        self.inner.apply(decision)
    }
}

pub(super) struct UnavailableRepository;

impl RuleRepository for UnavailableRepository {
    fn insert(&self, _rule: Rule) -> Result<Rule, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _rule: Rule) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &RuleId) -> Result<Option<Rule>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn remove(&self, _id: &RuleId) -> Result<Option<Rule>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn snapshot(&self, _workspace_id: &WorkspaceId) -> Result<Arc<Vec<Rule>>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
