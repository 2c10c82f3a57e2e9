use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::catalog::FieldCatalog;
use super::domain::{CandidateFields, Decision, Rule, RuleDraft, RuleId, WorkspaceId};
use super::evaluation::RuleSet;
use super::repository::{RepositoryError, RuleRepository};
use super::validation::{RuleValidator, ValidationError};

/// Rule engine composing the validator with an injected rule repository.
pub struct RuleEngine<R> {
    repository: Arc<R>,
    validator: RuleValidator,
}

static RULE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_rule_id() -> RuleId {
    let id = RULE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    RuleId(format!("rule-{id:06}"))
}

impl<R> RuleEngine<R>
where
    R: RuleRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_catalog(repository, FieldCatalog::recruiting())
    }

    pub fn with_catalog(repository: Arc<R>, catalog: FieldCatalog) -> Self {
        Self {
            repository,
            validator: RuleValidator::new(catalog),
        }
    }

    pub fn catalog(&self) -> &FieldCatalog {
        self.validator.catalog()
    }

    /// Validate and store a rule. Nothing is stored when validation fails.
    pub fn add_rule(&self, draft: RuleDraft) -> Result<Rule, RuleEngineError> {
        let supplied = draft.id.clone().filter(|id| !id.0.trim().is_empty());
        let generated = supplied.is_none();
        let rule = draft.into_rule(supplied.unwrap_or_else(next_rule_id));

        if let Err(error) = self.validator.validate(&rule) {
            warn!(
                rule_id = %rule.id,
                workspace_id = %rule.workspace_id,
                kind = error.kind(),
                %error,
                "rule rejected"
            );
            return Err(error.into());
        }

        let stored = self.insert(rule, generated)?;
        info!(
            rule_id = %stored.id,
            workspace_id = %stored.workspace_id,
            priority = stored.priority,
            autonomy = stored.autonomy_level.label(),
            "rule admitted"
        );
        Ok(stored)
    }

    // Generated ids skip past any the caller stored explicitly.
    fn insert(&self, mut rule: Rule, generated: bool) -> Result<Rule, RepositoryError> {
        loop {
            match self.repository.insert(rule.clone()) {
                Err(RepositoryError::Conflict) if generated => {
                    debug!(rule_id = %rule.id, "generated rule id taken, advancing");
                    rule.id = next_rule_id();
                }
                result => return result,
            }
        }
    }

    pub fn get_rule(&self, id: &RuleId) -> Result<Option<Rule>, RuleEngineError> {
        Ok(self.repository.fetch(id)?)
    }

    pub fn list_rules(&self, workspace_id: &WorkspaceId) -> Result<Vec<Rule>, RuleEngineError> {
        let snapshot = self.repository.snapshot(workspace_id)?;
        Ok(snapshot.as_ref().clone())
    }

    /// Remove a rule, returning it when it existed.
    pub fn remove_rule(&self, id: &RuleId) -> Result<Option<Rule>, RuleEngineError> {
        let removed = self.repository.remove(id)?;
        if let Some(rule) = &removed {
            info!(rule_id = %rule.id, workspace_id = %rule.workspace_id, "rule removed");
        }
        Ok(removed)
    }

    pub fn set_rule_enabled(&self, id: &RuleId, enabled: bool) -> Result<Rule, RuleEngineError> {
        let mut rule = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        rule.enabled = enabled;
        self.repository.update(rule.clone())?;
        info!(rule_id = %rule.id, enabled, "rule toggled");
        Ok(rule)
    }

    /// Evaluate a candidate against the workspace's enabled rules.
    ///
    /// Only a repository failure can make this fail; candidate data issues degrade the
    /// affected leaf to a non-match.
    pub fn evaluate(
        &self,
        fields: &CandidateFields,
        workspace_id: &WorkspaceId,
    ) -> Result<Vec<Decision>, RuleEngineError> {
        let snapshot = self.repository.snapshot(workspace_id)?;
        let rule_set = RuleSet::new(snapshot.iter());
        let decisions = rule_set.evaluate(fields);

        debug!(
            %workspace_id,
            rules = rule_set.len(),
            decisions = decisions.len(),
            "candidate evaluated"
        );
        Ok(decisions)
    }
}

/// Error raised by the rule engine.
#[derive(Debug, thiserror::Error)]
pub enum RuleEngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
