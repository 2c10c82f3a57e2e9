use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::domain::{Rule, RuleId, WorkspaceId};

/// Workspace-scoped rule storage injected into the engine.
pub trait RuleRepository: Send + Sync {
    fn insert(&self, rule: Rule) -> Result<Rule, RepositoryError>;
    fn update(&self, rule: Rule) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &RuleId) -> Result<Option<Rule>, RepositoryError>;
    fn remove(&self, id: &RuleId) -> Result<Option<Rule>, RepositoryError>;
    /// Immutable view of a workspace's rules in insertion order.
    fn snapshot(&self, workspace_id: &WorkspaceId) -> Result<Arc<Vec<Rule>>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("rule already exists")]
    Conflict,
    #[error("rule not found")]
    NotFound,
    #[error("rule store unavailable: {0}")]
    Unavailable(String),
}

/// Copy-on-write rule store: writers swap a workspace's list, readers keep their snapshot.
#[derive(Debug, Default)]
pub struct InMemoryRuleRepository {
    state: RwLock<StoreState>,
}

#[derive(Debug, Default)]
struct StoreState {
    workspaces: HashMap<WorkspaceId, Arc<Vec<Rule>>>,
    owners: HashMap<RuleId, WorkspaceId>,
}

impl InMemoryRuleRepository {
    fn read(&self) -> Result<RwLockReadGuard<'_, StoreState>, RepositoryError> {
        self.state
            .read()
            .map_err(|_| RepositoryError::Unavailable("rule store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState>, RepositoryError> {
        self.state
            .write()
            .map_err(|_| RepositoryError::Unavailable("rule store lock poisoned".to_string()))
    }
}

impl RuleRepository for InMemoryRuleRepository {
    fn insert(&self, rule: Rule) -> Result<Rule, RepositoryError> {
        let mut state = self.write()?;
        if state.owners.contains_key(&rule.id) {
            return Err(RepositoryError::Conflict);
        }

        state
            .owners
            .insert(rule.id.clone(), rule.workspace_id.clone());
        let rules = state
            .workspaces
            .entry(rule.workspace_id.clone())
            .or_default();
        Arc::make_mut(rules).push(rule.clone());
        Ok(rule)
    }

    fn update(&self, rule: Rule) -> Result<(), RepositoryError> {
        let mut state = self.write()?;
        match state.owners.get(&rule.id) {
            Some(owner) if owner == &rule.workspace_id => {}
            _ => return Err(RepositoryError::NotFound),
        }

        let rules = state
            .workspaces
            .get_mut(&rule.workspace_id)
            .ok_or(RepositoryError::NotFound)?;
        let rules = Arc::make_mut(rules);
        let slot = rules
            .iter_mut()
            .find(|stored| stored.id == rule.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = rule;
        Ok(())
    }

    fn fetch(&self, id: &RuleId) -> Result<Option<Rule>, RepositoryError> {
        let state = self.read()?;
        let rule = state
            .owners
            .get(id)
            .and_then(|workspace| state.workspaces.get(workspace))
            .and_then(|rules| rules.iter().find(|rule| &rule.id == id))
            .cloned();
        Ok(rule)
    }

    fn remove(&self, id: &RuleId) -> Result<Option<Rule>, RepositoryError> {
        let mut state = self.write()?;
        let Some(workspace) = state.owners.remove(id) else {
            return Ok(None);
        };

        let removed = state.workspaces.get_mut(&workspace).and_then(|rules| {
            let position = rules.iter().position(|rule| &rule.id == id)?;
            Some(Arc::make_mut(rules).remove(position))
        });
        Ok(removed)
    }

    fn snapshot(&self, workspace_id: &WorkspaceId) -> Result<Arc<Vec<Rule>>, RepositoryError> {
        let state = self.read()?;
        Ok(state
            .workspaces
            .get(workspace_id)
            .cloned()
            .unwrap_or_default())
    }
}
