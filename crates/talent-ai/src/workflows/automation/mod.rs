//! Rule automation: field catalog, condition validation, workspace rule storage, and
//! evaluation of scored candidates into action decisions.
//!
//! The engine only emits [`Decision`]s. Carrying them out, including honoring the
//! autonomy level, belongs to an [`ActionDispatcher`] supplied by the host.

pub mod catalog;
pub mod dispatch;
pub mod domain;
pub mod engine;
pub mod evaluation;
pub mod repository;
pub mod router;
pub mod validation;

#[cfg(test)]
mod tests;

pub use catalog::{FieldCatalog, FieldDefinition, FieldType};
pub use dispatch::{ActionDispatcher, DispatchError};
pub use domain::{
    ActionKind, ActionParams, AutonomyLevel, CandidateFields, CompositeCondition, Condition,
    ConditionGroup, Decision, FieldValue, LeafCondition, NotificationChannel, Operator, Rule,
    RuleAction, RuleDraft, RuleId, WorkspaceId,
};
pub use engine::{RuleEngine, RuleEngineError};
pub use evaluation::{condition_matches, RuleSet};
pub use repository::{InMemoryRuleRepository, RepositoryError, RuleRepository};
pub use router::automation_router;
pub use validation::{RuleValidator, ValidationError};
