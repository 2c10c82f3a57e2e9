use std::sync::Arc;

use super::catalog::{FieldCatalog, FieldDefinition, FieldType};
use super::domain::{
    ActionKind, Condition, ConditionGroup, FieldValue, LeafCondition, NotificationChannel,
    Operator, Rule, RuleAction,
};

/// Reasons a rule is refused admission to the store.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("rule is missing required field `{0}`")]
    MissingRuleField(&'static str),
    #[error("unknown field `{field}`")]
    UnknownField { field: String },
    #[error("{field}: Field requires a {expected} operator, got `{operator}`")]
    FieldOperatorMismatch {
        field: String,
        operator: Operator,
        expected: FieldType,
    },
    #[error("{field}: Field requires a value of type {expected}")]
    ValueTypeMismatch { field: String, expected: FieldType },
    #[error("{field}: Field must be between {min} and {max}, got {value}")]
    RangeViolation {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("{field} must be one of {allowed}, got `{value}`")]
    InvalidEnumValue {
        field: String,
        value: String,
        allowed: String,
    },
    #[error("{group} condition must have at least one condition")]
    EmptyCompositeCondition { group: ConditionGroup },
    #[error("`{action}` action requires params.{param}")]
    MissingActionParam {
        action: ActionKind,
        param: &'static str,
    },
    #[error("params.{param} must be one of {allowed}, got `{value}`")]
    InvalidEnumParam {
        param: &'static str,
        value: String,
        allowed: String,
    },
}

impl ValidationError {
    /// Stable name of the failure class for API payloads.
    pub const fn kind(&self) -> &'static str {
        match self {
            ValidationError::MissingRuleField(_) => "MissingRuleField",
            ValidationError::UnknownField { .. } => "UnknownField",
            ValidationError::FieldOperatorMismatch { .. } => "FieldOperatorMismatch",
            ValidationError::ValueTypeMismatch { .. } => "ValueTypeMismatch",
            ValidationError::RangeViolation { .. } => "RangeViolation",
            ValidationError::InvalidEnumValue { .. } => "InvalidEnumValue",
            ValidationError::EmptyCompositeCondition { .. } => "EmptyCompositeCondition",
            ValidationError::MissingActionParam { .. } => "MissingActionParam",
            ValidationError::InvalidEnumParam { .. } => "InvalidEnumParam",
        }
    }
}

/// Checks rules against the field catalog before they reach the store.
#[derive(Debug, Clone)]
pub struct RuleValidator {
    catalog: Arc<FieldCatalog>,
}

impl Default for RuleValidator {
    fn default() -> Self {
        Self::new(FieldCatalog::recruiting())
    }
}

impl RuleValidator {
    pub fn new(catalog: FieldCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    pub fn validate(&self, rule: &Rule) -> Result<(), ValidationError> {
        if rule.workspace_id.0.trim().is_empty() {
            return Err(ValidationError::MissingRuleField("workspaceId"));
        }
        if rule.name.trim().is_empty() {
            return Err(ValidationError::MissingRuleField("name"));
        }

        self.validate_condition(&rule.condition)?;
        validate_action(&rule.action)
    }

    pub fn validate_condition(&self, condition: &Condition) -> Result<(), ValidationError> {
        match condition {
            Condition::Leaf(leaf) => self.validate_leaf(leaf),
            Condition::Composite(group) => {
                if group.conditions.is_empty() {
                    return Err(ValidationError::EmptyCompositeCondition { group: group.kind });
                }
                group
                    .conditions
                    .iter()
                    .try_for_each(|child| self.validate_condition(child))
            }
        }
    }

    fn validate_leaf(&self, leaf: &LeafCondition) -> Result<(), ValidationError> {
        let definition =
            self.catalog
                .get(&leaf.field)
                .ok_or_else(|| ValidationError::UnknownField {
                    field: leaf.field.clone(),
                })?;

        if !definition.permits(leaf.operator) {
            return Err(ValidationError::FieldOperatorMismatch {
                field: leaf.field.clone(),
                operator: leaf.operator,
                expected: definition.field_type,
            });
        }

        match definition.field_type {
            FieldType::Numeric => validate_numeric_value(definition, &leaf.value),
            FieldType::String => leaf.value.as_text().map(|_| ()).ok_or_else(|| {
                ValidationError::ValueTypeMismatch {
                    field: definition.name.clone(),
                    expected: FieldType::String,
                }
            }),
            FieldType::Enum => validate_enum_value(definition, &leaf.value),
        }
    }
}

fn validate_numeric_value(
    definition: &FieldDefinition,
    value: &FieldValue,
) -> Result<(), ValidationError> {
    let threshold = value
        .as_number()
        .filter(|number| number.is_finite())
        .ok_or_else(|| ValidationError::ValueTypeMismatch {
            field: definition.name.clone(),
            expected: FieldType::Numeric,
        })?;

    if let Some((min, max)) = definition.range {
        if threshold < min || threshold > max {
            return Err(ValidationError::RangeViolation {
                field: definition.name.clone(),
                min,
                max,
                value: threshold,
            });
        }
    }

    Ok(())
}

fn validate_enum_value(
    definition: &FieldDefinition,
    value: &FieldValue,
) -> Result<(), ValidationError> {
    let text = value
        .as_text()
        .ok_or_else(|| ValidationError::ValueTypeMismatch {
            field: definition.name.clone(),
            expected: FieldType::Enum,
        })?;

    if definition.allowed_values.iter().any(|allowed| allowed == text) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEnumValue {
            field: definition.name.clone(),
            value: text.to_string(),
            allowed: definition.allowed_values.join(", "),
        })
    }
}

fn validate_action(action: &RuleAction) -> Result<(), ValidationError> {
    match action.kind {
        ActionKind::Tag => {
            let present = action
                .params
                .tag
                .as_deref()
                .is_some_and(|tag| !tag.trim().is_empty());
            if !present {
                return Err(ValidationError::MissingActionParam {
                    action: ActionKind::Tag,
                    param: "tag",
                });
            }
        }
        ActionKind::Notify => {
            let channel = action.params.notification_channel.as_deref().ok_or(
                ValidationError::MissingActionParam {
                    action: ActionKind::Notify,
                    param: "notificationChannel",
                },
            )?;
            if NotificationChannel::parse(channel).is_none() {
                let allowed = NotificationChannel::ALL
                    .iter()
                    .map(|channel| channel.label())
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(ValidationError::InvalidEnumParam {
                    param: "notificationChannel",
                    value: channel.to_string(),
                    allowed,
                });
            }
        }
        ActionKind::Invite | ActionKind::Shortlist | ActionKind::Reject => {}
    }

    Ok(())
}
