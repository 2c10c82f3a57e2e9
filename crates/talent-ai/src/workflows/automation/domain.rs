use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for stored automation rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RuleId(pub String);

/// Workspace owning a set of rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkspaceId(pub String);

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Comparison applied by a leaf condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = ">", alias = "gt")]
    GreaterThan,
    #[serde(rename = ">=", alias = "gte")]
    GreaterThanOrEqual,
    #[serde(rename = "<", alias = "lt")]
    LessThan,
    #[serde(rename = "<=", alias = "lte")]
    LessThanOrEqual,
    #[serde(rename = "==", alias = "eq")]
    Equal,
    #[serde(rename = "!=", alias = "neq")]
    NotEqual,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "not_contains")]
    NotContains,
}

impl Operator {
    pub const fn symbol(self) -> &'static str {
        match self {
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqual => ">=",
            Operator::LessThan => "<",
            Operator::LessThanOrEqual => "<=",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::Contains => "contains",
            Operator::NotContains => "not_contains",
        }
    }

    /// Operators that order or compare numbers.
    pub const fn is_numeric_comparison(self) -> bool {
        !matches!(self, Operator::Contains | Operator::NotContains)
    }

    pub const fn is_equality(self) -> bool {
        matches!(self, Operator::Equal | Operator::NotEqual)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Scalar carried by candidate fields and condition thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Flag(bool),
    Text(String),
    /// Explicit `null`; never matches any operator.
    Null,
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Candidate attributes a rule condition is evaluated against.
pub type CandidateFields = BTreeMap<String, FieldValue>;

/// Boolean combinator for a composite condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConditionGroup {
    And,
    Or,
}

impl fmt::Display for ConditionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionGroup::And => f.write_str("AND"),
            ConditionGroup::Or => f.write_str("OR"),
        }
    }
}

/// Recursive condition tree. Composite nodes carry a `type` discriminator, leaves do not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Condition {
    Composite(CompositeCondition),
    Leaf(LeafCondition),
}

impl Condition {
    pub fn leaf(field: impl Into<String>, operator: Operator, value: impl Into<FieldValue>) -> Self {
        Self::Leaf(LeafCondition {
            field: field.into(),
            operator,
            value: value.into(),
        })
    }

    pub fn all(conditions: Vec<Condition>) -> Self {
        Self::Composite(CompositeCondition {
            kind: ConditionGroup::And,
            conditions,
        })
    }

    pub fn any(conditions: Vec<Condition>) -> Self {
        Self::Composite(CompositeCondition {
            kind: ConditionGroup::Or,
            conditions,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafCondition {
    pub field: String,
    pub operator: Operator,
    pub value: FieldValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeCondition {
    #[serde(rename = "type")]
    pub kind: ConditionGroup,
    pub conditions: Vec<Condition>,
}

/// Automated action a matching rule asks the dispatcher to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Invite,
    Tag,
    Notify,
    Shortlist,
    Reject,
}

impl ActionKind {
    pub const fn label(self) -> &'static str {
        match self {
            ActionKind::Invite => "invite",
            ActionKind::Tag => "tag",
            ActionKind::Notify => "notify",
            ActionKind::Shortlist => "shortlist",
            ActionKind::Reject => "reject",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Free-form action parameters; required keys depend on the action kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

impl ActionParams {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleAction {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    #[serde(default, skip_serializing_if = "ActionParams::is_empty")]
    pub params: ActionParams,
}

impl RuleAction {
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            params: ActionParams::default(),
        }
    }

    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Tag,
            params: ActionParams {
                tag: Some(tag.into()),
                ..ActionParams::default()
            },
        }
    }

    pub fn notify(channel: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Notify,
            params: ActionParams {
                notification_channel: Some(channel.into()),
                ..ActionParams::default()
            },
        }
    }
}

/// Delivery channels accepted by `notify` actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationChannel {
    Email,
    Telegram,
    Sms,
}

impl NotificationChannel {
    pub const ALL: [NotificationChannel; 3] = [
        NotificationChannel::Email,
        NotificationChannel::Telegram,
        NotificationChannel::Sms,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            NotificationChannel::Email => "email",
            NotificationChannel::Telegram => "telegram",
            NotificationChannel::Sms => "sms",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|channel| channel.label() == value)
    }
}

/// How far an emitted decision may proceed without a human.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutonomyLevel {
    /// Record a suggestion only.
    Advise,
    /// Queue for human approval.
    Confirm,
    /// Execute immediately.
    Autonomous,
}

impl AutonomyLevel {
    pub const fn label(self) -> &'static str {
        match self {
            AutonomyLevel::Advise => "advise",
            AutonomyLevel::Confirm => "confirm",
            AutonomyLevel::Autonomous => "autonomous",
        }
    }
}

/// A validated rule as held by the rule store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: RuleId,
    pub workspace_id: WorkspaceId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub condition: Condition,
    pub action: RuleAction,
    pub autonomy_level: AutonomyLevel,
    pub priority: i32,
    pub enabled: bool,
}

/// Inbound rule definition; missing ids are assigned on admission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDraft {
    #[serde(default)]
    pub id: Option<RuleId>,
    #[serde(default)]
    pub workspace_id: WorkspaceId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub condition: Condition,
    pub action: RuleAction,
    pub autonomy_level: AutonomyLevel,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl RuleDraft {
    pub(crate) fn into_rule(self, id: RuleId) -> Rule {
        Rule {
            id,
            workspace_id: self.workspace_id,
            name: self.name,
            description: self.description,
            condition: self.condition,
            action: self.action,
            autonomy_level: self.autonomy_level,
            priority: self.priority,
            enabled: self.enabled,
        }
    }
}

/// Command emitted for each enabled rule whose condition matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub rule_id: RuleId,
    pub action: RuleAction,
    pub autonomy_level: AutonomyLevel,
}
