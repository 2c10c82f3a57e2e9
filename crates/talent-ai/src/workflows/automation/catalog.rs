use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::Operator;

const SCORE_RANGE: (f64, f64) = (0.0, 100.0);

const SCORE_FIELDS: [&str; 6] = [
    "fitScore",
    "compositeScore",
    "priceScore",
    "deliveryScore",
    "skillsMatchScore",
    "experienceScore",
];

const RECOMMENDATION_VALUES: [&str; 4] = [
    "HIGHLY_RECOMMENDED",
    "RECOMMENDED",
    "NEUTRAL",
    "NOT_RECOMMENDED",
];

/// Value shape a catalog field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Numeric,
    String,
    Enum,
}

impl FieldType {
    pub const fn label(self) -> &'static str {
        match self {
            FieldType::Numeric => "numeric",
            FieldType::String => "string",
            FieldType::Enum => "enum",
        }
    }

    /// Whether `operator` is meaningful for values of this type at all.
    pub const fn accepts(self, operator: Operator) -> bool {
        match self {
            FieldType::Numeric => operator.is_numeric_comparison(),
            FieldType::String => {
                operator.is_equality()
                    || matches!(operator, Operator::Contains | Operator::NotContains)
            }
            FieldType::Enum => operator.is_equality(),
        }
    }

    fn default_operators(self) -> BTreeSet<Operator> {
        [
            Operator::GreaterThan,
            Operator::GreaterThanOrEqual,
            Operator::LessThan,
            Operator::LessThanOrEqual,
            Operator::Equal,
            Operator::NotEqual,
            Operator::Contains,
            Operator::NotContains,
        ]
        .into_iter()
        .filter(|operator| self.accepts(*operator))
        .collect()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Static metadata describing one candidate field rules may reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub allowed_operators: BTreeSet<Operator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<(f64, f64)>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_values: Vec<String>,
}

impl FieldDefinition {
    pub fn numeric(name: impl Into<String>, range: Option<(f64, f64)>) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::Numeric,
            allowed_operators: FieldType::Numeric.default_operators(),
            range,
            allowed_values: Vec::new(),
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::String,
            allowed_operators: FieldType::String.default_operators(),
            range: None,
            allowed_values: Vec::new(),
        }
    }

    pub fn enumeration<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            field_type: FieldType::Enum,
            allowed_operators: FieldType::Enum.default_operators(),
            range: None,
            allowed_values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Restrict the operators accepted for this field.
    pub fn with_operators<I>(mut self, operators: I) -> Self
    where
        I: IntoIterator<Item = Operator>,
    {
        self.allowed_operators = operators.into_iter().collect();
        self
    }

    pub fn permits(&self, operator: Operator) -> bool {
        self.field_type.accepts(operator) && self.allowed_operators.contains(&operator)
    }
}

/// Registry of known candidate fields keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldCatalog {
    fields: BTreeMap<String, FieldDefinition>,
}

impl FieldCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fields produced by the upstream scoring step plus common profile attributes.
    pub fn recruiting() -> Self {
        SCORE_FIELDS
            .into_iter()
            .fold(Self::new(), |catalog, name| {
                catalog.with_field(FieldDefinition::numeric(name, Some(SCORE_RANGE)))
            })
            .with_field(FieldDefinition::numeric("yearsExperience", Some((0.0, 60.0))))
            .with_field(FieldDefinition::enumeration(
                "recommendation",
                RECOMMENDATION_VALUES,
            ))
            .with_field(FieldDefinition::string("location"))
            .with_field(FieldDefinition::string("source"))
    }

    pub fn with_field(mut self, definition: FieldDefinition) -> Self {
        self.fields.insert(definition.name.clone(), definition);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.values()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
