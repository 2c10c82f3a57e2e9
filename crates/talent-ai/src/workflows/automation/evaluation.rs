use super::domain::{
    CandidateFields, Condition, ConditionGroup, Decision, FieldValue, LeafCondition, Operator,
    Rule,
};

/// Enabled rules of one workspace, highest priority first.
///
/// Rules sharing a priority keep the order they were stored in.
#[derive(Debug, Clone)]
pub struct RuleSet<'a> {
    rules: Vec<&'a Rule>,
}

impl<'a> RuleSet<'a> {
    pub fn new<I>(rules: I) -> Self
    where
        I: IntoIterator<Item = &'a Rule>,
    {
        let mut rules: Vec<&Rule> = rules.into_iter().filter(|rule| rule.enabled).collect();
        rules.sort_by(|left, right| right.priority.cmp(&left.priority));
        Self { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> impl Iterator<Item = &'a Rule> + '_ {
        self.rules.iter().copied()
    }

    /// One decision per matching rule, in priority order.
    pub fn evaluate(&self, fields: &CandidateFields) -> Vec<Decision> {
        self.rules
            .iter()
            .filter(|rule| condition_matches(&rule.condition, fields))
            .map(|rule| Decision {
                rule_id: rule.id.clone(),
                action: rule.action.clone(),
                autonomy_level: rule.autonomy_level,
            })
            .collect()
    }
}

/// Walk the condition tree; `all`/`any` stop at the first deciding child.
pub fn condition_matches(condition: &Condition, fields: &CandidateFields) -> bool {
    match condition {
        Condition::Leaf(leaf) => leaf_matches(leaf, fields),
        Condition::Composite(group) => match group.kind {
            ConditionGroup::And => group
                .conditions
                .iter()
                .all(|child| condition_matches(child, fields)),
            ConditionGroup::Or => group
                .conditions
                .iter()
                .any(|child| condition_matches(child, fields)),
        },
    }
}

// Missing or null fields and kind mismatches are a non-match, never an error.
fn leaf_matches(leaf: &LeafCondition, fields: &CandidateFields) -> bool {
    let Some(actual) = fields.get(&leaf.field) else {
        return false;
    };
    let expected = &leaf.value;

    match leaf.operator {
        Operator::GreaterThan => compare_numbers(actual, expected, |a, b| a > b),
        Operator::GreaterThanOrEqual => compare_numbers(actual, expected, |a, b| a >= b),
        Operator::LessThan => compare_numbers(actual, expected, |a, b| a < b),
        Operator::LessThanOrEqual => compare_numbers(actual, expected, |a, b| a <= b),
        Operator::Equal => values_equal(actual, expected).unwrap_or(false),
        Operator::NotEqual => values_equal(actual, expected).is_some_and(|equal| !equal),
        Operator::Contains => text_contains(actual, expected).unwrap_or(false),
        Operator::NotContains => text_contains(actual, expected).is_some_and(|found| !found),
    }
}

fn compare_numbers(actual: &FieldValue, expected: &FieldValue, op: fn(f64, f64) -> bool) -> bool {
    match (actual.as_number(), expected.as_number()) {
        (Some(actual), Some(expected)) => op(actual, expected),
        _ => false,
    }
}

fn values_equal(actual: &FieldValue, expected: &FieldValue) -> Option<bool> {
    match (actual, expected) {
        (FieldValue::Number(a), FieldValue::Number(b)) => Some(a == b),
        (FieldValue::Text(a), FieldValue::Text(b)) => Some(a == b),
        (FieldValue::Flag(a), FieldValue::Flag(b)) => Some(a == b),
        _ => None,
    }
}

fn text_contains(actual: &FieldValue, expected: &FieldValue) -> Option<bool> {
    let haystack = actual.as_text()?.to_lowercase();
    let needle = expected.as_text()?.to_lowercase();
    Some(haystack.contains(&needle))
}
