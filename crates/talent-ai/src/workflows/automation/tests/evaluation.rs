use proptest::prelude::*;

use super::common::*;
use crate::workflows::automation::domain::{
    ActionKind, AutonomyLevel, CandidateFields, Condition, FieldValue, Operator, RuleAction,
    RuleId,
};
use crate::workflows::automation::evaluation::{condition_matches, RuleSet};

#[test]
fn leaf_applies_numeric_comparisons() {
    let fields = candidate([("fitScore", FieldValue::Number(80.0))]);

    let cases = [
        (Operator::GreaterThan, 79, true),
        (Operator::GreaterThan, 80, false),
        (Operator::GreaterThanOrEqual, 80, true),
        (Operator::LessThan, 81, true),
        (Operator::LessThanOrEqual, 79, false),
        (Operator::Equal, 80, true),
        (Operator::NotEqual, 80, false),
    ];

    for (operator, threshold, expected) in cases {
        let condition = Condition::leaf("fitScore", operator, threshold);
        assert_eq!(
            condition_matches(&condition, &fields),
            expected,
            "fitScore 80 {operator} {threshold}"
        );
    }
}

#[test]
fn missing_fields_never_match() {
    let fields = candidate([("priceScore", FieldValue::Number(50.0))]);

    assert!(!condition_matches(&high_fit(), &fields));
    assert!(!condition_matches(
        &Condition::leaf("fitScore", Operator::NotEqual, 10),
        &fields
    ));
    assert!(!condition_matches(
        &Condition::leaf("location", Operator::NotContains, "remote"),
        &fields
    ));
}

#[test]
fn null_fields_never_match() {
    let fields = candidate([
        ("fitScore", FieldValue::Null),
        ("location", FieldValue::Null),
    ]);

    for operator in [Operator::GreaterThan, Operator::Equal, Operator::NotEqual] {
        assert!(!condition_matches(
            &Condition::leaf("fitScore", operator, 10),
            &fields
        ));
    }
    assert!(!condition_matches(
        &Condition::leaf("location", Operator::NotContains, "remote"),
        &fields
    ));

    let decoded: CandidateFields =
        serde_json::from_str(r#"{"fitScore": null}"#).expect("null decodes");
    assert_eq!(decoded.get("fitScore"), Some(&FieldValue::Null));
}

#[test]
fn mismatched_value_kinds_degrade_to_non_match() {
    let fields = candidate([
        ("fitScore", FieldValue::Text("high".to_string())),
        ("location", FieldValue::Number(3.0)),
    ]);

    assert!(!condition_matches(&high_fit(), &fields));
    assert!(!condition_matches(
        &Condition::leaf("fitScore", Operator::NotEqual, 10),
        &fields
    ));
    assert!(!condition_matches(
        &Condition::leaf("location", Operator::Contains, "3"),
        &fields
    ));
}

#[test]
fn text_operators_ignore_case() {
    let fields = candidate([("location", FieldValue::Text("Berlin, Germany".to_string()))]);

    assert!(condition_matches(
        &Condition::leaf("location", Operator::Contains, "berlin"),
        &fields
    ));
    assert!(condition_matches(
        &Condition::leaf("location", Operator::NotContains, "lisbon"),
        &fields
    ));
    assert!(!condition_matches(
        &Condition::leaf("location", Operator::Equal, "berlin, germany"),
        &fields
    ));
}

#[test]
fn composites_combine_children() {
    let fields = candidate([
        ("fitScore", FieldValue::Number(85.0)),
        ("recommendation", FieldValue::Text("RECOMMENDED".to_string())),
    ]);
    let recommended = Condition::leaf("recommendation", Operator::Equal, "RECOMMENDED");
    let low_fit = Condition::leaf("fitScore", Operator::LessThan, 50);

    assert!(condition_matches(
        &Condition::all(vec![high_fit(), recommended.clone()]),
        &fields
    ));
    assert!(!condition_matches(
        &Condition::all(vec![recommended.clone(), low_fit.clone()]),
        &fields
    ));
    assert!(condition_matches(
        &Condition::any(vec![low_fit.clone(), recommended]),
        &fields
    ));
    assert!(!condition_matches(
        &Condition::any(vec![low_fit.clone(), low_fit]),
        &fields
    ));
}

#[test]
fn rule_set_orders_by_priority_then_insertion() {
    let rules = vec![
        rule("rule-low", prioritized("low", 1, high_fit())),
        rule("rule-first-tie", prioritized("first", 5, high_fit())),
        rule("rule-high", prioritized("high", 10, high_fit())),
        rule("rule-second-tie", prioritized("second", 5, high_fit())),
    ];
    let fields = candidate([("fitScore", FieldValue::Number(90.0))]);

    let decisions = RuleSet::new(&rules).evaluate(&fields);
    let order: Vec<&str> = decisions
        .iter()
        .map(|decision| decision.rule_id.0.as_str())
        .collect();

    assert_eq!(
        order,
        vec!["rule-high", "rule-first-tie", "rule-second-tie", "rule-low"]
    );
}

#[test]
fn every_matching_enabled_rule_emits_one_decision() {
    let mut disabled = prioritized("disabled", 100, high_fit());
    disabled.enabled = false;
    let mut autonomous = draft(
        "autonomous invite",
        high_fit(),
        RuleAction::new(ActionKind::Invite),
    );
    autonomous.autonomy_level = AutonomyLevel::Autonomous;

    let rules = vec![
        rule("rule-disabled", disabled),
        rule("rule-autonomous", autonomous),
        rule(
            "rule-miss",
            prioritized("miss", 50, Condition::leaf("fitScore", Operator::LessThan, 10)),
        ),
    ];
    let fields = candidate([("fitScore", FieldValue::Number(91.0))]);

    let rule_set = RuleSet::new(&rules);
    assert_eq!(rule_set.len(), 2);

    let decisions = rule_set.evaluate(&fields);
    assert_eq!(decisions.len(), 1);
    assert_eq!(decisions[0].rule_id, RuleId("rule-autonomous".to_string()));
    assert_eq!(decisions[0].autonomy_level, AutonomyLevel::Autonomous);
    assert_eq!(decisions[0].action.kind, ActionKind::Invite);
}

fn fit_score(score: f64) -> CandidateFields {
    candidate([("fitScore", FieldValue::Number(score))])
}

proptest! {
    #[test]
    fn contradictory_and_never_matches(score in -1000.0f64..1000.0) {
        let contradiction = Condition::all(vec![
            Condition::leaf("fitScore", Operator::GreaterThan, 80),
            Condition::leaf("fitScore", Operator::LessThan, 50),
        ]);

        prop_assert!(!condition_matches(&contradiction, &fit_score(score)));
    }

    #[test]
    fn or_matches_when_either_child_matches(
        score in 0.0f64..=100.0,
        first in 0.0f64..=100.0,
        second in 0.0f64..=100.0,
    ) {
        let a = Condition::leaf("fitScore", Operator::GreaterThanOrEqual, first);
        let b = Condition::leaf("fitScore", Operator::LessThan, second);
        let fields = fit_score(score);
        let either = condition_matches(&a, &fields) || condition_matches(&b, &fields);

        prop_assert_eq!(
            condition_matches(&Condition::any(vec![a.clone(), b.clone()]), &fields),
            either
        );
        prop_assert_eq!(
            condition_matches(&Condition::any(vec![b, a]), &fields),
            either
        );
    }
}
