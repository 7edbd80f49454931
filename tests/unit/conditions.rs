// Tests for condition parsing and evaluation against projected records.
use namebuilder::{Condition, Configuration, Operator, Record, RuleError};
use serde_json::{json, Value};
use test_case::test_case;

fn record() -> Record {
    Record::from_json(&json!({
        "attributes": {
            "name": "Contoso Ltd",
            "blank": "  ",
            "revenue": {"$type": "money", "value": 1500000},
            "statuscode": {"$type": "optionset", "value": 1},
            "createdon": {"$type": "datetime", "value": "2024-02-10T08:30:00"},
            "employees": 250,
            "active": true,
            "owner": {"$type": "lookup", "id": "00000000-0000-0000-0000-000000000007", "name": "Ada"}
        },
        "formattedValues": {"statuscode": "Active"}
    }))
    .expect("record")
}

fn condition(value: Value) -> Condition {
    serde_json::from_value(value).expect("condition")
}

#[test_case(json!({"field": "name", "value": "contoso ltd"}), true ; "equals defaults and ignores case")]
#[test_case(json!({"field": "statuscode", "operator": "equals", "value": "active"}), true ; "option label")]
#[test_case(json!({"field": "statuscode", "operator": "equals", "value": 1}), true ; "option code as number")]
#[test_case(json!({"field": "owner", "operator": "contains", "value": "ad"}), true ; "lookup name")]
#[test_case(json!({"field": "name", "operator": "notContains", "value": "fabrikam"}), true ; "not contains")]
#[test_case(json!({"field": "revenue", "operator": "greaterThan", "value": "1,000,000"}), true ; "money ordering")]
#[test_case(json!({"field": "employees", "operator": "lessThan", "value": "100"}), false ; "whole ordering")]
#[test_case(json!({"field": "createdon", "operator": "greaterThan", "value": "2024-01-31"}), true ; "date ordering")]
#[test_case(json!({"field": "name", "operator": "lessThan", "value": "delta"}), true ; "string ordering fallback")]
#[test_case(json!({"field": "missing", "operator": "equals", "value": ""}), true ; "absent equals empty")]
#[test_case(json!({"field": "missing", "operator": "greaterThan", "value": "5"}), false ; "absent never greater")]
#[test_case(json!({"anyOf": []}), false ; "empty any of")]
#[test_case(json!({"allOf": []}), true ; "empty all of")]
#[test_case(json!({"allOf": [{"field": "active", "value": "true"}, {"anyOf": [{"field": "blank", "operator": "isNotEmpty"}, {"field": "employees", "operator": "greaterThan", "value": 200}]}]}), true ; "nested groups")]
fn evaluates(document: Value, expected: bool) {
    assert_eq!(condition(document).evaluate(&record()), expected);
}

#[test]
fn is_empty_and_is_not_empty_are_complements() {
    let record = record();
    for field in [
        "name", "blank", "revenue", "statuscode", "createdon", "employees", "active", "owner",
        "missing",
    ] {
        let empty = Condition::compare(field, Operator::IsEmpty, "").evaluate(&record);
        let not_empty = Condition::compare(field, Operator::IsNotEmpty, "").evaluate(&record);
        assert_ne!(empty, not_empty, "field {field}");
    }
}

#[test]
fn blank_and_missing_fields_are_empty() {
    let record = record();
    assert!(Condition::compare("blank", Operator::IsEmpty, "").evaluate(&record));
    assert!(Condition::compare("missing", Operator::IsEmpty, "").evaluate(&record));
    assert!(!Condition::compare("employees", Operator::IsEmpty, "").evaluate(&record));
}

#[test_case(r#"{"field": "a", "allOf": []}"# ; "leaf and group")]
#[test_case(r#"{"anyOf": [], "allOf": []}"# ; "two groups")]
fn conflicting_shapes_are_rejected(raw: &str) {
    let document = format!(r#"{{"fields": [{{"field": "x", "includeIf": {raw}}}]}}"#);
    let err = Configuration::from_json_str(&document).unwrap_err();
    assert!(matches!(err, RuleError::Parse { .. }), "{err:?}");
}

#[test]
fn shapeless_and_unknown_operators_are_rejected() {
    assert!(serde_json::from_value::<Condition>(json!({"value": "x"})).is_err());
    assert!(serde_json::from_value::<Condition>(json!({"field": "a", "operator": "between"})).is_err());
}

#[test]
fn operators_parse_case_insensitively() {
    let parsed = condition(json!({"field": "a", "operator": "IS_NOT_EMPTY"}));
    assert_eq!(parsed, Condition::compare("a", Operator::IsNotEmpty, ""));
}
