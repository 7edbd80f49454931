// End-to-end evaluation of rule documents against JSON records.
use namebuilder::{
    preview_json, CachedCurrencyResolver, Configuration, ContributionSource, FieldRule, NameBuilder,
    Record, StaticCurrencySymbols,
};
use serde_json::{json, Value};
use uuid::Uuid;

fn builder(document: Value) -> NameBuilder {
    let config: Configuration = serde_json::from_value(document).expect("configuration");
    NameBuilder::new(config).expect("builder")
}

fn record(value: Value) -> Record {
    Record::from_json(&value).expect("record")
}

#[test]
fn truncates_concatenated_name_with_default_indicator() {
    let builder = builder(json!({
        "targetField": "name",
        "maxLength": 10,
        "fields": [{"field": "first", "suffix": " "}, {"field": "last"}]
    }));
    let outcome = builder.evaluate(&record(json!({"first": "Johnathan", "last": "Smith"})));

    assert_eq!(outcome.value, "Johnath...");
    assert!(outcome.truncated);
}

#[test]
fn condition_on_absent_field_omits_rule_entirely() {
    let builder = builder(json!({
        "fields": [
            {"field": "name"},
            {
                "field": "status",
                "default": "No status",
                "prefix": " | ",
                "includeIf": {"field": "status", "operator": "equals", "value": "Active"}
            }
        ]
    }));

    assert_eq!(builder.build(&record(json!({"name": "Contoso"}))), "Contoso");
    assert_eq!(
        builder.build(&record(json!({"name": "Contoso", "status": "active"}))),
        "Contoso | active"
    );
}

#[test]
fn rules_without_fallbacks_contribute_nothing() {
    let builder = builder(json!({
        "fields": [{"field": "missing", "prefix": "<", "suffix": ">"}]
    }));
    let outcome = builder.evaluate(&record(json!({})));
    assert_eq!(outcome.value, "");
    assert_eq!(outcome.contributions[0].source, ContributionSource::Empty);
}

#[test]
fn account_name_with_money_dates_and_options() {
    let currency_id = Uuid::from_u128(0xEE);
    let builder = builder(json!({
        "entity": "opportunity",
        "fields": [
            {"field": "name"},
            {"field": "estimatedvalue", "type": "currency", "format": "0.0K", "prefix": " - "},
            {"field": "estimatedclosedate", "type": "date", "format": "MMM yyyy", "prefix": " (", "suffix": ")"},
            {"field": "salesstage", "prefix": " [", "suffix": "]"}
        ]
    }))
    .with_currency_resolver(CachedCurrencyResolver::new(
        StaticCurrencySymbols::new().with(currency_id, "€"),
    ));

    let record = record(json!({
        "attributes": {
            "name": "Renewal",
            "estimatedvalue": {"$type": "money", "value": 48250},
            "estimatedclosedate": {"$type": "date", "value": "2024-06-30"},
            "salesstage": {"$type": "optionset", "value": 2, "label": "Propose"},
            "transactioncurrencyid": {"$type": "lookup", "id": currency_id.to_string()}
        }
    }));

    assert_eq!(builder.build(&record), "Renewal - €48.3K (Jun 2024) [Propose]");
}

#[test]
fn record_symbol_wins_over_resolver() {
    let builder = builder(json!({
        "fields": [{"field": "amount", "type": "currency"}]
    }));
    let record = record(json!({
        "attributes": {"amount": {"$type": "money", "value": "-99.5"}},
        "currencySymbol": "R$"
    }));
    assert_eq!(builder.build(&record), "-R$99.50");
}

#[test]
fn alternate_chain_and_defaults() {
    let builder = builder(json!({
        "fields": [{
            "field": "nickname",
            "alternateField": {
                "field": "firstname",
                "suffix": "!",
                "alternateField": {"field": "fullname", "default": "Anonymous"}
            },
            "default": "never used"
        }]
    }));

    assert_eq!(builder.build(&record(json!({"nickname": "Ace"}))), "Ace");
    assert_eq!(builder.build(&record(json!({"nickname": " ", "firstname": "Grace"}))), "Grace!");
    assert_eq!(builder.build(&record(json!({}))), "Anonymous");

    let outcome = builder.evaluate(&record(json!({})));
    assert_eq!(outcome.contributions[0].source, ContributionSource::Alternate);
}

#[test]
fn per_field_limits_apply_before_affixes() {
    let builder = builder(json!({
        "fields": [
            {"field": "city", "maxLength": 4, "truncationIndicator": ".", "suffix": ", "},
            {"field": "country"}
        ]
    }));
    assert_eq!(
        builder.build(&record(json!({"city": "Amsterdam", "country": "NL"}))),
        "Ams., NL"
    );
}

#[test]
fn builder_is_shareable_across_threads() {
    let builder = std::sync::Arc::new(
        NameBuilder::new(Configuration::new(vec![FieldRule::new("id").prefix("#")]))
            .expect("builder"),
    );

    let handles: Vec<_> = (0..4)
        .map(|index| {
            let builder = std::sync::Arc::clone(&builder);
            std::thread::spawn(move || builder.build(&Record::new().with("id", index as i64)))
        })
        .collect();

    let names: Vec<String> = handles
        .into_iter()
        .map(|handle| handle.join().expect("thread"))
        .collect();
    assert_eq!(names, vec!["#0", "#1", "#2", "#3"]);
}

#[test]
fn preview_helper_matches_builder() {
    let name = preview_json(
        r#"{"maxLength": 8, "fields": [{"field": "title", "truncationIndicator": "~"}]}"#,
        r#"{"title": "Quarterly report"}"#,
    )
    .expect("preview");
    assert_eq!(name, "Quarter~");
}

#[test]
fn alternate_conditions_are_ignored_while_falling_back() {
    let builder = builder(json!({
        "fields": [{
            "field": "nickname",
            "alternateField": {
                "field": "firstname",
                "includeIf": {"field": "type", "operator": "equals", "value": "person"}
            }
        }]
    }));

    let outcome = builder.evaluate(&record(json!({"firstname": "Ada", "type": "company"})));
    assert_eq!(outcome.value, "Ada");
    assert_eq!(outcome.contributions[0].source, ContributionSource::Alternate);
}
