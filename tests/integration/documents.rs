// Loading, validating and inspecting rule documents on disk.
use std::fs;

use namebuilder::{
    load_configuration, Configuration, EngineSettings, EvaluationLimits, NameBuilder, RuleError,
};
use tempfile::tempdir;

const CONTACT_YAML: &str = r#"
entity: contact
targetField: fullname
maxLength: 60
fields:
  - field: lastname
    suffix: ", "
    alternateField:
      field: companyname
  - field: FirstName
  - field: annualincome
    type: currency
    prefix: " "
    includeIf:
      allOf:
        - field: statecode
          operator: equals
          value: 0
        - field: LastName
          operator: isNotEmpty
"#;

#[test]
fn loads_yaml_and_lists_referenced_fields() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("contact.yml");
    fs::write(&path, CONTACT_YAML).expect("write");

    let config = load_configuration(&path).expect("load");
    assert_eq!(config.entity.as_deref(), Some("contact"));
    assert_eq!(
        config.referenced_fields(),
        vec![
            "annualincome",
            "companyname",
            "FirstName",
            "lastname",
            "statecode",
            "transactioncurrencyid"
        ]
    );
}

#[test]
fn json_output_uses_document_field_names() {
    let config = Configuration::from_yaml_str(CONTACT_YAML).expect("parse");
    let rendered = config.to_json_pretty().expect("render");

    for key in ["targetField", "maxLength", "alternateField", "includeIf", "allOf"] {
        assert!(rendered.contains(&format!("\"{key}\"")), "missing {key}");
    }
    assert!(!rendered.contains("truncationIndicator"));
    assert!(!rendered.contains("null"));
}

#[test]
fn builder_loads_from_path() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("rules.json");
    fs::write(&path, r##"{"fields": [{"field": "code", "prefix": "#"}]}"##).expect("write");

    let builder = NameBuilder::from_path(&path).expect("builder");
    let record = namebuilder::Record::new().with("code", "A-17");
    assert_eq!(builder.build(&record), "#A-17");
}

#[test]
fn malformed_files_report_their_path() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("broken.json");
    fs::write(&path, "{\"fields\": [").expect("write");

    match load_configuration(&path).unwrap_err() {
        RuleError::Parse { path: reported, .. } => {
            assert!(reported.ends_with("broken.json"), "{reported}");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn directories_and_missing_files_are_rejected() {
    let dir = tempdir().expect("temp dir");
    assert!(matches!(
        load_configuration(dir.path()).unwrap_err(),
        RuleError::Parse { .. }
    ));
    assert!(matches!(
        load_configuration(dir.path().join("nope.json")).unwrap_err(),
        RuleError::MissingPath(_)
    ));
}

#[test]
fn empty_field_names_are_reported_with_paths() {
    let config = Configuration::from_json_str(
        r#"{"fields": [{"field": "a"}, {"field": "b", "alternateField": {"field": "c", "alternateField": {"field": ""}}}]}"#,
    )
    .expect("parse");

    match config.validate(&EvaluationLimits::default()).unwrap_err() {
        RuleError::EmptyFieldName { path } => {
            assert_eq!(path, "fields[1].alternateField.alternateField");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn settings_bound_alternate_depth() {
    let settings = EngineSettings {
        max_depth: 2,
        ..EngineSettings::default()
    };
    let limits = EvaluationLimits::from(&settings);

    let config = Configuration::from_json_str(
        r#"{"fields": [{"field": "a", "alternateField": {"field": "b", "alternateField": {"field": "c"}}}]}"#,
    )
    .expect("parse");

    match NameBuilder::with_limits(config.clone(), limits).unwrap_err() {
        RuleError::DepthExceeded { limit, path } => {
            assert_eq!(limit, 2);
            assert_eq!(path, "fields[0].alternateField.alternateField");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(NameBuilder::new(config).is_ok());
}
