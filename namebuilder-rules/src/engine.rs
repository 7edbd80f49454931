use std::fmt;
use std::path::Path;
use std::sync::Arc;

use namebuilder_core::{EngineSettings, DEFAULT_MAX_DEPTH};
use tracing::{debug, info};

use crate::configuration::Configuration;
use crate::currency::{CurrencySymbolResolver, NoCurrencySymbols};
use crate::error::RuleError;
use crate::loader::load_configuration;
use crate::outcome::{ContributionSource, NameOutcome};
use crate::record::Record;
use crate::resolver::resolve_with_source;
use crate::truncate::truncate_with_indicator;

/// Bounds applied to a document before it is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationLimits {
    /// Deepest alternate chain or condition nesting accepted.
    pub max_depth: usize,
}

impl Default for EvaluationLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl From<&EngineSettings> for EvaluationLimits {
    fn from(settings: &EngineSettings) -> Self {
        Self {
            max_depth: settings.max_depth,
        }
    }
}

/// Evaluates a validated rule document against records.
///
/// Construction validates the document once; evaluation afterwards is
/// infallible and holds no state between calls.
#[derive(Clone)]
pub struct NameBuilder {
    config: Configuration,
    currency: Arc<dyn CurrencySymbolResolver>,
    limits: EvaluationLimits,
}

impl fmt::Debug for NameBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameBuilder")
            .field("config", &self.config)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

impl NameBuilder {
    pub fn new(config: Configuration) -> Result<Self, RuleError> {
        Self::with_limits(config, EvaluationLimits::default())
    }

    pub fn with_limits(config: Configuration, limits: EvaluationLimits) -> Result<Self, RuleError> {
        config.validate(&limits)?;
        Ok(Self {
            config,
            currency: Arc::new(NoCurrencySymbols),
            limits,
        })
    }

    /// Loads and validates a document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RuleError> {
        Self::new(load_configuration(path)?)
    }

    /// Replaces the currency-symbol capability used for currency rules.
    pub fn with_currency_resolver(mut self, resolver: impl CurrencySymbolResolver + 'static) -> Self {
        self.currency = Arc::new(resolver);
        self
    }

    pub fn with_shared_currency_resolver(mut self, resolver: Arc<dyn CurrencySymbolResolver>) -> Self {
        self.currency = resolver;
        self
    }

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    pub fn limits(&self) -> EvaluationLimits {
        self.limits
    }

    /// Computes the name for `record`.
    pub fn build(&self, record: &Record) -> String {
        self.evaluate(record).value
    }

    /// Computes the name and reports what each rule contributed.
    pub fn evaluate(&self, record: &Record) -> NameOutcome {
        let tracing_enabled = self.config.tracing_enabled();
        let mut outcome = NameOutcome::new();

        for rule in &self.config.fields {
            if let Some(condition) = &rule.include_if {
                if !condition.evaluate(record) {
                    debug!(field = %rule.field, "rule skipped by condition");
                    outcome.record(&rule.field, ContributionSource::SkippedByCondition, String::new());
                    continue;
                }
            }

            let (text, source) = resolve_with_source(rule, record, self.currency.as_ref());
            if tracing_enabled && !text.is_empty() {
                info!(field = %rule.field, source = source.as_str(), text = %text, "rule contributed");
            }
            outcome.record(&rule.field, source, text);
        }

        if let Some(limit) = self.config.output_limit() {
            if outcome.len() > limit {
                let indicator = self.config.global_truncation_indicator();
                outcome.value = truncate_with_indicator(&outcome.value, limit, indicator);
                outcome.truncated = true;
            }
        }

        if tracing_enabled {
            info!(
                target_field = %self.config.target_field,
                length = outcome.len(),
                truncated = outcome.truncated,
                "name built"
            );
        }

        outcome
    }
}

/// One-shot helper: validates `config` and builds the name for `record`.
pub fn build_name(config: &Configuration, record: &Record) -> Result<String, RuleError> {
    config.validate(&EvaluationLimits::default())?;
    let builder = NameBuilder {
        config: config.clone(),
        currency: Arc::new(NoCurrencySymbols),
        limits: EvaluationLimits::default(),
    };
    Ok(builder.build(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{Condition, Operator};
    use crate::currency::StaticCurrencySymbols;
    use crate::record::CURRENCY_REFERENCE_FIELD;
    use crate::rule::FieldRule;
    use crate::value::{EntityReference, FieldType, FieldValue};
    use rust_decimal::Decimal;
    use serde_json::json;
    use uuid::Uuid;

    fn config(value: serde_json::Value) -> Configuration {
        serde_json::from_value(value).expect("configuration")
    }

    #[test]
    fn concatenates_and_truncates_whole_output() {
        let builder = NameBuilder::new(config(json!({
            "targetField": "name",
            "maxLength": 10,
            "fields": [
                {"field": "first", "suffix": " "},
                {"field": "last"}
            ]
        })))
        .expect("builder");

        let record = Record::new().with("first", "Johnathan").with("last", "Smith");
        let outcome = builder.evaluate(&record);

        assert_eq!(outcome.value, "Johnath...");
        assert!(outcome.truncated);
        assert_eq!(outcome.contributing_fields(), vec!["first", "last"]);
    }

    #[test]
    fn false_condition_omits_rule_and_default() {
        let builder = NameBuilder::new(config(json!({
            "fields": [
                {"field": "name"},
                {
                    "field": "status",
                    "default": "Unknown",
                    "prefix": " - ",
                    "includeIf": {"field": "status", "operator": "equals", "value": "Active"}
                }
            ]
        })))
        .expect("builder");

        let record = Record::new().with("name", "Contoso");
        let outcome = builder.evaluate(&record);

        assert_eq!(outcome.value, "Contoso");
        assert_eq!(outcome.contributions[1].source, ContributionSource::SkippedByCondition);
    }

    #[test]
    fn zero_document_limit_is_unlimited() {
        let builder = NameBuilder::new(
            Configuration::new(vec![FieldRule::new("title")]).with_max_length(0),
        )
        .expect("builder");
        let record = Record::new().with("title", "A fairly long title");
        assert_eq!(builder.build(&record), "A fairly long title");
    }

    #[test]
    fn global_truncation_uses_first_configured_indicator() {
        let builder = NameBuilder::new(
            Configuration::new(vec![
                FieldRule::new("first").suffix(" "),
                FieldRule::new("last").truncation_indicator("…"),
            ])
            .with_max_length(8),
        )
        .expect("builder");
        let record = Record::new().with("first", "Grace").with("last", "Hopper");
        assert_eq!(builder.build(&record), "Grace H…");
    }

    #[test]
    fn empty_output_is_valid() {
        let builder = NameBuilder::new(Configuration::new(vec![FieldRule::new("missing")]))
            .expect("builder");
        let outcome = builder.evaluate(&Record::new());
        assert!(outcome.is_empty());
        assert_eq!(outcome.contributions[0].source, ContributionSource::Empty);
    }

    #[test]
    fn rejects_documents_with_empty_field_names() {
        let err = NameBuilder::new(Configuration::new(vec![FieldRule::new("")])).unwrap_err();
        assert!(matches!(err, RuleError::EmptyFieldName { .. }));
    }

    #[test]
    fn rejects_nesting_beyond_limits() {
        let condition = Condition::AllOf(vec![Condition::AnyOf(vec![Condition::AllOf(vec![
            Condition::equals("a", "1"),
        ])])]);
        let config = Configuration::new(vec![FieldRule::new("x").include_if(condition)]);

        assert!(NameBuilder::with_limits(config.clone(), EvaluationLimits { max_depth: 5 }).is_ok());
        let err = NameBuilder::with_limits(config, EvaluationLimits { max_depth: 3 }).unwrap_err();
        match err {
            RuleError::DepthExceeded { limit, path } => {
                assert_eq!(limit, 3);
                assert_eq!(path, "fields[0].includeIf.allOf[0].anyOf[0]");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn currency_rules_use_injected_resolver() {
        let currency_id = Uuid::from_u128(9);
        let builder = NameBuilder::new(Configuration::new(vec![
            FieldRule::new("name").suffix(" "),
            FieldRule::new("revenue").typed(FieldType::Currency).format("0.#M"),
        ]))
        .expect("builder")
        .with_currency_resolver(StaticCurrencySymbols::new().with(currency_id, "£"));

        let record = Record::new()
            .with("name", "Fabrikam")
            .with("revenue", FieldValue::Money(Decimal::from(2_500_000)))
            .with(CURRENCY_REFERENCE_FIELD, EntityReference::new(currency_id));

        assert_eq!(builder.build(&record), "Fabrikam £2.5M");
    }

    #[test]
    fn conditions_combine_with_any_and_all() {
        let rule = FieldRule::new("city").prefix(", ").include_if(Condition::AllOf(vec![
            Condition::compare("city", Operator::IsNotEmpty, ""),
            Condition::AnyOf(vec![
                Condition::equals("country", "US"),
                Condition::compare("revenue", Operator::GreaterThan, "1000"),
            ]),
        ]));
        let builder =
            NameBuilder::new(Configuration::new(vec![FieldRule::new("name"), rule])).expect("builder");

        let domestic = Record::new().with("name", "A").with("city", "Austin").with("country", "us");
        let large = Record::new()
            .with("name", "B")
            .with("city", "Lyon")
            .with("country", "FR")
            .with("revenue", 5000i64);
        let small = Record::new()
            .with("name", "C")
            .with("city", "Nice")
            .with("country", "FR")
            .with("revenue", 10i64);

        assert_eq!(builder.build(&domestic), "A, Austin");
        assert_eq!(builder.build(&large), "B, Lyon");
        assert_eq!(builder.build(&small), "C");
    }

    #[test]
    fn build_name_validates_first() {
        let config = Configuration::new(vec![FieldRule::new("first")]);
        let record = Record::new().with("first", "Ada");
        assert_eq!(build_name(&config, &record).expect("name"), "Ada");
        assert!(build_name(&Configuration::new(vec![FieldRule::new(" ")]), &record).is_err());
    }
}
