use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::condition::Condition;
use crate::engine::EvaluationLimits;
use crate::error::RuleError;
use crate::record::CURRENCY_REFERENCE_FIELD;
use crate::rule::FieldRule;
use crate::truncate::DEFAULT_TRUNCATION_INDICATOR;
use crate::value::FieldType;

/// Field written when a document names no target.
pub const DEFAULT_TARGET_FIELD: &str = "name";

/// Root rule document. Field names match the JSON consumed by the
/// execution backend and must not change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// Logical name of the record type the rules apply to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    #[serde(default = "Configuration::default_target_field")]
    pub target_field: String,
    /// Cap on the concatenated output. Zero or absent means unlimited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Diagnostic switch for the execution environment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_tracing: Option<bool>,
    /// Ordered rules; order is concatenation order.
    #[serde(default)]
    pub fields: Vec<FieldRule>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            entity: None,
            target_field: Self::default_target_field(),
            max_length: None,
            enable_tracing: None,
            fields: Vec::new(),
        }
    }
}

impl Configuration {
    pub fn default_target_field() -> String {
        DEFAULT_TARGET_FIELD.to_string()
    }

    pub fn new(fields: Vec<FieldRule>) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn tracing_enabled(&self) -> bool {
        self.enable_tracing.unwrap_or(false)
    }

    /// Effective document-level limit; zero counts as unlimited.
    pub fn output_limit(&self) -> Option<usize> {
        self.max_length.filter(|limit| *limit > 0)
    }

    /// Indicator of the first rule that sets a non-empty one.
    pub fn global_truncation_indicator(&self) -> &str {
        self.fields
            .iter()
            .filter_map(|rule| rule.truncation_indicator.as_deref())
            .find(|indicator| !indicator.is_empty())
            .unwrap_or(DEFAULT_TRUNCATION_INDICATOR)
    }

    /// Reports the first structural defect: an empty field name or
    /// nesting beyond `limits.max_depth`.
    pub fn validate(&self, limits: &EvaluationLimits) -> Result<(), RuleError> {
        for (index, rule) in self.fields.iter().enumerate() {
            validate_rule(rule, &format!("fields[{index}]"), 1, limits)?;
        }
        Ok(())
    }

    /// Every field the document reads, including alternates and condition
    /// leaves, plus the currency reference when any rule is typed currency.
    /// Names are de-duplicated case-insensitively and sorted.
    pub fn referenced_fields(&self) -> Vec<String> {
        let mut names = Vec::new();
        let mut needs_currency = false;
        for rule in &self.fields {
            collect_rule_fields(rule, &mut names, &mut needs_currency);
        }
        if needs_currency {
            names.push(CURRENCY_REFERENCE_FIELD);
        }

        let mut seen = HashSet::new();
        let mut unique: Vec<String> = names
            .into_iter()
            .filter(|name| !name.trim().is_empty())
            .filter(|name| seen.insert(name.to_lowercase()))
            .map(str::to_string)
            .collect();
        unique.sort_by_key(|name| name.to_lowercase());
        unique
    }
}

fn validate_rule(
    rule: &FieldRule,
    path: &str,
    depth: usize,
    limits: &EvaluationLimits,
) -> Result<(), RuleError> {
    if depth > limits.max_depth {
        return Err(RuleError::DepthExceeded {
            limit: limits.max_depth,
            path: path.to_string(),
        });
    }

    if rule.field.trim().is_empty() {
        return Err(RuleError::EmptyFieldName {
            path: path.to_string(),
        });
    }

    if let Some(condition) = &rule.include_if {
        validate_condition(condition, &format!("{path}.includeIf"), depth + 1, limits)?;
    }

    if let Some(alternate) = &rule.alternate_field {
        validate_rule(alternate, &format!("{path}.alternateField"), depth + 1, limits)?;
    }

    Ok(())
}

fn validate_condition(
    condition: &Condition,
    path: &str,
    depth: usize,
    limits: &EvaluationLimits,
) -> Result<(), RuleError> {
    if depth > limits.max_depth {
        return Err(RuleError::DepthExceeded {
            limit: limits.max_depth,
            path: path.to_string(),
        });
    }

    let (shape, children) = match condition {
        Condition::AnyOf(children) => ("anyOf", children),
        Condition::AllOf(children) => ("allOf", children),
        Condition::Compare { field, .. } => {
            if field.trim().is_empty() {
                return Err(RuleError::EmptyCondition);
            }
            return Ok(());
        }
    };

    for (index, child) in children.iter().enumerate() {
        validate_condition(child, &format!("{path}.{shape}[{index}]"), depth + 1, limits)?;
    }
    Ok(())
}

fn collect_rule_fields<'a>(rule: &'a FieldRule, names: &mut Vec<&'a str>, needs_currency: &mut bool) {
    names.push(&rule.field);
    if rule.field_type == Some(FieldType::Currency) {
        *needs_currency = true;
    }
    if let Some(condition) = &rule.include_if {
        condition.collect_fields(names);
    }
    if let Some(alternate) = &rule.alternate_field {
        collect_rule_fields(alternate, names, needs_currency);
    }
}
