use serde::{Deserialize, Serialize};

use crate::condition::Condition;
use crate::truncate::DEFAULT_TRUNCATION_INDICATOR;
use crate::value::FieldType;

/// How one piece of the output is sourced, formatted and affixed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRule {
    /// Source field name. Never empty in a valid document.
    pub field: String,
    /// Declared type; inferred from the value when absent.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    /// Number or date pattern, depending on the type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Cap on the formatted value, applied before prefix and suffix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truncation_indicator: Option<String>,
    /// Static text used when the field is absent or blank and no alternate exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    /// Whole hours added to date/datetime values before formatting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone_offset_hours: Option<i32>,
    /// Fallback rule whose complete output replaces this one when the field is empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate_field: Option<Box<FieldRule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_if: Option<Condition>,
}

impl FieldRule {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ..Self::default()
        }
    }

    pub fn typed(mut self, field_type: FieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn truncation_indicator(mut self, indicator: impl Into<String>) -> Self {
        self.truncation_indicator = Some(indicator.into());
        self
    }

    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn timezone_offset(mut self, hours: i32) -> Self {
        self.timezone_offset_hours = Some(hours);
        self
    }

    pub fn alternate(mut self, rule: FieldRule) -> Self {
        self.alternate_field = Some(Box::new(rule));
        self
    }

    pub fn include_if(mut self, condition: Condition) -> Self {
        self.include_if = Some(condition);
        self
    }

    /// Indicator used when this rule truncates.
    pub fn indicator(&self) -> &str {
        self.truncation_indicator
            .as_deref()
            .filter(|indicator| !indicator.is_empty())
            .unwrap_or(DEFAULT_TRUNCATION_INDICATOR)
    }
}
