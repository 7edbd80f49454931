use tracing::{debug, trace};

use crate::currency::{resolve_currency_symbol, CurrencySymbolResolver};
use crate::date_format::format_timestamp;
use crate::money::format_money;
use crate::number_format::format_number;
use crate::outcome::ContributionSource;
use crate::record::Record;
use crate::rule::FieldRule;
use crate::truncate::truncate_with_indicator;
use crate::value::{FieldType, FieldValue};

/// Resolves one rule against `record` to its final text: formatted,
/// truncated and affixed. Never fails; unresolvable rules yield `""`.
///
/// `includeIf` is not consulted here, for the rule or its alternates;
/// only the name builder gates top-level rules.
pub fn resolve_field(
    rule: &FieldRule,
    record: &Record,
    currency: &dyn CurrencySymbolResolver,
) -> String {
    resolve_with_source(rule, record, currency).0
}

pub(crate) fn resolve_with_source(
    rule: &FieldRule,
    record: &Record,
    currency: &dyn CurrencySymbolResolver,
) -> (String, ContributionSource) {
    let value = record.get(&rule.field).filter(|value| !value.is_empty());

    let (candidate, source) = match value {
        Some(value) => (format_value(rule, value, record, currency), ContributionSource::Primary),
        None => {
            if let Some(alternate) = rule.alternate_field.as_deref() {
                debug!(field = %rule.field, alternate = %alternate.field, "primary field empty, using alternate");
                let (text, _) = resolve_with_source(alternate, record, currency);
                let source = if text.is_empty() {
                    ContributionSource::Empty
                } else {
                    ContributionSource::Alternate
                };
                return (text, source);
            }

            match rule.default.as_deref() {
                Some(default) if !default.is_empty() => {
                    debug!(field = %rule.field, "primary field empty, using default");
                    (default.to_string(), ContributionSource::Default)
                }
                _ => (String::new(), ContributionSource::Empty),
            }
        }
    };

    let text = finish(rule, candidate);
    trace!(field = %rule.field, text = %text, "resolved field rule");
    let source = if text.is_empty() {
        ContributionSource::Empty
    } else {
        source
    };
    (text, source)
}

/// Per-field truncation, then affixes around non-empty text.
fn finish(rule: &FieldRule, text: String) -> String {
    let text = match rule.max_length {
        Some(limit) if text.chars().count() > limit => {
            truncate_with_indicator(&text, limit, rule.indicator())
        }
        _ => text,
    };

    if text.is_empty() {
        return text;
    }

    let prefix = rule.prefix.as_deref().unwrap_or_default();
    let suffix = rule.suffix.as_deref().unwrap_or_default();
    format!("{prefix}{text}{suffix}")
}

/// Formats a present value by the rule's effective type. Values that do
/// not coerce to that type render as their default text.
fn format_value(
    rule: &FieldRule,
    value: &FieldValue,
    record: &Record,
    currency: &dyn CurrencySymbolResolver,
) -> String {
    let format = rule.format.as_deref();
    let label = record.label(&rule.field).filter(|label| !label.trim().is_empty());

    match FieldType::effective(rule.field_type, value) {
        FieldType::Date | FieldType::DateTime => match value.as_timestamp() {
            Some(timestamp) => format_timestamp(timestamp, format, rule.timezone_offset_hours),
            None => value.default_text(),
        },
        FieldType::Number => match value {
            FieldValue::Boolean(_) | FieldValue::Timestamp(_) | FieldValue::Lookup(_) => {
                value.default_text()
            }
            _ => match value.as_decimal() {
                Some(amount) => format_number(amount, format),
                None => value.default_text(),
            },
        },
        FieldType::Currency => match value.as_decimal() {
            Some(amount) => {
                let symbol = resolve_currency_symbol(record, currency);
                format_money(amount, format, label, symbol.as_deref())
            }
            None => value.default_text(),
        },
        FieldType::OptionSet | FieldType::Boolean => match label {
            Some(label) => label.to_string(),
            None => value.default_text(),
        },
        FieldType::Lookup => value.default_text(),
        FieldType::String => match (value, label) {
            (FieldValue::OptionSet(_) | FieldValue::Money(_) | FieldValue::Boolean(_), Some(label)) => {
                label.to_string()
            }
            _ => value.default_text(),
        },
    }
}
