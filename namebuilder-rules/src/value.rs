use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::error::RuleError;

/// Reference to another business object, optionally carrying its display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityReference {
    pub id: Uuid,
    pub logical_name: Option<String>,
    pub name: Option<String>,
}

impl EntityReference {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            logical_name: None,
            name: None,
        }
    }

    pub fn named(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            logical_name: None,
            name: Some(name.into()),
        }
    }
}

/// Raw value of a record attribute. Absent attributes are simply missing
/// from the [`Record`](crate::Record).
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Whole(i64),
    Decimal(Decimal),
    Boolean(bool),
    /// Naive wall-clock instant; no timezone is implied.
    Timestamp(NaiveDateTime),
    /// Coded option value. The human label lives in the record's label map.
    OptionSet(i32),
    Money(Decimal),
    Lookup(EntityReference),
}

/// Tag of a [`FieldValue`], used for type inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Whole,
    Decimal,
    Boolean,
    Timestamp,
    OptionSet,
    Money,
    Lookup,
}

impl FieldValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            FieldValue::Text(_) => ValueKind::Text,
            FieldValue::Whole(_) => ValueKind::Whole,
            FieldValue::Decimal(_) => ValueKind::Decimal,
            FieldValue::Boolean(_) => ValueKind::Boolean,
            FieldValue::Timestamp(_) => ValueKind::Timestamp,
            FieldValue::OptionSet(_) => ValueKind::OptionSet,
            FieldValue::Money(_) => ValueKind::Money,
            FieldValue::Lookup(_) => ValueKind::Lookup,
        }
    }

    /// Only text participates in the emptiness test: blank text is empty,
    /// every other present value (zero, false, unnamed lookups) is not.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    /// Numeric projection used by number/currency formatting and ordered comparisons.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            FieldValue::Whole(value) => Some(Decimal::from(*value)),
            FieldValue::Decimal(value) | FieldValue::Money(value) => Some(*value),
            FieldValue::OptionSet(code) => Some(Decimal::from(*code)),
            FieldValue::Text(text) => parse_decimal(text),
            FieldValue::Boolean(_) | FieldValue::Timestamp(_) | FieldValue::Lookup(_) => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            FieldValue::Timestamp(value) => Some(*value),
            FieldValue::Text(text) => parse_timestamp(text),
            _ => None,
        }
    }

    /// The value's default textual representation.
    pub fn default_text(&self) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::Whole(value) => value.to_string(),
            FieldValue::Decimal(value) | FieldValue::Money(value) => value.to_string(),
            FieldValue::Boolean(true) => "True".to_string(),
            FieldValue::Boolean(false) => "False".to_string(),
            FieldValue::Timestamp(value) => crate::date_format::default_text(*value),
            FieldValue::OptionSet(code) => code.to_string(),
            FieldValue::Lookup(reference) => reference
                .name
                .clone()
                .unwrap_or_else(|| reference.id.to_string()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Whole(value)
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        FieldValue::Decimal(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(value: NaiveDateTime) -> Self {
        FieldValue::Timestamp(value)
    }
}

impl From<EntityReference> for FieldValue {
    fn from(value: EntityReference) -> Self {
        FieldValue::Lookup(value)
    }
}

/// Declared type of a field rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    String,
    Lookup,
    Date,
    DateTime,
    OptionSet,
    Number,
    Currency,
    Boolean,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Lookup => "lookup",
            FieldType::Date => "date",
            FieldType::DateTime => "datetime",
            FieldType::OptionSet => "optionset",
            FieldType::Number => "number",
            FieldType::Currency => "currency",
            FieldType::Boolean => "boolean",
        }
    }

    /// Best-effort type for a value whose rule declares none.
    pub fn infer(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Text => FieldType::String,
            ValueKind::Timestamp => FieldType::DateTime,
            ValueKind::Boolean => FieldType::Boolean,
            ValueKind::Whole | ValueKind::Decimal => FieldType::Number,
            ValueKind::Money => FieldType::Currency,
            ValueKind::OptionSet => FieldType::OptionSet,
            ValueKind::Lookup => FieldType::Lookup,
        }
    }

    /// Effective type for one evaluation. Computed fresh every time; rules are never mutated.
    pub fn effective(declared: Option<FieldType>, value: &FieldValue) -> Self {
        declared.unwrap_or_else(|| FieldType::infer(value.kind()))
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, FieldType::Date | FieldType::DateTime)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = RuleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "string" => Ok(FieldType::String),
            "lookup" => Ok(FieldType::Lookup),
            "date" => Ok(FieldType::Date),
            "datetime" => Ok(FieldType::DateTime),
            "optionset" => Ok(FieldType::OptionSet),
            "number" => Ok(FieldType::Number),
            "currency" => Ok(FieldType::Currency),
            "boolean" => Ok(FieldType::Boolean),
            other => Err(RuleError::UnknownFieldType(other.to_string())),
        }
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Parses an invariant-culture number: optional sign, group separators, exponent.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let cleaned: String = trimmed.chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    Decimal::from_str(cleaned)
        .or_else(|_| Decimal::from_scientific(cleaned))
        .ok()
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Parses a timestamp. Values carrying an offset are converted to UTC wall-clock time.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(aware) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(aware.naive_utc());
    }

    if let Some(value) = DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
    {
        return Some(value);
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
