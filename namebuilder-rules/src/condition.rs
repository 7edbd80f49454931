use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::date_format::round_trip_text;
use crate::error::RuleError;
use crate::record::Record;
use crate::value::{parse_decimal, parse_timestamp, FieldValue};

/// Comparison applied by a leaf condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Operator {
    #[default]
    Equals,
    NotEquals,
    Contains,
    NotContains,
    IsEmpty,
    IsNotEmpty,
    GreaterThan,
    LessThan,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "notEquals",
            Operator::Contains => "contains",
            Operator::NotContains => "notContains",
            Operator::IsEmpty => "isEmpty",
            Operator::IsNotEmpty => "isNotEmpty",
            Operator::GreaterThan => "greaterThan",
            Operator::LessThan => "lessThan",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = RuleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|ch| *ch != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "equals" => Ok(Operator::Equals),
            "notequals" => Ok(Operator::NotEquals),
            "contains" => Ok(Operator::Contains),
            "notcontains" => Ok(Operator::NotContains),
            "isempty" => Ok(Operator::IsEmpty),
            "isnotempty" => Ok(Operator::IsNotEmpty),
            "greaterthan" => Ok(Operator::GreaterThan),
            "lessthan" => Ok(Operator::LessThan),
            _ => Err(RuleError::UnknownOperator(value.to_string())),
        }
    }
}

impl Serialize for Operator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Operator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Boolean expression gating whether a field rule contributes.
///
/// Exactly one shape is populated in a document; populating several is
/// rejected while parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCondition", into = "RawCondition")]
pub enum Condition {
    /// True when any child is true. Empty is false.
    AnyOf(Vec<Condition>),
    /// True when every child is true. Empty is true.
    AllOf(Vec<Condition>),
    Compare {
        field: String,
        operator: Operator,
        value: String,
    },
}

impl Condition {
    pub fn compare(field: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        Condition::Compare {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::compare(field, Operator::Equals, value)
    }

    /// Evaluates the condition. Never fails: mismatched operands fall
    /// back to string comparison.
    pub fn evaluate(&self, record: &Record) -> bool {
        match self {
            Condition::AnyOf(children) => children.iter().any(|child| child.evaluate(record)),
            Condition::AllOf(children) => children.iter().all(|child| child.evaluate(record)),
            Condition::Compare {
                field,
                operator,
                value,
            } => {
                let context = ComparisonContext::from_record(record, field);
                context.test(*operator, value)
            }
        }
    }

    /// Nesting depth, a leaf counting as one.
    pub fn depth(&self) -> usize {
        match self {
            Condition::AnyOf(children) | Condition::AllOf(children) => {
                1 + children.iter().map(Condition::depth).max().unwrap_or(0)
            }
            Condition::Compare { .. } => 1,
        }
    }

    /// Visits every field name a leaf reads.
    pub fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Condition::AnyOf(children) | Condition::AllOf(children) => {
                for child in children {
                    child.collect_fields(out);
                }
            }
            Condition::Compare { field, .. } => out.push(field),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    operator: Option<Operator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<Operand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    any_of: Option<Vec<Condition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    all_of: Option<Vec<Condition>>,
}

/// Leaf operand. Authors sometimes write numbers or booleans unquoted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum Operand {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
}

impl From<Operand> for String {
    fn from(value: Operand) -> Self {
        match value {
            Operand::Text(text) => text,
            Operand::Number(number) => number.to_string(),
            Operand::Flag(flag) => flag.to_string(),
        }
    }
}

impl TryFrom<RawCondition> for Condition {
    type Error = RuleError;

    fn try_from(raw: RawCondition) -> Result<Self, Self::Error> {
        let field = raw.field.filter(|field| !field.trim().is_empty());

        let mut shapes = Vec::new();
        if raw.any_of.is_some() {
            shapes.push("anyOf");
        }
        if raw.all_of.is_some() {
            shapes.push("allOf");
        }
        if field.is_some() {
            shapes.push("field");
        }
        if shapes.len() > 1 {
            return Err(RuleError::ConflictingCondition(shapes.join(", ")));
        }

        if let Some(children) = raw.any_of {
            return Ok(Condition::AnyOf(children));
        }
        if let Some(children) = raw.all_of {
            return Ok(Condition::AllOf(children));
        }
        match field {
            Some(field) => Ok(Condition::Compare {
                field,
                operator: raw.operator.unwrap_or_default(),
                value: raw.value.map(String::from).unwrap_or_default(),
            }),
            None => Err(RuleError::EmptyCondition),
        }
    }
}

impl From<Condition> for RawCondition {
    fn from(condition: Condition) -> Self {
        match condition {
            Condition::AnyOf(children) => RawCondition {
                any_of: Some(children),
                ..RawCondition::default()
            },
            Condition::AllOf(children) => RawCondition {
                all_of: Some(children),
                ..RawCondition::default()
            },
            Condition::Compare {
                field,
                operator,
                value,
            } => RawCondition {
                field: Some(field),
                operator: Some(operator),
                value: Some(Operand::Text(value)),
                ..RawCondition::default()
            },
        }
    }
}

/// Every way a record field can be compared: its string candidates plus
/// numeric and temporal projections for ordering operators.
#[derive(Debug, Default)]
struct ComparisonContext {
    has_value: bool,
    number: Option<Decimal>,
    timestamp: Option<NaiveDateTime>,
    candidates: Vec<String>,
}

impl ComparisonContext {
    fn from_record(record: &Record, field: &str) -> Self {
        let Some(value) = record.get(field) else {
            return Self::default();
        };

        let mut context = ComparisonContext {
            has_value: true,
            ..Self::default()
        };
        let label = record.label(field).filter(|label| !label.trim().is_empty());

        match value {
            FieldValue::Text(text) => {
                context.number = parse_decimal(text);
                context.timestamp = parse_timestamp(text);
                context.candidates.push(text.clone());
            }
            FieldValue::Lookup(reference) => {
                if let Some(name) = reference.name.as_deref().filter(|n| !n.trim().is_empty()) {
                    context.candidates.push(name.to_string());
                }
                context.candidates.push(reference.id.to_string());
            }
            FieldValue::OptionSet(code) => {
                context.number = Some(Decimal::from(*code));
                context.candidates.extend(label.map(str::to_string));
                context.candidates.push(code.to_string());
            }
            FieldValue::Money(amount) => {
                context.number = Some(*amount);
                context.candidates.extend(label.map(str::to_string));
                context.candidates.push(amount.to_string());
            }
            FieldValue::Timestamp(timestamp) => {
                context.timestamp = Some(*timestamp);
                context.candidates.push(round_trip_text(*timestamp));
            }
            FieldValue::Boolean(flag) => {
                context.number = Some(if *flag { Decimal::ONE } else { Decimal::ZERO });
                context.candidates.push(flag.to_string());
            }
            FieldValue::Whole(_) | FieldValue::Decimal(_) => {
                context.number = value.as_decimal();
                context.candidates.push(value.default_text());
            }
        }

        context
    }

    fn test(&self, operator: Operator, operand: &str) -> bool {
        match operator {
            Operator::Equals => self.matches_any(|candidate| eq_ignore_case(candidate, operand)),
            Operator::NotEquals => !self.matches_any(|candidate| eq_ignore_case(candidate, operand)),
            Operator::Contains => self.matches_any(|candidate| contains_ignore_case(candidate, operand)),
            Operator::NotContains => {
                !self.matches_any(|candidate| contains_ignore_case(candidate, operand))
            }
            Operator::IsEmpty => self.is_empty(),
            Operator::IsNotEmpty => !self.is_empty(),
            Operator::GreaterThan => self.compare(operand) == Ordering::Greater,
            Operator::LessThan => self.compare(operand) == Ordering::Less,
        }
    }

    fn is_empty(&self) -> bool {
        !self.has_value || self.candidates.iter().all(|c| c.trim().is_empty())
    }

    /// Absent fields compare as a single empty candidate.
    fn matches_any(&self, predicate: impl Fn(&str) -> bool) -> bool {
        if self.candidates.is_empty() {
            return predicate("");
        }
        self.candidates.iter().any(|candidate| predicate(candidate))
    }

    fn compare(&self, operand: &str) -> Ordering {
        if let (Some(number), Some(target)) = (self.number, parse_decimal(operand)) {
            return number.cmp(&target);
        }

        if let (Some(timestamp), Some(target)) = (self.timestamp, parse_timestamp(operand)) {
            return timestamp.cmp(&target);
        }

        let candidate = self.candidates.first().map(String::as_str).unwrap_or("");
        candidate.to_uppercase().cmp(&operand.to_uppercase())
    }
}

fn eq_ignore_case(left: &str, right: &str) -> bool {
    left.to_lowercase() == right.to_lowercase()
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
