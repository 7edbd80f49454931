use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::RuleError;
use crate::value::{parse_timestamp, EntityReference, FieldValue};

/// Attribute holding the record's currency reference.
pub const CURRENCY_REFERENCE_FIELD: &str = "transactioncurrencyid";

/// Immutable snapshot of one business object's field values.
///
/// Besides the raw values a record may carry human labels for coded
/// fields (option sets, money) and a currency symbol resolved ahead of time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    attributes: HashMap<String, FieldValue>,
    labels: HashMap<String, String>,
    currency_symbol: Option<String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style attribute insert.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Builder-style label insert.
    pub fn with_label(mut self, field: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(field.into(), label.into());
        self
    }

    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = Some(symbol.into());
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.attributes.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.attributes.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.attributes.contains_key(field)
    }

    /// Formatted label supplied for a coded field.
    pub fn label(&self, field: &str) -> Option<&str> {
        self.labels.get(field).map(String::as_str)
    }

    pub fn currency_symbol(&self) -> Option<&str> {
        self.currency_symbol.as_deref()
    }

    /// Currency reference of the record, ignoring the nil id.
    pub fn currency_reference(&self) -> Option<&EntityReference> {
        match self.attributes.get(CURRENCY_REFERENCE_FIELD) {
            Some(FieldValue::Lookup(reference)) if !reference.id.is_nil() => Some(reference),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Parses a JSON record document. See [`Record::from_json`].
    pub fn from_json_str(raw: &str) -> Result<Self, RuleError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|err| RuleError::InvalidRecord(err.to_string()))?;
        Self::from_json(&value)
    }

    /// Projects a JSON object into a record.
    ///
    /// Either a flat object of attributes, or an envelope with `attributes`,
    /// optional `formattedValues` and optional `currencySymbol`. Plain scalars
    /// map to text, whole, decimal and boolean values; `null` means absent.
    /// Richer kinds use tagged objects such as
    /// `{"$type": "money", "value": 12.5}` or
    /// `{"$type": "lookup", "id": "...", "name": "..."}`.
    pub fn from_json(value: &Value) -> Result<Self, RuleError> {
        let root = value
            .as_object()
            .ok_or_else(|| RuleError::InvalidRecord("record must be a JSON object".into()))?;

        let mut record = Record::new();
        let attributes = match root.get("attributes") {
            Some(Value::Object(attributes)) => {
                if let Some(labels) = root.get("formattedValues") {
                    record.read_labels(labels)?;
                }
                match root.get("currencySymbol") {
                    Some(Value::String(symbol)) => record.currency_symbol = Some(symbol.clone()),
                    Some(Value::Null) | None => {}
                    Some(_) => {
                        return Err(RuleError::InvalidRecord(
                            "currencySymbol must be a string".into(),
                        ))
                    }
                }
                attributes
            }
            Some(_) => {
                return Err(RuleError::InvalidRecord(
                    "attributes must be a JSON object".into(),
                ))
            }
            None => root,
        };

        for (field, raw) in attributes {
            if let Some(value) = project_value(field, raw, &mut record.labels)? {
                record.attributes.insert(field.clone(), value);
            }
        }

        Ok(record)
    }

    fn read_labels(&mut self, labels: &Value) -> Result<(), RuleError> {
        let labels = labels
            .as_object()
            .ok_or_else(|| RuleError::InvalidRecord("formattedValues must be a JSON object".into()))?;
        for (field, label) in labels {
            match label {
                Value::String(text) => {
                    self.labels.insert(field.clone(), text.clone());
                }
                Value::Null => {}
                other => {
                    self.labels.insert(field.clone(), other.to_string());
                }
            }
        }
        Ok(())
    }
}

fn project_value(
    field: &str,
    raw: &Value,
    labels: &mut HashMap<String, String>,
) -> Result<Option<FieldValue>, RuleError> {
    let value = match raw {
        Value::Null => return Ok(None),
        Value::String(text) => FieldValue::Text(text.clone()),
        Value::Bool(flag) => FieldValue::Boolean(*flag),
        Value::Number(number) => match number.as_i64() {
            Some(whole) => FieldValue::Whole(whole),
            None => FieldValue::Decimal(json_decimal(field, raw)?),
        },
        Value::Object(map) if map.contains_key("$type") => {
            let value = project_tagged(field, map)?;
            if let Some(Value::String(label)) = map.get("label") {
                labels.insert(field.to_string(), label.clone());
            }
            value
        }
        Value::Object(_) | Value::Array(_) => {
            return Err(RuleError::InvalidRecord(format!(
                "attribute {field} has an unsupported shape"
            )))
        }
    };
    Ok(Some(value))
}

fn project_tagged(field: &str, map: &Map<String, Value>) -> Result<FieldValue, RuleError> {
    let tag = map
        .get("$type")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_ascii_lowercase();
    let payload = map.get("value").unwrap_or(&Value::Null);

    match tag.as_str() {
        "money" => Ok(FieldValue::Money(json_decimal(field, payload)?)),
        "decimal" => Ok(FieldValue::Decimal(json_decimal(field, payload)?)),
        "optionset" => payload
            .as_i64()
            .and_then(|code| i32::try_from(code).ok())
            .map(FieldValue::OptionSet)
            .ok_or_else(|| invalid(field, "option set value must be a 32-bit integer")),
        "datetime" | "date" => payload
            .as_str()
            .and_then(parse_timestamp)
            .map(FieldValue::Timestamp)
            .ok_or_else(|| invalid(field, "timestamp value is not a recognised date/time")),
        "lookup" => {
            let id = map
                .get("id")
                .and_then(Value::as_str)
                .and_then(|raw| Uuid::parse_str(raw).ok())
                .ok_or_else(|| invalid(field, "lookup id must be a UUID"))?;
            Ok(FieldValue::Lookup(EntityReference {
                id,
                logical_name: map
                    .get("logicalName")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                name: map.get("name").and_then(Value::as_str).map(str::to_string),
            }))
        }
        other => Err(invalid(field, &format!("unknown value tag {other:?}"))),
    }
}

fn json_decimal(field: &str, raw: &Value) -> Result<Decimal, RuleError> {
    let text = match raw {
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.trim().to_string(),
        _ => return Err(invalid(field, "expected a number")),
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| invalid(field, "number out of range"))
}

fn invalid(field: &str, message: &str) -> RuleError {
    RuleError::InvalidRecord(format!("attribute {field}: {message}"))
}
