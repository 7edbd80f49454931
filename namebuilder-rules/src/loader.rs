use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::configuration::Configuration;
use crate::error::RuleError;
use crate::rule::FieldRule;

const INLINE_SOURCE: &str = "<inline>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|value| value.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                DocumentFormat::Yaml
            }
            _ => DocumentFormat::Json,
        }
    }
}

/// Reads a rule document from disk. `.yaml`/`.yml` files are parsed as
/// YAML, everything else as JSON.
pub fn load_configuration(path: impl AsRef<Path>) -> Result<Configuration, RuleError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(RuleError::MissingPath(path.display().to_string()));
    }
    if path.is_dir() {
        return Err(RuleError::parse_error(path, "expected a file, found a directory"));
    }

    let raw = fs::read_to_string(path).map_err(|err| RuleError::from_io(path, err))?;
    parse_document(&raw, DocumentFormat::for_path(path), path)
}

fn parse_document(
    raw: &str,
    format: DocumentFormat,
    path: &Path,
) -> Result<Configuration, RuleError> {
    let mut attempts = Vec::new();

    let document_error = match parse_as::<Configuration>(raw, format) {
        Ok(config) => return Ok(config),
        Err(message) => message,
    };
    attempts.push("configuration document");

    // A bare array of field rules is accepted as a document with defaults.
    if let Ok(fields) = parse_as::<Vec<FieldRule>>(raw, format) {
        return Ok(Configuration::new(fields));
    }
    attempts.push("field list");

    let message = format!("{document_error} (tried {:?})", attempts);
    Err(RuleError::parse_error(path.to_path_buf(), message))
}

fn parse_as<T>(raw: &str, format: DocumentFormat) -> Result<T, String>
where
    T: serde::de::DeserializeOwned,
{
    match format {
        DocumentFormat::Json => serde_json::from_str(raw).map_err(|err| err.to_string()),
        DocumentFormat::Yaml => serde_yaml::from_str(raw).map_err(|err| err.to_string()),
    }
}

impl Configuration {
    pub fn from_json_str(raw: &str) -> Result<Self, RuleError> {
        parse_document(raw, DocumentFormat::Json, Path::new(INLINE_SOURCE))
    }

    /// Same parse path as [`Configuration::from_json_str`] for an already parsed value.
    pub fn from_json_value(value: &serde_json::Value) -> Result<Self, RuleError> {
        let document_error = match Configuration::deserialize(value) {
            Ok(config) => return Ok(config),
            Err(err) => err.to_string(),
        };

        if let Ok(fields) = Vec::<FieldRule>::deserialize(value) {
            return Ok(Configuration::new(fields));
        }

        let message = format!("{document_error} (tried {:?})", ["configuration document", "field list"]);
        Err(RuleError::parse_error(INLINE_SOURCE, message))
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, RuleError> {
        parse_document(raw, DocumentFormat::Yaml, Path::new(INLINE_SOURCE))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RuleError> {
        load_configuration(path)
    }

    /// Serializes with the document field names, omitting absent options.
    pub fn to_json_pretty(&self) -> Result<String, RuleError> {
        serde_json::to_string_pretty(self)
            .map_err(|err| RuleError::parse_error(INLINE_SOURCE, err.to_string()))
    }
}
