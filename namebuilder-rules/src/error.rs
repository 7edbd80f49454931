use std::path::PathBuf;

use namebuilder_core::NameBuilderError;
use thiserror::Error;

/// Errors returned when loading, validating or projecting rule inputs.
///
/// Only structural defects of a document surface here. Data problems
/// (bad format strings, unparseable operands) degrade to default text.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("configuration path does not exist: {0}")]
    MissingPath(String),
    #[error("failed to read configuration from {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration from {path}: {message}")]
    Parse { path: String, message: String },
    #[error("field rule at {path} has an empty field name")]
    EmptyFieldName { path: String },
    #[error("condition populates more than one shape: {0}")]
    ConflictingCondition(String),
    #[error("condition has no field, anyOf or allOf")]
    EmptyCondition,
    #[error("unknown condition operator: {0}")]
    UnknownOperator(String),
    #[error("unknown field type: {0}")]
    UnknownFieldType(String),
    #[error("nesting deeper than {limit} levels at {path}; alternate fields or conditions may be cyclic")]
    DepthExceeded { limit: usize, path: String },
    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

impl RuleError {
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RuleError::Io {
            path: path.into().display().to_string(),
            source,
        }
    }

    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        RuleError::Parse {
            path: path.into().display().to_string(),
            message: message.into(),
        }
    }
}

impl From<RuleError> for NameBuilderError {
    fn from(err: RuleError) -> Self {
        match err {
            RuleError::Io { source, .. } => NameBuilderError::IoError(source),
            RuleError::InvalidRecord(message) => NameBuilderError::InvalidRecord(message),
            other => NameBuilderError::InvalidDocument(other.to_string()),
        }
    }
}

/// Failure inside a format mini-language. Never leaves the engine: callers
/// fall back to the value's default text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("unterminated quoted literal")]
    UnterminatedLiteral,
    #[error("format ends with an escape character")]
    TrailingEscape,
    #[error("unsupported format specifier: {0}")]
    UnsupportedSpecifier(String),
    #[error("numeric overflow while formatting")]
    Overflow,
    #[error("integer format applied to a fractional value")]
    NonIntegral,
}
