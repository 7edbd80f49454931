use std::io;

use thiserror::Error;

/// Result type used across the name builder core crate.
pub type Result<T> = std::result::Result<T, NameBuilderError>;

/// Canonical error representation shared by all crates in the workspace.
#[derive(Debug, Error)]
pub enum NameBuilderError {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("serialization error: {0}")]
    SerializationError(String),

    #[error("invalid rule document: {0}")]
    InvalidDocument(String),

    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error("settings error: {0}")]
    ConfigError(String),

    #[error("general error: {0}")]
    GeneralError(String),
}

/// Dedicated configuration error used by the settings module.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {key}: {value}")]
    InvalidEnvVar { key: String, value: String },
}

impl From<ConfigError> for NameBuilderError {
    fn from(value: ConfigError) -> Self {
        NameBuilderError::ConfigError(value.to_string())
    }
}
