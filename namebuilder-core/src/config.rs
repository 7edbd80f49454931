use std::env;

use crate::errors::{ConfigError, NameBuilderError};

/// Default bound on alternate-field chains and condition nesting.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Runtime environment used by the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    fn from_str(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Development,
        }
    }
}

/// Process-level settings for hosts embedding the engine.
///
/// Settings only bound evaluation and configure logging. Rule defaults
/// always live in the configuration document itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub environment: Environment,
    pub log_level: String,
    pub max_depth: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            log_level: "info".to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EngineSettings {
    /// Loads settings from the process environment (`NAMEBUILDER_*`).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env_with_prefix("NAMEBUILDER_")
    }

    /// Loads settings from env vars prefixed with the provided value (e.g. `PREVIEW_`).
    pub fn from_env_with_prefix(prefix: &str) -> Result<Self, ConfigError> {
        let key = |suffix: &str| format!("{}{}", prefix, suffix);

        let environment = env::var(key("ENV"))
            .map(|raw| Environment::from_str(&raw))
            .unwrap_or_default();

        let log_level = env::var(key("LOG")).unwrap_or_else(|_| "info".to_string());

        let depth_key = key("MAX_DEPTH");
        let max_depth = match env::var(&depth_key) {
            Ok(raw) => parse_depth(&depth_key, &raw)?,
            Err(_) => DEFAULT_MAX_DEPTH,
        };

        Ok(Self {
            environment,
            log_level,
            max_depth,
        })
    }
}

fn parse_depth(key: &str, raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(depth) if depth > 0 => Ok(depth),
        _ => Err(ConfigError::InvalidEnvVar {
            key: key.to_string(),
            value: raw.to_string(),
        }),
    }
}

/// Helper that loads settings and converts to the canonical error type.
pub fn load_engine_settings() -> Result<EngineSettings, NameBuilderError> {
    Ok(EngineSettings::from_env()?)
}
