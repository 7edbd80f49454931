//! NameBuilder: computes a record's name field from declarative rules.
//!
//! The workspace is split into a few crates:
//!
//! * `namebuilder-core`: canonical error type, environment settings and tracing setup
//! * `namebuilder-rules`: the rule engine (value model, formats, conditions, builder)
//! * `namebuilder-cli`: the `namebuilder` authoring and preview binary
//!
//! This facade re-exports the public API and adds one-call helpers for
//! hosts that hold both inputs as JSON.

pub use namebuilder_core::{
    logging::init_tracing, EngineSettings, Environment, NameBuilderError, DEFAULT_MAX_DEPTH,
};
pub use namebuilder_rules::*;

use serde_json::Value;
use tracing::debug;

/// Builds the name for a JSON record using a JSON rule document.
pub fn preview_json(config_json: &str, record_json: &str) -> Result<String, NameBuilderError> {
    let config = Configuration::from_json_str(config_json)?;
    let record = Record::from_json_str(record_json)?;
    preview(config, &record)
}

/// Same as [`preview_json`] for already parsed JSON values.
pub fn preview_value(config: &Value, record: &Value) -> Result<String, NameBuilderError> {
    let config = Configuration::from_json_value(config)?;
    let record = Record::from_json(record)?;
    preview(config, &record)
}

fn preview(config: Configuration, record: &Record) -> Result<String, NameBuilderError> {
    let builder = NameBuilder::new(config)?;
    let name = builder.build(record);
    debug!(
        target_field = %builder.configuration().target_field,
        length = name.chars().count(),
        "preview built"
    );
    Ok(name)
}
