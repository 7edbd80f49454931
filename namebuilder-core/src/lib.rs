//! Core shared library for the name builder workspace.
//!
//! This crate exposes the primitives every other crate depends on:
//! the canonical error type, environment-driven engine settings, JSON
//! helpers and the tracing subscriber setup used by binaries.

pub mod config;
pub mod errors;
pub mod logging;
pub mod serde_utils;

pub use config::{EngineSettings, Environment, DEFAULT_MAX_DEPTH};
pub use errors::{ConfigError, NameBuilderError, Result as CoreResult};
