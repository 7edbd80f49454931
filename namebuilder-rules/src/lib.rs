//! Name-construction rule engine.
//!
//! A [`Configuration`] lists ordered field rules. Each rule sources a value
//! from a [`Record`], formats it by type (dates, scaled numbers, money with
//! currency symbols, option labels, lookups), falls back to alternate
//! fields or static defaults, truncates and affixes it. Rules can be gated
//! by a small boolean [`Condition`] language. The [`NameBuilder`]
//! concatenates the results and applies the document-wide length cap.
//!
//! Evaluation is pure: data problems degrade to default text, and only
//! structural defects of a document surface as [`RuleError`].

mod condition;
mod configuration;
mod currency;
pub mod date_format;
mod engine;
mod error;
mod loader;
mod money;
pub mod number_format;
mod outcome;
mod record;
mod resolver;
mod rule;
mod truncate;
mod value;

pub use condition::{Condition, Operator};
pub use configuration::{Configuration, DEFAULT_TARGET_FIELD};
pub use currency::{
    resolve_currency_symbol, CachedCurrencyResolver, CurrencySymbolResolver, NoCurrencySymbols,
    StaticCurrencySymbols,
};
pub use date_format::{format_timestamp, TimezonePreset, TIMEZONE_PRESETS};
pub use engine::{build_name, EvaluationLimits, NameBuilder};
pub use error::{FormatError, RuleError};
pub use loader::load_configuration;
pub use money::{apply_currency_symbol, format_money};
pub use number_format::format_number;
pub use outcome::{Contribution, ContributionSource, NameOutcome};
pub use record::{Record, CURRENCY_REFERENCE_FIELD};
pub use resolver::resolve_field;
pub use rule::FieldRule;
pub use truncate::{truncate_with_indicator, DEFAULT_TRUNCATION_INDICATOR};
pub use value::{parse_decimal, parse_timestamp, EntityReference, FieldType, FieldValue, ValueKind};
