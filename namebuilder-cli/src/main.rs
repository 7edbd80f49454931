use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use namebuilder_core::{config::load_engine_settings, logging::init_tracing, serde_utils::to_pretty_json};
use namebuilder_rules::{
    format_number, format_timestamp, parse_decimal, parse_timestamp, CachedCurrencyResolver,
    Configuration, EvaluationLimits, NameBuilder, Record, StaticCurrencySymbols,
};
use tracing::debug;
use uuid::Uuid;

mod output;

#[derive(Parser)]
#[command(name = "namebuilder")]
#[command(about = "Author, validate and preview name builder rule documents", long_about = None)]
struct Cli {
    /// Log level filter (overrides NAMEBUILDER_LOG)
    #[arg(long, global = true, env = "NAMEBUILDER_LOG")]
    log: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a configuration against a sample record
    Preview(PreviewArgs),
    /// Check a configuration for structural defects
    Validate(ConfigArgs),
    /// List every attribute a configuration reads
    Fields(ConfigArgs),
    /// Try a format string against a single value
    #[command(subcommand)]
    Format(FormatCommands),
    /// Show version information
    Version,
}

#[derive(Args)]
struct ConfigArgs {
    /// Rule document (JSON, or YAML for .yaml/.yml)
    #[arg(long)]
    config: PathBuf,
}

#[derive(Args)]
struct PreviewArgs {
    #[arg(long)]
    config: PathBuf,
    /// Sample record as JSON
    #[arg(long)]
    record: PathBuf,
    /// Currency symbol for a currency id, as `<uuid>=<symbol>`
    #[arg(long = "currency", value_parser = parse_currency)]
    currencies: Vec<(Uuid, String)>,
    /// Print per-rule contributions to stderr
    #[arg(long, default_value_t = false)]
    explain: bool,
    /// Print the full evaluation outcome as JSON
    #[arg(long, default_value_t = false, conflicts_with = "explain")]
    json: bool,
}

#[derive(Subcommand)]
enum FormatCommands {
    /// Format a number, e.g. `1234567 0.0M`
    Number { value: String, format: String },
    /// Format a date/time, e.g. `2024-01-01T00:00:00 yyyy-MM-dd --offset -5`
    Date {
        value: String,
        format: String,
        #[arg(long, allow_hyphen_values = true)]
        offset: Option<i32>,
    },
}

fn parse_currency(raw: &str) -> std::result::Result<(Uuid, String), String> {
    let (id, symbol) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected <uuid>=<symbol>, got {raw}"))?;
    let id = Uuid::parse_str(id.trim()).map_err(|err| format!("invalid currency id {id}: {err}"))?;
    Ok((id, symbol.to_string()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = load_engine_settings().context("reading engine settings")?;
    let level = cli.log.as_deref().unwrap_or(&settings.log_level);
    init_tracing(Some(level)).context("initialising tracing")?;

    let limits = EvaluationLimits::from(&settings);
    debug!(max_depth = limits.max_depth, environment = ?settings.environment, "settings loaded");

    match cli.command {
        Commands::Preview(args) => preview(args, limits),
        Commands::Validate(args) => validate(&args, limits),
        Commands::Fields(args) => {
            let config = Configuration::from_path(&args.config)?;
            output::print_fields(&config.referenced_fields());
            Ok(())
        }
        Commands::Format(FormatCommands::Number { value, format }) => {
            let number =
                parse_decimal(&value).ok_or_else(|| anyhow!("not a number: {value}"))?;
            println!("{}", format_number(number, Some(&format)));
            Ok(())
        }
        Commands::Format(FormatCommands::Date {
            value,
            format,
            offset,
        }) => {
            let timestamp =
                parse_timestamp(&value).ok_or_else(|| anyhow!("not a date/time: {value}"))?;
            println!("{}", format_timestamp(timestamp, Some(&format), offset));
            Ok(())
        }
        Commands::Version => {
            println!("NameBuilder v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Prints a summary for a valid document. Invalid documents are returned
/// as the command error, which `main` reports once and exits non-zero on.
fn validate(args: &ConfigArgs, limits: EvaluationLimits) -> Result<()> {
    let config = Configuration::from_path(&args.config)?;
    config.validate(&limits)?;
    output::print_valid(&config);
    Ok(())
}

fn preview(args: PreviewArgs, limits: EvaluationLimits) -> Result<()> {
    let config = Configuration::from_path(&args.config)?;
    let raw = fs::read_to_string(&args.record)
        .with_context(|| format!("reading record {}", args.record.display()))?;
    let record = Record::from_json_str(&raw)?;

    let symbols = args
        .currencies
        .into_iter()
        .fold(StaticCurrencySymbols::new(), |symbols, (id, symbol)| {
            symbols.with(id, symbol)
        });

    let builder = NameBuilder::with_limits(config, limits)?
        .with_currency_resolver(CachedCurrencyResolver::new(symbols));
    let outcome = builder.evaluate(&record);
    if args.json {
        println!("{}", to_pretty_json(&outcome)?);
    } else {
        output::print_preview(builder.configuration(), &outcome, args.explain);
    }
    Ok(())
}
