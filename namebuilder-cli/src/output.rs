use colored::*;
use namebuilder_rules::{Configuration, ContributionSource, NameOutcome};

pub fn print_preview(config: &Configuration, outcome: &NameOutcome, explain: bool) {
    println!("{}", outcome.value);
    if !explain {
        return;
    }

    eprintln!(
        "{} {} ({} chars{})",
        "✔ Preview for".green().bold(),
        config.target_field.bold(),
        outcome.len(),
        if outcome.truncated { ", truncated" } else { "" }
    );
    for contribution in &outcome.contributions {
        let source = match contribution.source {
            ContributionSource::Primary => contribution.source.as_str().green(),
            ContributionSource::Alternate | ContributionSource::Default => {
                contribution.source.as_str().yellow()
            }
            ContributionSource::SkippedByCondition | ContributionSource::Empty => {
                contribution.source.as_str().dimmed()
            }
        };
        eprintln!(
            "  {:<24} {:<10} {:?}",
            contribution.field, source, contribution.text
        );
    }
}

pub fn print_valid(config: &Configuration) {
    println!(
        "{} {} rule(s), target field {}",
        "✔ Configuration valid:".green().bold(),
        config.fields.len(),
        config.target_field.bold()
    );
    if let Some(entity) = &config.entity {
        println!("  Entity: {entity}");
    }
    match config.output_limit() {
        Some(limit) => println!("  Max length: {limit}"),
        None => println!("  Max length: unlimited"),
    }
}

pub fn print_fields(fields: &[String]) {
    for field in fields {
        println!("{field}");
    }
}
