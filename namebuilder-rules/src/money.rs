use rust_decimal::Decimal;

use crate::number_format::{format_grouped_two_decimals, format_number};

/// Formats a money amount and layers the currency symbol on top.
///
/// The numeric text comes from `format` when set, otherwise from the
/// record's label for the field, otherwise from two-decimal grouped
/// rendering. Blank symbols leave the text untouched.
pub fn format_money(
    amount: Decimal,
    format: Option<&str>,
    label: Option<&str>,
    symbol: Option<&str>,
) -> String {
    let formatted = match (format.filter(|f| !f.trim().is_empty()), label) {
        (Some(format), _) => format_number(amount, Some(format)),
        (None, Some(label)) => label.to_string(),
        (None, None) => String::new(),
    };

    let formatted = if formatted.trim().is_empty() {
        format_grouped_two_decimals(amount)
    } else {
        formatted
    };

    match symbol {
        Some(symbol) => apply_currency_symbol(&formatted, symbol),
        None => formatted,
    }
}

/// Inserts `symbol` into already formatted money text.
///
/// Text that contains the symbol is only trimmed; a leading minus keeps
/// its place before the symbol; accounting parentheses wrap the result.
pub fn apply_currency_symbol(formatted: &str, symbol: &str) -> String {
    if formatted.trim().is_empty() || symbol.trim().is_empty() {
        return formatted.to_string();
    }

    let trimmed = formatted.trim();
    if trimmed.contains(symbol) {
        return trimmed.to_string();
    }

    if let Some(rest) = trimmed.strip_prefix('-') {
        return format!("-{symbol}{rest}");
    }

    if let Some(inner) = trimmed
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return format!("({})", apply_currency_symbol(inner, symbol));
    }

    format!("{symbol}{trimmed}")
}
