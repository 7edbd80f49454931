//! Numeric rendering with magnitude scaling (`K`, `M`, `B`).
//!
//! Patterns follow invariant-culture decimal format strings: standard
//! specifiers (`N2`, `F0`, `D6`, `P1`, `G`) and custom patterns built
//! from `0`, `#`, `.`, `,`, `%`, `‰`, quoted literals and up to three
//! `;`-separated sections. Rounding is half away from zero.

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::error::FormatError;

/// Pattern applied to scaled values when the remainder of the format is blank.
pub const DEFAULT_SCALED_PATTERN: &str = "0.##";

const MAX_SCALE: usize = 28;

/// Scale token found in a numeric format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaleFormat {
    pub divisor: Decimal,
    /// Token as written, appended verbatim to the output.
    pub suffix: char,
    /// Format with the token removed.
    pub pattern: String,
}

/// Finds the first `K`/`M`/`B` (any case) in the format.
pub fn detect_scale(format: &str) -> Option<ScaleFormat> {
    let (index, suffix) = format
        .char_indices()
        .find(|(_, ch)| matches!(ch.to_ascii_uppercase(), 'K' | 'M' | 'B'))?;

    let divisor = match suffix.to_ascii_uppercase() {
        'K' => Decimal::from(1_000),
        'M' => Decimal::from(1_000_000),
        _ => Decimal::from(1_000_000_000),
    };

    let mut pattern = String::with_capacity(format.len());
    pattern.push_str(&format[..index]);
    pattern.push_str(&format[index + suffix.len_utf8()..]);

    Some(ScaleFormat {
        divisor,
        suffix,
        pattern,
    })
}

/// Formats a number. Absent/blank formats and any formatting failure
/// yield the number's default text.
pub fn format_number(value: Decimal, format: Option<&str>) -> String {
    let Some(format) = format.filter(|format| !format.trim().is_empty()) else {
        return value.to_string();
    };

    match try_format_number(value, format) {
        Ok(text) => text,
        Err(err) => {
            debug!(%format, error = %err, "numeric format failed, using default text");
            value.to_string()
        }
    }
}

/// Fallible core of [`format_number`].
pub fn try_format_number(value: Decimal, format: &str) -> Result<String, FormatError> {
    if let Some(scale) = detect_scale(format) {
        let scaled = value
            .checked_div(scale.divisor)
            .ok_or(FormatError::Overflow)?;
        let pattern = if scale.pattern.trim().is_empty() {
            DEFAULT_SCALED_PATTERN
        } else {
            scale.pattern.as_str()
        };
        let mut text = apply_pattern(scaled, pattern)?;
        text.push(scale.suffix);
        return Ok(text);
    }

    apply_pattern(value, format)
}

/// Applies a decimal pattern without scale-token handling.
pub fn apply_pattern(value: Decimal, pattern: &str) -> Result<String, FormatError> {
    match standard_specifier(pattern) {
        Some((specifier, precision)) => format_standard(value, specifier, precision),
        None => format_custom(value, pattern),
    }
}

/// Two-decimal grouped rendering (`N2`).
pub fn format_grouped_two_decimals(value: Decimal) -> String {
    let (text, is_zero) = render_fixed(value.abs(), 2, true);
    with_sign(value, text, is_zero)
}

fn standard_specifier(pattern: &str) -> Option<(char, Option<usize>)> {
    let mut chars = pattern.chars();
    let specifier = chars.next().filter(char::is_ascii_alphabetic)?;
    let rest = chars.as_str();
    if rest.is_empty() {
        return Some((specifier, None));
    }
    if rest.len() <= 2 && rest.chars().all(|ch| ch.is_ascii_digit()) {
        return rest.parse().ok().map(|precision| (specifier, Some(precision)));
    }
    None
}

fn format_standard(
    value: Decimal,
    specifier: char,
    precision: Option<usize>,
) -> Result<String, FormatError> {
    match specifier.to_ascii_uppercase() {
        'N' => {
            let (text, is_zero) = render_fixed(value.abs(), precision.unwrap_or(2), true);
            Ok(with_sign(value, text, is_zero))
        }
        'F' => {
            let (text, is_zero) = render_fixed(value.abs(), precision.unwrap_or(2), false);
            Ok(with_sign(value, text, is_zero))
        }
        'D' => {
            if !value.fract().is_zero() {
                return Err(FormatError::NonIntegral);
            }
            let digits = value.abs().trunc().normalize().to_string();
            let width = precision.unwrap_or(0);
            let padded = format!("{digits:0>width$}");
            Ok(with_sign(value, padded, value.is_zero()))
        }
        'P' => {
            let percent = value
                .checked_mul(Decimal::from(100))
                .ok_or(FormatError::Overflow)?;
            let (text, is_zero) = render_fixed(percent.abs(), precision.unwrap_or(2), true);
            Ok(with_sign(value, format!("{text} %"), is_zero))
        }
        'G' => Ok(value.to_string()),
        other => Err(FormatError::UnsupportedSpecifier(other.to_string())),
    }
}

fn with_sign(value: Decimal, text: String, rounded_to_zero: bool) -> String {
    if value.is_sign_negative() && !value.is_zero() && !rounded_to_zero {
        format!("-{text}")
    } else {
        text
    }
}

/// Renders a non-negative value with a fixed number of decimals.
fn render_fixed(value: Decimal, decimals: usize, grouping: bool) -> (String, bool) {
    let rounded = round(value, decimals);
    let (int_part, mut frac_part) = split_digits(rounded);
    while frac_part.len() < decimals {
        frac_part.push('0');
    }

    let int_text = if grouping {
        group_thousands(&int_part)
    } else {
        int_part
    };

    let text = if decimals > 0 {
        format!("{int_text}.{frac_part}")
    } else {
        int_text
    };
    (text, rounded.is_zero())
}

fn round(value: Decimal, decimals: usize) -> Decimal {
    let dp = decimals.min(MAX_SCALE) as u32;
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

fn split_digits(value: Decimal) -> (String, String) {
    let text = value.abs().to_string();
    match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part.to_string(), frac_part.to_string()),
        None => (text, String::new()),
    }
}

fn group_thousands(digits: &str) -> String {
    let count = digits.chars().count();
    let mut out = String::with_capacity(count + count / 3);
    for (index, ch) in digits.chars().enumerate() {
        out.push(ch);
        let remaining = count - index - 1;
        if remaining > 0 && remaining % 3 == 0 {
            out.push(',');
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Zero,
    Hash,
    Point,
    Comma,
    Percent,
    PerMille,
    Literal(String),
}

impl Token {
    fn is_digit(&self) -> bool {
        matches!(self, Token::Zero | Token::Hash)
    }
}

fn format_custom(value: Decimal, pattern: &str) -> Result<String, FormatError> {
    let sections = split_sections(pattern)?;
    let negative = value.is_sign_negative() && !value.is_zero();
    let has_zero_section = sections.len() >= 3 && !sections[2].is_empty();

    let (section, use_minus) = if negative {
        match sections.get(1) {
            Some(section) if !section.is_empty() => (section.as_str(), false),
            _ => (sections[0].as_str(), true),
        }
    } else if value.is_zero() && has_zero_section {
        (sections[2].as_str(), false)
    } else {
        (sections[0].as_str(), false)
    };

    let rendered = render_section(value.abs(), section)?;
    if rendered.is_zero && has_zero_section && !value.is_zero() {
        return Ok(render_section(Decimal::ZERO, &sections[2])?.text);
    }

    if use_minus && !rendered.is_zero {
        Ok(format!("-{}", rendered.text))
    } else {
        Ok(rendered.text)
    }
}

fn split_sections(pattern: &str) -> Result<Vec<String>, FormatError> {
    let mut sections = Vec::new();
    let mut current = String::new();
    let mut chars = pattern.chars();
    let mut quote: Option<char> = None;

    while let Some(ch) = chars.next() {
        match (quote, ch) {
            (Some(open), _) if ch == open => {
                quote = None;
                current.push(ch);
            }
            (Some(_), _) => current.push(ch),
            (None, '\'' | '"') => {
                quote = Some(ch);
                current.push(ch);
            }
            (None, '\\') => {
                current.push(ch);
                current.push(chars.next().ok_or(FormatError::TrailingEscape)?);
            }
            (None, ';') => sections.push(std::mem::take(&mut current)),
            (None, _) => current.push(ch),
        }
    }

    if quote.is_some() {
        return Err(FormatError::UnterminatedLiteral);
    }
    sections.push(current);
    Ok(sections)
}

fn tokenize(section: &str) -> Result<Vec<Token>, FormatError> {
    let mut tokens = Vec::new();
    let mut chars = section.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '0' => tokens.push(Token::Zero),
            '#' => tokens.push(Token::Hash),
            '.' => tokens.push(Token::Point),
            ',' => tokens.push(Token::Comma),
            '%' => tokens.push(Token::Percent),
            '‰' => tokens.push(Token::PerMille),
            '\'' | '"' => {
                let mut literal = String::new();
                loop {
                    match chars.next() {
                        Some(next) if next == ch => break,
                        Some(next) => literal.push(next),
                        None => return Err(FormatError::UnterminatedLiteral),
                    }
                }
                tokens.push(Token::Literal(literal));
            }
            '\\' => {
                let escaped = chars.next().ok_or(FormatError::TrailingEscape)?;
                tokens.push(Token::Literal(escaped.to_string()));
            }
            'E' | 'e' if matches!(chars.peek(), Some('0' | '+' | '-')) => {
                return Err(FormatError::UnsupportedSpecifier("exponent".into()));
            }
            other => tokens.push(Token::Literal(other.to_string())),
        }
    }

    Ok(tokens)
}

struct Rendered {
    text: String,
    is_zero: bool,
}

fn render_section(value: Decimal, section: &str) -> Result<Rendered, FormatError> {
    let tokens = tokenize(section)?;
    if tokens.is_empty() {
        return Ok(Rendered {
            text: value.to_string(),
            is_zero: value.is_zero(),
        });
    }

    let point = tokens.iter().position(|token| *token == Token::Point);
    let (int_tokens, frac_tokens) = match point {
        Some(index) => (&tokens[..index], &tokens[index + 1..]),
        None => (&tokens[..], &tokens[tokens.len()..]),
    };

    let int_count = int_tokens.iter().filter(|token| token.is_digit()).count();
    let min_int = int_tokens
        .iter()
        .filter(|token| token.is_digit())
        .position(|token| *token == Token::Zero)
        .map(|first_zero| int_count - first_zero)
        .unwrap_or(0);

    let frac_placeholders: Vec<&Token> =
        frac_tokens.iter().filter(|token| token.is_digit()).collect();
    let max_frac = frac_placeholders.len();
    let min_frac = frac_placeholders
        .iter()
        .rposition(|token| **token == Token::Zero)
        .map(|last_zero| last_zero + 1)
        .unwrap_or(0);

    // Commas between integer placeholders group; trailing ones divide by 1000.
    let mut grouping = false;
    let mut seen_digit = false;
    let mut pending_commas = 0u32;
    for token in int_tokens {
        match token {
            Token::Zero | Token::Hash => {
                if seen_digit && pending_commas > 0 {
                    grouping = true;
                }
                pending_commas = 0;
                seen_digit = true;
            }
            Token::Comma if seen_digit => pending_commas += 1,
            _ => {}
        }
    }

    let mut scaled = value;
    for token in &tokens {
        let factor = match token {
            Token::Percent => 100,
            Token::PerMille => 1_000,
            _ => continue,
        };
        scaled = scaled
            .checked_mul(Decimal::from(factor))
            .ok_or(FormatError::Overflow)?;
    }
    for _ in 0..pending_commas {
        scaled = scaled
            .checked_div(Decimal::from(1_000))
            .ok_or(FormatError::Overflow)?;
    }

    let rounded = round(scaled, max_frac);
    let (int_part, frac_part) = split_digits(rounded);

    let mut int_digits = if int_part == "0" { String::new() } else { int_part };
    while int_digits.len() < min_int {
        int_digits.insert(0, '0');
    }

    let mut frac_digits = frac_part;
    while frac_digits.len() < max_frac {
        frac_digits.push('0');
    }
    while frac_digits.len() > min_frac && frac_digits.ends_with('0') {
        frac_digits.pop();
    }

    let shows_digits = int_count > 0 || max_frac > 0 || point.is_some();
    let digits: Vec<char> = int_digits.chars().collect();
    let mut out = String::new();
    let mut next = 0usize;
    let mut placeholders_seen = 0usize;

    for token in int_tokens {
        match token {
            Token::Zero | Token::Hash => {
                placeholders_seen += 1;
                let reserved = int_count - placeholders_seen;
                while digits.len() - next > reserved {
                    push_digit(&mut out, &digits, &mut next, grouping);
                }
            }
            Token::Literal(text) => out.push_str(text),
            Token::Percent => out.push('%'),
            Token::PerMille => out.push('‰'),
            Token::Comma | Token::Point => {}
        }
    }

    if shows_digits {
        while next < digits.len() {
            push_digit(&mut out, &digits, &mut next, grouping);
        }
    }

    if !frac_digits.is_empty() {
        out.push('.');
    }
    let frac_chars: Vec<char> = frac_digits.chars().collect();
    let mut frac_index = 0usize;
    for token in frac_tokens {
        match token {
            Token::Zero | Token::Hash => {
                if let Some(digit) = frac_chars.get(frac_index) {
                    out.push(*digit);
                }
                frac_index += 1;
            }
            Token::Literal(text) => out.push_str(text),
            Token::Percent => out.push('%'),
            Token::PerMille => out.push('‰'),
            Token::Comma | Token::Point => {}
        }
    }

    Ok(Rendered {
        text: out,
        is_zero: rounded.is_zero(),
    })
}

fn push_digit(out: &mut String, digits: &[char], next: &mut usize, grouping: bool) {
    out.push(digits[*next]);
    *next += 1;
    let remaining = digits.len() - *next;
    if grouping && remaining > 0 && remaining % 3 == 0 {
        out.push(',');
    }
}
