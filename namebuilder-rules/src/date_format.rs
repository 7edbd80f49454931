//! Date/time rendering with invariant-culture pattern semantics
//! (`yyyy-MM-dd`, `dddd, MMMM d`, `hh:mm tt`, single-letter standard
//! patterns such as `d`, `G`, `o`).

use chrono::{Datelike, Duration, NaiveDateTime, Timelike};
use tracing::debug;

use crate::error::FormatError;

const DEFAULT_PATTERN: &str = "MM/dd/yyyy HH:mm:ss";

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Offset preset offered to rule authors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimezonePreset {
    pub label: &'static str,
    pub offset_hours: i32,
}

/// Common whole-hour offsets relative to UTC. IST is rounded to the nearest hour.
pub const TIMEZONE_PRESETS: &[TimezonePreset] = &[
    TimezonePreset { label: "UTC (±0)", offset_hours: 0 },
    TimezonePreset { label: "Pacific (UTC-8)", offset_hours: -8 },
    TimezonePreset { label: "Mountain (UTC-7)", offset_hours: -7 },
    TimezonePreset { label: "Central (UTC-6)", offset_hours: -6 },
    TimezonePreset { label: "Eastern (UTC-5)", offset_hours: -5 },
    TimezonePreset { label: "London (UTC+0)", offset_hours: 0 },
    TimezonePreset { label: "CET (UTC+1)", offset_hours: 1 },
    TimezonePreset { label: "EET (UTC+2)", offset_hours: 2 },
    TimezonePreset { label: "IST (UTC+5.5)", offset_hours: 6 },
    TimezonePreset { label: "CST China (UTC+8)", offset_hours: 8 },
    TimezonePreset { label: "JST (UTC+9)", offset_hours: 9 },
    TimezonePreset { label: "AEST (UTC+10)", offset_hours: 10 },
];

/// Default textual representation of a timestamp.
pub fn default_text(value: NaiveDateTime) -> String {
    render_pattern(value, DEFAULT_PATTERN, 0).unwrap_or_else(|_| value.to_string())
}

/// Shifts by `offset_hours` (when present) and renders with `format`.
/// Blank formats, shift overflow and pattern failures yield default text.
pub fn format_timestamp(
    value: NaiveDateTime,
    format: Option<&str>,
    offset_hours: Option<i32>,
) -> String {
    let shifted = match offset_hours {
        Some(hours) => match shift(value, hours) {
            Some(shifted) => shifted,
            None => {
                debug!(hours, "timezone shift overflowed, using unshifted default text");
                return default_text(value);
            }
        },
        None => value,
    };

    let Some(format) = format.filter(|format| !format.trim().is_empty()) else {
        return default_text(shifted);
    };

    match render_pattern(shifted, format, offset_hours.unwrap_or(0)) {
        Ok(text) => text,
        Err(err) => {
            debug!(%format, error = %err, "date format failed, using default text");
            default_text(shifted)
        }
    }
}

/// Adds whole hours, `None` on overflow.
pub fn shift(value: NaiveDateTime, hours: i32) -> Option<NaiveDateTime> {
    value.checked_add_signed(Duration::hours(i64::from(hours)))
}

/// Round-trip text used as a comparison candidate (`o` pattern).
pub fn round_trip_text(value: NaiveDateTime) -> String {
    render_pattern(value, "o", 0).unwrap_or_else(|_| value.to_string())
}

fn standard_pattern(specifier: char) -> Option<&'static str> {
    let pattern = match specifier {
        'd' => "MM/dd/yyyy",
        'D' => "dddd, dd MMMM yyyy",
        'f' => "dddd, dd MMMM yyyy HH:mm",
        'F' => "dddd, dd MMMM yyyy HH:mm:ss",
        'g' => "MM/dd/yyyy HH:mm",
        'G' => DEFAULT_PATTERN,
        'm' | 'M' => "MMMM dd",
        'o' | 'O' => "yyyy'-'MM'-'dd'T'HH':'mm':'ss'.'fffffff",
        'r' | 'R' => "ddd, dd MMM yyyy HH':'mm':'ss 'GMT'",
        's' => "yyyy'-'MM'-'dd'T'HH':'mm':'ss",
        't' => "HH:mm",
        'T' => "HH:mm:ss",
        'u' => "yyyy'-'MM'-'dd HH':'mm':'ss'Z'",
        'y' | 'Y' => "yyyy MMMM",
        _ => return None,
    };
    Some(pattern)
}

/// Renders `pattern` against an already shifted value. `offset_hours`
/// only feeds the `z` tokens.
pub fn render_pattern(
    value: NaiveDateTime,
    pattern: &str,
    offset_hours: i32,
) -> Result<String, FormatError> {
    let mut chars = pattern.chars();
    if let (Some(single), None) = (chars.next(), chars.next()) {
        let expanded = standard_pattern(single)
            .ok_or_else(|| FormatError::UnsupportedSpecifier(single.to_string()))?;
        return render_custom(value, expanded, offset_hours);
    }
    render_custom(value, pattern, offset_hours)
}

fn render_custom(
    value: NaiveDateTime,
    pattern: &str,
    offset_hours: i32,
) -> Result<String, FormatError> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut index = 0;

    while index < chars.len() {
        let ch = chars[index];
        let mut run = 1;
        while index + run < chars.len() && chars[index + run] == ch {
            run += 1;
        }

        match ch {
            'd' => {
                match run {
                    1 => out.push_str(&value.day().to_string()),
                    2 => out.push_str(&format!("{:02}", value.day())),
                    3 => out.push_str(&day_name(value)[..3]),
                    _ => out.push_str(day_name(value)),
                }
                index += run;
            }
            'M' => {
                let month = value.month();
                match run {
                    1 => out.push_str(&month.to_string()),
                    2 => out.push_str(&format!("{month:02}")),
                    3 => out.push_str(&month_name(month)[..3]),
                    _ => out.push_str(month_name(month)),
                }
                index += run;
            }
            'y' => {
                let year = value.year();
                match run {
                    1 => out.push_str(&(year % 100).to_string()),
                    2 => out.push_str(&format!("{:02}", year % 100)),
                    width => out.push_str(&format!("{year:0width$}")),
                }
                index += run;
            }
            'h' => {
                let hour = match value.hour() % 12 {
                    0 => 12,
                    hour => hour,
                };
                push_two(&mut out, hour, run);
                index += run;
            }
            'H' => {
                push_two(&mut out, value.hour(), run);
                index += run;
            }
            'm' => {
                push_two(&mut out, value.minute(), run);
                index += run;
            }
            's' => {
                push_two(&mut out, value.second(), run);
                index += run;
            }
            'f' | 'F' => {
                if run > 7 {
                    return Err(FormatError::UnsupportedSpecifier(ch.to_string().repeat(run)));
                }
                let nanos = value.nanosecond() % 1_000_000_000;
                let fraction = format!("{:09}", nanos);
                let digits = &fraction[..run];
                if ch == 'f' {
                    out.push_str(digits);
                } else {
                    let trimmed = digits.trim_end_matches('0');
                    if trimmed.is_empty() {
                        if out.ends_with('.') {
                            out.pop();
                        }
                    } else {
                        out.push_str(trimmed);
                    }
                }
                index += run;
            }
            't' => {
                let meridiem = if value.hour() < 12 { "AM" } else { "PM" };
                if run == 1 {
                    out.push_str(&meridiem[..1]);
                } else {
                    out.push_str(meridiem);
                }
                index += run;
            }
            'g' => {
                out.push_str("A.D.");
                index += run;
            }
            'z' => {
                let sign = if offset_hours < 0 { '-' } else { '+' };
                let hours = offset_hours.unsigned_abs();
                match run {
                    1 => out.push_str(&format!("{sign}{hours}")),
                    2 => out.push_str(&format!("{sign}{hours:02}")),
                    _ => out.push_str(&format!("{sign}{hours:02}:00")),
                }
                index += run;
            }
            // Naive values carry no kind information.
            'K' => index += run,
            '\'' | '"' => {
                let close = chars[index + 1..]
                    .iter()
                    .position(|candidate| *candidate == ch)
                    .ok_or(FormatError::UnterminatedLiteral)?;
                out.extend(&chars[index + 1..index + 1 + close]);
                index += close + 2;
            }
            '\\' => {
                let escaped = chars.get(index + 1).ok_or(FormatError::TrailingEscape)?;
                out.push(*escaped);
                index += 2;
            }
            '%' => {
                if chars.get(index + 1) == Some(&'%') {
                    return Err(FormatError::UnsupportedSpecifier("%%".into()));
                }
                index += 1;
            }
            other => {
                out.push(other);
                index += 1;
            }
        }
    }

    Ok(out)
}

fn push_two(out: &mut String, value: u32, run: usize) {
    if run == 1 {
        out.push_str(&value.to_string());
    } else {
        out.push_str(&format!("{value:02}"));
    }
}

fn day_name(value: NaiveDateTime) -> &'static str {
    DAY_NAMES[value.weekday().num_days_from_sunday() as usize]
}

fn month_name(month: u32) -> &'static str {
    MONTH_NAMES[(month as usize + 11) % 12]
}
