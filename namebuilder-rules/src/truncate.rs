/// Indicator appended when a value is cut short.
pub const DEFAULT_TRUNCATION_INDICATOR: &str = "...";

/// Shortens `value` to at most `max_length` characters, ending with `indicator`.
///
/// Values already within the limit are returned unchanged. A zero limit
/// yields an empty string; a limit no longer than the indicator yields the
/// indicator cut to the limit. Blank indicators fall back to `"..."`.
/// Lengths count Unicode scalar values.
pub fn truncate_with_indicator(value: &str, max_length: usize, indicator: &str) -> String {
    if value.is_empty() || max_length == 0 {
        return String::new();
    }

    if value.chars().count() <= max_length {
        return value.to_string();
    }

    let indicator = if indicator.is_empty() {
        DEFAULT_TRUNCATION_INDICATOR
    } else {
        indicator
    };
    let indicator_length = indicator.chars().count();

    if max_length <= indicator_length {
        return indicator.chars().take(max_length).collect();
    }

    let mut out: String = value.chars().take(max_length - indicator_length).collect();
    out.push_str(indicator);
    out
}
