// Tests for the number, date, money and truncation format functions.
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use namebuilder::{
    apply_currency_symbol, format_money, format_number, format_timestamp, truncate_with_indicator,
    TIMEZONE_PRESETS,
};
use rust_decimal::Decimal;
use test_case::test_case;

fn dec(raw: &str) -> Decimal {
    Decimal::from_str(raw).expect("decimal")
}

fn new_year() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .expect("date")
        .and_hms_opt(0, 0, 0)
        .expect("time")
}

#[test_case("1234567", "0.0M", "1.2M" ; "millions")]
#[test_case("1234567", "0.00K", "1234.57K" ; "thousands")]
#[test_case("987654321", "0.##m", "987.65m" ; "lowercase token kept")]
#[test_case("1234567", "#,##0", "1,234,567" ; "plain grouping")]
fn scales_numbers(value: &str, format: &str, expected: &str) {
    assert_eq!(format_number(dec(value), Some(format)), expected);
}

#[test]
fn number_without_format_is_default_text() {
    assert_eq!(format_number(dec("1234.5"), None), "1234.5");
}

#[test]
fn dates_shift_before_formatting() {
    assert_eq!(
        format_timestamp(new_year(), Some("yyyy-MM-dd"), Some(-5)),
        "2023-12-31"
    );
    assert_eq!(
        format_timestamp(new_year(), Some("yyyy-MM-ddTHH:mm"), Some(-5)),
        "2023-12-31T19:00"
    );
}

#[test]
fn dates_without_format_use_default_representation() {
    assert_eq!(format_timestamp(new_year(), None, None), "01/01/2024 00:00:00");
    assert_eq!(format_timestamp(new_year(), None, Some(2)), "01/01/2024 02:00:00");
}

#[test]
fn dates_render_names_and_offsets() {
    assert_eq!(
        format_timestamp(new_year(), Some("dddd, dd MMMM yyyy"), None),
        "Monday, 01 January 2024"
    );
    assert_eq!(
        format_timestamp(new_year(), Some("HH:mm zzz"), Some(-5)),
        "19:00 -05:00"
    );
}

#[test]
fn broken_date_format_falls_back() {
    assert_eq!(
        format_timestamp(new_year(), Some("yyyy 'open"), None),
        "01/01/2024 00:00:00"
    );
}

#[test]
fn presets_cover_common_offsets() {
    let eastern = TIMEZONE_PRESETS
        .iter()
        .find(|preset| preset.label.starts_with("Eastern"))
        .expect("eastern preset");
    assert_eq!(eastern.offset_hours, -5);
    assert!(TIMEZONE_PRESETS
        .iter()
        .all(|preset| (-12..=14).contains(&preset.offset_hours)));
}

#[test_case("-1,234.00", "-$1,234.00" ; "minus sign stays first")]
#[test_case("(1,234.00)", "($1,234.00)" ; "accounting parentheses")]
#[test_case("1,234.00", "$1,234.00" ; "plain prefix")]
#[test_case("$1,234.00", "$1,234.00" ; "already present")]
fn inserts_currency_symbol(formatted: &str, expected: &str) {
    assert_eq!(apply_currency_symbol(formatted, "$"), expected);
}

#[test]
fn money_prefers_format_then_label_then_two_decimals() {
    let amount = dec("-1234");
    assert_eq!(
        format_money(amount, Some("#,##0.00;(#,##0.00)"), Some("ignored"), Some("$")),
        "($1,234.00)"
    );
    assert_eq!(format_money(amount, None, Some("-1 234,00 kr"), None), "-1 234,00 kr");
    assert_eq!(format_money(amount, None, None, Some("$")), "-$1,234.00");
}

#[test_case("Johnathan Smith", 10, "...", "Johnath..." ; "default indicator")]
#[test_case("Johnathan Smith", 2, "...", ".." ; "indicator longer than limit")]
#[test_case("Johnathan Smith", 0, "...", "" ; "zero limit")]
#[test_case("Smith", 5, "...", "Smith" ; "within limit")]
#[test_case("Ünïcødé name", 6, "…", "Ünïcø…" ; "counts characters")]
fn truncates(value: &str, max_length: usize, indicator: &str, expected: &str) {
    let once = truncate_with_indicator(value, max_length, indicator);
    assert_eq!(once, expected);
    assert_eq!(truncate_with_indicator(&once, max_length, indicator), once);
}
