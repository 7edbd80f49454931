// Fuzz target driving the number and date format mini-languages with arbitrary patterns.
#![no_main]

use chrono::DateTime;
use libfuzzer_sys::fuzz_target;
use namebuilder_rules::{format_number, format_timestamp, truncate_with_indicator};
use rust_decimal::Decimal;

fuzz_target!(|data: &[u8]| {
    if data.len() < 12 {
        return;
    }

    let (head, rest) = data.split_at(12);
    let Ok(pattern) = std::str::from_utf8(rest) else {
        return;
    };

    let mut seconds = [0u8; 8];
    seconds.copy_from_slice(&head[..8]);
    let seconds = i64::from_le_bytes(seconds) % 253_402_300_799;
    let offset = i32::from(head[8] as i8);
    let scale = u32::from(head[9] % 29);

    let value = Decimal::new(seconds, scale);
    let _ = format_number(value, Some(pattern));

    if let Some(timestamp) = DateTime::from_timestamp(seconds, 0) {
        let _ = format_timestamp(timestamp.naive_utc(), Some(pattern), Some(offset));
    }

    let indicator: String = pattern.chars().take(3).collect();
    let _ = truncate_with_indicator(pattern, usize::from(head[10]), &indicator);
});
