// Fuzz target exploring rule document and record parsing under arbitrary input.
#![no_main]

use libfuzzer_sys::fuzz_target;
use namebuilder_rules::{Configuration, NameBuilder, Record};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let record = Record::from_json_str(text).unwrap_or_default();
    for parsed in [Configuration::from_json_str(text), Configuration::from_yaml_str(text)] {
        if let Ok(config) = parsed {
            if let Ok(builder) = NameBuilder::new(config) {
                let _ = builder.evaluate(&record);
            }
        }
    }
});
