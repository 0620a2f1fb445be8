//! Fuzz target for JSON body redaction.
//!
//! Arbitrary bytes must never panic. Input that parses as JSON must come
//! back as JSON, and a second pass must not change it.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ygg_redact::{Outcome, Redactor};

fuzz_target!(|data: &[u8]| {
    let redactor = Redactor::default();
    let result = redactor.redact_json_bytes_checked(data);

    if result.outcome == Outcome::Sanitized {
        // Re-parse with the engine itself; output may nest past serde_json's default limit.
        let second = redactor.redact_json_bytes_checked(&result.output);
        assert_eq!(second.outcome, Outcome::Sanitized);
        assert_eq!(second.output, result.output);
    } else {
        assert_eq!(result.output, data);
    }
});
