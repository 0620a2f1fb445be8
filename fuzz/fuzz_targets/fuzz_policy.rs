//! Fuzz target for redaction policy parsing.
//!
//! Tests that policy JSON parsing and validation handle arbitrary input
//! without panicking, and that every accepted policy builds an engine.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ygg_redact::{RedactionPolicy, Redactor};

fuzz_target!(|data: &[u8]| {
    if let Ok(policy) = serde_json::from_slice::<RedactionPolicy>(data) {
        if policy.validate().is_ok() {
            let redactor = Redactor::new(policy).expect("validated policy");
            let _ = redactor.sanitize_bytes(br#"{"token":"abc","note":"x"}"#);
        }
    }
});
