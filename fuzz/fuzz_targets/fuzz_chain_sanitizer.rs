//! Fuzz target for the chain sanitizer.
//!
//! Arbitrary bodies must never panic, and no output may still carry a
//! trigger keyword.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ygg_redact::Redactor;

fuzz_target!(|data: &[u8]| {
    let redactor = Redactor::default();
    let out = redactor.sanitize_bytes(data);

    let lowered = out.to_ascii_lowercase();
    for trigger in &redactor.policy().chain_triggers {
        let needle = trigger.to_ascii_lowercase();
        assert!(
            !lowered
                .windows(needle.len())
                .any(|window| window == needle.as_bytes()),
            "trigger {:?} survived",
            trigger
        );
    }
});
