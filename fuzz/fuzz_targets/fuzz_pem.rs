//! Fuzz target for PEM block redaction over raw bytes.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ygg_redact::Redactor;

fuzz_target!(|data: &[u8]| {
    let redactor = Redactor::default();
    let out = redactor.redact_pem_bytes(data);
    // The shortest block is longer than the default mask.
    assert!(out.len() <= data.len());

    if let Ok(text) = std::str::from_utf8(data) {
        assert_eq!(redactor.redact_pem(text).as_bytes(), out.as_ref());
    }
});
