//! Fuzz target for URL query redaction.
//!
//! Tests that URL parsing and re-serialization handle arbitrary input,
//! including relative references, without panicking.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use ygg_redact::Redactor;

#[derive(Debug, Arbitrary)]
struct UrlInput {
    url: String,
    extra_sensitive: Vec<String>,
}

fuzz_target!(|input: UrlInput| {
    let redactor = Redactor::default();
    let result = redactor.redact_url_query_checked(&input.url, &input.extra_sensitive);
    if result.is_fallback() {
        assert_eq!(result.output, input.url);
    }
});
