//! Redaction engine for secrets-store client logs.
//!
//! This crate makes every artifact an API client might log safe to emit:
//! field maps, HTTP headers, URL query strings, JSON bodies, PEM blocks, and
//! byte blobs of unknown format.
//!
//! # Key Features
//!
//! - **Key classification**: a case-insensitive vocabulary decides which field,
//!   header, and parameter names carry secrets. Over-inclusive by default.
//! - **Previews**: non-sensitive strings longer than the preview window are
//!   shortened to their head and tail, so logs stay useful without echoing
//!   whole payloads.
//! - **Format adapters**: headers, URLs, JSON, and PEM each get their own
//!   rules; the chain sanitizer composes them for bodies of unknown format.
//! - **Fail-open adapters**: malformed input is returned as given, and the
//!   `*_checked` variants report when that happened.
//! - **Injectable policy**: vocabulary, mask, and preview window come from a
//!   [`RedactionPolicy`] that can be loaded from a JSON file.
//!
//! # Example
//!
//! ```
//! use ygg_redact::{Redactor, RedactionPolicy};
//!
//! let redactor = Redactor::new(RedactionPolicy::default()).unwrap();
//!
//! let url = redactor.redact_url_query("https://x/y?token=abcdef123456&page=2", &[] as &[&str]);
//! assert_eq!(url, "https://x/y?token=****&page=2");
//!
//! let body = redactor.sanitize_bytes(br#"{"password": "hunter2", "page": 2}"#);
//! assert_eq!(body, br#"{"page":2,"password":"****"}"#.to_vec());
//! ```

pub mod chain;
pub mod engine;
pub mod error;
pub mod headers;
pub mod json_body;
pub mod kv;
pub mod outcome;
pub mod pem;
pub mod policy;
pub mod preview;
pub mod url_query;
pub mod vocabulary;
pub mod walk;

pub use engine::{default_redactor, Redactor};
pub use error::{RedactionError, Result};
pub use headers::HeaderMultimap;
pub use outcome::{FallbackReason, Outcome, Redacted};
pub use policy::{
    RedactionPolicy, POLICY_ENV_VAR, POLICY_SCHEMA_VERSION, PREVIEW_WINDOW, REDACTION_MASK,
};
pub use preview::{preview, PREVIEW_ELLIPSIS};
pub use vocabulary::{
    fold_case, KeyPattern, MatchMode, SensitivityVocabulary, DEFAULT_SENSITIVE_SUBSTRINGS,
};

use serde_json::{Map, Value};
use std::borrow::Cow;

/// [`Redactor::is_sensitive_key`] with the default policy.
pub fn is_sensitive_key(key: &str) -> bool {
    default_redactor().is_sensitive_key(key)
}

/// [`Redactor::redact_fields`] with the default policy.
pub fn redact_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    default_redactor().redact_fields(fields)
}

/// [`Redactor::render_kv`] with the default policy.
pub fn render_kv(fields: &Map<String, Value>) -> String {
    default_redactor().render_kv(fields)
}

/// [`Redactor::redact_headers`] with the default policy.
pub fn redact_headers(headers: &HeaderMultimap) -> HeaderMultimap {
    default_redactor().redact_headers(headers)
}

/// [`Redactor::redact_url_query`] with the default policy.
pub fn redact_url_query<S: AsRef<str>>(raw: &str, extra_sensitive: &[S]) -> String {
    default_redactor().redact_url_query(raw, extra_sensitive)
}

/// [`Redactor::redact_json_bytes`] with the default policy.
pub fn redact_json_bytes(body: &[u8]) -> Vec<u8> {
    default_redactor().redact_json_bytes(body)
}

/// [`Redactor::redact_pem`] with the default policy.
pub fn redact_pem(text: &str) -> Cow<'_, str> {
    default_redactor().redact_pem(text)
}

/// [`Redactor::sanitize_bytes`] with the default policy.
pub fn sanitize_bytes(body: &[u8]) -> Vec<u8> {
    default_redactor().sanitize_bytes(body)
}
