//! HTTP header redaction.

use crate::engine::Redactor;
use std::collections::BTreeMap;

/// Header name to its ordered list of values. Names are kept as given.
pub type HeaderMultimap = BTreeMap<String, Vec<String>>;

impl Redactor {
    /// Whether a header's values must be masked.
    ///
    /// True for vocabulary matches and for the policy's always-sensitive
    /// names (`Authorization`, `Cookie` by default), compared case-insensitively.
    pub fn is_sensitive_header(&self, name: &str) -> bool {
        self.is_sensitive_key(name)
            || self
                .policy()
                .always_sensitive_headers
                .iter()
                .any(|h| h.eq_ignore_ascii_case(name))
    }

    /// Redact a header multimap.
    ///
    /// Sensitive headers collapse to a single masked value; other values are
    /// previewed one by one. Returns a new map.
    pub fn redact_headers(&self, headers: &HeaderMultimap) -> HeaderMultimap {
        headers
            .iter()
            .map(|(name, values)| (name.clone(), self.redact_header_values(name, values)))
            .collect()
    }

    /// Redact the values of a single header.
    pub fn redact_header_values<S: AsRef<str>>(&self, name: &str, values: &[S]) -> Vec<String> {
        if self.is_sensitive_header(name) {
            return vec![self.mask().to_string()];
        }
        values
            .iter()
            .map(|v| self.preview(v.as_ref()).into_owned())
            .collect()
    }
}
