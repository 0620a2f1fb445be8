//! Key-value string rendering for plain-text log lines.

use crate::engine::Redactor;
use serde_json::{Map, Value};
use std::fmt::Write;

impl Redactor {
    /// Render a field map as `key=value` pairs separated by single spaces.
    ///
    /// The map is redacted with [`Redactor::redact_fields`] first. String
    /// values are written raw, everything else as compact JSON. Pairs follow
    /// the map's key order.
    pub fn render_kv(&self, fields: &Map<String, Value>) -> String {
        let mut out = String::new();
        for (key, value) in self.redact_fields(fields) {
            if !out.is_empty() {
                out.push(' ');
            }
            match value {
                Value::String(s) => {
                    let _ = write!(out, "{}={}", key, s);
                }
                other => {
                    let _ = write!(out, "{}={}", key, other);
                }
            }
        }
        out
    }
}
