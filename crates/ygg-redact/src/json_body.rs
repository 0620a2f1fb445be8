//! JSON body redaction.
//!
//! Documents of any nesting depth are accepted. Parsing, the walk, and
//! serialization grow the stack on demand instead of limiting depth.

use crate::engine::Redactor;
use crate::outcome::{FallbackReason, Redacted};
use crate::walk::{drop_iteratively, RED_ZONE, STACK_GROWTH};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

impl Redactor {
    /// Redact a JSON document held in bytes.
    ///
    /// Input that is not JSON, or a tree that cannot be serialized back, is
    /// returned unchanged.
    pub fn redact_json_bytes(&self, body: &[u8]) -> Vec<u8> {
        self.redact_json_bytes_checked(body).output
    }

    /// [`Redactor::redact_json_bytes`], reporting whether the input was parsed.
    pub fn redact_json_bytes_checked(&self, body: &[u8]) -> Redacted<Vec<u8>> {
        let parsed = match parse_document(body) {
            Ok(value) => value,
            Err(_) => return Redacted::unchanged(body.to_vec(), FallbackReason::MalformedJson),
        };

        let redacted = self.redact_json_value(parsed);
        let serialized = serde_json::to_vec(&StackSafe(&redacted));
        drop_iteratively(redacted);
        match serialized {
            Ok(out) => Redacted::sanitized(out),
            Err(_) => Redacted::unchanged(body.to_vec(), FallbackReason::SerializeFailed),
        }
    }
}

/// Parse one complete JSON document with no nesting limit.
fn parse_document(body: &[u8]) -> serde_json::Result<Value> {
    let mut de = serde_json::Deserializer::from_slice(body);
    de.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    if let Err(err) = de.end() {
        drop_iteratively(value);
        return Err(err);
    }
    Ok(value)
}

/// Serializes a tree, growing the stack as nesting deepens.
struct StackSafe<'a>(&'a Value);

impl Serialize for StackSafe<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        stacker::maybe_grow(RED_ZONE, STACK_GROWTH, || match self.0 {
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(&StackSafe(item))?;
                }
                seq.end()
            }
            Value::Object(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, &StackSafe(value))?;
                }
                out.end()
            }
            scalar => scalar.serialize(serializer),
        })
    }
}
