//! Structural walkers over loosely-typed trees.
//!
//! Two traversals share the scalar rules:
//!
//! - [`Redactor::redact_fields`] is shape-preserving. Nested maps are always
//!   recursed, even under a sensitive key, so every level keeps its key set.
//!   Leaves and sequences under a sensitive key become the mask.
//! - [`Redactor::redact_json_value`] is the JSON body walker. A sensitive key
//!   discards its whole subtree for the mask.
//!
//! In both, sequence elements carry no key of their own: strings inside a
//! sequence are previewed, never masked by name. Only the parent key can mark
//! them sensitive.
//!
//! The JSON walker grows the stack on demand, so decoded bodies of any depth
//! are safe to pass in.

use crate::engine::Redactor;
use serde::Serialize;
use serde_json::{Map, Value};
use std::borrow::Cow;

/// Remaining stack below which deep traversals switch to a fresh segment.
pub(crate) const RED_ZONE: usize = 64 * 1024;

/// Size of each stack segment allocated by deep traversals.
pub(crate) const STACK_GROWTH: usize = 1024 * 1024;

impl Redactor {
    /// Redact a field map for logging, returning a new map of the same shape.
    pub fn redact_fields(&self, fields: &Map<String, Value>) -> Map<String, Value> {
        fields
            .iter()
            .map(|(key, value)| (key.clone(), self.redact_field(key, value)))
            .collect()
    }

    fn redact_field(&self, key: &str, value: &Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(self.redact_fields(map)),
            _ if self.is_sensitive_key(key) => self.mask_value(),
            Value::Array(items) => {
                Value::Array(items.iter().map(|item| self.redact_element(item)).collect())
            }
            other => self.redact_scalar(key, other),
        }
    }

    fn redact_element(&self, value: &Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(self.redact_fields(map)),
            Value::Array(items) => {
                Value::Array(items.iter().map(|item| self.redact_element(item)).collect())
            }
            Value::String(s) => Value::String(self.preview(s).into_owned()),
            other => other.clone(),
        }
    }

    /// Redact a decoded JSON document.
    ///
    /// Takes ownership so the tree is rebuilt rather than edited in place.
    pub fn redact_json_value(&self, value: Value) -> Value {
        stacker::maybe_grow(RED_ZONE, STACK_GROWTH, || match value {
            Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(key, value)| {
                        let redacted = if self.is_sensitive_key(&key) {
                            drop_iteratively(value);
                            self.mask_value()
                        } else {
                            self.redact_json_value(value)
                        };
                        (key, redacted)
                    })
                    .collect(),
            ),
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| self.redact_json_value(item))
                    .collect(),
            ),
            Value::String(s) => {
                let shortened = match self.preview(&s) {
                    Cow::Owned(short) => Some(short),
                    Cow::Borrowed(_) => None,
                };
                Value::String(shortened.unwrap_or(s))
            }
            other => other,
        })
    }

    /// Serialize `value` to a JSON tree and redact it like a JSON body.
    ///
    /// Values that cannot be represented as JSON become the mask.
    pub fn redact_serializable<T: Serialize + ?Sized>(&self, value: &T) -> Value {
        match serde_json::to_value(value) {
            Ok(tree) => self.redact_json_value(tree),
            Err(_) => self.mask_value(),
        }
    }
}

/// Free a tree without recursing once per level.
pub(crate) fn drop_iteratively(value: Value) {
    let mut pending = vec![value];
    while let Some(value) = pending.pop() {
        match value {
            Value::Array(items) => pending.extend(items),
            Value::Object(map) => pending.extend(map.into_iter().map(|(_, value)| value)),
            _ => {}
        }
    }
}
