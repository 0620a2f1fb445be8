//! Results of a redaction pass that may have fallen back to its input.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why an adapter returned its input unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// The URL could not be parsed.
    MalformedUrl,
    /// The body was not valid JSON.
    MalformedJson,
    /// The redacted tree could not be serialized.
    SerializeFailed,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FallbackReason::MalformedUrl => "malformed_url",
            FallbackReason::MalformedJson => "malformed_json",
            FallbackReason::SerializeFailed => "serialize_failed",
        };
        write!(f, "{}", s)
    }
}

/// What happened to a value passed through an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum Outcome {
    /// Parsed and redacted.
    Sanitized,
    /// Replaced wholesale by the mask.
    Collapsed,
    /// Returned as given; no redaction was applied.
    Unchanged(FallbackReason),
}

/// An adapter's output together with how it was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redacted<T> {
    /// The value safe to log (or the original, see `outcome`).
    pub output: T,
    /// How `output` was produced.
    pub outcome: Outcome,
}

impl<T> Redacted<T> {
    pub fn sanitized(output: T) -> Self {
        Self {
            output,
            outcome: Outcome::Sanitized,
        }
    }

    pub fn collapsed(output: T) -> Self {
        Self {
            output,
            outcome: Outcome::Collapsed,
        }
    }

    pub fn unchanged(output: T, reason: FallbackReason) -> Self {
        Self {
            output,
            outcome: Outcome::Unchanged(reason),
        }
    }

    /// The fallback reason, if the input was passed through.
    pub fn fallback(&self) -> Option<FallbackReason> {
        match self.outcome {
            Outcome::Unchanged(reason) => Some(reason),
            _ => None,
        }
    }

    /// Whether the input was passed through unredacted.
    pub fn is_fallback(&self) -> bool {
        self.fallback().is_some()
    }

    pub fn into_inner(self) -> T {
        self.output
    }

    /// Transform the output, keeping the outcome.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Redacted<U> {
        Redacted {
            output: f(self.output),
            outcome: self.outcome,
        }
    }
}
