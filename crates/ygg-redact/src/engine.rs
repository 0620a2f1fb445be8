//! Main redaction engine.
//!
//! A [`Redactor`] binds a validated [`RedactionPolicy`] to the classification
//! and scalar redaction rules. The format adapters (headers, URLs, JSON, PEM,
//! chain) are implemented on it in their own modules.

use crate::error::{RedactionError, Result};
use crate::policy::RedactionPolicy;
use crate::preview::preview;
use crate::vocabulary::fold_case;
use once_cell::sync::Lazy;
use regex::bytes::{Regex as BytesRegex, RegexBuilder};
use serde_json::Value;
use std::borrow::Cow;
use std::path::Path;

/// The redaction engine.
///
/// Immutable after construction and safe to share across threads.
#[derive(Debug, Clone)]
pub struct Redactor {
    /// The redaction policy.
    policy: RedactionPolicy,

    /// Chain sanitizer keywords as one case-insensitive alternation.
    triggers: Option<BytesRegex>,
}

static DEFAULT_TRIGGERS: Lazy<Option<BytesRegex>> =
    Lazy::new(|| compile_triggers(&RedactionPolicy::default().chain_triggers).unwrap());

static DEFAULT_REDACTOR: Lazy<Redactor> = Lazy::new(Redactor::default);

/// The process-wide engine built from the default policy.
pub fn default_redactor() -> &'static Redactor {
    &DEFAULT_REDACTOR
}

impl Redactor {
    /// Create an engine from a policy, rejecting invalid policies.
    pub fn new(policy: RedactionPolicy) -> Result<Self> {
        policy.validate()?;
        Self::from_valid(policy)
    }

    /// Load an engine from a policy file.
    pub fn load<P: AsRef<Path>>(policy_path: P) -> Result<Self> {
        let policy = RedactionPolicy::load(policy_path)?;
        Self::from_valid(policy)
    }

    /// Build an engine from `YGG_REDACTION_POLICY`, or the default policy.
    pub fn from_env() -> Result<Self> {
        let policy = RedactionPolicy::from_env()?;
        Self::from_valid(policy)
    }

    fn from_valid(policy: RedactionPolicy) -> Result<Self> {
        let triggers = compile_triggers(&policy.chain_triggers)?;
        Ok(Self { policy, triggers })
    }

    /// Get a reference to the policy.
    pub fn policy(&self) -> &RedactionPolicy {
        &self.policy
    }

    /// Get the current policy version.
    pub fn policy_version(&self) -> &str {
        &self.policy.schema_version
    }

    /// The mask substituted for sensitive values.
    pub fn mask(&self) -> &str {
        &self.policy.mask
    }

    pub(crate) fn mask_value(&self) -> Value {
        Value::String(self.policy.mask.clone())
    }

    pub(crate) fn triggers(&self) -> Option<&BytesRegex> {
        self.triggers.as_ref()
    }

    /// Whether a field, header, or parameter name is sensitive.
    pub fn is_sensitive_key(&self, key: &str) -> bool {
        self.policy.vocabulary.is_sensitive(key)
    }

    /// Shorten a non-sensitive string to the policy's preview window.
    pub fn preview<'a>(&self, value: &'a str) -> Cow<'a, str> {
        preview(value, self.policy.preview_window)
    }

    /// Make a single named value safe to log.
    ///
    /// A sensitive name yields the mask whatever the value. Otherwise strings
    /// are previewed and every other value is returned as-is.
    pub fn redact_scalar(&self, key: &str, value: &Value) -> Value {
        if self.is_sensitive_key(key) {
            return self.mask_value();
        }
        match value {
            Value::String(s) => Value::String(self.preview(s).into_owned()),
            other => other.clone(),
        }
    }

    /// [`Redactor::redact_scalar`] for a plain string.
    pub fn redact_str<'a>(&'a self, key: &str, value: &'a str) -> Cow<'a, str> {
        if self.is_sensitive_key(key) {
            Cow::Borrowed(self.mask())
        } else {
            self.preview(value)
        }
    }
}

impl Default for Redactor {
    fn default() -> Self {
        Self {
            policy: RedactionPolicy::default(),
            triggers: DEFAULT_TRIGGERS.clone(),
        }
    }
}

/// Compile chain triggers into a single matcher, `None` when there are none.
fn compile_triggers(triggers: &[String]) -> Result<Option<BytesRegex>> {
    if triggers.is_empty() {
        return Ok(None);
    }
    let alternation = triggers
        .iter()
        .map(|trigger| trigger_pattern(trigger))
        .collect::<Vec<_>>()
        .join("|");
    RegexBuilder::new(&alternation)
        .case_insensitive(true)
        .build()
        .map(Some)
        .map_err(|err| RedactionError::policy(format!("invalid chain trigger: {}", err)))
}

fn trigger_pattern(trigger: &str) -> String {
    fold_case(trigger)
        .chars()
        .map(|c| match c {
            // `İ` lowers to `i` but is not in its case-folding set.
            'i' => "[iİ]".to_string(),
            c => regex::escape(c.encode_utf8(&mut [0; 4])),
        })
        .collect()
}
