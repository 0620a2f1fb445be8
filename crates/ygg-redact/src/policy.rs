//! Redaction policy configuration.
//!
//! The policy is the single source of truth for what counts as sensitive and
//! how it is rendered: the key vocabulary, the mask, the preview window, the
//! header names that are always masked, and the keywords that make the chain
//! sanitizer discard a whole buffer.

use crate::error::{RedactionError, Result};
use crate::vocabulary::SensitivityVocabulary;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Schema version for the policy file.
pub const POLICY_SCHEMA_VERSION: &str = "1.0.0";

/// Fixed sentinel substituted for every sensitive value.
pub const REDACTION_MASK: &str = "****";

/// Strings at or below this many characters are never shortened.
pub const PREVIEW_WINDOW: usize = 16;

/// Environment variable naming a policy file to load.
pub const POLICY_ENV_VAR: &str = "YGG_REDACTION_POLICY";

/// Redaction policy configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedactionPolicy {
    /// Schema version.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Replacement for sensitive values.
    #[serde(default = "default_mask")]
    pub mask: String,

    /// Preview window in characters.
    #[serde(default = "default_preview_window")]
    pub preview_window: usize,

    /// Key classification patterns.
    #[serde(default)]
    pub vocabulary: SensitivityVocabulary,

    /// Header names masked regardless of the vocabulary (case-insensitive).
    #[serde(default = "default_always_sensitive_headers")]
    pub always_sensitive_headers: Vec<String>,

    /// Keywords that collapse a sanitized buffer to the mask (case-insensitive).
    #[serde(default = "default_chain_triggers")]
    pub chain_triggers: Vec<String>,
}

fn default_schema_version() -> String {
    POLICY_SCHEMA_VERSION.to_string()
}

fn default_mask() -> String {
    REDACTION_MASK.to_string()
}

fn default_preview_window() -> usize {
    PREVIEW_WINDOW
}

fn default_always_sensitive_headers() -> Vec<String> {
    vec!["Authorization".to_string(), "Cookie".to_string()]
}

fn default_chain_triggers() -> Vec<String> {
    vec!["authorization:".to_string(), "bearer ".to_string()]
}

impl RedactionPolicy {
    /// Create a new policy with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate a policy from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let policy: RedactionPolicy = serde_json::from_str(&content)?;
        policy.validate()?;
        debug!(
            path = %path.display(),
            patterns = policy.vocabulary.len(),
            "Loaded redaction policy"
        );
        Ok(policy)
    }

    /// Load the policy named by `YGG_REDACTION_POLICY`, or the default policy
    /// when the variable is unset or empty.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(POLICY_ENV_VAR) {
            Some(path) if !path.is_empty() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    /// Save policy to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check that the policy can be applied.
    pub fn validate(&self) -> Result<()> {
        let major = self.schema_version.split('.').next().unwrap_or_default();
        let expected = POLICY_SCHEMA_VERSION.split('.').next().unwrap_or_default();
        if major != expected {
            return Err(RedactionError::policy(format!(
                "unsupported schema version {} (expected {}.x)",
                self.schema_version, expected
            )));
        }
        if self.mask.is_empty() {
            return Err(RedactionError::policy("mask must not be empty"));
        }
        if self.preview_window < 2 {
            return Err(RedactionError::policy(format!(
                "preview window must be at least 2 characters, got {}",
                self.preview_window
            )));
        }
        if self.vocabulary.patterns().iter().any(|p| p.pattern().is_empty()) {
            return Err(RedactionError::policy(
                "vocabulary patterns must not be empty",
            ));
        }
        if self.always_sensitive_headers.iter().any(|h| h.is_empty()) {
            return Err(RedactionError::policy("header names must not be empty"));
        }
        if self.chain_triggers.iter().any(|t| t.is_empty()) {
            return Err(RedactionError::policy("chain triggers must not be empty"));
        }
        Ok(())
    }

    /// Replace the vocabulary.
    pub fn with_vocabulary(mut self, vocabulary: SensitivityVocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    /// Replace the mask.
    pub fn with_mask(mut self, mask: impl Into<String>) -> Self {
        self.mask = mask.into();
        self
    }

    /// Replace the preview window.
    pub fn with_preview_window(mut self, window: usize) -> Self {
        self.preview_window = window;
        self
    }
}

impl Default for RedactionPolicy {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            mask: default_mask(),
            preview_window: default_preview_window(),
            vocabulary: SensitivityVocabulary::default(),
            always_sensitive_headers: default_always_sensitive_headers(),
            chain_triggers: default_chain_triggers(),
        }
    }
}
