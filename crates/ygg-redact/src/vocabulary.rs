//! Key classification: deciding whether a field name denotes sensitive content.
//!
//! A [`SensitivityVocabulary`] is an ordered list of case-insensitive
//! [`KeyPattern`]s. A key is sensitive when any pattern matches its
//! lower-cased form (see [`fold_case`]). Substring patterns are deliberately over-inclusive:
//! `ApiKeyValue` and `my_private_note` both classify as sensitive. A false
//! positive costs a preview; a false negative leaks a secret.

use serde::{Deserialize, Serialize};

/// Substrings that mark a field, header, or query parameter as sensitive.
pub const DEFAULT_SENSITIVE_SUBSTRINGS: &[&str] = &[
    "token",
    "secret",
    "password",
    "passwd",
    "apikey",
    "api_key",
    "authorization",
    "auth",
    "credential",
    "private",
    "key",
    "cert",
    "certificate",
    "pem",
    "jwt",
    "bearer",
    "value",
];

/// Lower-case `s` one character at a time.
///
/// Each character maps to a single character: `İ` becomes `i` rather than
/// `i` plus a combining dot, and `Σ` always becomes `σ`.
pub fn fold_case(s: &str) -> String {
    s.chars().filter_map(|c| c.to_lowercase().next()).collect()
}

/// How a [`KeyPattern`] is compared against a lower-cased key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// The key contains the pattern anywhere.
    #[default]
    Substring,
    /// The key equals the pattern.
    Exact,
}

/// A single vocabulary entry.
///
/// Patterns are stored lower-cased. In a policy file an entry is either a
/// bare string (substring mode) or `{"pattern": "...", "mode": "exact"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "KeyPatternSpec")]
pub struct KeyPattern {
    pattern: String,
    mode: MatchMode,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum KeyPatternSpec {
    Bare(String),
    Full {
        pattern: String,
        #[serde(default)]
        mode: MatchMode,
    },
}

impl From<KeyPatternSpec> for KeyPattern {
    fn from(spec: KeyPatternSpec) -> Self {
        match spec {
            KeyPatternSpec::Bare(pattern) => KeyPattern::substring(&pattern),
            KeyPatternSpec::Full { pattern, mode } => KeyPattern::new(&pattern, mode),
        }
    }
}

impl KeyPattern {
    /// Create a pattern with an explicit match mode.
    pub fn new(pattern: &str, mode: MatchMode) -> Self {
        Self {
            pattern: fold_case(pattern),
            mode,
        }
    }

    /// Create a substring pattern.
    pub fn substring(pattern: &str) -> Self {
        Self::new(pattern, MatchMode::Substring)
    }

    /// Create an exact-match pattern.
    pub fn exact(pattern: &str) -> Self {
        Self::new(pattern, MatchMode::Exact)
    }

    /// The lower-cased pattern text.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The match mode.
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Test an already lower-cased key.
    pub fn matches(&self, lowered_key: &str) -> bool {
        match self.mode {
            MatchMode::Substring => lowered_key.contains(self.pattern.as_str()),
            MatchMode::Exact => lowered_key == self.pattern,
        }
    }
}

/// Ordered set of patterns classifying keys as sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensitivityVocabulary {
    patterns: Vec<KeyPattern>,
}

impl SensitivityVocabulary {
    /// Create a vocabulary from explicit patterns.
    pub fn new(patterns: Vec<KeyPattern>) -> Self {
        Self { patterns }
    }

    /// A vocabulary that classifies nothing as sensitive.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Add a pattern, keeping insertion order. Duplicates are ignored.
    pub fn with_pattern(mut self, pattern: KeyPattern) -> Self {
        if !self.patterns.contains(&pattern) {
            self.patterns.push(pattern);
        }
        self
    }

    /// Remove every pattern whose text equals `pattern` (case-insensitive).
    pub fn without_pattern(mut self, pattern: &str) -> Self {
        let lowered = fold_case(pattern);
        self.patterns.retain(|p| p.pattern != lowered);
        self
    }

    /// Whether `key` is sensitive.
    pub fn is_sensitive(&self, key: &str) -> bool {
        let lowered = fold_case(key);
        self.patterns.iter().any(|p| p.matches(&lowered))
    }

    /// The patterns in order.
    pub fn patterns(&self) -> &[KeyPattern] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for SensitivityVocabulary {
    fn default() -> Self {
        Self::new(
            DEFAULT_SENSITIVE_SUBSTRINGS
                .iter()
                .map(|s| KeyPattern::substring(s))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_case_maps_one_to_one() {
        assert_eq!(fold_case("X-Auth-Token"), "x-auth-token");
        assert_eq!(fold_case("PRİVATE"), "private");
        assert_eq!(fold_case("ΣΑΣ"), "\u{3c3}\u{3b1}\u{3c3}");
    }

    #[test]
    fn test_dotted_capital_i_classified() {
        let vocab = SensitivityVocabulary::default();
        assert!(vocab.is_sensitive("PRİVATE"));
        assert!(vocab.is_sensitive("AUTHORİZATION"));
        assert!(SensitivityVocabulary::empty()
            .with_pattern(KeyPattern::exact("Pİn"))
            .is_sensitive("PIN"));
    }

    #[test]
    fn test_default_vocabulary_matches_compound_names() {
        let vocab = SensitivityVocabulary::default();

        assert!(vocab.is_sensitive("token"));
        assert!(vocab.is_sensitive("X-Auth-Token"));
        assert!(vocab.is_sensitive("ApiKeyValue"));
        assert!(vocab.is_sensitive("my_private_note"));
        assert!(vocab.is_sensitive("client_cert_path"));
        assert!(vocab.is_sensitive("AUTHORIZATION"));
    }

    #[test]
    fn test_default_vocabulary_passes_plain_names() {
        let vocab = SensitivityVocabulary::default();

        assert!(!vocab.is_sensitive("namespace"));
        assert!(!vocab.is_sensitive("page"));
        assert!(!vocab.is_sensitive("content-type"));
        assert!(!vocab.is_sensitive("updated_at"));
        assert!(!vocab.is_sensitive(""));
    }

    #[test]
    fn test_short_secret_names_are_not_in_vocabulary() {
        // `pwd` is not a vocabulary entry, so `pwd_temp` is not sensitive.
        let vocab = SensitivityVocabulary::default();
        assert!(!vocab.is_sensitive("pwd_temp"));
    }

    #[test]
    fn test_exact_mode() {
        let vocab = SensitivityVocabulary::empty().with_pattern(KeyPattern::exact("sid"));

        assert!(vocab.is_sensitive("sid"));
        assert!(vocab.is_sensitive("SID"));
        assert!(!vocab.is_sensitive("side"));
        assert!(!vocab.is_sensitive("inside"));
    }

    #[test]
    fn test_patterns_are_lowercased() {
        let pattern = KeyPattern::substring("Session");
        assert_eq!(pattern.pattern(), "session");
        assert!(pattern.matches("x-session-id"));
    }

    #[test]
    fn test_with_and_without_pattern() {
        let vocab = SensitivityVocabulary::default()
            .with_pattern(KeyPattern::substring("session"))
            .without_pattern("VALUE");

        assert!(vocab.is_sensitive("session_id"));
        assert!(!vocab.is_sensitive("value"));
        assert_eq!(vocab.len(), DEFAULT_SENSITIVE_SUBSTRINGS.len());
    }

    #[test]
    fn test_with_pattern_ignores_duplicates() {
        let vocab = SensitivityVocabulary::default().with_pattern(KeyPattern::substring("TOKEN"));
        assert_eq!(vocab.len(), DEFAULT_SENSITIVE_SUBSTRINGS.len());
    }

    #[test]
    fn test_empty_vocabulary() {
        let vocab = SensitivityVocabulary::empty();
        assert!(vocab.is_empty());
        assert!(!vocab.is_sensitive("password"));
    }

    #[test]
    fn test_deserialize_mixed_entries() {
        let json = r#"["Token", {"pattern": "sid", "mode": "exact"}, {"pattern": "otp"}]"#;
        let vocab: SensitivityVocabulary = serde_json::from_str(json).unwrap();

        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab.patterns()[0], KeyPattern::substring("token"));
        assert_eq!(vocab.patterns()[1].mode(), MatchMode::Exact);
        assert_eq!(vocab.patterns()[2].mode(), MatchMode::Substring);
    }

    #[test]
    fn test_serialize_roundtrip() {
        let vocab = SensitivityVocabulary::default().with_pattern(KeyPattern::exact("sid"));
        let json = serde_json::to_string(&vocab).unwrap();
        let parsed: SensitivityVocabulary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, vocab);
    }
}
