//! The chain sanitizer: make an arbitrary byte blob safe to print.
//!
//! Stages, in order:
//!
//! 1. JSON body redaction (no-op when the blob is not JSON).
//! 2. PEM block redaction.
//! 3. A case-insensitive scan for the policy's trigger keywords
//!    (`authorization:` and `bearer ` by default), compiled once per engine.
//!    Any hit discards the whole blob for the mask alone.
//!
//! Stage 3 runs over the *result* of the first two, so credentials already
//! masked by key inside JSON do not trigger it, while free-text credentials
//! and short previewed values do.

use crate::engine::Redactor;
use crate::outcome::{Outcome, Redacted};

impl Redactor {
    /// Sanitize a request or response body of unknown format.
    pub fn sanitize_bytes(&self, body: &[u8]) -> Vec<u8> {
        self.sanitize_bytes_checked(body).output
    }

    /// [`Redactor::sanitize_bytes`], reporting what happened.
    ///
    /// `Unchanged` means the output equals the input: the blob was not JSON
    /// and held neither a PEM block nor a trigger keyword.
    pub fn sanitize_bytes_checked(&self, body: &[u8]) -> Redacted<Vec<u8>> {
        let json = self.redact_json_bytes_checked(body);
        let pem = self.redact_pem_bytes(&json.output);
        let pem_changed = pem.as_ref() != json.output.as_slice();
        let output = pem.into_owned();

        if self.contains_trigger(&output) {
            return Redacted::collapsed(self.mask().as_bytes().to_vec());
        }

        match json.outcome {
            Outcome::Unchanged(reason) if !pem_changed => Redacted::unchanged(output, reason),
            _ => Redacted::sanitized(output),
        }
    }

    /// [`Redactor::sanitize_bytes`] for text.
    pub fn sanitize_str(&self, text: &str) -> String {
        match String::from_utf8(self.sanitize_bytes(text.as_bytes())) {
            Ok(s) => s,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        }
    }

    fn contains_trigger(&self, haystack: &[u8]) -> bool {
        self.triggers()
            .is_some_and(|triggers| triggers.is_match(haystack))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::FallbackReason;
    use crate::RedactionPolicy;

    #[test]
    fn test_structured_authorization_survives_as_json() {
        let redactor = Redactor::default();
        let result = redactor.sanitize_bytes_checked(br#"{"authorization": "Bearer xyz"}"#);

        assert_eq!(result.output, br#"{"authorization":"****"}"#.to_vec());
        assert_eq!(result.outcome, Outcome::Sanitized);
    }

    #[test]
    fn test_plaintext_authorization_collapses() {
        let redactor = Redactor::default();
        let result = redactor.sanitize_bytes_checked(b"GET /v2 HTTP/1.1\nAuthorization: Bearer abc\n");

        assert_eq!(result.output, b"****".to_vec());
        assert_eq!(result.outcome, Outcome::Collapsed);
    }

    #[test]
    fn test_previewed_bearer_value_collapses() {
        // `note` is not sensitive, so its short value is kept and then caught.
        let redactor = Redactor::default();
        let out = redactor.sanitize_bytes(br#"{"note": "BEARER abc"}"#);
        assert_eq!(out, b"****".to_vec());
    }

    #[test]
    fn test_pem_inside_json_string_is_previewed() {
        // Stage 1 already shortens the long string, so the armor body is gone
        // before stage 2 runs.
        let redactor = Redactor::default();
        let body = br#"{"items": ["-----BEGIN X-----\nabc\n-----END X-----"]}"#;

        let out = redactor.sanitize_bytes(body);
        assert_eq!(out, r#"{"items":["-----BEG…D X-----"]}"#.as_bytes().to_vec());
    }

    #[test]
    fn test_pem_in_plain_text_replaced() {
        let redactor = Redactor::default();
        let body = b"cert:\n-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----\ndone";

        let result = redactor.sanitize_bytes_checked(body);
        assert_eq!(result.output, b"cert:\n****\ndone".to_vec());
        assert_eq!(result.outcome, Outcome::Sanitized);
    }

    #[test]
    fn test_plain_text_unchanged() {
        let redactor = Redactor::default();
        let result = redactor.sanitize_bytes_checked(b"404 page not found");

        assert_eq!(result.output, b"404 page not found".to_vec());
        assert_eq!(result.outcome, Outcome::Unchanged(FallbackReason::MalformedJson));
    }

    #[test]
    fn test_no_triggers_never_collapses() {
        let mut policy = RedactionPolicy::default();
        policy.chain_triggers.clear();
        let redactor = Redactor::new(policy).unwrap();

        assert_eq!(
            redactor.sanitize_bytes(b"Authorization: Bearer abc"),
            b"Authorization: Bearer abc".to_vec()
        );
    }

    #[test]
    fn test_sanitize_str() {
        let redactor = Redactor::default();
        assert_eq!(redactor.sanitize_str(r#"{"password":"p"}"#), r#"{"password":"****"}"#);
        assert_eq!(redactor.sanitize_str("bearer token here"), "****");
    }

    #[test]
    fn test_unicode_case_variants_collapse() {
        let redactor = Redactor::default();
        assert_eq!(
            redactor.sanitize_bytes("AUTHORİZATION: Bearer".as_bytes()),
            b"****".to_vec()
        );
        assert_eq!(redactor.sanitize_bytes(b"BeArEr abc"), b"****".to_vec());
    }

    #[test]
    fn test_trigger_in_invalid_utf8_collapses() {
        let redactor = Redactor::default();
        let body = b"\xff\xfe authorization: basic Zm9v";
        assert_eq!(redactor.sanitize_bytes(body), b"****".to_vec());
    }
}
