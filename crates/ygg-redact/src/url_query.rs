//! URL query string redaction.
//!
//! Absolute and scheme-relative URLs are parsed and re-serialized. A
//! path-relative reference keeps everything but its query byte-for-byte,
//! since resolving it against a base would rewrite the path.

use crate::engine::Redactor;
use crate::outcome::{FallbackReason, Redacted};
use crate::vocabulary::fold_case;
use url::{form_urlencoded, ParseError, Position, Url};

/// Base used to resolve scheme-relative references. Never appears in output.
const RELATIVE_BASE: &str = "http://relative.invalid/";

enum Reference {
    Absolute(Url),
    SchemeRelative(Url),
    PathRelative,
}

impl Redactor {
    /// Redact the query parameters of a URL.
    ///
    /// Parameters whose name is sensitive, or equals one of `extra_sensitive`
    /// (case-insensitive), are masked; other values are previewed. Scheme,
    /// host, path, and parameter names are kept. A password in the authority
    /// is masked. Unparseable input is returned unchanged.
    pub fn redact_url_query<S: AsRef<str>>(&self, raw: &str, extra_sensitive: &[S]) -> String {
        self.redact_url_query_checked(raw, extra_sensitive).output
    }

    /// [`Redactor::redact_url_query`], reporting whether the input was parsed.
    pub fn redact_url_query_checked<S: AsRef<str>>(
        &self,
        raw: &str,
        extra_sensitive: &[S],
    ) -> Redacted<String> {
        let output = match parse_reference(raw) {
            Some(Reference::Absolute(url)) => self.redact_parsed(url, extra_sensitive).to_string(),
            Some(Reference::SchemeRelative(url)) => {
                let url = self.redact_parsed(url, extra_sensitive);
                format!("//{}", &url[Position::BeforeUsername..])
            }
            Some(Reference::PathRelative) => self.redact_path_relative(raw, extra_sensitive),
            None => return Redacted::unchanged(raw.to_string(), FallbackReason::MalformedUrl),
        };
        Redacted::sanitized(output)
    }

    fn redact_parsed<S: AsRef<str>>(&self, mut url: Url, extra_sensitive: &[S]) -> Url {
        if url.password().is_some() {
            let _ = url.set_password(Some(self.mask()));
        }

        let pairs = self.redact_pairs(url.query_pairs(), extra_sensitive);
        if !pairs.is_empty() {
            url.query_pairs_mut()
                .clear()
                .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        url
    }

    fn redact_path_relative<S: AsRef<str>>(&self, raw: &str, extra_sensitive: &[S]) -> String {
        let (before_fragment, fragment) = match raw.split_once('#') {
            Some((head, fragment)) => (head, Some(fragment)),
            None => (raw, None),
        };
        let (path, query) = match before_fragment.split_once('?') {
            Some((path, query)) => (path, query),
            None => return raw.to_string(),
        };

        let pairs = self.redact_pairs(form_urlencoded::parse(query.as_bytes()), extra_sensitive);
        if pairs.is_empty() {
            return raw.to_string();
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .finish();

        let mut out = format!("{}?{}", path, query);
        if let Some(fragment) = fragment {
            out.push('#');
            out.push_str(fragment);
        }
        out
    }

    fn redact_pairs<S: AsRef<str>>(
        &self,
        pairs: form_urlencoded::Parse<'_>,
        extra_sensitive: &[S],
    ) -> Vec<(String, String)> {
        pairs
            .map(|(name, value)| {
                let value = if self.is_sensitive_param(&name, extra_sensitive) {
                    self.mask().to_string()
                } else {
                    self.preview(&value).into_owned()
                };
                (name.into_owned(), value)
            })
            .collect()
    }

    fn is_sensitive_param<S: AsRef<str>>(&self, name: &str, extra_sensitive: &[S]) -> bool {
        if self.is_sensitive_key(name) {
            return true;
        }
        let folded = fold_case(name);
        extra_sensitive
            .iter()
            .any(|extra| fold_case(extra.as_ref()) == folded)
    }
}

fn parse_reference(raw: &str) -> Option<Reference> {
    match Url::parse(raw) {
        Ok(url) => Some(Reference::Absolute(url)),
        Err(ParseError::RelativeUrlWithoutBase) if is_scheme_relative(raw) => {
            let base = Url::parse(RELATIVE_BASE).ok()?;
            base.join(raw).ok().map(Reference::SchemeRelative)
        }
        Err(ParseError::RelativeUrlWithoutBase) => Some(Reference::PathRelative),
        Err(_) => None,
    }
}

// The parser strips leading controls and spaces and accepts `\` for `/`.
fn is_scheme_relative(raw: &str) -> bool {
    let mut chars = raw.trim_start_matches(|c: char| c <= ' ').chars();
    matches!(
        (chars.next(), chars.next()),
        (Some('/' | '\\'), Some('/' | '\\'))
    )
}
