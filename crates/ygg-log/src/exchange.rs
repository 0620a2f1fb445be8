//! HTTP exchange logging.
//!
//! Routes every request and response artifact the client would log (URL,
//! headers, body) through the redaction engine before it reaches `tracing`.
//! Events are emitted at DEBUG under the `ygg::http` target.

use http::header::{HeaderMap, HeaderValue};
use http::{Method, StatusCode};
use tracing::{debug, enabled, Level};
use ygg_redact::{HeaderMultimap, Redacted, Redactor, REDACTION_MASK};

/// Target of every event emitted by this module.
pub const HTTP_TARGET: &str = "ygg::http";

/// Logs HTTP exchanges through a [`Redactor`].
#[derive(Debug, Clone, Copy)]
pub struct ExchangeLogger<'r> {
    redactor: &'r Redactor,
    extra_sensitive_params: &'r [&'r str],
}

impl ExchangeLogger<'static> {
    /// A logger backed by the process-wide engine.
    pub fn global() -> Self {
        ExchangeLogger::new(crate::redactor())
    }
}

impl<'r> ExchangeLogger<'r> {
    pub fn new(redactor: &'r Redactor) -> Self {
        ExchangeLogger {
            redactor,
            extra_sensitive_params: &[],
        }
    }

    /// Also mask these query parameter names (case-insensitive).
    pub fn with_extra_sensitive_params(mut self, names: &'r [&'r str]) -> Self {
        self.extra_sensitive_params = names;
        self
    }

    /// Log an outgoing request.
    pub fn log_request(&self, method: &Method, url: &str, headers: &HeaderMap, body: Option<&[u8]>) {
        if !enabled!(target: HTTP_TARGET, Level::DEBUG) {
            return;
        }

        let url = self
            .redactor
            .redact_url_query_checked(url, self.extra_sensitive_params);
        self.note_fallback("url", &url);
        let headers = self.redactor.redact_headers(&header_multimap(headers));
        debug!(
            target: HTTP_TARGET,
            method = %method,
            url = %url.output,
            headers = ?headers,
            "HTTP request"
        );

        if let Some(body) = body {
            self.log_body("request", body);
        }
    }

    /// Log a received response.
    pub fn log_response(&self, status: StatusCode, headers: &HeaderMap, body: Option<&[u8]>) {
        if !enabled!(target: HTTP_TARGET, Level::DEBUG) {
            return;
        }

        let headers = self.redactor.redact_headers(&header_multimap(headers));
        debug!(
            target: HTTP_TARGET,
            status = status.as_u16(),
            headers = ?headers,
            "HTTP response"
        );

        if let Some(body) = body {
            self.log_body("response", body);
        }
    }

    fn log_body(&self, direction: &'static str, body: &[u8]) {
        let sanitized = self.redactor.sanitize_bytes_checked(body);
        self.note_fallback("body", &sanitized);
        debug!(
            target: HTTP_TARGET,
            direction,
            body = %String::from_utf8_lossy(&sanitized.output),
            "HTTP body"
        );
    }

    fn note_fallback<T>(&self, artifact: &'static str, result: &Redacted<T>) {
        if let Some(reason) = result.fallback() {
            debug!(
                target: HTTP_TARGET,
                artifact,
                reason = %reason,
                "Redaction passed input through"
            );
        }
    }

    /// Build an error message for a failed call, embedding the sanitized body.
    pub fn safe_error_message(&self, operation: &str, status: StatusCode, body: &[u8]) -> String {
        if body.is_empty() {
            return format!(
                "{} failed (status {}): empty response body",
                operation,
                status.as_u16()
            );
        }
        let sanitized = self.redactor.sanitize_bytes(body);
        format!(
            "{} failed (status {}): {}",
            operation,
            status.as_u16(),
            String::from_utf8_lossy(&sanitized)
        )
    }

    /// Apply the header policy to an `http` header map.
    ///
    /// Sensitive headers keep a single masked value; other values are
    /// previewed. Names are unchanged.
    pub fn redact_header_map(&self, headers: &HeaderMap) -> HeaderMap {
        let mut out = HeaderMap::with_capacity(headers.keys_len());
        for name in headers.keys() {
            if self.redactor.is_sensitive_header(name.as_str()) {
                out.insert(name.clone(), self.mask_value());
                continue;
            }
            for value in headers.get_all(name) {
                let text = String::from_utf8_lossy(value.as_bytes());
                let previewed = self.redactor.preview(&text);
                let value = HeaderValue::from_bytes(previewed.as_bytes())
                    .unwrap_or_else(|_| self.mask_value());
                out.append(name.clone(), value);
            }
        }
        out
    }

    fn mask_value(&self) -> HeaderValue {
        HeaderValue::from_str(self.redactor.mask())
            .unwrap_or_else(|_| HeaderValue::from_static(REDACTION_MASK))
    }
}

/// Convert an `http` header map to the engine's multimap.
///
/// Values that are not UTF-8 are converted lossily.
pub fn header_multimap(headers: &HeaderMap) -> HeaderMultimap {
    let mut out = HeaderMultimap::new();
    for (name, value) in headers {
        out.entry(name.as_str().to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    out
}

/// [`ExchangeLogger::log_request`] with the process-wide engine.
pub fn log_request(method: &Method, url: &str, headers: &HeaderMap, body: Option<&[u8]>) {
    ExchangeLogger::global().log_request(method, url, headers, body);
}

/// [`ExchangeLogger::log_response`] with the process-wide engine.
pub fn log_response(status: StatusCode, headers: &HeaderMap, body: Option<&[u8]>) {
    ExchangeLogger::global().log_response(status, headers, body);
}

/// [`ExchangeLogger::safe_error_message`] with the process-wide engine.
pub fn safe_error_message(operation: &str, status: StatusCode, body: &[u8]) -> String {
    ExchangeLogger::global().safe_error_message(operation, status, body)
}

/// [`ExchangeLogger::redact_header_map`] with the process-wide engine.
pub fn redact_header_map(headers: &HeaderMap) -> HeaderMap {
    ExchangeLogger::global().redact_header_map(headers)
}
