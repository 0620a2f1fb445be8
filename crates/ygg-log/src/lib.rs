//! Redacting log setup for the yggdrasil secrets-store client.
//!
//! Provides dual-mode logging:
//! - Human-readable console output, with field values redacted
//! - Machine-parseable JSONL, with field values redacted
//!
//! and [`exchange`] helpers that log HTTP requests and responses after
//! passing URL, headers, and body through the redaction engine.
//!
//! # Usage
//!
//! ```no_run
//! use ygg_log::{init_logging, log_request, LogConfig};
//!
//! let config = LogConfig::from_env(None, None);
//! init_logging(&config).expect("logging already initialized");
//!
//! let headers = http::HeaderMap::new();
//! log_request(&http::Method::GET, "https://vault.example.com/v2/x?token=abc", &headers, None);
//! ```
//!
//! # Design Notes
//!
//! - stderr receives all log output (human or JSONL)
//! - The engine is resolved once per process from `YGG_REDACTION_POLICY`,
//!   or replaced with [`set_redactor`] before first use

pub mod config;
pub mod exchange;
pub mod layer;

pub use config::{LogConfig, LogFormat, LogLevel, LOG_FORMAT_ENV_VAR, LOG_LEVEL_ENV_VAR};
pub use exchange::{
    header_multimap, log_request, log_response, redact_header_map, safe_error_message,
    ExchangeLogger, HTTP_TARGET,
};
pub use layer::RedactingJsonlLayer;

use std::io::IsTerminal;
use std::sync::OnceLock;
use tracing_subscriber::field::MakeExt;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, EnvFilter};
use ygg_redact::Redactor;

static REDACTOR: OnceLock<Redactor> = OnceLock::new();

/// Get the process-wide redaction engine used for logging.
///
/// On first use it is built from `YGG_REDACTION_POLICY`; a policy that fails
/// to load falls back to the default policy with a warning on stderr.
pub fn redactor() -> &'static Redactor {
    REDACTOR.get_or_init(|| {
        Redactor::from_env().unwrap_or_else(|err| {
            eprintln!("Warning: redaction policy not loaded ({}), using default policy", err);
            Redactor::default()
        })
    })
}

/// Install the process-wide redaction engine.
///
/// Fails, handing the engine back, if one is already in use.
pub fn set_redactor(engine: Redactor) -> Result<(), Redactor> {
    REDACTOR.set(engine)
}

/// Initialize the logging subsystem.
///
/// Call once at startup before any logging occurs. `RUST_LOG` directives,
/// when present, take precedence over `config.level` for filtering.
pub fn init_logging(config: &LogConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::from(config.level).into())
            .parse_lossy("")
    });
    let engine = redactor().clone();

    match config.format {
        LogFormat::Human => {
            let use_ansi = std::io::stderr().is_terminal();
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(use_ansi)
                .fmt_fields(redacting_fields(engine));

            if config.timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer)
                    .try_init()
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer.without_time())
                    .try_init()
            }
        }
        LogFormat::Jsonl => tracing_subscriber::registry()
            .with(filter)
            .with(RedactingJsonlLayer::stderr(engine))
            .try_init(),
    }
}

/// Initialize logging from the environment alone.
pub fn init_default_logging() -> Result<(), TryInitError> {
    let config = LogConfig::from_env(None, None);
    init_logging(&config)
}

/// Field formatter for human output that applies the same rules as
/// [`RedactingJsonlLayer`].
fn redacting_fields(
    engine: Redactor,
) -> impl for<'writer> fmt::FormatFields<'writer> + Send + Sync + 'static {
    format::debug_fn(move |writer: &mut Writer<'_>, field, value| {
        let name = field.name();
        if engine.is_sensitive_key(name) {
            return write!(writer, "{}={}", name, engine.mask());
        }
        let text = engine.sanitize_str(&format!("{:?}", value));
        if name == "message" {
            write!(writer, "{}", text)
        } else {
            write!(writer, "{}={}", name, text)
        }
    })
    .delimited(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redactor_is_shared() {
        let a = redactor() as *const Redactor;
        let b = redactor() as *const Redactor;
        assert_eq!(a, b);
    }

    #[test]
    fn test_set_redactor_after_first_use_fails() {
        let _ = redactor();
        let result = set_redactor(Redactor::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_log_config_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.format, LogFormat::Human);
        assert_eq!(config.level, LogLevel::Info);
    }

    #[test]
    fn test_human_fields_redacted() {
        use std::io::{self, Write};
        use std::sync::{Arc, Mutex};

        #[derive(Clone)]
        struct BufWriter(Arc<Mutex<Vec<u8>>>);
        impl Write for BufWriter {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.lock().unwrap().write(buf)
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let buffer = Arc::new(Mutex::new(Vec::new()));
        let writer = BufWriter(buffer.clone());
        let layer = fmt::layer()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .without_time()
            .fmt_fields(redacting_fields(Redactor::default()));
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(token = "abc", page = 2, "Authorization: Bearer xyz");
        });

        let output = String::from_utf8_lossy(&buffer.lock().unwrap()).into_owned();
        assert!(output.contains("token=****"), "{}", output);
        assert!(output.contains("page=2"), "{}", output);
        assert!(!output.contains("xyz"), "{}", output);
    }
}
