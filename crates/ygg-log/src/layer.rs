//! Redacting tracing layer for JSONL output.
//!
//! Every event becomes one JSON object on its own line. Field values are
//! redacted before they are buffered: a sensitive field name yields the mask
//! whatever the value's type, and every other text value, the message
//! included, goes through the chain sanitizer.

use std::io::{self, Write};
use std::sync::Mutex;

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;
use ygg_redact::Redactor;

/// Redacted fields recorded on a span, stored in its extensions.
#[derive(Debug, Clone, Default)]
struct SpanFields(Map<String, Value>);

/// A visitor that redacts field values as it collects them.
struct RedactingVisitor<'r> {
    redactor: &'r Redactor,
    fields: Map<String, Value>,
    message: Option<String>,
}

impl<'r> RedactingVisitor<'r> {
    fn new(redactor: &'r Redactor) -> Self {
        RedactingVisitor {
            redactor,
            fields: Map::new(),
            message: None,
        }
    }

    fn record_text(&mut self, name: &str, text: &str) {
        if name == "message" {
            self.message = Some(self.redactor.sanitize_str(text));
            return;
        }
        let value = if self.redactor.is_sensitive_key(name) {
            Value::String(self.redactor.mask().to_string())
        } else {
            Value::String(self.redactor.sanitize_str(text))
        };
        self.fields.insert(name.to_string(), value);
    }

    fn record_value(&mut self, name: &str, value: Value) {
        let value = if self.redactor.is_sensitive_key(name) {
            Value::String(self.redactor.mask().to_string())
        } else {
            value
        };
        self.fields.insert(name.to_string(), value);
    }
}

impl Visit for RedactingVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_text(field.name(), value);
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.record_text(field.name(), &format!("{:?}", value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_value(field.name(), Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.record_value(field.name(), Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        // Non-finite floats have no JSON form.
        let value = serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or(Value::Null);
        self.record_value(field.name(), value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.record_value(field.name(), Value::Bool(value));
    }
}

/// JSONL tracing layer that redacts every field it writes.
pub struct RedactingJsonlLayer<W = io::Stderr> {
    writer: Mutex<W>,
    redactor: Redactor,
}

impl RedactingJsonlLayer<io::Stderr> {
    /// Create a layer writing to stderr.
    pub fn stderr(redactor: Redactor) -> Self {
        RedactingJsonlLayer::new(io::stderr(), redactor)
    }
}

impl<W: Write> RedactingJsonlLayer<W> {
    /// Create a layer with a custom writer.
    pub fn new(writer: W, redactor: Redactor) -> Self {
        RedactingJsonlLayer {
            writer: Mutex::new(writer),
            redactor,
        }
    }

    /// The engine this layer redacts with.
    pub fn redactor(&self) -> &Redactor {
        &self.redactor
    }
}

impl<S, W> Layer<S> for RedactingJsonlLayer<W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: Write + 'static,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let mut visitor = RedactingVisitor::new(&self.redactor);
        attrs.record(&mut visitor);

        if let Some(span) = ctx.span(id) {
            span.extensions_mut().insert(SpanFields(visitor.fields));
        }
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let mut visitor = RedactingVisitor::new(&self.redactor);
        values.record(&mut visitor);

        if let Some(span) = ctx.span(id) {
            let mut extensions = span.extensions_mut();
            match extensions.get_mut::<SpanFields>() {
                Some(SpanFields(fields)) => fields.extend(visitor.fields),
                None => extensions.insert(SpanFields(visitor.fields)),
            }
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let ts = Utc::now();

        // Span fields, outermost first so inner spans override.
        let mut fields = Map::new();
        let mut span_path: Vec<&'static str> = Vec::new();
        if let Some(scope) = ctx.event_scope(event) {
            for span in scope.from_root() {
                span_path.push(span.name());
                if let Some(SpanFields(span_fields)) = span.extensions().get::<SpanFields>() {
                    fields.extend(span_fields.iter().map(|(k, v)| (k.clone(), v.clone())));
                }
            }
        }

        let mut visitor = RedactingVisitor::new(&self.redactor);
        event.record(&mut visitor);
        fields.extend(visitor.fields);

        let metadata = event.metadata();
        let mut obj = Map::new();
        obj.insert("ts".to_string(), Value::from(ts.to_rfc3339()));
        obj.insert(
            "level".to_string(),
            Value::from(metadata.level().as_str().to_lowercase()),
        );
        obj.insert("target".to_string(), Value::from(metadata.target()));
        if !span_path.is_empty() {
            obj.insert("span".to_string(), Value::from(span_path.join(":")));
        }
        if let Some(msg) = visitor.message {
            obj.insert("message".to_string(), Value::from(msg));
        }
        if !fields.is_empty() {
            obj.insert("fields".to_string(), Value::Object(fields));
        }

        let json = serde_json::to_string(&Value::Object(obj)).unwrap_or_default();
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", json);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tracing_subscriber::layer::SubscriberExt;

    struct BufWriter(Arc<Mutex<Vec<u8>>>);

    impl Write for BufWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture<F: FnOnce()>(f: F) -> Vec<Value> {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let layer = RedactingJsonlLayer::new(BufWriter(buffer.clone()), Redactor::default());
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, f);

        let output = buffer.lock().unwrap();
        String::from_utf8_lossy(&output)
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_event_shape() {
        let lines = capture(|| {
            tracing::info!(target: "ygg::test", count = 42, active = true, "hello");
        });

        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert_eq!(line["level"], "info");
        assert_eq!(line["target"], "ygg::test");
        assert_eq!(line["message"], "hello");
        assert_eq!(line["fields"]["count"], 42);
        assert_eq!(line["fields"]["active"], true);
        assert!(line["ts"].is_string());
        assert!(line.get("span").is_none());
    }

    #[test]
    fn test_sensitive_fields_masked_whatever_type() {
        let lines = capture(|| {
            tracing::warn!(
                token = "ygg_tok_8f14e45fceea167a5a36dedd4bea2543",
                api_key = 12345,
                private = true,
                ratio_secret = 0.5,
                "auth failed"
            );
        });

        let fields = &lines[0]["fields"];
        assert_eq!(fields["token"], "****");
        assert_eq!(fields["api_key"], "****");
        assert_eq!(fields["private"], "****");
        assert_eq!(fields["ratio_secret"], "****");
    }

    #[test]
    fn test_message_and_text_fields_sanitized() {
        let lines = capture(|| {
            tracing::error!(
                detail = "Authorization: Bearer abc",
                body = r#"{"password":"hunter2","page":2}"#,
                "request failed: Authorization: Bearer abc"
            );
        });

        let line = &lines[0];
        assert_eq!(line["message"], "****");
        assert_eq!(line["fields"]["detail"], "****");
        assert_eq!(line["fields"]["body"], r#"{"page":2,"password":"****"}"#);
    }

    #[test]
    fn test_display_and_debug_fields_sanitized() {
        let cert = "-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----";
        let lines = capture(|| {
            tracing::info!(note = %format!("got {}", cert), plain = ?"text");
        });

        let fields = &lines[0]["fields"];
        assert_eq!(fields["note"], "got ****");
        assert_eq!(fields["plain"], "\"text\"");
    }

    #[test]
    fn test_span_fields_and_path() {
        let lines = capture(|| {
            let outer = tracing::info_span!("get_secret", namespace = "prod", token = "t0k");
            let _outer = outer.enter();
            let inner = tracing::info_span!("http", attempt = 1);
            let _inner = inner.enter();
            tracing::info!("sending");
        });

        let line = &lines[0];
        assert_eq!(line["span"], "get_secret:http");
        assert_eq!(line["fields"]["namespace"], "prod");
        assert_eq!(line["fields"]["token"], "****");
        assert_eq!(line["fields"]["attempt"], 1);
    }

    #[test]
    fn test_recorded_span_fields_redacted() {
        let lines = capture(|| {
            let span = tracing::info_span!("login", session = tracing::field::Empty);
            span.record("session", "Bearer abc");
            let _enter = span.enter();
            tracing::info!("done");
        });

        assert_eq!(lines[0]["fields"]["session"], "****");
    }

    #[test]
    fn test_non_finite_float_is_null() {
        let lines = capture(|| {
            tracing::info!(ratio = f64::NAN, "nan");
        });
        assert!(lines[0]["fields"]["ratio"].is_null());
    }

    #[test]
    fn test_layer_uses_its_own_policy() {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let policy = ygg_redact::RedactionPolicy::default().with_mask("<hidden>");
        let redactor = Redactor::new(policy).unwrap();
        let layer = RedactingJsonlLayer::new(BufWriter(buffer.clone()), redactor);
        assert_eq!(layer.redactor().mask(), "<hidden>");

        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(password = "hunter2", "login");
        });

        let output = buffer.lock().unwrap();
        let line: Value = serde_json::from_str(String::from_utf8_lossy(&output).trim()).unwrap();
        assert_eq!(line["fields"]["password"], "<hidden>");
    }
}
