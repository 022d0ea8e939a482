//! Tracing setup and a diagnostics layer for session events.
//!
//! [`DiagnosticsLayer`] captures tracing events (including the fields of
//! enclosing spans such as `sms_session{session_id}`) and forwards them over a
//! channel, so operator tooling can watch dispatch failures and skipped
//! messages without scraping log output.

use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::span::{Attributes, Id};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Event data forwarded to diagnostics consumers
#[derive(Debug, Clone, serde::Serialize)]
pub struct DiagnosticEvent {
    /// Event target (e.g., "sms_execution::actor")
    pub target: String,
    /// Log level (INFO, DEBUG, WARN, ERROR)
    pub level: String,
    /// Human-readable message
    pub message: String,
    /// Structured fields from the event
    pub fields: HashMap<String, Value>,
    /// Fields of the enclosing spans, outermost first (e.g., session_id)
    pub span: HashMap<String, Value>,
    /// Timestamp
    pub timestamp: String,
}

impl DiagnosticEvent {
    /// Looks a field up on the event first, then on its spans.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name).or_else(|| self.span.get(name))
    }
}

/// Span fields stored in the registry's span extensions.
struct SpanFields(HashMap<String, Value>);

/// A tracing layer that sends every event it sees to a channel
pub struct DiagnosticsLayer {
    sender: mpsc::UnboundedSender<DiagnosticEvent>,
}

impl DiagnosticsLayer {
    /// Create a new layer with the given channel sender
    pub fn new(sender: mpsc::UnboundedSender<DiagnosticEvent>) -> Self {
        Self { sender }
    }

    /// Create a layer together with the receiving end of its channel
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<DiagnosticEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

impl<S> Layer<S> for DiagnosticsLayer
where
    S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let mut fields = HashMap::new();
        attrs.record(&mut FieldVisitor(&mut fields));
        if let Some(span) = ctx.span(id) {
            span.extensions_mut().insert(SpanFields(fields));
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let mut fields = HashMap::new();
        let mut visitor = FieldVisitor(&mut fields);
        event.record(&mut visitor);

        let mut span_fields = HashMap::new();
        if let Some(scope) = ctx.event_scope(event) {
            for span in scope.from_root() {
                if let Some(stored) = span.extensions().get::<SpanFields>() {
                    span_fields.extend(stored.0.iter().map(|(k, v)| (k.clone(), v.clone())));
                }
            }
        }

        let diagnostic = DiagnosticEvent {
            target: event.metadata().target().to_string(),
            level: event.metadata().level().to_string(),
            message: fields
                .get("message")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            fields,
            span: span_fields,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        // Non-blocking send - if the receiver is dropped, we just skip
        let _ = self.sender.send(diagnostic);
    }
}

/// Field visitor that extracts tracing fields into a HashMap
struct FieldVisitor<'a>(&'a mut HashMap<String, Value>);

impl<'a> tracing::field::Visit for FieldVisitor<'a> {
    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.0
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.insert(
            field.name().to_string(),
            serde_json::json!(format!("{:?}", value)),
        );
    }
}

/// Installs the global subscriber: an `EnvFilter` read from `RUST_LOG`
/// (falling back to `default_directive`), a fmt layer, and optionally a
/// diagnostics layer.
///
/// Returns false if a global subscriber was already installed.
pub fn init_tracing(default_directive: &str, diagnostics: Option<DiagnosticsLayer>) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(diagnostics)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::registry;

    #[test]
    fn captures_event_and_span_fields() {
        let (layer, mut rx) = DiagnosticsLayer::channel();
        let subscriber = registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            let span = tracing::info_span!("sms_session", session_id = "abc");
            let _entered = span.enter();
            tracing::error!(error = "gateway down", "Failed to dispatch outbound message");
        });

        let event = rx.try_recv().unwrap();
        assert_eq!(event.level, "ERROR");
        assert_eq!(event.message, "Failed to dispatch outbound message");
        assert_eq!(event.field("error"), Some(&Value::from("gateway down")));
        assert_eq!(event.field("session_id"), Some(&Value::from("abc")));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn init_tracing_installs_global_subscriber_once() {
        let (layer, _rx) = DiagnosticsLayer::channel();
        init_tracing("sms_execution=debug", Some(layer));
        assert!(!init_tracing("warn", None));
    }

    #[test]
    fn dropped_receiver_does_not_panic() {
        let (layer, rx) = DiagnosticsLayer::channel();
        drop(rx);

        tracing::subscriber::with_default(registry().with(layer), || {
            tracing::warn!("nobody is listening");
        });
    }
}
