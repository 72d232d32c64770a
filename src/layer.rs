use crate::level::Severity;
use crate::logger::Logger;
use crate::record::{Fields, SourceLocation};
use serde_json::Value;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// `tracing_subscriber` layer that forwards events to a [`Logger`].
///
/// Event fields become record fields, the `message` field becomes the
/// record message, and the event's module path and line become the
/// source location. The logger's minimum severity applies, so events
/// below the threshold are dropped before any field is visited.
pub struct StructuredLogLayer {
    logger: Logger,
}

impl StructuredLogLayer {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }
}

impl<S> Layer<S> for StructuredLogLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        let severity = Severity::from(meta.level());
        if !self.logger.enabled(severity) {
            return;
        }

        let mut fields = Fields::new();
        let mut message: Option<String> = None;
        event.record(&mut FieldVisitor {
            fields: &mut fields,
            message: &mut message,
        });

        let location = SourceLocation {
            module: meta.module_path().map(|s| s.to_string()),
            function: None,
            line: meta.line(),
        };

        self.logger
            .log_at(severity, message.as_deref().unwrap_or_default(), fields, location);
    }
}

/// Collects `tracing` event fields as JSON values.
pub struct FieldVisitor<'a> {
    pub fields: &'a mut Fields,
    pub message: &'a mut Option<String>,
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.fields.insert_value(field.name(), Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.insert_value(field.name(), Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert_value(field.name(), Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.fields.insert_value(field.name(), Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.insert_value(field.name(), Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let text = format!("{:?}", value);
        if field.name() == "message" {
            *self.message = Some(text);
        } else {
            self.fields.insert_value(field.name(), Value::String(text));
        }
    }
}
