use crate::config::LoggerConfig;
use crate::level::Severity;
use crate::record::{Fields, LogRecord, SourceLocation};
use crate::sink;
use chrono::Utc;
use std::io::{self, Write};
use std::panic::Location;
use std::sync::Arc;

/// Structured JSON line emitter.
///
/// Each call filters on the configured minimum severity, builds a
/// [`LogRecord`], renders it as one JSON object and writes it to the
/// configured destination. Logging never fails the caller: rendering
/// falls back to text for unserializable values and write errors are
/// swallowed after one attempt on the fallback sink.
///
/// `Logger` is cheap to clone; clones share the same configuration.
#[derive(Clone, Debug)]
pub struct Logger {
    config: Arc<LoggerConfig>,
}

impl Logger {
    pub fn new(config: LoggerConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// Whether a record at `severity` would be emitted.
    pub fn enabled(&self, severity: Severity) -> bool {
        severity >= self.config.minimum_severity
    }

    #[track_caller]
    pub fn debug(&self, message: &str, fields: Fields) {
        self.log_from(Severity::Debug, message, fields, Location::caller());
    }

    #[track_caller]
    pub fn info(&self, message: &str, fields: Fields) {
        self.log_from(Severity::Info, message, fields, Location::caller());
    }

    #[track_caller]
    pub fn warning(&self, message: &str, fields: Fields) {
        self.log_from(Severity::Warning, message, fields, Location::caller());
    }

    #[track_caller]
    pub fn error(&self, message: &str, fields: Fields) {
        self.log_from(Severity::Error, message, fields, Location::caller());
    }

    #[track_caller]
    pub fn critical(&self, message: &str, fields: Fields) {
        self.log_from(Severity::Critical, message, fields, Location::caller());
    }

    /// Log at a severity chosen at runtime.
    #[track_caller]
    pub fn log(&self, severity: Severity, message: &str, fields: Fields) {
        self.log_from(severity, message, fields, Location::caller());
    }

    fn log_from(&self, severity: Severity, message: &str, fields: Fields, caller: &Location<'_>) {
        if !self.enabled(severity) {
            return;
        }
        self.emit(severity, message, fields, SourceLocation::from_caller(caller));
    }

    /// Log with an explicit source location, e.g. one taken from
    /// `tracing` metadata instead of the Rust call site.
    pub fn log_at(&self, severity: Severity, message: &str, fields: Fields, location: SourceLocation) {
        if !self.enabled(severity) {
            return;
        }
        self.emit(severity, message, fields, location);
    }

    fn emit(&self, severity: Severity, message: &str, fields: Fields, location: SourceLocation) {
        let record = LogRecord {
            timestamp: Utc::now(),
            level: severity,
            message: message.to_string(),
            location,
            fields,
            service: self.config.service_name.clone(),
            environment: self.config.environment.clone(),
        };
        self.write(&record.to_json_line());
    }

    fn write(&self, line: &str) {
        self.write_reporting_to(line, &mut io::stderr().lock());
    }

    fn write_reporting_to<W: Write>(&self, line: &str, diagnostics: &mut W) {
        if let Err(e) = self.config.destination.write_line(line) {
            if let Err(fallback_err) = self.config.fallback.write_line(line) {
                sink::report(
                    diagnostics,
                    format_args!("log write failed ({}), fallback failed too: {}", e, fallback_err),
                );
            }
        }
    }
}
