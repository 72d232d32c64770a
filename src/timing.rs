//! Scoped timing of an operation, reported as one log record.

use crate::level::Severity;
use crate::logger::Logger;
use crate::record::{Fields, SourceLocation};
use std::fmt;
use std::panic::Location;
use std::time::Instant;

enum Outcome {
    Success,
    Failure(Option<String>),
}

/// Measures an operation from creation until drop.
///
/// Exactly one record is emitted when the guard goes away:
/// - after [`TimingGuard::finish_ok`]: INFO "Function executed successfully";
/// - after [`TimingGuard::finish_err`], or when dropped without finishing
///   (early return, unwinding panic): ERROR "Function execution failed".
///
/// Both carry `trace_id`, `function_name`, `duration_ms` and `status`.
#[must_use = "the operation is timed until the guard is dropped"]
pub struct TimingGuard<'a> {
    logger: &'a Logger,
    operation: String,
    trace_id: String,
    start: Instant,
    caller: &'static Location<'static>,
    outcome: Option<Outcome>,
}

impl Logger {
    /// Start timing `operation` for the request identified by `trace_id`.
    #[track_caller]
    pub fn time(&self, operation: impl Into<String>, trace_id: impl Into<String>) -> TimingGuard<'_> {
        TimingGuard {
            logger: self,
            operation: operation.into(),
            trace_id: trace_id.into(),
            start: Instant::now(),
            caller: Location::caller(),
            outcome: None,
        }
    }
}

impl<'a> TimingGuard<'a> {
    /// Milliseconds since the guard was created, rounded to two decimals.
    pub fn elapsed_ms(&self) -> f64 {
        round_ms(self.start.elapsed().as_secs_f64() * 1000.0)
    }

    pub fn finish_ok(mut self) {
        self.outcome = Some(Outcome::Success);
    }

    pub fn finish_err(mut self, error: &dyn fmt::Display) {
        self.outcome = Some(Outcome::Failure(Some(error.to_string())));
    }
}

impl Drop for TimingGuard<'_> {
    fn drop(&mut self) {
        let outcome = self.outcome.take().unwrap_or_else(|| {
            if std::thread::panicking() {
                Outcome::Failure(Some("panicked".to_string()))
            } else {
                Outcome::Failure(None)
            }
        });

        let fields = Fields::new()
            .with("trace_id", &self.trace_id)
            .with("function_name", &self.operation)
            .with("duration_ms", self.elapsed_ms());
        let location = SourceLocation::from_caller(self.caller).with_function(self.operation.clone());

        match outcome {
            Outcome::Success => self.logger.log_at(
                Severity::Info,
                "Function executed successfully",
                fields.with("status", "success"),
                location,
            ),
            Outcome::Failure(error) => {
                let mut fields = fields.with("status", "error");
                if let Some(error) = error {
                    fields.insert("error", &error);
                }
                self.logger
                    .log_at(Severity::Error, "Function execution failed", fields, location);
            }
        }
    }
}

/// Run `f` under a [`TimingGuard`] and return its result unchanged.
#[track_caller]
pub fn timed<T, E, F>(logger: &Logger, operation: &str, trace_id: &str, f: F) -> Result<T, E>
where
    E: fmt::Display,
    F: FnOnce() -> Result<T, E>,
{
    let guard = logger.time(operation, trace_id);
    let result = f();
    match &result {
        Ok(_) => guard.finish_ok(),
        Err(e) => guard.finish_err(e),
    }
    result
}

fn round_ms(ms: f64) -> f64 {
    (ms * 100.0).round() / 100.0
}
