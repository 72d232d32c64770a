use crate::env::{self, ENVIRONMENT_ENV, LOG_LEVEL_ENV, SERVICE_NAME_ENV, TIMEOUT_SECONDS_ENV};
use crate::level::Severity;
use crate::sink::{LogSink, StderrSink, StdoutSink};
use std::fmt;
use std::sync::Arc;

/// Service name used when `AWS_LAMBDA_FUNCTION_NAME` is unset.
pub const DEFAULT_SERVICE_NAME: &str = "lambda-service";

/// Environment name used when `ENVIRONMENT` is unset.
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Process-wide logger configuration.
///
/// Built once at startup and treated as read-only afterwards.
///
/// **Fields**
/// - `minimum_severity`: records below this level are dropped before
///   they are built.
/// - `service_name`, `environment`: injected into every record as the
///   `service` and `environment` fields.
/// - `destination`: where rendered lines are written.
/// - `fallback`: receives a line when writing to `destination` fails.
#[derive(Clone)]
pub struct LoggerConfig {
    pub minimum_severity: Severity,
    pub service_name: String,
    pub environment: String,
    pub destination: Arc<dyn LogSink>,
    pub fallback: Arc<dyn LogSink>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            minimum_severity: Severity::Info,
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
            destination: Arc::new(StdoutSink),
            fallback: Arc::new(StderrSink),
        }
    }
}

impl fmt::Debug for LoggerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerConfig")
            .field("minimum_severity", &self.minimum_severity)
            .field("service_name", &self.service_name)
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}

impl LoggerConfig {
    /// Read `LOG_LEVEL`, `AWS_LAMBDA_FUNCTION_NAME` and `ENVIRONMENT`.
    ///
    /// An unrecognized level name falls back to `INFO`; configuration
    /// problems must not prevent the function from starting.
    pub fn from_env() -> Self {
        let minimum_severity = std::env::var(LOG_LEVEL_ENV)
            .ok()
            .and_then(|name| name.parse().ok())
            .unwrap_or_default();

        Self {
            minimum_severity,
            service_name: env::env_or(SERVICE_NAME_ENV, DEFAULT_SERVICE_NAME),
            environment: env::env_or(ENVIRONMENT_ENV, DEFAULT_ENVIRONMENT),
            ..Self::default()
        }
    }

    pub fn with_minimum_severity(mut self, severity: Severity) -> Self {
        self.minimum_severity = severity;
        self
    }

    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = service_name.into();
        self
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    pub fn with_destination(mut self, destination: Arc<dyn LogSink>) -> Self {
        self.destination = destination;
        self
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn LogSink>) -> Self {
        self.fallback = fallback;
        self
    }
}

/// Settings read by the request handler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandlerSettings {
    pub environment: String,
    pub log_level: String,
    pub timeout_seconds: i64,
}

impl Default for HandlerSettings {
    fn default() -> Self {
        Self {
            environment: DEFAULT_ENVIRONMENT.to_string(),
            log_level: Severity::Info.as_str().to_string(),
            timeout_seconds: 30,
        }
    }
}

impl HandlerSettings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            environment: env::env_or(ENVIRONMENT_ENV, &defaults.environment),
            log_level: env::env_or(LOG_LEVEL_ENV, &defaults.log_level),
            timeout_seconds: env::env_int(TIMEOUT_SECONDS_ENV, defaults.timeout_seconds),
        }
    }
}
