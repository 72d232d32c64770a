//! Environment variable names and typed lookup helpers.
//!
//! Configuration is read from the process environment once at startup.
//! The lookup helpers never fail: a missing or unparsable value yields
//! the supplied default.

/// Minimum log level name, e.g. `INFO` or `debug`.
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

/// Function name set by the Lambda runtime; used as the service name.
pub const SERVICE_NAME_ENV: &str = "AWS_LAMBDA_FUNCTION_NAME";

/// Deployment environment name, e.g. `production`.
pub const ENVIRONMENT_ENV: &str = "ENVIRONMENT";

/// Handler timeout budget in seconds.
pub const TIMEOUT_SECONDS_ENV: &str = "TIMEOUT_SECONDS";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read a boolean flag. See [`parse_bool`] for accepted spellings.
///
/// None of the built-in settings is boolean; this is the lookup for
/// feature flags a handler defines on top of [`HandlerSettings`], next
/// to [`env_or`] and [`env_int`].
///
/// [`HandlerSettings`]: crate::config::HandlerSettings
pub fn env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(value) => parse_bool(&value),
        Err(_) => default,
    }
}

/// Read an integer, falling back to `default` when unset or invalid.
pub fn env_int(key: &str, default: i64) -> i64 {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

/// `true`, `t`, `yes`, `y` and `1` (any case) are true; everything else is false.
pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "t" | "yes" | "y" | "1"
    )
}
