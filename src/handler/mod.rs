//! Request handling for an API Gateway style event.
//!
//! Every invocation gets a short trace id. The same id is attached to
//! every log line, returned in the `X-Trace-ID` header and inserted into
//! the response body, so a response can be matched to its logs.

pub mod error;
pub mod response;

use crate::config::HandlerSettings;
use crate::logger::Logger;
use crate::record::Fields;
use crate::timing;
use error::HandlerError;
use response::Response;
use serde_json::{json, Value};

/// Facts about the current invocation supplied by the runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationContext {
    pub function_name: String,
    pub memory_limit_mb: u32,
    pub request_id: String,
    pub remaining_time_ms: u64,
}

/// First 8 characters of a random v4 UUID.
pub fn new_trace_id() -> String {
    let mut id = uuid::Uuid::new_v4().to_string();
    id.truncate(8);
    id
}

/// Handle one event with a freshly generated trace id.
pub fn handle(logger: &Logger, settings: &HandlerSettings, event: &Value, context: &InvocationContext) -> Response {
    handle_with_trace_id(logger, settings, event, context, &new_trace_id())
}

/// Handle one event, never failing: errors become 4xx/5xx responses.
pub fn handle_with_trace_id(
    logger: &Logger,
    settings: &HandlerSettings,
    event: &Value,
    context: &InvocationContext,
    trace_id: &str,
) -> Response {
    logger.info(
        "Lambda execution started",
        Fields::new()
            .with("trace_id", trace_id)
            .with("function_name", &context.function_name)
            .with("remaining_time_ms", context.remaining_time_ms)
            .with("memory_limit_mb", context.memory_limit_mb)
            .with("request_id", &context.request_id)
            .with("method", event.get("httpMethod"))
            .with("path", event.get("path")),
    );

    let result = timing::timed(logger, "process_request", trace_id, || {
        process_request(logger, settings, event, trace_id)
    });

    match result {
        Ok(data) => {
            let response_size_bytes = serde_json::to_string(&data).map(|s| s.len()).unwrap_or(0);
            logger.info(
                "Lambda execution completed successfully",
                Fields::new()
                    .with("trace_id", trace_id)
                    .with("status", "success")
                    .with("response_size_bytes", response_size_bytes),
            );
            Response::ok(data, trace_id)
        }
        Err(err) => {
            let message = if err.is_client_error() {
                "Lambda request rejected"
            } else {
                "Lambda execution failed"
            };
            logger.log(err.severity(), message, failure_fields(&err, trace_id));
            Response::from_error(&err, trace_id)
        }
    }
}

/// Fields logged when a request fails.
///
/// The response body hides server-side details, so the log line carries
/// all of them: for an upstream failure the upstream service and the status
/// it answered with.
fn failure_fields(err: &HandlerError, trace_id: &str) -> Fields {
    let mut fields = Fields::new()
        .with("trace_id", trace_id)
        .with("status_code", err.status_code())
        .with("error_type", err.kind())
        .with_display("error_message", err);
    if let HandlerError::ExternalService {
        service, status_code, ..
    } = err
    {
        fields.insert("upstream_service", service);
        fields.insert("upstream_status_code", status_code);
    }
    fields
}

/// The business step: validate the event and echo its body.
///
/// An empty event (see [`is_empty_event`]) is rejected as a validation
/// error.
pub fn process_request(
    logger: &Logger,
    settings: &HandlerSettings,
    event: &Value,
    trace_id: &str,
) -> Result<Value, HandlerError> {
    if is_empty_event(event) {
        return Err(HandlerError::validation("Event cannot be empty"));
    }

    logger.log_data_summary(event, trace_id, "input_validation");
    let body = decode_body(logger, event.get("body"), trace_id);

    Ok(json!({
        "message": "Success!",
        "data": body,
        "environment": settings.environment,
        "trace_id": trace_id,
    }))
}

/// Null, `false`, zero, `""`, `[]` and `{}` carry no request.
fn is_empty_event(event: &Value) -> bool {
    match event {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Decode the event `body`.
///
/// A string body is parsed as JSON. When parsing fails the body is
/// treated as `{}` and a warning is logged; the request still succeeds.
/// A missing or null body is `{}`; any other JSON value is used as is.
pub fn decode_body(logger: &Logger, body: Option<&Value>, trace_id: &str) -> Value {
    match body {
        None | Some(Value::Null) => json!({}),
        Some(Value::String(raw)) if raw.trim().is_empty() => json!({}),
        Some(Value::String(raw)) => match serde_json::from_str(raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                logger.warning(
                    "Failed to parse request body",
                    Fields::new()
                        .with("trace_id", trace_id)
                        .with_display("error", e)
                        .with("body_length", raw.len()),
                );
                json!({})
            }
        },
        Some(other) => other.clone(),
    }
}
