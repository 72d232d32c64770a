//! HTTP-style response envelope returned by the handler.

use crate::handler::error::HandlerError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Header carrying the request's trace id.
pub const TRACE_ID_HEADER: &str = "X-Trace-ID";

/// API Gateway proxy response.
///
/// # Example
///
/// ```
/// use lambda_json_log::handler::response::Response;
/// use serde_json::json;
///
/// let response = Response::new(200, json!({"message": "Success!"}), Some("abcd1234"));
/// assert_eq!(response.trace_id(), Some("abcd1234"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    /// JSON-encoded payload.
    pub body: String,
}

impl Response {
    /// Build a response. When `trace_id` is given and `data` is an object,
    /// `trace_id` is also inserted into the body. The header falls back to
    /// `unknown` without a trace id.
    pub fn new(status_code: u16, mut data: Value, trace_id: Option<&str>) -> Self {
        if let (Some(id), Value::Object(map)) = (trace_id, &mut data) {
            map.insert("trace_id".to_string(), Value::String(id.to_string()));
        }

        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Access-Control-Allow-Origin".to_string(), "*".to_string());
        headers.insert(
            TRACE_ID_HEADER.to_string(),
            trace_id.unwrap_or("unknown").to_string(),
        );

        Self {
            status_code,
            headers,
            body: serde_json::to_string(&data).unwrap_or_else(|_| "{}".to_string()),
        }
    }

    pub fn ok(data: Value, trace_id: &str) -> Self {
        Self::new(200, data, Some(trace_id))
    }

    pub fn from_error(error: &HandlerError, trace_id: &str) -> Self {
        Self::new(error.status_code(), error.client_body(), Some(trace_id))
    }

    pub fn trace_id(&self) -> Option<&str> {
        self.headers.get(TRACE_ID_HEADER).map(String::as_str)
    }

    pub fn body_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}
