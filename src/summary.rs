use crate::level::Severity;
use crate::logger::Logger;
use crate::record::{Fields, SourceLocation};
use serde::Serialize;
use serde_json::Value;
use std::panic::Location;

/// Keys that mark a payload as carrying credentials (compared case-insensitively).
pub const SENSITIVE_KEYS: [&str; 3] = ["password", "token", "secret"];

/// Shape of a payload, logged instead of the payload itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataSummary {
    pub trace_id: String,
    pub operation: String,
    pub data_keys: Vec<String>,
    pub data_size: usize,
    pub has_sensitive_data: bool,
}

impl DataSummary {
    pub fn to_fields(&self) -> Fields {
        Fields::new()
            .with("trace_id", &self.trace_id)
            .with("operation", &self.operation)
            .with("data_keys", &self.data_keys)
            .with("data_size", self.data_size)
            .with("has_sensitive_data", self.has_sensitive_data)
    }
}

/// Summarize `data`. Anything other than an object is first wrapped as
/// `{"raw_data": <text>}`. `data_size` is the length of the compact JSON
/// encoding in bytes.
pub fn summarize(data: &Value, trace_id: &str, operation: &str) -> DataSummary {
    let wrapped;
    let object = match data {
        Value::Object(map) => map,
        other => {
            let text = match other {
                Value::String(s) => s.clone(),
                v => v.to_string(),
            };
            wrapped = serde_json::Map::from_iter([("raw_data".to_string(), Value::String(text))]);
            &wrapped
        }
    };

    let data_keys: Vec<String> = object.keys().cloned().collect();
    let has_sensitive_data = data_keys
        .iter()
        .any(|key| SENSITIVE_KEYS.iter().any(|s| key.eq_ignore_ascii_case(s)));
    let data_size = serde_json::to_string(object).map(|s| s.len()).unwrap_or(0);

    DataSummary {
        trace_id: trace_id.to_string(),
        operation: operation.to_string(),
        data_keys,
        data_size,
        has_sensitive_data,
    }
}

impl Logger {
    /// Log a DEBUG "Data processing summary" for `data` and return the summary.
    #[track_caller]
    pub fn log_data_summary(&self, data: &Value, trace_id: &str, operation: &str) -> DataSummary {
        let caller = Location::caller();
        let summary = summarize(data, trace_id, operation);
        self.log_at(
            Severity::Debug,
            "Data processing summary",
            summary.to_fields(),
            SourceLocation::from_caller(caller),
        );
        summary
    }
}
