use std::sync::Arc;

use lambda_json_log::config::HandlerSettings;
use lambda_json_log::handler::{self, InvocationContext};
use lambda_json_log::sink::MemorySink;
use lambda_json_log::{Logger, LoggerConfig, Severity};
use serde_json::json;

fn context() -> InvocationContext {
    InvocationContext {
        function_name: "test-function".to_string(),
        memory_limit_mb: 256,
        request_id: "test-request-id".to_string(),
        remaining_time_ms: 30_000,
    }
}

fn logger(minimum: Severity) -> (Logger, MemorySink) {
    let sink = MemorySink::new();
    let config = LoggerConfig::default()
        .with_minimum_severity(minimum)
        .with_service_name("svc")
        .with_environment("test")
        .with_destination(Arc::new(sink.clone()));
    (Logger::new(config), sink)
}

#[test]
fn trace_id_matches_across_logs_header_and_body() {
    let (logger, sink) = logger(Severity::Debug);
    let event = json!({"httpMethod": "POST", "path": "/orders", "body": "{\"id\": 7}"});
    let response = handler::handle(&logger, &HandlerSettings::default(), &event, &context());

    assert_eq!(response.status_code, 200);
    let trace_id = response.trace_id().unwrap().to_string();
    assert_eq!(trace_id.len(), 8);
    let body = response.body_json().unwrap();
    assert_eq!(body["trace_id"], json!(trace_id));
    assert_eq!(body["data"], json!({"id": 7}));

    let records = sink.records();
    let messages: Vec<_> = records.iter().map(|r| r["message"].as_str().unwrap().to_string()).collect();
    assert_eq!(
        messages,
        vec![
            "Lambda execution started",
            "Data processing summary",
            "Function executed successfully",
            "Lambda execution completed successfully",
        ]
    );
    for record in &records {
        assert_eq!(record["trace_id"], json!(trace_id));
    }

    let started = &records[0];
    assert_eq!(started["method"], json!("POST"));
    assert_eq!(started["path"], json!("/orders"));
    assert_eq!(started["request_id"], json!("test-request-id"));
    assert_eq!(started["memory_limit_mb"], json!(256));
    assert_eq!(started["function_name"], json!("test-function"));

    let completed = &records[3];
    assert_eq!(completed["status"], json!("success"));
    assert!(completed["response_size_bytes"].as_u64().unwrap() > 0);
}

#[test]
fn malformed_body_is_logged_and_request_succeeds() {
    let (logger, sink) = logger(Severity::Info);
    let event = json!({"httpMethod": "POST", "body": "{broken"});
    let response = handler::handle_with_trace_id(&logger, &HandlerSettings::default(), &event, &context(), "feedbeef");

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body_json().unwrap()["data"], json!({}));

    let warning = sink
        .records()
        .into_iter()
        .find(|r| r["level"] == json!("WARNING"))
        .unwrap();
    assert_eq!(warning["message"], json!("Failed to parse request body"));
    assert_eq!(warning["trace_id"], json!("feedbeef"));
}

#[test]
fn empty_event_returns_400_and_logs_failure_timing() {
    let (logger, sink) = logger(Severity::Info);
    let response = handler::handle_with_trace_id(&logger, &HandlerSettings::default(), &json!({}), &context(), "t-400");

    assert_eq!(response.status_code, 400);
    assert_eq!(response.trace_id(), Some("t-400"));
    assert_eq!(
        response.body_json().unwrap(),
        json!({"error": "Event cannot be empty", "trace_id": "t-400"})
    );

    let records = sink.records();
    let timing = records
        .iter()
        .find(|r| r["message"] == json!("Function execution failed"))
        .unwrap();
    assert_eq!(timing["status"], json!("error"));
    assert_eq!(timing["error"], json!("Event cannot be empty"));
    assert!(records.iter().all(|r| r["trace_id"] == json!("t-400")));
}

#[test]
fn environment_setting_is_echoed() {
    let (logger, _sink) = logger(Severity::Info);
    let settings = HandlerSettings {
        environment: "production".to_string(),
        ..HandlerSettings::default()
    };
    let response = handler::handle(&logger, &settings, &json!({"body": {}}), &context());
    assert_eq!(response.body_json().unwrap()["environment"], json!("production"));
}
