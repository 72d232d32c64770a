use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use lambda_json_log::handler::{self, InvocationContext};
use lambda_json_log::sink::{LogSink, SinkError, StdoutSink};
use lambda_json_log::config::HandlerSettings;
use lambda_json_log::{Logger, LoggerConfig, Severity};
use serde_json::json;

/// Example of plugging in a custom destination by implementing the
/// `LogSink` trait directly. This one counts lines and forwards them to
/// stdout.
#[derive(Default)]
struct CountingSink {
    lines: AtomicU64,
}

impl LogSink for CountingSink {
    fn write_line(&self, line: &str) -> Result<(), SinkError> {
        self.lines.fetch_add(1, Ordering::Relaxed);
        StdoutSink.write_line(line)
    }
}

fn main() {
    let sink = Arc::new(CountingSink::default());
    let config = LoggerConfig::from_env()
        .with_minimum_severity(Severity::Debug)
        .with_destination(sink.clone());
    let logger = Logger::new(config);

    let context = InvocationContext {
        function_name: "custom-sink-example".to_string(),
        memory_limit_mb: 128,
        request_id: "local-request".to_string(),
        remaining_time_ms: 3_000,
    };
    let event = json!({"httpMethod": "POST", "path": "/echo", "body": "{\"name\": \"test\"}"});

    let response = handler::handle(&logger, &HandlerSettings::from_env(), &event, &context);

    println!("status {} trace {:?}", response.status_code, response.trace_id());
    println!("{} log lines written", sink.lines.load(Ordering::Relaxed));
}
