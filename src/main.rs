//! AWS Lambda entry point for the example request handler.

use std::time::{SystemTime, UNIX_EPOCH};

use lambda_json_log::config::HandlerSettings;
use lambda_json_log::handler::{self, response::Response, InvocationContext};
use lambda_json_log::init;
use lambda_runtime::{service_fn, Context, Error, LambdaEvent};
use serde_json::Value;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    init::init_tracing();

    let settings = HandlerSettings::from_env();
    info!(
        environment = %settings.environment,
        log_level = %settings.log_level,
        timeout_seconds = settings.timeout_seconds,
        "handler runtime starting"
    );

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let settings = settings.clone();
        async move { function_handler(event, &settings) }
    }))
    .await
}

fn function_handler(event: LambdaEvent<Value>, settings: &HandlerSettings) -> Result<Response, Error> {
    let context = invocation_context(&event.context);
    Ok(handler::handle(init::logger(), settings, &event.payload, &context))
}

fn invocation_context(context: &Context) -> InvocationContext {
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    InvocationContext {
        function_name: context.env_config.function_name.clone(),
        memory_limit_mb: u32::try_from(context.env_config.memory).unwrap_or(0),
        request_id: context.request_id.clone(),
        remaining_time_ms: context.deadline.saturating_sub(now_ms),
    }
}
