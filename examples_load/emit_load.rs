use std::sync::Arc;
use std::time::Instant;

use lambda_json_log::noop_sink::NoopSink;
use lambda_json_log::{Fields, Logger, LoggerConfig, Severity};

fn main() {
    let config = LoggerConfig::default()
        .with_minimum_severity(Severity::Info)
        .with_destination(Arc::new(NoopSink));
    let logger = Logger::new(config);

    let n: u64 = 100_000;

    let start = Instant::now();
    for i in 0..n {
        logger.info("load test record", Fields::new().with("trace_id", "abcd1234").with("iteration", i));
    }
    let emitted = start.elapsed();

    let start = Instant::now();
    for i in 0..n {
        logger.debug("filtered record", Fields::new().with("iteration", i));
    }
    let filtered = start.elapsed();

    println!("emitted {} records in {:?} (~{:.0} rec/s)",
        n,
        emitted,
        n as f64 / emitted.as_secs_f64()
    );
    println!("filtered {} records in {:?} (~{:.0} rec/s)",
        n,
        filtered,
        n as f64 / filtered.as_secs_f64()
    );
}
