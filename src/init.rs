use crate::config::LoggerConfig;
use crate::layer::StructuredLogLayer;
use crate::logger::Logger;
use crate::sink;
use std::sync::{Once, OnceLock};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

static LOGGER: OnceLock<Logger> = OnceLock::new();
static TRACING: Once = Once::new();

/// Install the process-wide logger.
///
/// **Parameters**
/// - `config`: [`LoggerConfig`] used for every record emitted through
///   [`logger`] and the `tracing` bridge.
///
/// **Returns**
/// - The installed logger. Only the first call takes effect; later calls
///   return the logger that is already installed and drop `config`, so
///   a record is never written twice.
pub fn init_logger(config: LoggerConfig) -> &'static Logger {
    LOGGER.get_or_init(|| Logger::new(config))
}

/// The process-wide logger, configured from the environment on first use
/// when [`init_logger`] has not been called.
pub fn logger() -> &'static Logger {
    LOGGER.get_or_init(|| Logger::new(LoggerConfig::from_env()))
}

pub fn is_initialized() -> bool {
    LOGGER.get().is_some()
}

/// Route `tracing` events through the process-wide logger.
///
/// **Effects**
///
/// Installs a [`Registry`] combined with [`StructuredLogLayer`] as the
/// global default subscriber, so `tracing::info!(trace_id = .., "..")`
/// produces the same JSON lines as [`Logger::info`]. Repeated calls are
/// no-ops. If another subscriber was installed first it is left alone.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let layer = StructuredLogLayer::new(logger().clone());
        let subscriber = Registry::default().with(layer);
        if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
            sink::report_to_stderr(format_args!("tracing subscriber already installed: {}", e));
        }
    });
}
