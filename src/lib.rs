pub mod level;
pub mod record;
pub mod sink;
pub mod noop_sink;
pub mod env;
pub mod config;
pub mod logger;
pub mod layer;
pub mod init;
pub mod timing;
pub mod summary;
pub mod handler;

pub use config::LoggerConfig;
pub use level::Severity;
pub use logger::Logger;
pub use record::Fields;
