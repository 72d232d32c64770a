use crate::sink::{LogSink, SinkError};

/// A sink that simply drops all lines.
///
/// Useful for measuring the overhead of record building and rendering
/// without any I/O, and as a fallback when nothing should reach stderr.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl LogSink for NoopSink {
    fn write_line(&self, _line: &str) -> Result<(), SinkError> {
        Ok(())
    }
}
