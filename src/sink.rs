use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Error produced when a sink cannot accept a line.
#[derive(thiserror::Error, Debug)]
pub enum SinkError {
    #[error("failed to write log line: {0}")]
    Io(#[from] io::Error),
}

/// Synchronous destination for rendered log lines.
///
/// Implementations must write each line (plus its trailing newline) as
/// one operation so that concurrent callers never interleave bytes
/// within a line. The logger calls `write_line` inline on the calling
/// thread and never surfaces its errors to application code.
pub trait LogSink: Send + Sync {
    /// Write a single rendered line. `line` carries no trailing newline.
    ///
    /// **Returns**
    /// - `Ok(())` once the full line and its newline were written.
    /// - `Err(..)` if the underlying stream rejected the write. The
    ///   logger swallows this and retries once on its fallback sink.
    fn write_line(&self, line: &str) -> Result<(), SinkError>;

    /// Flush any buffered output. Default implementation is a no-op.
    fn flush(&self) -> Result<(), SinkError> {
        Ok(())
    }
}

fn terminated(line: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(line.len() + 1);
    buf.extend_from_slice(line.as_bytes());
    buf.push(b'\n');
    buf
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panic while holding the lock leaves a writer that is still usable.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Report a problem with the logging machinery itself on `out`.
///
/// Unlike `eprintln!` this never panics: a report that `out` rejects is
/// dropped.
pub(crate) fn report<W: Write>(out: &mut W, args: fmt::Arguments<'_>) {
    if out.write_fmt(args).is_ok() {
        let _ = out.write_all(b"\n");
    }
}

/// [`report`] on the process standard error.
pub(crate) fn report_to_stderr(args: fmt::Arguments<'_>) {
    report(&mut io::stderr().lock(), args);
}

/// Writes to the process standard output. The default destination.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn write_line(&self, line: &str) -> Result<(), SinkError> {
        let mut out = io::stdout().lock();
        out.write_all(&terminated(line))?;
        out.flush()?;
        Ok(())
    }
}

/// Writes to the process standard error. The default fallback.
#[derive(Clone, Copy, Debug, Default)]
pub struct StderrSink;

impl LogSink for StderrSink {
    fn write_line(&self, line: &str) -> Result<(), SinkError> {
        let mut err = io::stderr().lock();
        err.write_all(&terminated(line))?;
        Ok(())
    }
}

/// Adapts any [`Write`] implementation, serializing writes with a mutex.
pub struct WriterSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> LogSink for WriterSink<W> {
    fn write_line(&self, line: &str) -> Result<(), SinkError> {
        lock(&self.writer).write_all(&terminated(line))?;
        Ok(())
    }

    fn flush(&self) -> Result<(), SinkError> {
        lock(&self.writer).flush()?;
        Ok(())
    }
}

/// In-memory buffer of emitted lines. Clones share the same buffer, so a
/// test can hand one clone to the logger and inspect the other.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, as UTF-8 text.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&lock(&self.buffer)).into_owned()
    }

    /// Written lines without their trailing newlines.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    /// Written lines parsed as JSON. Lines that fail to parse are skipped.
    pub fn records(&self) -> Vec<serde_json::Value> {
        self.lines()
            .iter()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.buffer).is_empty()
    }

    pub fn clear(&self) {
        lock(&self.buffer).clear();
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, line: &str) -> Result<(), SinkError> {
        lock(&self.buffer).extend_from_slice(&terminated(line));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn memory_sink_appends_newline_per_line() {
        let sink = MemorySink::new();
        sink.write_line("{\"a\":1}").unwrap();
        sink.write_line("{\"b\":2}").unwrap();
        assert_eq!(sink.contents(), "{\"a\":1}\n{\"b\":2}\n");
        assert_eq!(sink.lines().len(), 2);
        assert_eq!(sink.records()[1]["b"], 2);
    }

    #[test]
    fn memory_sink_clones_share_buffer() {
        let sink = MemorySink::new();
        let handle = sink.clone();
        sink.write_line("x").unwrap();
        assert_eq!(handle.lines(), vec!["x".to_string()]);
        handle.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn writer_sink_writes_into_wrapped_writer() {
        let sink = WriterSink::new(Vec::new());
        sink.write_line("one").unwrap();
        sink.write_line("two").unwrap();
        sink.flush().unwrap();
        assert_eq!(sink.into_inner(), b"one\ntwo\n".to_vec());
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "reader closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "reader closed"))
        }
    }

    #[test]
    fn report_writes_one_line() {
        let mut out = Vec::new();
        report(&mut out, format_args!("sink {} failed", "stdout"));
        assert_eq!(out, b"sink stdout failed\n".to_vec());
    }

    #[test]
    fn report_on_closed_stream_does_not_panic() {
        report(&mut BrokenPipe, format_args!("nobody is listening"));
    }

    #[test]
    fn logger_threads_into_writer_sink_produce_whole_json_lines() {
        use crate::config::LoggerConfig;
        use crate::logger::Logger;
        use crate::record::Fields;

        let buffer = SharedBuffer::default();
        let config = LoggerConfig::default().with_destination(Arc::new(WriterSink::new(buffer.clone())));
        let logger = Logger::new(config);

        let threads: Vec<_> = (0..8)
            .map(|t| {
                let logger = logger.clone();
                thread::spawn(move || {
                    for i in 0..50 {
                        logger.info(
                            "concurrent record",
                            Fields::new()
                                .with("thread", t)
                                .with("iteration", i)
                                .with("padding", "x".repeat(256)),
                        );
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }

        let contents = String::from_utf8(lock(&buffer.0).clone()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 8 * 50);
        for line in lines {
            let record: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(record["message"], "concurrent record");
            assert_eq!(record["padding"].as_str().unwrap().len(), 256);
        }
    }

    /// Writer whose clones append to the same buffer.
    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            lock(&self.0).extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn concurrent_writes_do_not_interleave_within_a_line() {
        let sink = MemorySink::new();
        let threads: Vec<_> = (0..8)
            .map(|t| {
                let sink = sink.clone();
                thread::spawn(move || {
                    let line = format!("{}", t).repeat(512);
                    for _ in 0..50 {
                        sink.write_line(&line).unwrap();
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }

        let lines = sink.lines();
        assert_eq!(lines.len(), 8 * 50);
        for line in lines {
            let first = line.chars().next().unwrap();
            assert_eq!(line.len(), 512);
            assert!(line.chars().all(|c| c == first));
        }
    }
}
