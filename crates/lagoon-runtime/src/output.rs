//! Output sinks behind `println` / `print`.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// Line-oriented destination for printed values. The runtime neither
/// buffers nor flushes on the sink's behalf.
pub trait OutputSink: Send + Sync {
    fn write_line(&self, line: &str) -> io::Result<()>;
}

impl<T: OutputSink + ?Sized> OutputSink for Arc<T> {
    fn write_line(&self, line: &str) -> io::Result<()> {
        (**self).write_line(line)
    }
}

/// Process standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{}", line)
    }
}

/// Keeps every line in memory.
#[derive(Debug, Default)]
pub struct BufferSink {
    lines: Mutex<Vec<String>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drain and return the captured lines.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl OutputSink for BufferSink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
        Ok(())
    }
}
