use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use tracing::Level;

use crate::constants::LOG_BUFFER_LINES;

/// Bounded, shareable list of formatted log lines.
///
/// The demo keeps one so tracing output never lands on the terminal it is
/// drawing into; the last lines are shown in the status area.
#[derive(Clone, Debug)]
pub struct LogBuffer {
    inner: Arc<Mutex<LogLines>>,
}

#[derive(Debug)]
struct LogLines {
    lines: VecDeque<String>,
    max_lines: usize,
}

impl LogBuffer {
    pub fn new(max_lines: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(LogLines {
                lines: VecDeque::new(),
                max_lines: max_lines.max(1),
            })),
        }
    }

    pub fn push(&self, line: impl Into<String>) {
        if let Ok(mut buffer) = self.inner.lock() {
            buffer.lines.push_back(line.into());
            while buffer.lines.len() > buffer.max_lines {
                buffer.lines.pop_front();
            }
        }
    }

    /// Up to `count` most recent lines, oldest first.
    pub fn tail(&self, count: usize) -> Vec<String> {
        let Ok(buffer) = self.inner.lock() else {
            return Vec::new();
        };
        let skip = buffer.lines.len().saturating_sub(count);
        buffer.lines.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|buffer| buffer.lines.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn writer(&self) -> LogWriter {
        LogWriter {
            buffer: self.clone(),
            pending: Vec::new(),
        }
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(LOG_BUFFER_LINES)
    }
}

/// Splits written bytes into lines; a trailing partial line waits for the
/// next newline or an explicit flush.
#[derive(Debug)]
pub struct LogWriter {
    buffer: LogBuffer,
    pending: Vec<u8>,
}

impl LogWriter {
    fn flush_pending(&mut self, force: bool) {
        let end = if force {
            self.pending.len()
        } else {
            match self.pending.iter().rposition(|b| *b == b'\n') {
                Some(pos) => pos + 1,
                None => return,
            }
        };
        let drained: Vec<u8> = self.pending.drain(..end).collect();
        let text = String::from_utf8_lossy(&drained);
        for line in text.split('\n').filter(|line| !line.is_empty()) {
            self.buffer.push(line);
        }
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        self.flush_pending(false);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_pending(true);
        Ok(())
    }
}

impl Drop for LogWriter {
    fn drop(&mut self) {
        self.flush_pending(true);
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogBuffer {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.writer()
    }
}

/// Install a compact global subscriber writing into `buffer`. Later calls
/// are no-ops.
pub fn init_default(buffer: LogBuffer) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_writer(buffer)
        .with_target(false)
        .with_ansi(false)
        .with_thread_names(false)
        .without_time()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_drops_oldest_lines() {
        let buffer = LogBuffer::new(2);
        buffer.push("one");
        buffer.push("two");
        buffer.push("three");
        assert_eq!(buffer.tail(10), vec!["two", "three"]);
        assert_eq!(buffer.tail(1), vec!["three"]);
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn writer_waits_for_newline() {
        let buffer = LogBuffer::new(10);
        let mut writer = buffer.writer();
        writer.write_all(b"opened wi").expect("write");
        assert!(buffer.is_empty());
        writer.write_all(b"ndow\nclosing").expect("write");
        assert_eq!(buffer.tail(10), vec!["opened window"]);
        writer.flush().expect("flush");
        assert_eq!(buffer.tail(10), vec!["opened window", "closing"]);
    }

    #[test]
    fn subscriber_output_lands_in_buffer() {
        let buffer = LogBuffer::new(10);
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_writer(buffer.clone())
            .with_ansi(false)
            .without_time()
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!(window_id = "a", "opened window");
        });
        let lines = buffer.tail(10);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("opened window"));
        assert!(lines[0].contains("window_id"));
    }
}
