// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Host-backed `java/io/PrintStream` and the sinks behind it.

use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::Result;

/// Destination for output written through a [`PrintStream`].
///
/// Buffering and flushing policy belong to the sink.
pub trait Sink: Send {
    /// Accepts a run of bytes for output.
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Pushes buffered output to its destination.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writes to the process's standard output.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl Sink for StdoutSink {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        io::stdout().lock().write_all(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().lock().flush()
    }
}

/// Writes to the process's standard error.
#[derive(Debug, Default)]
pub struct StderrSink;

impl Sink for StderrSink {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        io::stderr().lock().write_all(bytes)
    }
}

/// In-memory sink; clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct BufferSink {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl BufferSink {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything written so far.
    pub fn contents(&self) -> Vec<u8> {
        self.buffer.lock().clone()
    }

    /// Everything written so far, lossily decoded as UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }
}

impl Sink for BufferSink {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.buffer.lock().extend_from_slice(bytes);
        Ok(())
    }
}

/// The output channel object bound to `System.out`.
///
/// Each call holds the sink for its whole write, so concurrent `println`s
/// never interleave within a line.
pub struct PrintStream {
    sink: Mutex<Box<dyn Sink>>,
}

impl PrintStream {
    /// Internal class name.
    pub const CLASS_NAME: &'static str = "java/io/PrintStream";

    /// Wraps a sink.
    pub fn new(sink: Box<dyn Sink>) -> Self {
        Self {
            sink: Mutex::new(sink),
        }
    }

    /// Writes `bytes` without a line terminator.
    pub fn print(&self, bytes: &[u8]) -> Result<()> {
        let mut sink = self.sink.lock();
        sink.write_all(bytes)?;
        Ok(())
    }

    /// Writes `bytes` followed by a newline, then flushes.
    pub fn println(&self, bytes: &[u8]) -> Result<()> {
        let mut sink = self.sink.lock();
        sink.write_all(bytes)?;
        sink.write_all(b"\n")?;
        sink.flush()?;
        Ok(())
    }
}

impl fmt::Debug for PrintStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrintStream").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuntimeError;

    struct ClosedSink;

    impl Sink for ClosedSink {
        fn write_all(&mut self, _bytes: &[u8]) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn test_println_appends_newline() {
        let buffer = BufferSink::new();
        let out = PrintStream::new(Box::new(buffer.clone()));
        out.println(b"hello").unwrap();
        out.print(b"a").unwrap();
        out.println(b"").unwrap();
        assert_eq!(buffer.text(), "hello\na\n");
    }

    #[test]
    fn test_sink_errors_surface() {
        let out = PrintStream::new(Box::new(ClosedSink));
        assert_eq!(
            out.println(b"x").unwrap_err(),
            RuntimeError::Io("closed".to_string())
        );
    }

    #[test]
    fn test_lines_do_not_interleave() {
        let buffer = BufferSink::new();
        let out = PrintStream::new(Box::new(buffer.clone()));

        std::thread::scope(|s| {
            for t in 0..4 {
                let out = &out;
                s.spawn(move || {
                    for _ in 0..50 {
                        out.println(format!("thread-{t}").as_bytes()).unwrap();
                    }
                });
            }
        });

        let text = buffer.text();
        assert_eq!(text.lines().count(), 200);
        assert!(text.lines().all(|l| l.starts_with("thread-") && l.len() == 8));
    }
}
