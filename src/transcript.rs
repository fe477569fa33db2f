//! Verbose transcript of how the input was read and classified.

use std::io::{self, Write};

use crate::reader::Capture;

pub(crate) struct Transcript<W: Write> {
    enabled: bool,
    started: bool,
    sink: W,
}

impl Transcript<io::Stderr> {
    pub(crate) fn stderr(enabled: bool) -> Self {
        Self::new(enabled, io::stderr())
    }
}

impl<W: Write> Transcript<W> {
    pub(crate) fn new(enabled: bool, sink: W) -> Self {
        Self {
            enabled,
            started: false,
            sink,
        }
    }

    pub(crate) fn note(&mut self, message: impl AsRef<str>) {
        if !self.enabled {
            return;
        }
        self.start();
        let _ = writeln!(self.sink, "- {}", message.as_ref());
    }

    pub(crate) fn block(&mut self, title: &str, content: &str) {
        if !self.enabled {
            return;
        }
        self.start();
        let _ = writeln!(self.sink, "--- {title} ---");
        let _ = writeln!(self.sink, "{content}");
        let _ = writeln!(self.sink, "--- end {title} ---");
    }

    /// Record capture size, truncation, and the captured text.
    pub(crate) fn capture(&mut self, capture: &Capture) {
        if capture.truncated {
            self.note(format!(
                "read {} bytes (truncated at {} byte limit)",
                capture.bytes, capture.capacity
            ));
        } else {
            self.note(format!("read {} bytes", capture.bytes));
        }
        self.block("input", capture.text.trim_end());
    }

    #[cfg(test)]
    pub(crate) fn into_sink(self) -> W {
        self.sink
    }

    fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        let _ = writeln!(self.sink, "transcript:");
    }
}
