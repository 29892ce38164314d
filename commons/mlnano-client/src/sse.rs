//! Incremental decoder for `text/event-stream` bodies.

/// One dispatched server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    pub event: String,
    pub data: String,
}

use tracing::warn;

/// Longest line kept in memory while waiting for its terminator.
pub const MAX_LINE_BYTES: usize = 1 << 20;

/// Feeds arbitrary byte chunks and yields complete events. Lines may be split
/// across chunks at any byte, including inside a multi-byte character.
///
/// A line longer than the limit is dropped together with the rest of its
/// event, and decoding resumes after the next blank line.
#[derive(Debug)]
pub struct SseDecoder {
    buf: Vec<u8>,
    // bytes of `buf` already known to hold no newline
    scanned: usize,
    max_line: usize,
    // dropping the tail of an oversized line
    discarding: bool,
    // dropping fields until the event ends
    skipping: bool,
    event: Option<String>,
    data: Vec<String>,
}

impl Default for SseDecoder {
    fn default() -> Self {
        Self::with_max_line(MAX_LINE_BYTES)
    }
}

impl SseDecoder {
    pub fn with_max_line(max_line: usize) -> Self {
        Self {
            buf: Vec::new(),
            scanned: 0,
            max_line,
            discarding: false,
            skipping: false,
            event: None,
            data: Vec::new(),
        }
    }

    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buf.extend_from_slice(chunk);
        let mut out = Vec::new();
        let mut start = 0;
        while let Some(offset) =
            self.buf[self.scanned..].iter().position(|b| *b == b'\n')
        {
            let end = self.scanned + offset;
            let line = self.buf[start..end].to_vec();
            start = end + 1;
            self.scanned = start;
            if let Some(event) = self.handle_line(line) {
                out.push(event);
            }
        }
        self.buf.drain(..start);
        self.scanned = self.buf.len();

        if self.buf.len() > self.max_line {
            if !self.discarding {
                warn!(limit = self.max_line, "dropping oversized event-stream line");
            }
            self.buf.clear();
            self.scanned = 0;
            self.discarding = true;
            self.skip_event();
        }
        out
    }

    fn handle_line(&mut self, mut line: Vec<u8>) -> Option<SseEvent> {
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        if self.discarding {
            self.discarding = false;
            return None;
        }
        if line.len() > self.max_line {
            warn!(limit = self.max_line, "dropping oversized event-stream line");
            self.skip_event();
            return None;
        }
        if line.is_empty() {
            if self.skipping {
                self.skipping = false;
                return None;
            }
            return self.dispatch();
        }
        // comment / keep-alive
        if self.skipping || line.starts_with(b":") {
            return None;
        }
        let line = String::from_utf8_lossy(&line);
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line.as_ref(), ""),
        };
        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            _ => {}
        }
        None
    }

    fn skip_event(&mut self) {
        self.event = None;
        self.data.clear();
        self.skipping = true;
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        if self.data.is_empty() && self.event.is_none() {
            return None;
        }
        Some(SseEvent {
            event: self.event.take().unwrap_or_else(|| "message".to_string()),
            data: std::mem::take(&mut self.data).join("\n"),
        })
    }
}
