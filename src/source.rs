//! Tracker message sources.
//!
//! `MessageSource` decouples whatever receives tracker output (a socket
//! thread, a log file, a simulator) from the code that consumes it. The
//! scripted and recording providers let tests replay exact sequences.

use std::collections::VecDeque;
use std::io::BufRead;

use tracing::warn;

use crate::message::{MessageError, TrackerMessage};

/// Anything that yields tracker messages in arrival order.
pub trait MessageSource {
    /// Next message, or `None` when the source is exhausted.
    fn next_message(&mut self) -> Option<Result<TrackerMessage, MessageError>>;
}

/// Delivers messages from a pre-defined queue.
pub struct ScriptedSource {
    messages: VecDeque<TrackerMessage>,
}

impl ScriptedSource {
    pub fn new(messages: Vec<TrackerMessage>) -> Self {
        Self {
            messages: VecDeque::from(messages),
        }
    }

    /// Number of messages not yet delivered.
    pub fn remaining(&self) -> usize {
        self.messages.len()
    }

    pub fn has_messages(&self) -> bool {
        !self.messages.is_empty()
    }
}

impl MessageSource for ScriptedSource {
    fn next_message(&mut self) -> Option<Result<TrackerMessage, MessageError>> {
        self.messages.pop_front().map(Ok)
    }
}

/// Wraps a source and keeps a copy of every message it delivers.
pub struct RecordingSource<P: MessageSource> {
    inner: P,
    recorded: Vec<TrackerMessage>,
}

impl<P: MessageSource> RecordingSource<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            recorded: Vec::new(),
        }
    }

    pub fn recorded(&self) -> &[TrackerMessage] {
        &self.recorded
    }

    pub fn into_recorded(self) -> Vec<TrackerMessage> {
        self.recorded
    }
}

impl<P: MessageSource> MessageSource for RecordingSource<P> {
    fn next_message(&mut self) -> Option<Result<TrackerMessage, MessageError>> {
        let message = self.inner.next_message()?;
        if let Ok(m) = &message {
            self.recorded.push(m.clone());
        }
        Some(message)
    }
}

/// Reads one JSON message per line. Blank lines are skipped.
pub struct JsonLinesSource<R: BufRead> {
    reader: R,
    line: String,
    line_number: usize,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            line_number: 0,
        }
    }

    /// 1-based number of the last line read.
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

impl<R: BufRead> MessageSource for JsonLinesSource<R> {
    fn next_message(&mut self) -> Option<Result<TrackerMessage, MessageError>> {
        loop {
            self.line.clear();
            match self.reader.read_line(&mut self.line) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_number += 1;
                    let text = self.line.trim();
                    if text.is_empty() {
                        continue;
                    }
                    let decoded = TrackerMessage::decode(text);
                    if let Err(e) = &decoded {
                        warn!("line {}: {}", self.line_number, e);
                    }
                    return Some(decoded);
                }
                Err(e) => {
                    // The unreadable line is still consumed.
                    self.line_number += 1;
                    warn!("line {}: {}", self.line_number, e);
                    return Some(Err(e.into()));
                }
            }
        }
    }
}
