//! Line assembly for the serial command channel.
//!
//! Bytes are accumulated until `\n` or `\r`. Other control characters are
//! dropped and empty lines are ignored. A line that reaches the buffer
//! capacity is discarded: the accumulator is reset and the rest of the line,
//! up to the next terminator, is skipped.
//!
//! At most [`MAX_PENDING_LINES`] complete lines wait to be consumed; lines
//! completed while the queue is full are dropped.

use std::collections::VecDeque;
use tracing::warn;

/// Complete lines kept while waiting for the control loop.
pub const MAX_PENDING_LINES: usize = 8;

#[derive(Debug)]
pub struct LineReader {
    current: Vec<u8>,
    /// Longest accepted line, in bytes
    max_len: usize,
    overflowed: bool,
    ready: VecDeque<String>,
}

impl LineReader {
    /// `capacity` counts two bytes of terminator slack, like a C buffer.
    pub fn new(capacity: usize) -> Self {
        let max_len = capacity.saturating_sub(2).max(1);
        Self {
            current: Vec::with_capacity(max_len),
            max_len,
            overflowed: false,
            ready: VecDeque::new(),
        }
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn push(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            match byte {
                b'\n' | b'\r' => self.terminate(),
                b if b < b' ' => {}
                _ if self.overflowed => {}
                _ => {
                    if self.current.len() >= self.max_len {
                        warn!(max_len = self.max_len, "Serial line too long, discarded");
                        self.current.clear();
                        self.overflowed = true;
                    } else {
                        self.current.push(byte);
                    }
                }
            }
        }
    }

    /// Oldest complete line not yet consumed.
    pub fn next_line(&mut self) -> Option<String> {
        self.ready.pop_front()
    }

    /// Complete lines waiting to be consumed.
    pub fn pending(&self) -> usize {
        self.ready.len()
    }

    fn terminate(&mut self) {
        self.overflowed = false;
        if self.current.is_empty() {
            return;
        }
        if self.ready.len() >= MAX_PENDING_LINES {
            warn!(pending = self.ready.len(), "Serial backlog full, line dropped");
            self.current.clear();
            return;
        }
        let line = String::from_utf8_lossy(&self.current).into_owned();
        self.current.clear();
        self.ready.push_back(line);
    }
}
