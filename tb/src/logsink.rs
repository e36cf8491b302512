//! Log Sink - append-only, timestamped activity log
//!
//! New lines land in a pending queue. `drain` moves them into the durable log
//! and hands back the whole history for display. Drained lines are never
//! emitted twice. The log is unbounded.

use std::collections::VecDeque;
use tracing::info;

use crate::domain::LogEntry;

#[derive(Debug, Default)]
pub struct LogSink {
    pending: VecDeque<LogEntry>,
    drained: Vec<LogEntry>,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp and queue a message
    pub fn log(&mut self, message: impl Into<String>) {
        self.push(LogEntry::now(message));
    }

    /// Queue an already-stamped entry
    pub fn push(&mut self, entry: LogEntry) {
        info!(timestamp = %entry.timestamp, "{}", entry.message);
        self.pending.push_back(entry);
    }

    /// Move pending entries into the durable log; return the full log
    pub fn drain(&mut self) -> &[LogEntry] {
        self.drained.extend(self.pending.drain(..));
        &self.drained
    }

    /// Everything logged so far, drained or not, in arrival order
    pub fn all(&self) -> Vec<LogEntry> {
        self.drained.iter().chain(self.pending.iter()).cloned().collect()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Total entries, drained and pending
    pub fn len(&self) -> usize {
        self.drained.len() + self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
