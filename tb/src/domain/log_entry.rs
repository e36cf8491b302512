//! LogEntry domain type

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Clock format used for entry timestamps
pub const TIMESTAMP_FORMAT: &str = "%H:%M:%S";

/// One timestamped log line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Local wall-clock time, `HH:MM:SS`
    pub timestamp: String,
    pub message: String,
}

impl LogEntry {
    /// Stamp a message with the current local time
    pub fn now(message: impl Into<String>) -> Self {
        Self::at(Local::now(), message)
    }

    pub fn at(time: DateTime<Local>, message: impl Into<String>) -> Self {
        Self {
            timestamp: time.format(TIMESTAMP_FORMAT).to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.timestamp, self.message)
    }
}
