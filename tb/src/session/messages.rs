//! Session manager messages
//!
//! Commands and responses for the actor pattern.

use serde::Serialize;
use thiserror::Error;
use tokio::sync::oneshot;

use crate::domain::LogEntry;

/// Errors from session operations
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Unknown task: {0}")]
    UnknownTask(String),

    #[error("Channel error")]
    ChannelError,
}

/// Response from session operations
pub type SessionResponse<T> = Result<T, SessionError>;

/// Progress of one catalog task
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskProgress {
    pub task: String,
    /// Fraction complete in [0, 1]
    pub progress: f64,
}

/// Point-in-time view of the session for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    /// Scheduler running flag
    pub running: bool,
    /// Progress per task, catalog order
    pub progress: Vec<TaskProgress>,
    /// Consecutive manual rejections
    pub rejections: u32,
    /// Rejections have reached the warning threshold
    pub warning: bool,
    /// Full drained log, arrival order
    pub log: Vec<LogEntry>,
}

impl SessionSnapshot {
    pub fn progress_of(&self, task: &str) -> Option<f64> {
        self.progress.iter().find(|p| p.task == task).map(|p| p.progress)
    }

    /// Log rendered as `HH:MM:SS: message` lines
    pub fn log_text(&self) -> String {
        self.log.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n")
    }
}

/// Commands sent to the SessionManager actor
#[derive(Debug)]
pub enum SessionCommand {
    // Log sink
    Log {
        message: String,
        reply: oneshot::Sender<SessionResponse<()>>,
    },
    Drain {
        reply: oneshot::Sender<SessionResponse<Vec<LogEntry>>>,
    },

    // Progress
    SetProgress {
        task: String,
        progress: f64,
        reply: oneshot::Sender<SessionResponse<()>>,
    },
    ResetProgress {
        reply: oneshot::Sender<SessionResponse<()>>,
    },

    // Rejection counter
    RecordAccepted {
        reply: oneshot::Sender<SessionResponse<()>>,
    },
    RecordRejected {
        reply: oneshot::Sender<SessionResponse<u32>>,
    },

    // Scheduler flag
    SetRunning {
        running: bool,
        /// true if the flag changed
        reply: oneshot::Sender<SessionResponse<bool>>,
    },

    // Read
    Snapshot {
        reply: oneshot::Sender<SessionResponse<SessionSnapshot>>,
    },

    // Shutdown
    Shutdown,
}
