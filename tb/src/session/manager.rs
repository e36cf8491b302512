//! SessionManager - actor that owns the session state
//!
//! Progress, the log sink, the rejection counter and the scheduler flag are
//! owned by a single task. Foreground handlers and scheduled jobs talk to it
//! over a channel, so updates never interleave partially.

use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::domain::{Catalog, LogEntry};
use crate::logsink::LogSink;

use super::messages::{SessionCommand, SessionError, SessionResponse, SessionSnapshot, TaskProgress};

/// Rejections in a row before the user is warned
pub const DEFAULT_REJECTION_WARNING: u32 = 3;

/// Event broadcast when session state changes
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A line was appended to the log
    Logged(LogEntry),
    /// A task's progress changed
    Progress { task: String, progress: f64 },
    /// Rejection counter is at or past the warning threshold
    RejectionWarning { rejections: u32 },
}

/// Mutable session record, owned by the actor
struct SessionState {
    running: bool,
    progress: Vec<TaskProgress>,
    sink: LogSink,
    rejections: u32,
    warning_threshold: u32,
}

impl SessionState {
    fn new(catalog: &Catalog, warning_threshold: u32) -> Self {
        Self {
            running: false,
            progress: catalog
                .names()
                .map(|name| TaskProgress {
                    task: name.to_string(),
                    progress: 0.0,
                })
                .collect(),
            sink: LogSink::new(),
            rejections: 0,
            warning_threshold,
        }
    }

    fn warning(&self) -> bool {
        self.rejections >= self.warning_threshold
    }
}

/// Handle to send commands to the SessionManager
#[derive(Clone)]
pub struct SessionManager {
    tx: mpsc::Sender<SessionCommand>,
    event_tx: broadcast::Sender<SessionEvent>,
}

impl SessionManager {
    /// Spawn a new SessionManager actor for the given catalog
    pub fn spawn(catalog: &Catalog, warning_threshold: u32) -> Self {
        debug!(tasks = catalog.len(), warning_threshold, "spawn: called");
        let state = SessionState::new(catalog, warning_threshold);

        let (tx, rx) = mpsc::channel(256);
        let (event_tx, _) = broadcast::channel(1024);

        tokio::spawn(actor_loop(state, rx, event_tx.clone()));

        info!("SessionManager spawned");
        Self { tx, event_tx }
    }

    /// Subscribe to session change events
    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<SessionResponse<T>>) -> SessionCommand,
    ) -> SessionResponse<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(make(reply_tx))
            .await
            .map_err(|_| SessionError::ChannelError)?;
        reply_rx.await.map_err(|_| SessionError::ChannelError)?
    }

    // === Log sink ===

    /// Append a timestamped message to the pending log
    pub async fn log(&self, message: impl Into<String>) -> SessionResponse<()> {
        let message = message.into();
        debug!(%message, "log: called");
        self.request(|reply| SessionCommand::Log { message, reply }).await
    }

    /// Move pending entries into the durable log and return all of it
    pub async fn drain(&self) -> SessionResponse<Vec<LogEntry>> {
        debug!("drain: called");
        self.request(|reply| SessionCommand::Drain { reply }).await
    }

    // === Progress ===

    /// Set one task's progress, clamped to [0, 1]
    pub async fn set_progress(&self, task: &str, progress: f64) -> SessionResponse<()> {
        debug!(%task, progress, "set_progress: called");
        let task = task.to_string();
        self.request(|reply| SessionCommand::SetProgress { task, progress, reply })
            .await
    }

    /// Zero every task's progress
    pub async fn reset_progress(&self) -> SessionResponse<()> {
        debug!("reset_progress: called");
        self.request(|reply| SessionCommand::ResetProgress { reply }).await
    }

    // === Rejection counter ===

    /// An accepted run resets the rejection counter
    pub async fn record_accepted(&self) -> SessionResponse<()> {
        debug!("record_accepted: called");
        self.request(|reply| SessionCommand::RecordAccepted { reply }).await
    }

    /// A rejected run bumps the counter; returns the new count
    pub async fn record_rejected(&self) -> SessionResponse<u32> {
        debug!("record_rejected: called");
        self.request(|reply| SessionCommand::RecordRejected { reply }).await
    }

    // === Scheduler flag ===

    /// Set the running flag; returns true if it changed
    pub async fn set_running(&self, running: bool) -> SessionResponse<bool> {
        debug!(running, "set_running: called");
        self.request(|reply| SessionCommand::SetRunning { running, reply })
            .await
    }

    // === Read ===

    /// Drain the log and return the full session view
    pub async fn snapshot(&self) -> SessionResponse<SessionSnapshot> {
        debug!("snapshot: called");
        self.request(|reply| SessionCommand::Snapshot { reply }).await
    }

    /// Shutdown the SessionManager
    pub async fn shutdown(&self) -> SessionResponse<()> {
        debug!("shutdown: called");
        self.tx
            .send(SessionCommand::Shutdown)
            .await
            .map_err(|_| SessionError::ChannelError)
    }
}

async fn actor_loop(
    mut state: SessionState,
    mut rx: mpsc::Receiver<SessionCommand>,
    event_tx: broadcast::Sender<SessionEvent>,
) {
    debug!("SessionManager actor started");

    while let Some(cmd) = rx.recv().await {
        match cmd {
            SessionCommand::Log { message, reply } => {
                let entry = LogEntry::now(message);
                let _ = event_tx.send(SessionEvent::Logged(entry.clone()));
                state.sink.push(entry);
                let _ = reply.send(Ok(()));
            }

            SessionCommand::Drain { reply } => {
                let log = state.sink.drain().to_vec();
                debug!(entries = log.len(), "actor_loop: Drain command");
                let _ = reply.send(Ok(log));
            }

            SessionCommand::SetProgress { task, progress, reply } => {
                let result = match state.progress.iter_mut().find(|p| p.task == task) {
                    Some(entry) => {
                        entry.progress = progress.clamp(0.0, 1.0);
                        let _ = event_tx.send(SessionEvent::Progress {
                            task,
                            progress: entry.progress,
                        });
                        Ok(())
                    }
                    None => Err(SessionError::UnknownTask(task)),
                };
                let _ = reply.send(result);
            }

            SessionCommand::ResetProgress { reply } => {
                debug!("actor_loop: ResetProgress command");
                for entry in state.progress.iter_mut() {
                    entry.progress = 0.0;
                    let _ = event_tx.send(SessionEvent::Progress {
                        task: entry.task.clone(),
                        progress: 0.0,
                    });
                }
                let _ = reply.send(Ok(()));
            }

            SessionCommand::RecordAccepted { reply } => {
                debug!(previous = state.rejections, "actor_loop: RecordAccepted command");
                state.rejections = 0;
                let _ = reply.send(Ok(()));
            }

            SessionCommand::RecordRejected { reply } => {
                state.rejections = state.rejections.saturating_add(1);
                debug!(rejections = state.rejections, "actor_loop: RecordRejected command");
                if state.warning() {
                    warn!(rejections = state.rejections, "Consecutive rejections reached warning threshold");
                    let _ = event_tx.send(SessionEvent::RejectionWarning {
                        rejections: state.rejections,
                    });
                }
                let _ = reply.send(Ok(state.rejections));
            }

            SessionCommand::SetRunning { running, reply } => {
                let changed = state.running != running;
                state.running = running;
                debug!(running, changed, "actor_loop: SetRunning command");
                let _ = reply.send(Ok(changed));
            }

            SessionCommand::Snapshot { reply } => {
                let log = state.sink.drain().to_vec();
                let snapshot = SessionSnapshot {
                    running: state.running,
                    progress: state.progress.clone(),
                    rejections: state.rejections,
                    warning: state.warning(),
                    log,
                };
                let _ = reply.send(Ok(snapshot));
            }

            SessionCommand::Shutdown => {
                info!("SessionManager shutting down");
                break;
            }
        }
    }

    debug!("SessionManager actor stopped");
}
