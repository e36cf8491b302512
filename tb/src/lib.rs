//! TaskBot - timed task scheduler with a chatbot on the side
//!
//! Tasks from a small catalog run either on demand or on a recurring
//! schedule. Accepting a task "runs" it for its duration while progress is
//! reported; rejecting it asks a pre-fitted text classifier for a response and
//! bumps a consecutive-rejection counter that warns the user at three.
//!
//! # Modules
//!
//! - [`domain`] - tasks, runs, log entries
//! - [`session`] - shared session state behind an actor
//! - [`executor`] - runs or rejects one task
//! - [`scheduler`] - recurring jobs, Stopped/Running
//! - [`logsink`] - buffered log lines drained on render
//! - [`app`] - wires the pieces together
//! - [`web`] - axum UI
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod executor;
pub mod logsink;
pub mod scheduler;
pub mod session;
pub mod web;

// Re-export commonly used types
pub use app::App;
pub use config::{Config, WebConfig};
pub use domain::{Catalog, CatalogError, LogEntry, RunOutcome, Task, TaskRun, default_tasks};
pub use executor::{ExecError, TaskExecutor};
pub use logsink::LogSink;
pub use scheduler::{Scheduler, SchedulerConfig, SchedulerConfigError, SchedulerState};
pub use session::{SessionError, SessionEvent, SessionManager, SessionSnapshot};
