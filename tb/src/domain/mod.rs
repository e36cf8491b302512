//! Domain types for TaskBot
//!
//! Core domain types: Task, Catalog, TaskRun, LogEntry.
//! Tasks are defined once at startup; runs and outcomes are ephemeral.

mod log_entry;
mod run;
mod task;

pub use log_entry::{LogEntry, TIMESTAMP_FORMAT};
pub use run::{RunOutcome, TaskRun};
pub use task::{Catalog, CatalogError, Task, default_tasks};
