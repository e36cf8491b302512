//! Scheduler for recurring task runs
//!
//! Two states, Stopped and Running. While running, every catalog task has a
//! recurring job that runs it (accepted) once per `duration + buffer` units.

mod config;
mod core;

pub use config::{SchedulerConfig, SchedulerConfigError};
pub use core::{Scheduler, SchedulerState};
