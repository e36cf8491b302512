//! TaskRun domain type
//!
//! Ephemeral record of one task invocation. Lives only for the duration of
//! a single `TaskExecutor::execute` call.

use uuid::Uuid;

use super::task::Task;

/// One invocation of a task
#[derive(Debug, Clone)]
pub struct TaskRun {
    /// Run id, used as a tracing field
    pub id: String,
    pub task: Task,
    pub accepted: bool,
    /// Fraction complete in [0, 1]
    pub progress: f64,
}

impl TaskRun {
    pub fn new(task: Task, accepted: bool) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            task,
            accepted,
            progress: 0.0,
        }
    }

    /// Record tick `n` of `duration`; returns the new progress
    pub fn advance(&mut self, tick: u32) -> f64 {
        self.progress = (f64::from(tick) / f64::from(self.task.duration)).clamp(0.0, 1.0);
        self.progress
    }
}

/// What a finished run did
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The task ran all of its ticks
    Completed { task: String },

    /// The task was declined and the classifier answered instead
    Rejected {
        task: String,
        /// Classifier output for the task name
        response: String,
        /// Consecutive rejections including this one
        rejections: u32,
        /// True when the warning threshold has been reached
        warning: bool,
    },
}

impl RunOutcome {
    pub fn task(&self) -> &str {
        match self {
            Self::Completed { task } | Self::Rejected { task, .. } => task,
        }
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Rejected { warning: true, .. })
    }
}
