//! Task Executor - runs one task to completion or handles its rejection
//!
//! An accepted run suspends for one time unit per duration tick, reporting
//! progress after each tick. A rejected run asks the classifier to respond to
//! the task name and bumps the consecutive-rejection counter.
//!
//! Work is a cooperative `tokio::time::sleep` loop: dropping the future
//! cancels the run between ticks.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use textclass::{Classifier, ClassifierError};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::{Catalog, RunOutcome, Task, TaskRun};
use crate::session::{SessionError, SessionManager};

/// Errors from executing a task
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("Unknown task: {0}")]
    UnknownTask(String),

    #[error("Classifier failed: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("Session unavailable: {0}")]
    Session(#[from] SessionError),

    #[error("Task run aborted: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Progress callback, called with the fraction complete after each tick
pub type ProgressFn<'a> = &'a (dyn Fn(f64) + Send + Sync);

/// Runs catalog tasks against the shared session
pub struct TaskExecutor {
    catalog: Catalog,
    session: SessionManager,
    classifier: Arc<dyn Classifier>,
    tick: Duration,
    warning_threshold: u32,
    /// One lock per task so runs of the same task never overlap
    locks: HashMap<String, Arc<Mutex<()>>>,
}

impl TaskExecutor {
    pub fn new(
        catalog: Catalog,
        session: SessionManager,
        classifier: Arc<dyn Classifier>,
        tick: Duration,
        warning_threshold: u32,
    ) -> Self {
        debug!(tasks = catalog.len(), ?tick, warning_threshold, "TaskExecutor::new: called");
        let locks = catalog
            .names()
            .map(|name| (name.to_string(), Arc::new(Mutex::new(()))))
            .collect();
        Self {
            catalog,
            session,
            classifier,
            tick,
            warning_threshold,
            locks,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Length of one time unit
    pub fn tick(&self) -> Duration {
        self.tick
    }

    /// Look up a task by name and execute it
    pub async fn execute_by_name(
        &self,
        name: &str,
        accept: bool,
        on_progress: Option<ProgressFn<'_>>,
    ) -> Result<RunOutcome, ExecError> {
        let task = self
            .catalog
            .get(name)
            .ok_or_else(|| ExecError::UnknownTask(name.to_string()))?
            .clone();
        self.execute(&task, accept, on_progress).await
    }

    /// Run a task (accept) or respond to its rejection
    pub async fn execute(
        &self,
        task: &Task,
        accept: bool,
        on_progress: Option<ProgressFn<'_>>,
    ) -> Result<RunOutcome, ExecError> {
        debug!(task = %task.name, accept, "TaskExecutor::execute: called");
        if self.catalog.get(&task.name) != Some(task) {
            return Err(ExecError::UnknownTask(task.name.clone()));
        }
        let lock = self
            .locks
            .get(&task.name)
            .cloned()
            .ok_or_else(|| ExecError::UnknownTask(task.name.clone()))?;
        // accepted and rejected runs of one task take turns, so their log lines never interleave
        let _guard = lock.lock().await;

        let run = TaskRun::new(task.clone(), accept);
        if accept {
            self.run_accepted(run, on_progress).await
        } else {
            self.run_rejected(run).await
        }
    }

    async fn run_accepted(&self, mut run: TaskRun, on_progress: Option<ProgressFn<'_>>) -> Result<RunOutcome, ExecError> {
        let name = run.task.name.clone();
        let duration = run.task.duration;

        info!(run_id = %run.id, task = %name, duration, "Task run started");
        self.session
            .log(format!("{} time! Running for {} seconds...", name, duration))
            .await?;

        for tick in 1..=duration {
            tokio::time::sleep(self.tick).await;
            let progress = run.advance(tick);
            self.session.set_progress(&name, progress).await?;
            if let Some(report) = on_progress {
                report(progress);
            }
        }

        self.session.log(format!("{} done, nailed it!", name)).await?;
        self.session.record_accepted().await?;
        info!(run_id = %run.id, task = %name, "Task run completed");

        Ok(RunOutcome::Completed { task: name })
    }

    async fn run_rejected(&self, run: TaskRun) -> Result<RunOutcome, ExecError> {
        let name = run.task.name;
        info!(run_id = %run.id, task = %name, "Task rejected");
        self.session.log(format!("You rejected {}? Alright:-", name)).await?;

        // a classifier failure leaves the rejection line logged and the counter untouched
        let response = self.classifier.predict(&name)?;
        self.session.log(format!("AI says: {}", response)).await?;

        let rejections = self.session.record_rejected().await?;
        let warning = rejections >= self.warning_threshold;
        if warning {
            warn!(rejections, "Hey, {} rejections in a row? You get a warning!", rejections);
        }

        Ok(RunOutcome::Rejected {
            task: name,
            response,
            rejections,
            warning,
        })
    }
}
