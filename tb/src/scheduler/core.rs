//! Scheduler implementation

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::domain::Task;
use crate::executor::{ExecError, TaskExecutor};
use crate::session::{SessionManager, SessionResponse};

use super::config::SchedulerConfig;

/// Scheduler lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Stopped,
    Running,
}

impl fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stopped => write!(f, "stopped"),
            Self::Running => write!(f, "running"),
        }
    }
}

/// Registered recurring jobs, one per catalog task
struct Jobs {
    stop_tx: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

/// Internal state protected by mutex
#[derive(Default)]
struct SchedulerInner {
    jobs: Option<Jobs>,
    /// Jobs signalled to stop that may still be finishing a run
    stopping: Vec<JoinHandle<()>>,
}

/// The Scheduler runs every catalog task on its own period
/// (`duration + buffer` time units) until stopped.
pub struct Scheduler {
    config: SchedulerConfig,
    executor: Arc<TaskExecutor>,
    session: SessionManager,
    inner: Mutex<SchedulerInner>,
}

impl Scheduler {
    /// Create a new scheduler in the Stopped state
    pub fn new(config: SchedulerConfig, executor: Arc<TaskExecutor>, session: SessionManager) -> Self {
        debug!(?config, "Scheduler::new: called");
        Self {
            config,
            executor,
            session,
            inner: Mutex::new(SchedulerInner::default()),
        }
    }

    pub async fn state(&self) -> SchedulerState {
        if self.inner.lock().await.jobs.is_some() {
            SchedulerState::Running
        } else {
            SchedulerState::Stopped
        }
    }

    /// Period between scheduled runs of a task
    pub fn period(&self, task: &Task) -> Duration {
        self.config.period(task.duration)
    }

    /// Stopped -> Running. Returns false if already running.
    pub async fn start(&self) -> SessionResponse<bool> {
        debug!("Scheduler::start: called");
        let mut inner = self.inner.lock().await;
        if inner.jobs.is_some() {
            debug!("Scheduler::start: already running");
            return Ok(false);
        }

        let (stop_tx, stop_rx) = watch::channel(false);
        let handles = self
            .executor
            .catalog()
            .tasks()
            .iter()
            .map(|task| {
                let period = self.period(task);
                debug!(task = %task.name, ?period, "Scheduler::start: registering job");
                tokio::spawn(job_loop(self.executor.clone(), task.clone(), period, stop_rx.clone()))
            })
            .collect();
        inner.jobs = Some(Jobs { stop_tx, handles });

        self.session.set_running(true).await?;
        self.session.log("Scheduler's alive, tasks incoming!").await?;
        info!(jobs = self.executor.catalog().len(), "Scheduler started");
        Ok(true)
    }

    /// Running -> Stopped. In-flight runs finish; no new runs start.
    /// Returns false if already stopped.
    pub async fn stop(&self) -> SessionResponse<bool> {
        debug!("Scheduler::stop: called");
        let mut inner = self.inner.lock().await;
        let Some(jobs) = inner.jobs.take() else {
            debug!("Scheduler::stop: already stopped");
            return Ok(false);
        };

        let _ = jobs.stop_tx.send(true);
        inner.stopping.extend(jobs.handles);
        inner.stopping.retain(|h| !h.is_finished());

        self.session.set_running(false).await?;
        self.session.reset_progress().await?;
        self.session.log("Scheduler's out, peace!").await?;
        info!("Scheduler stopped");
        Ok(true)
    }

    /// Wait for stopped jobs to finish their in-flight runs
    pub async fn wait_stopped(&self) {
        let handles: Vec<_> = self.inner.lock().await.stopping.drain(..).collect();
        debug!(count = handles.len(), "Scheduler::wait_stopped: called");
        for handle in handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Scheduled job panicked");
            }
        }
    }
}

async fn job_loop(executor: Arc<TaskExecutor>, task: Task, period: Duration, mut stop_rx: watch::Receiver<bool>) {
    debug!(task = %task.name, ?period, "job_loop: started");
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = stop_rx.changed() => break,
            _ = interval.tick() => {}
        }
        if *stop_rx.borrow() {
            break;
        }

        match executor.execute(&task, true, None).await {
            Ok(_) => {}
            Err(ExecError::Session(e)) => {
                error!(task = %task.name, error = %e, "Session gone, ending job");
                break;
            }
            Err(e) => {
                error!(task = %task.name, error = %e, "Scheduled run failed");
            }
        }
    }

    debug!(task = %task.name, "job_loop: stopped");
}
