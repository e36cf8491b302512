//! Application context
//!
//! Everything a front end needs, built once at startup and torn down on
//! shutdown. Components receive their collaborators from here instead of
//! reaching for globals.

use std::sync::Arc;

use eyre::{Context, Result};
use textclass::{Classifier, ClassifierError, Reply};
use tracing::{debug, info};

use crate::config::Config;
use crate::domain::{Catalog, RunOutcome};
use crate::executor::{ExecError, TaskExecutor};
use crate::scheduler::Scheduler;
use crate::session::SessionManager;

#[derive(Clone)]
pub struct App {
    config: Arc<Config>,
    session: SessionManager,
    executor: Arc<TaskExecutor>,
    scheduler: Arc<Scheduler>,
    classifier: Arc<dyn Classifier>,
}

impl App {
    /// Load the classifier artifacts named in the config and build the app.
    /// Missing or corrupt artifacts are fatal.
    pub fn new(config: Config) -> Result<Self> {
        debug!("App::new: called");
        let classifier = config.model.load_classifier()?;
        Self::with_classifier(config, Arc::new(classifier))
    }

    /// Build the app around an already-loaded classifier
    pub fn with_classifier(config: Config, classifier: Arc<dyn Classifier>) -> Result<Self> {
        let catalog = config.catalog().context("Invalid task catalog")?;
        config.scheduler.validate().context("Invalid scheduler config")?;
        let session = SessionManager::spawn(&catalog, config.scheduler.rejection_warning);
        let executor = Arc::new(TaskExecutor::new(
            catalog,
            session.clone(),
            classifier.clone(),
            config.scheduler.tick(),
            config.scheduler.rejection_warning,
        ));
        let scheduler = Arc::new(Scheduler::new(
            config.scheduler.clone(),
            executor.clone(),
            session.clone(),
        ));

        info!(tasks = executor.catalog().len(), "App initialized");
        Ok(Self {
            config: Arc::new(config),
            session,
            executor,
            scheduler,
            classifier,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        self.executor.catalog()
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn executor(&self) -> &TaskExecutor {
        &self.executor
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Run a task on its own tokio task and wait for it. Dropping the
    /// returned future only drops the waiter; the run still finishes.
    pub async fn run_task(&self, name: &str, accept: bool) -> Result<RunOutcome, ExecError> {
        debug!(%name, accept, "App::run_task: called");
        let executor = self.executor.clone();
        let name = name.to_string();
        tokio::spawn(async move { executor.execute_by_name(&name, accept, None).await }).await?
    }

    /// Answer a free-text message with the classifier
    pub fn ask(&self, message: &str) -> Result<Reply, ClassifierError> {
        debug!(%message, "App::ask: called");
        textclass::reply(self.classifier.as_ref(), message)
    }

    /// Stop the scheduler, let in-flight runs finish, then stop the session actor
    pub async fn shutdown(&self) -> Result<()> {
        debug!("App::shutdown: called");
        self.scheduler.stop().await.context("Failed to stop scheduler")?;
        self.scheduler.wait_stopped().await;
        self.session.shutdown().await.context("Failed to stop session")?;
        info!("App shut down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Task;

    struct Fixed;

    impl Classifier for Fixed {
        fn predict(&self, _text: &str) -> Result<String, ClassifierError> {
            Ok("fixed".to_string())
        }
    }

    #[tokio::test]
    async fn test_app_wires_components() {
        let app = App::with_classifier(Config::default(), Arc::new(Fixed)).unwrap();
        assert_eq!(app.catalog().len(), 3);
        assert_eq!(app.ask("hi").unwrap(), Reply::Response("fixed".to_string()));
        assert_eq!(app.ask("").unwrap(), Reply::Prompt);

        let snap = app.session().snapshot().await.unwrap();
        assert_eq!(snap.progress.len(), 3);
        app.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_catalog_is_fatal() {
        let config = Config {
            tasks: vec![Task::new("Nap", 0)],
            ..Default::default()
        };
        assert!(App::with_classifier(config, Arc::new(Fixed)).is_err());
    }

    #[tokio::test]
    async fn test_zero_tick_is_fatal() {
        let mut config = Config::default();
        config.scheduler.tick_ms = 0;
        let err = App::with_classifier(config, Arc::new(Fixed)).err().unwrap();
        assert!(err.to_string().contains("Invalid scheduler config"));
        assert!(format!("{:?}", err).contains("tick-ms must be greater than zero"));
    }

    #[tokio::test]
    async fn test_zero_rejection_warning_is_fatal() {
        let mut config = Config::default();
        config.scheduler.rejection_warning = 0;
        let err = App::with_classifier(config, Arc::new(Fixed)).err().unwrap();
        assert!(format!("{:?}", err).contains("rejection-warning must be greater than zero"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_task_survives_dropped_caller() {
        let app = App::with_classifier(Config::default(), Arc::new(Fixed)).unwrap();
        let waited = tokio::time::timeout(std::time::Duration::from_millis(2500), app.run_task("Homework", true)).await;
        assert!(waited.is_err());

        tokio::time::sleep(std::time::Duration::from_secs(10)).await;
        let snap = app.session().snapshot().await.unwrap();
        assert_eq!(snap.progress_of("Homework"), Some(1.0));
        assert_eq!(snap.log.last().unwrap().message, "Homework done, nailed it!");
    }

    #[tokio::test]
    async fn test_missing_artifacts_are_fatal() {
        let temp = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.model.vectorizer_path = temp.path().join("missing.json");
        config.model.model_path = temp.path().join("missing-model.json");
        let err = App::new(config).err().unwrap();
        assert!(err.to_string().contains("Failed to load model artifacts"));
    }
}
