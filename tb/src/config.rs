//! TaskBot configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use textclass::config::ModelConfig;

use crate::domain::{Catalog, CatalogError, Task, default_tasks};
use crate::scheduler::SchedulerConfig;

/// Main TaskBot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Classifier artifact locations
    pub model: ModelConfig,

    /// Scheduler timing
    pub scheduler: SchedulerConfig,

    /// Web UI settings
    pub web: WebConfig,

    /// Task catalog, in display order
    pub tasks: Vec<Task>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: None,
            model: ModelConfig::default(),
            scheduler: SchedulerConfig::default(),
            web: WebConfig::default(),
            tasks: default_tasks(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for candidate in Self::candidate_paths() {
            if candidate.exists() {
                match Self::load_from_file(&candidate) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", candidate.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is set up
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let path = match config_path {
            Some(path) => path.clone(),
            None => Self::candidate_paths().into_iter().find(|p| p.exists())?,
        };
        Self::load_from_file(&path).ok()?.log_level
    }

    /// Project-local `.taskbot.yml`, then `~/.config/taskbot/taskbot.yml`
    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".taskbot.yml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("taskbot").join("taskbot.yml"));
        }
        paths
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Build the task catalog from the configured tasks
    pub fn catalog(&self) -> Result<Catalog, CatalogError> {
        Catalog::new(self.tasks.clone())
    }
}

/// Web UI settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Listen address
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8501".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.log_level.is_none());
        assert_eq!(config.scheduler.buffer_units, 5);
        assert_eq!(config.web.bind, "127.0.0.1:8501");
        assert_eq!(config.catalog().unwrap().names().collect::<Vec<_>>(), vec![
            "Reading", "Eating", "Homework"
        ]);
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
log-level: DEBUG

model:
  vectorizer-path: /opt/models/v.json
  model-path: /opt/models/m.json

scheduler:
  buffer-units: 2
  tick-ms: 100
  rejection-warning: 5

web:
  bind: 0.0.0.0:9000

tasks:
  - name: Stretching
    duration: 2
  - name: Coding
    duration: 9
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.log_level.as_deref(), Some("DEBUG"));
        assert_eq!(config.model.model_path, PathBuf::from("/opt/models/m.json"));
        assert_eq!(config.scheduler.tick_ms, 100);
        assert_eq!(config.scheduler.rejection_warning, 5);
        assert_eq!(config.web.bind, "0.0.0.0:9000");
        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("Coding").unwrap().duration, 9);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
scheduler:
  tick-ms: 10
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.scheduler.tick_ms, 10);
        assert_eq!(config.scheduler.buffer_units, 5);
        assert_eq!(config.tasks.len(), 3);
        assert_eq!(config.model, ModelConfig::default());
    }

    #[test]
    fn test_duplicate_tasks_rejected() {
        let yaml = r#"
tasks:
  - { name: Reading, duration: 5 }
  - { name: Reading, duration: 1 }
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            config.catalog().unwrap_err(),
            CatalogError::DuplicateName("Reading".to_string())
        );
    }

    #[test]
    fn test_load_explicit_path_and_log_level() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("taskbot.yml");
        fs::write(&path, "log-level: WARN\nweb:\n  bind: 127.0.0.1:1\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.web.bind, "127.0.0.1:1");
        assert_eq!(Config::load_log_level(Some(&path)).as_deref(), Some("WARN"));
    }

    #[test]
    fn test_load_explicit_missing_path_fails() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("nope.yml");
        assert!(Config::load(Some(&missing)).is_err());
        assert!(Config::load_log_level(Some(&missing)).is_none());
    }
}
