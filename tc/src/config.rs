//! Configuration for textclass

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Locations of the fitted artifacts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the fitted TF-IDF vectorizer (JSON)
    #[serde(rename = "vectorizer-path", default = "default_vectorizer_path")]
    pub vectorizer_path: PathBuf,

    /// Path to the fitted linear model (JSON)
    #[serde(rename = "model-path", default = "default_model_path")]
    pub model_path: PathBuf,
}

fn default_vectorizer_path() -> PathBuf {
    PathBuf::from(crate::DEFAULT_VECTORIZER_FILE)
}

fn default_model_path() -> PathBuf {
    PathBuf::from(crate::DEFAULT_MODEL_FILE)
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            vectorizer_path: default_vectorizer_path(),
            model_path: default_model_path(),
        }
    }
}

impl ModelConfig {
    /// Load the classifier this config points at
    pub fn load_classifier(&self) -> Result<crate::ArtifactClassifier> {
        crate::ArtifactClassifier::load(&self.vectorizer_path, &self.model_path).context(format!(
            "Failed to load model artifacts ({}, {})",
            self.vectorizer_path.display(),
            self.model_path.display()
        ))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Artifact locations
    #[serde(default)]
    pub model: ModelConfig,
}

impl Config {
    /// Load config from file, or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            return Self::load_from_file(config_path);
        }

        // Try default locations
        let default_paths = [
            dirs::config_dir().map(|p| p.join("textclass").join("config.yml")),
            Some(PathBuf::from("textclass.yml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                return Self::load_from_file(path);
            }
        }

        Ok(Config::default())
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).context(format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_paths() {
        let config = Config::default();
        assert_eq!(config.model.vectorizer_path, PathBuf::from("models/tfidf_vectorizer.json"));
        assert_eq!(config.model.model_path, PathBuf::from("models/conversation_model.json"));
    }

    #[test]
    fn test_load_explicit_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("textclass.yml");
        std::fs::write(&path, "model:\n  model-path: /tmp/m.json\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.model.model_path, PathBuf::from("/tmp/m.json"));
        assert_eq!(config.model.vectorizer_path, PathBuf::from("models/tfidf_vectorizer.json"));
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let temp = tempdir().unwrap();
        assert!(Config::load(Some(&temp.path().join("absent.yml"))).is_err());
    }
}
