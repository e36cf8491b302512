//! Linear classifier over TF-IDF features

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::ClassifierError;
use crate::vectorizer::SparseVector;

/// Fitted one-vs-rest linear model
///
/// `coef` holds one row per class. A single row with exactly two classes is
/// the binary form: a positive decision score selects `classes[1]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub classes: Vec<String>,
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

impl LinearModel {
    /// Load a model artifact from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "LinearModel::load: called");
        let content = std::fs::read_to_string(path).map_err(|source| ClassifierError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model: Self = serde_json::from_str(&content).map_err(|source| ClassifierError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        model.validate()?;
        Ok(model)
    }

    fn is_binary(&self) -> bool {
        self.coef.len() == 1 && self.classes.len() == 2
    }

    /// Check row counts and row widths agree
    pub fn validate(&self) -> Result<(), ClassifierError> {
        if self.classes.is_empty() {
            return Err(ClassifierError::EmptyModel);
        }
        if !self.is_binary() && self.coef.len() != self.classes.len() {
            return Err(ClassifierError::Shape(format!(
                "{} coefficient rows for {} classes",
                self.coef.len(),
                self.classes.len()
            )));
        }
        if self.intercept.len() != self.coef.len() {
            return Err(ClassifierError::Shape(format!(
                "{} intercepts for {} coefficient rows",
                self.intercept.len(),
                self.coef.len()
            )));
        }
        let width = self.n_features();
        if self.coef.iter().any(|row| row.len() != width) {
            return Err(ClassifierError::Shape("coefficient rows differ in width".to_string()));
        }
        Ok(())
    }

    /// Width of each coefficient row
    pub fn n_features(&self) -> usize {
        self.coef.first().map(Vec::len).unwrap_or(0)
    }

    /// Decision score per coefficient row
    pub fn decision_function(&self, x: &SparseVector) -> Vec<f64> {
        self.coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, b)| x.dot(row) + b)
            .collect()
    }

    /// Predict the label for one feature vector
    pub fn predict(&self, x: &SparseVector) -> &str {
        let scores = self.decision_function(x);
        let idx = if self.is_binary() {
            usize::from(scores[0] > 0.0)
        } else {
            // first maximum wins on ties
            scores
                .iter()
                .enumerate()
                .fold((0, f64::NEG_INFINITY), |best, (i, s)| if *s > best.1 { (i, *s) } else { best })
                .0
        };
        debug!(?scores, idx, "LinearModel::predict");
        &self.classes[idx]
    }
}
