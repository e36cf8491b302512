//! TF-IDF vectorizer
//!
//! Applies a vocabulary and IDF weights fitted elsewhere. Tokenization follows
//! the common `\b\w\w+\b` convention: words of two or more word characters,
//! lowercased unless disabled.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

use crate::error::ClassifierError;

static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("valid token pattern"));

/// Row normalization applied after weighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    #[default]
    L2,
    None,
}

/// Sparse feature vector, entries sorted by feature index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    pub dim: usize,
    pub entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Dot product against a dense weight row
    pub fn dot(&self, weights: &[f64]) -> f64 {
        self.entries
            .iter()
            .filter_map(|(i, v)| weights.get(*i).map(|w| w * v))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt()
    }
}

fn default_true() -> bool {
    true
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

/// Fitted TF-IDF vectorizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    /// Term to feature index
    pub vocabulary: HashMap<String, usize>,

    /// Inverse document frequency per feature index
    pub idf: Vec<f64>,

    #[serde(default = "default_true")]
    pub lowercase: bool,

    #[serde(default)]
    pub sublinear_tf: bool,

    #[serde(default)]
    pub norm: Norm,

    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
}

impl TfidfVectorizer {
    /// Load a vectorizer artifact from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "TfidfVectorizer::load: called");
        let content = std::fs::read_to_string(path).map_err(|source| ClassifierError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let vectorizer: Self = serde_json::from_str(&content).map_err(|source| ClassifierError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        vectorizer.validate()?;
        Ok(vectorizer)
    }

    /// Check that every vocabulary index has an IDF weight
    pub fn validate(&self) -> Result<(), ClassifierError> {
        if let Some((term, idx)) = self.vocabulary.iter().find(|(_, idx)| **idx >= self.idf.len()) {
            return Err(ClassifierError::Shape(format!(
                "term '{}' maps to index {} but idf has {} entries",
                term,
                idx,
                self.idf.len()
            )));
        }
        let (lo, hi) = self.ngram_range;
        if lo == 0 || lo > hi {
            return Err(ClassifierError::Shape(format!("invalid ngram range ({}, {})", lo, hi)));
        }
        Ok(())
    }

    /// Number of output features
    pub fn dim(&self) -> usize {
        self.idf.len()
    }

    pub fn is_fitted(&self) -> bool {
        !self.vocabulary.is_empty()
    }

    /// Split a document into analyzer terms (tokens and space-joined n-grams)
    pub fn analyze(&self, doc: &str) -> Vec<String> {
        let doc = if self.lowercase { doc.to_lowercase() } else { doc.to_string() };
        let tokens = tokenize(&doc);
        let (lo, hi) = self.ngram_range;
        let mut terms = Vec::new();
        for n in lo..=hi {
            if n == 1 {
                terms.extend(tokens.iter().cloned());
            } else {
                terms.extend(tokens.windows(n).map(|w| w.join(" ")));
            }
        }
        terms
    }

    /// Transform one document into a weighted, normalized sparse vector
    pub fn transform(&self, doc: &str) -> Result<SparseVector, ClassifierError> {
        if !self.is_fitted() {
            return Err(ClassifierError::NotFitted);
        }

        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in self.analyze(doc) {
            if let Some(idx) = self.vocabulary.get(&term) {
                *counts.entry(*idx).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(idx, tf)| {
                let tf = if self.sublinear_tf { 1.0 + tf.ln() } else { tf };
                (idx, tf * self.idf[idx])
            })
            .collect();

        if self.norm == Norm::L2 {
            let norm = entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                for (_, v) in entries.iter_mut() {
                    *v /= norm;
                }
            }
        }

        debug!(features = entries.len(), "TfidfVectorizer::transform: done");
        Ok(SparseVector {
            dim: self.dim(),
            entries,
        })
    }
}

/// Extract word tokens of two or more characters
pub fn tokenize(doc: &str) -> Vec<String> {
    TOKEN_PATTERN.find_iter(doc).map(|m| m.as_str().to_string()).collect()
}
