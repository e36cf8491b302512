//! Classifier trait and the artifact-backed implementation

use std::path::Path;
use tracing::{debug, info};

use crate::error::ClassifierError;
use crate::model::LinearModel;
use crate::vectorizer::TfidfVectorizer;

/// Text-to-label predictor
pub trait Classifier: Send + Sync {
    /// Predict a label for raw text
    fn predict(&self, text: &str) -> Result<String, ClassifierError>;
}

/// Vectorizer and model pair loaded from disk
#[derive(Debug, Clone)]
pub struct ArtifactClassifier {
    vectorizer: TfidfVectorizer,
    model: LinearModel,
}

impl ArtifactClassifier {
    /// Pair an already-loaded vectorizer and model
    pub fn new(vectorizer: TfidfVectorizer, model: LinearModel) -> Result<Self, ClassifierError> {
        vectorizer.validate()?;
        model.validate()?;
        if vectorizer.dim() != model.n_features() {
            return Err(ClassifierError::Shape(format!(
                "vectorizer produces {} features but model expects {}",
                vectorizer.dim(),
                model.n_features()
            )));
        }
        Ok(Self { vectorizer, model })
    }

    /// Load both artifacts
    pub fn load(vectorizer_path: impl AsRef<Path>, model_path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        debug!(
            vectorizer = %vectorizer_path.as_ref().display(),
            model = %model_path.as_ref().display(),
            "ArtifactClassifier::load: called"
        );
        let vectorizer = TfidfVectorizer::load(vectorizer_path)?;
        let model = LinearModel::load(model_path)?;
        let classifier = Self::new(vectorizer, model)?;
        info!(
            vocabulary = classifier.vectorizer.vocabulary.len(),
            classes = classifier.model.classes.len(),
            "Loaded classifier artifacts"
        );
        Ok(classifier)
    }

    pub fn classes(&self) -> &[String] {
        &self.model.classes
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vectorizer.vocabulary.len()
    }

    pub fn ngram_range(&self) -> (usize, usize) {
        self.vectorizer.ngram_range
    }
}

impl Classifier for ArtifactClassifier {
    fn predict(&self, text: &str) -> Result<String, ClassifierError> {
        debug!(%text, "ArtifactClassifier::predict: called");
        let x = self.vectorizer.transform(text)?;
        Ok(self.model.predict(&x).to_string())
    }
}
