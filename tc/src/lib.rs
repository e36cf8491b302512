//! TextClass - pre-fitted TF-IDF text classifier
//!
//! Loads a fitted vectorizer and a fitted linear model from JSON artifacts and
//! maps raw text to a label. Nothing here trains or mutates a model.
//!
//! # Artifacts
//!
//! ```text
//! models/
//! ├── tfidf_vectorizer.json   # vocabulary, idf, analyzer options
//! └── conversation_model.json # classes, coef rows, intercepts
//! ```
//!
//! # Example
//!
//! ```ignore
//! use textclass::{ArtifactClassifier, Classifier};
//!
//! let classifier = ArtifactClassifier::load("models/tfidf_vectorizer.json", "models/conversation_model.json")?;
//! let label = classifier.predict("hello there")?;
//! ```

pub mod chat;
pub mod cli;
pub mod config;
mod classifier;
mod error;
mod model;
mod vectorizer;

pub use chat::{EMPTY_PROMPT, Reply, reply};
pub use classifier::{ArtifactClassifier, Classifier};
pub use error::ClassifierError;
pub use model::LinearModel;
pub use vectorizer::{Norm, SparseVector, TfidfVectorizer, tokenize};

/// Default vectorizer artifact location, relative to the working directory
pub const DEFAULT_VECTORIZER_FILE: &str = "models/tfidf_vectorizer.json";

/// Default model artifact location, relative to the working directory
pub const DEFAULT_MODEL_FILE: &str = "models/conversation_model.json";
