//! Message-in, response-out helper shared by the CLI and web front ends

use std::fmt;

use crate::classifier::Classifier;
use crate::error::ClassifierError;

/// Text shown when the user submits nothing
pub const EMPTY_PROMPT: &str = "Please enter a message.";

/// Outcome of a free-text query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Input was blank; ask again
    Prompt,
    /// Label predicted for the input
    Response(String),
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prompt => write!(f, "{}", EMPTY_PROMPT),
            Self::Response(label) => write!(f, "Bot Response: {}", label),
        }
    }
}

/// Answer one message. Blank input is not an error.
pub fn reply(classifier: &dyn Classifier, input: &str) -> Result<Reply, ClassifierError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Reply::Prompt);
    }
    classifier.predict(input).map(Reply::Response)
}
