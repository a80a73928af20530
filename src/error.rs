//! Error types for chunkeval.

use thiserror::Error;

/// Result type for chunkeval operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for chunkeval operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Two brackets overlap without either containing the other. Well-formed
    /// constituent structure never produces this; it signals malformed input.
    #[error("crossing brackets: {0} and {1}")]
    CrossingBrackets(String, String),

    /// Gold and predicted token sequences differ for an aligned sentence.
    #[error("sentence {index}: token sequences do not match\n  gold:      {gold}\n  predicted: {pred}")]
    SentenceMismatch {
        /// 1-based sentence index.
        index: usize,
        /// Gold-standard token sequence.
        gold: String,
        /// Predicted token sequence.
        pred: String,
    },

    /// Malformed chunked or POS input.
    #[error("parse error: {0}")]
    Parse(String),

    /// Corpus-shape failure during evaluation.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a crossing-brackets error from the offending pair.
    pub fn crossing(a: impl Into<String>, b: impl Into<String>) -> Self {
        Error::CrossingBrackets(a.into(), b.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }

    /// Create an evaluation error.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Error::Evaluation(msg.into())
    }
}
