//! Error types for recipeflow-core.

use thiserror::Error;

/// Result type for recipeflow-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for recipeflow-core operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A position key did not split into exactly three integer components.
    #[error("Malformed position key: {0:?}")]
    MalformedKey(String),

    /// An NER tag string outside the r-FG vocabulary.
    #[error("Unknown entity tag: {0:?}")]
    UnknownTag(String),

    /// An edge label string that is neither `non-edge` nor `tag:LR`/`tag:RL`.
    #[error("Unknown edge label: {0:?}")]
    UnknownLabel(String),
}

impl Error {
    /// Create a malformed key error.
    #[must_use]
    pub fn malformed_key(key: impl Into<String>) -> Self {
        Self::MalformedKey(key.into())
    }
}
