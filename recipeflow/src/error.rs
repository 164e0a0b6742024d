//! Error types for the recipeflow crate.

use thiserror::Error;

/// Result type for recipeflow operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for recipeflow operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Core type error (malformed key, unknown tag/label).
    #[error(transparent)]
    Core(#[from] recipeflow_core::Error),

    /// Corpus file is malformed or a `.list`/`.flow` pair is desynchronized.
    #[error("Corpus error: {0}")]
    Corpus(String),

    /// A marked sentence failed the marker sanity check.
    #[error("Marker error: {0}")]
    Marker(String),

    /// Unrecognized corpus target name.
    #[error("Unknown corpus target: {0:?} (expected r-100, r-200 or r-300)")]
    UnknownTarget(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid glob pattern while resolving corpus files.
    #[error("Glob error: {0}")]
    Glob(#[from] glob::PatternError),
}

impl Error {
    /// Create a corpus error.
    #[must_use]
    pub fn corpus(msg: impl Into<String>) -> Self {
        Self::Corpus(msg.into())
    }

    /// Create a marker error.
    #[must_use]
    pub fn marker(msg: impl Into<String>) -> Self {
        Self::Marker(msg.into())
    }
}
