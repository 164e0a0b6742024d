//! Token positions and their canonical string keys.
//!
//! Every token in an r-FG corpus file is addressed by a triple
//! `(document, sentence, token)`. The triple is totally ordered
//! lexicographically, which is what makes "source precedes destination"
//! well-defined for directional edge labels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Delimiter used in canonical position keys (`"3;1;7"`).
pub const KEY_DELIMITER: char = ';';

/// A token position: `(doc, sent, token)`, ordered lexicographically.
///
/// The document index is part of the key, so positions from different
/// documents never compare equal even when sentence/token numbering repeats.
///
/// # Example
///
/// ```rust
/// use recipeflow_core::Position;
///
/// let p = Position::new(3, 1, 7);
/// assert_eq!(p.encode(), "3;1;7");
/// assert_eq!(Position::decode("3;1;7").unwrap(), p);
/// assert!(Position::new(3, 1, 7) < Position::new(3, 2, 0));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Position {
    /// Document index within the corpus file.
    pub doc: u32,
    /// Sentence index within the document.
    pub sent: u32,
    /// Token index within the sentence.
    pub token: u32,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub fn new(doc: u32, sent: u32, token: u32) -> Self {
        Self { doc, sent, token }
    }

    /// Encode to the canonical string key (`doc;sent;token`).
    #[must_use]
    pub fn encode(&self) -> String {
        format!(
            "{}{}{}{}{}",
            self.doc, KEY_DELIMITER, self.sent, KEY_DELIMITER, self.token
        )
    }

    /// Decode a canonical string key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedKey`] if the key does not split into exactly
    /// three integer components. Downstream maps assume complete coverage, so
    /// callers must treat this as fatal for the current file rather than
    /// skip-and-continue.
    pub fn decode(key: &str) -> Result<Self> {
        let parts: Vec<&str> = key.split(KEY_DELIMITER).collect();
        if parts.len() != 3 {
            return Err(Error::malformed_key(key));
        }
        Self::from_fields(&parts).map_err(|_| Error::malformed_key(key))
    }

    /// Build a position from exactly three textual integer fields (as they
    /// appear in `.list`/`.flow` lines).
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedKey`] on a wrong field count or a
    /// non-integer component.
    pub fn from_fields(fields: &[&str]) -> Result<Self> {
        if fields.len() != 3 {
            return Err(Error::malformed_key(fields.join(" ")));
        }
        let parse = |s: &str| -> Result<u32> {
            s.parse::<u32>().map_err(|_| Error::malformed_key(s))
        };
        Ok(Self {
            doc: parse(fields[0])?,
            sent: parse(fields[1])?,
            token: parse(fields[2])?,
        })
    }

    /// The `(doc, sent)` prefix identifying the sentence this token lives in.
    #[must_use]
    pub fn sentence_id(&self) -> (u32, u32) {
        (self.doc, self.sent)
    }

    /// Whether two positions fall in the same sentence of the same document.
    #[must_use]
    pub fn same_sentence(&self, other: &Self) -> bool {
        self.sentence_id() == other.sentence_id()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}
