//! Directional flow-edge labels.
//!
//! A labeled edge is stored under its position-ordered endpoint pair; the
//! original source/destination direction is recovered from the `:LR`/`:RL`
//! suffix on the label, never from key order. `non-edge` is the explicit
//! non-relation class emitted for considered-but-unrelated candidate pairs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::position::Position;

/// Label of the non-relation class.
pub const NON_EDGE_LABEL: &str = "non-edge";

/// Direction of an edge relative to its position-ordered endpoint pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Source precedes destination in position order (`:LR`).
    LeftToRight,
    /// Destination precedes source in position order (`:RL`).
    RightToLeft,
}

impl Direction {
    /// The label suffix (`:LR` / `:RL`).
    #[must_use]
    pub fn suffix(&self) -> &'static str {
        match self {
            Direction::LeftToRight => ":LR",
            Direction::RightToLeft => ":RL",
        }
    }
}

/// A flow-edge label: either a directional relation or `non-edge`.
///
/// # Example
///
/// ```rust
/// use recipeflow_core::{Direction, EdgeLabel, Position};
///
/// // Raw annotation code `v` from a `.flow` file, endpoints out of order:
/// let src = Position::new(0, 4, 2);
/// let dst = Position::new(0, 1, 7);
/// let (key, label) = EdgeLabel::from_raw("v", src, dst);
/// assert_eq!(key, (dst, src)); // stored ordered
/// assert_eq!(label.to_string(), "v-tm:RL");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeLabel {
    /// A directional relation with its corpus tag (e.g. `a`, `d`, `v-tm`).
    Edge {
        /// Canonical relation tag.
        tag: String,
        /// Direction relative to the stored (position-ordered) pair.
        direction: Direction,
    },
    /// Explicitly-considered, non-related pair.
    NonEdge,
}

impl EdgeLabel {
    /// Rewrite a raw annotation code into the training vocabulary.
    ///
    /// `v` (thermal/state change) becomes `v-tm`, `s` (location) becomes
    /// `d`; everything else passes through unchanged.
    #[must_use]
    pub fn canonical_tag(raw: &str) -> &str {
        match raw {
            "v" => "v-tm",
            "s" => "d",
            other => other,
        }
    }

    /// Canonicalize a raw labeled edge: rewrite the tag, order the endpoint
    /// pair by position, and attach the direction suffix that records which
    /// stored endpoint is upstream.
    #[must_use]
    pub fn from_raw(raw: &str, source: Position, dest: Position) -> ((Position, Position), Self) {
        let tag = Self::canonical_tag(raw).to_string();
        if source < dest {
            (
                (source, dest),
                EdgeLabel::Edge {
                    tag,
                    direction: Direction::LeftToRight,
                },
            )
        } else {
            (
                (dest, source),
                EdgeLabel::Edge {
                    tag,
                    direction: Direction::RightToLeft,
                },
            )
        }
    }

    /// The relation tag, if this is not `non-edge`.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        match self {
            EdgeLabel::Edge { tag, .. } => Some(tag),
            EdgeLabel::NonEdge => None,
        }
    }

    /// The direction, if this is not `non-edge`.
    #[must_use]
    pub fn direction(&self) -> Option<Direction> {
        match self {
            EdgeLabel::Edge { direction, .. } => Some(*direction),
            EdgeLabel::NonEdge => None,
        }
    }

    /// Whether this label is the non-relation class.
    #[must_use]
    pub fn is_non_edge(&self) -> bool {
        matches!(self, EdgeLabel::NonEdge)
    }

    /// Label string as used in datasets (`v-tm:LR`, `non-edge`).
    #[must_use]
    pub fn as_label(&self) -> String {
        match self {
            EdgeLabel::Edge { tag, direction } => format!("{}{}", tag, direction.suffix()),
            EdgeLabel::NonEdge => NON_EDGE_LABEL.to_string(),
        }
    }

    /// Parse a dataset label string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownLabel`] if the string is neither `non-edge`
    /// nor a tag with a `:LR`/`:RL` suffix.
    pub fn parse(label: &str) -> Result<Self> {
        if label == NON_EDGE_LABEL {
            return Ok(EdgeLabel::NonEdge);
        }
        if let Some(tag) = label.strip_suffix(":LR") {
            if tag.is_empty() {
                return Err(Error::UnknownLabel(label.to_string()));
            }
            return Ok(EdgeLabel::Edge {
                tag: tag.to_string(),
                direction: Direction::LeftToRight,
            });
        }
        if let Some(tag) = label.strip_suffix(":RL") {
            if tag.is_empty() {
                return Err(Error::UnknownLabel(label.to_string()));
            }
            return Ok(EdgeLabel::Edge {
                tag: tag.to_string(),
                direction: Direction::RightToLeft,
            });
        }
        Err(Error::UnknownLabel(label.to_string()))
    }
}

impl fmt::Display for EdgeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_label())
    }
}

impl FromStr for EdgeLabel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_tag_rewrites() {
        assert_eq!(EdgeLabel::canonical_tag("v"), "v-tm");
        assert_eq!(EdgeLabel::canonical_tag("s"), "d");
        assert_eq!(EdgeLabel::canonical_tag("a"), "a");
        assert_eq!(EdgeLabel::canonical_tag("t-eq"), "t-eq");
    }

    #[test]
    fn test_from_raw_forward() {
        let src = Position::new(0, 1, 2);
        let dst = Position::new(0, 3, 0);
        let (key, label) = EdgeLabel::from_raw("v", src, dst);
        assert_eq!(key, (src, dst));
        assert_eq!(label.as_label(), "v-tm:LR");
    }

    #[test]
    fn test_from_raw_reversed() {
        let src = Position::new(0, 3, 0);
        let dst = Position::new(0, 1, 2);
        let (key, label) = EdgeLabel::from_raw("v", src, dst);
        // Stored key swapped to position order, direction recorded as :RL.
        assert_eq!(key, (dst, src));
        assert_eq!(label.as_label(), "v-tm:RL");
    }

    #[test]
    fn test_parse_roundtrip() {
        for s in ["a:LR", "d:RL", "v-tm:LR", "t-eq:RL", "non-edge"] {
            assert_eq!(EdgeLabel::parse(s).unwrap().as_label(), s);
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(EdgeLabel::parse("a").is_err());
        assert!(EdgeLabel::parse(":LR").is_err());
        assert!(EdgeLabel::parse("a:XY").is_err());
        assert!(EdgeLabel::parse("").is_err());
    }
}
