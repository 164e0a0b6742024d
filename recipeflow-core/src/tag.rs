//! Entity tags of the r-FG recipe corpus and their BIO wrapping.
//!
//! A token is tagged `O`, `<base>-B` (begin span) or `<base>-I` (inside
//! span). The base vocabulary is fixed by the corpus annotation guidelines;
//! an unrecognized base tag in an input file is a parse error, not a new
//! category.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Base entity-tag vocabulary of the r-FG corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityTag {
    /// Action by the chef (`Ac`)
    Action,
    /// Discourse-level action by the chef (`Ac2`)
    Action2,
    /// Action by food (`Af`)
    FoodAction,
    /// Action by tool (`At`)
    ToolAction,
    /// Duration (`D`)
    Duration,
    /// Food (`F`)
    Food,
    /// Quantity (`Q`)
    Quantity,
    /// State of food (`Sf`)
    FoodState,
    /// State of tool (`St`)
    ToolState,
    /// Tool (`T`)
    Tool,
}

impl EntityTag {
    /// All base tags, in corpus-label order.
    pub const ALL: [EntityTag; 10] = [
        EntityTag::Action,
        EntityTag::Action2,
        EntityTag::FoodAction,
        EntityTag::ToolAction,
        EntityTag::Duration,
        EntityTag::Food,
        EntityTag::Quantity,
        EntityTag::FoodState,
        EntityTag::ToolState,
        EntityTag::Tool,
    ];

    /// Corpus label string.
    #[must_use]
    pub fn as_label(&self) -> &'static str {
        match self {
            EntityTag::Action => "Ac",
            EntityTag::Action2 => "Ac2",
            EntityTag::FoodAction => "Af",
            EntityTag::ToolAction => "At",
            EntityTag::Duration => "D",
            EntityTag::Food => "F",
            EntityTag::Quantity => "Q",
            EntityTag::FoodState => "Sf",
            EntityTag::ToolState => "St",
            EntityTag::Tool => "T",
        }
    }

    /// Parse a corpus label string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTag`] for anything outside the vocabulary.
    pub fn from_label(label: &str) -> Result<Self> {
        match label {
            "Ac" => Ok(EntityTag::Action),
            "Ac2" => Ok(EntityTag::Action2),
            "Af" => Ok(EntityTag::FoodAction),
            "At" => Ok(EntityTag::ToolAction),
            "D" => Ok(EntityTag::Duration),
            "F" => Ok(EntityTag::Food),
            "Q" => Ok(EntityTag::Quantity),
            "Sf" => Ok(EntityTag::FoodState),
            "St" => Ok(EntityTag::ToolState),
            "T" => Ok(EntityTag::Tool),
            other => Err(Error::UnknownTag(other.to_string())),
        }
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_label())
    }
}

impl FromStr for EntityTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_label(s)
    }
}

/// A token-level BIO tag: outside, span begin, or span continuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BioTag {
    /// The token belongs to no entity span (`O`).
    Outside,
    /// First token of a span (`<base>-B`).
    Begin(EntityTag),
    /// Continuation of the immediately preceding token's span (`<base>-I`).
    Inside(EntityTag),
}

impl BioTag {
    /// The base entity tag, if any.
    #[must_use]
    pub fn base(&self) -> Option<EntityTag> {
        match self {
            BioTag::Outside => None,
            BioTag::Begin(t) | BioTag::Inside(t) => Some(*t),
        }
    }

    /// Whether this tag begins (or wholly constitutes) an entity mention.
    ///
    /// These are the representative positions used for candidate pair
    /// generation: `-I` continuations and `O` are excluded.
    #[must_use]
    pub fn is_mention_start(&self) -> bool {
        matches!(self, BioTag::Begin(_))
    }

    /// Whether this tag is a span continuation (`-I`).
    #[must_use]
    pub fn is_inside(&self) -> bool {
        matches!(self, BioTag::Inside(_))
    }

    /// Whether this tag is `O`.
    #[must_use]
    pub fn is_outside(&self) -> bool {
        matches!(self, BioTag::Outside)
    }

    /// Whether this tag continues a span opened (or continued) by `prev`.
    ///
    /// `X-I` continues `X-B` and `X-I`; `O` never continues anything and
    /// nothing continues `O`.
    #[must_use]
    pub fn continues(&self, prev: &BioTag) -> bool {
        match (prev, self) {
            (BioTag::Begin(p) | BioTag::Inside(p), BioTag::Inside(t)) => p == t,
            _ => false,
        }
    }

    /// Corpus label string (`O`, `F-B`, `Ac-I`, ...).
    #[must_use]
    pub fn as_label(&self) -> String {
        match self {
            BioTag::Outside => "O".to_string(),
            BioTag::Begin(t) => format!("{}-B", t.as_label()),
            BioTag::Inside(t) => format!("{}-I", t.as_label()),
        }
    }

    /// Parse a corpus BIO label.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTag`] for an unknown base tag or suffix.
    pub fn from_label(label: &str) -> Result<Self> {
        if label == "O" {
            return Ok(BioTag::Outside);
        }
        if let Some(base) = label.strip_suffix("-B") {
            return Ok(BioTag::Begin(EntityTag::from_label(base)?));
        }
        if let Some(base) = label.strip_suffix("-I") {
            return Ok(BioTag::Inside(EntityTag::from_label(base)?));
        }
        Err(Error::UnknownTag(label.to_string()))
    }
}

impl fmt::Display for BioTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_label())
    }
}

impl FromStr for BioTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_label(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bio_label_roundtrip() {
        for tag in EntityTag::ALL {
            for bio in [BioTag::Begin(tag), BioTag::Inside(tag)] {
                assert_eq!(BioTag::from_label(&bio.as_label()).unwrap(), bio);
            }
        }
        assert_eq!(BioTag::from_label("O").unwrap(), BioTag::Outside);
    }

    #[test]
    fn test_unknown_tag_is_error() {
        assert!(BioTag::from_label("X-B").is_err());
        assert!(BioTag::from_label("F").is_err());
        assert!(BioTag::from_label("F-E").is_err());
        assert!(EntityTag::from_label("PER").is_err());
    }

    #[test]
    fn test_continuation() {
        let fb = BioTag::Begin(EntityTag::Food);
        let fi = BioTag::Inside(EntityTag::Food);
        let tb = BioTag::Begin(EntityTag::Tool);
        let ti = BioTag::Inside(EntityTag::Tool);

        assert!(fi.continues(&fb));
        assert!(fi.continues(&fi));
        assert!(!ti.continues(&fb));
        assert!(!tb.continues(&fb));
        assert!(!fi.continues(&BioTag::Outside));
        // O never continues anything, including another O
        assert!(!BioTag::Outside.continues(&BioTag::Outside));
        assert!(!BioTag::Outside.continues(&fb));
    }

    #[test]
    fn test_mention_start() {
        assert!(BioTag::Begin(EntityTag::Tool).is_mention_start());
        assert!(!BioTag::Inside(EntityTag::Tool).is_mention_start());
        assert!(!BioTag::Outside.is_mention_start());
    }
}
