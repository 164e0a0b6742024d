//! Relation-type allowlist: which ordered entity-tag pairs ever relate.
//!
//! Built by scanning the true edges of a corpus and recording the ordered
//! base-tag pair of every edge's endpoints. Candidate-pair generation later
//! consults the set in both directions, so recording one direction per
//! observed edge is sufficient.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use recipeflow_core::EntityTag;

use crate::corpus::RecipePair;
use crate::error::{Error, Result};

/// Separator in serialized pair entries (`"F->Ac"`).
const PAIR_ARROW: &str = "->";

/// The set of ordered entity-tag pairs observed on true edges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationSet {
    pairs: BTreeSet<String>,
}

impl RelationSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the set from a corpus, one entry per true edge's ordered
    /// endpoint-tag pair.
    ///
    /// # Errors
    ///
    /// Fails if an edge endpoint has no token record or carries the `O`
    /// tag; either means the `.list`/`.flow` pair is desynchronized.
    pub fn from_corpus<'a>(recipes: impl IntoIterator<Item = &'a RecipePair>) -> Result<Self> {
        let mut set = Self::new();
        for pair in recipes {
            for edge in &pair.flow.edges {
                let source = endpoint_tag(pair, edge.source)?;
                let dest = endpoint_tag(pair, edge.dest)?;
                set.insert(source, dest);
            }
        }
        log::debug!("relation set built: {} tag pairs", set.len());
        Ok(set)
    }

    /// Record that `source -> dest` was observed.
    pub fn insert(&mut self, source: EntityTag, dest: EntityTag) {
        self.pairs.insert(entry(source, dest));
    }

    /// Whether `source -> dest` was observed, in that order.
    #[must_use]
    pub fn contains(&self, source: EntityTag, dest: EntityTag) -> bool {
        self.pairs.contains(&entry(source, dest))
    }

    /// Whether the pair was observed in either direction.
    #[must_use]
    pub fn allows_either(&self, a: EntityTag, b: EntityTag) -> bool {
        self.contains(a, b) || self.contains(b, a)
    }

    /// Number of recorded tag pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether no pair has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Recorded entries in sorted order (`"F->Ac"` form).
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(String::as_str)
    }

    /// Write the set to a JSON file as a sorted string array.
    ///
    /// # Errors
    ///
    /// Fails on IO or serialization errors.
    pub fn save(&self, path: &Path) -> Result<()> {
        let entries: Vec<&str> = self.entries().collect();
        fs::write(path, serde_json::to_string_pretty(&entries)?)?;
        Ok(())
    }

    /// Read a set previously written by [`save`](Self::save).
    ///
    /// # Errors
    ///
    /// Fails on IO errors, invalid JSON, or entries that are not
    /// `"TAG->TAG"` with known tags.
    pub fn load(path: &Path) -> Result<Self> {
        let entries: Vec<String> = serde_json::from_str(&fs::read_to_string(path)?)?;
        let mut set = Self::new();
        for item in &entries {
            let (source, dest) = item.split_once(PAIR_ARROW).ok_or_else(|| {
                Error::corpus(format!("malformed relation-set entry {item:?}"))
            })?;
            set.insert(EntityTag::from_label(source)?, EntityTag::from_label(dest)?);
        }
        Ok(set)
    }
}

fn entry(source: EntityTag, dest: EntityTag) -> String {
    format!("{}{}{}", source.as_label(), PAIR_ARROW, dest.as_label())
}

fn endpoint_tag(pair: &RecipePair, position: recipeflow_core::Position) -> Result<EntityTag> {
    let tag = pair.recipe.tag(&position).ok_or_else(|| {
        Error::corpus(format!(
            "{}: edge endpoint {} has no token record",
            pair.recipe.name, position
        ))
    })?;
    tag.base().ok_or_else(|| {
        Error::corpus(format!(
            "{}: edge endpoint {} is tagged O",
            pair.recipe.name, position
        ))
    })
}
