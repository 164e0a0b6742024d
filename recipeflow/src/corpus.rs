//! r-FG corpus I/O: `.list` / `.flow` parsing and corpus-target resolution.
//!
//! A recipe ships as a file pair sharing a stem:
//!
//! - `<stem>.list` — one token per line:
//!   `doc sent token word pos ner-tag` (space-separated),
//! - `<stem>.flow` — one true edge per line:
//!   `doc sent token label doc sent token`.
//!
//! Malformed lines are fatal for the current file: downstream maps assume
//! complete coverage, so skip-and-continue would silently corrupt them.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs;
use std::ops::Bound;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use recipeflow_core::{BioTag, EdgeLabel, Position};

use crate::error::{Error, Result};

/// One token of a recipe: surface word, POS tag, NER tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    /// Surface word.
    pub word: String,
    /// Part-of-speech tag.
    pub pos: String,
    /// BIO entity tag.
    pub tag: BioTag,
}

/// A labeled edge as read from a `.flow` file, before canonicalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEdge {
    /// Source mention head.
    pub source: Position,
    /// Destination mention head.
    pub dest: Position,
    /// Raw annotation code (`v`, `s`, `a`, `t-eq`, ...).
    pub raw_label: String,
}

/// All tokens of one recipe, keyed and ordered by position.
#[derive(Debug, Clone)]
pub struct Recipe {
    /// Recipe name (file stem).
    pub name: String,
    tokens: BTreeMap<Position, TokenRecord>,
}

impl Recipe {
    /// Parse the contents of a `.list` file.
    ///
    /// # Errors
    ///
    /// Fatal on a line with the wrong field count, a non-integer position
    /// component, an unknown tag, or a duplicate position (a duplicate means
    /// the file pair is desynchronized or corrupt).
    pub fn parse(name: impl Into<String>, text: &str) -> Result<Self> {
        let name = name.into();
        let mut tokens = BTreeMap::new();

        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let items: Vec<&str> = line.split(' ').collect();
            if items.len() != 6 {
                return Err(Error::corpus(format!(
                    "{}:{}: expected 6 fields, found {}",
                    name,
                    lineno + 1,
                    items.len()
                )));
            }
            let position = Position::from_fields(&items[..3]).map_err(|e| {
                Error::corpus(format!("{}:{}: {}", name, lineno + 1, e))
            })?;
            let tag = BioTag::from_label(items[5]).map_err(|e| {
                Error::corpus(format!("{}:{}: {}", name, lineno + 1, e))
            })?;
            let record = TokenRecord {
                word: items[3].to_string(),
                pos: items[4].to_string(),
                tag,
            };
            match tokens.entry(position) {
                Entry::Vacant(slot) => {
                    slot.insert(record);
                }
                Entry::Occupied(_) => {
                    return Err(Error::corpus(format!(
                        "{}:{}: duplicate position {}",
                        name,
                        lineno + 1,
                        position
                    )));
                }
            }
        }

        Ok(Self { name, tokens })
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the recipe has no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token at a position.
    #[must_use]
    pub fn get(&self, position: &Position) -> Option<&TokenRecord> {
        self.tokens.get(position)
    }

    /// NER tag at a position.
    #[must_use]
    pub fn tag(&self, position: &Position) -> Option<BioTag> {
        self.tokens.get(position).map(|t| t.tag)
    }

    /// All tokens in position order.
    pub fn tokens(&self) -> impl Iterator<Item = (&Position, &TokenRecord)> {
        self.tokens.iter()
    }

    /// Tokens of one sentence, identified by its `(doc, sent)` prefix, in
    /// position order.
    pub fn sentence(&self, doc: u32, sent: u32) -> impl Iterator<Item = (&Position, &TokenRecord)> {
        let lo = Position::new(doc, sent, 0);
        let hi = Position::new(doc, sent, u32::MAX);
        self.tokens
            .range((Bound::Included(lo), Bound::Included(hi)))
    }

    /// Surface text of one sentence, space-joined.
    #[must_use]
    pub fn sentence_text(&self, doc: u32, sent: u32) -> String {
        let words: Vec<&str> = self
            .sentence(doc, sent)
            .map(|(_, t)| t.word.as_str())
            .collect();
        words.join(" ")
    }

    /// Group tokens into sentences, closing a sentence after a token whose
    /// POS tag is `.`. A trailing run without a closing period still forms a
    /// final sentence.
    #[must_use]
    pub fn split_into_sentences(&self) -> Vec<Vec<(Position, &TokenRecord)>> {
        let mut sentences = Vec::new();
        let mut current = Vec::new();
        for (position, record) in &self.tokens {
            current.push((*position, record));
            if record.pos == "." {
                sentences.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            sentences.push(current);
        }
        sentences
    }

    /// Positions of every token that begins (or wholly constitutes) an
    /// entity mention, in scan order.
    #[must_use]
    pub fn mention_starts(&self) -> Vec<Position> {
        self.tokens
            .iter()
            .filter(|(_, t)| t.tag.is_mention_start())
            .map(|(p, _)| *p)
            .collect()
    }
}

/// The true edges of one recipe as read from its `.flow` file.
#[derive(Debug, Clone, Default)]
pub struct FlowAnnotations {
    /// Edges in file order, direction as annotated.
    pub edges: Vec<RawEdge>,
}

impl FlowAnnotations {
    /// Parse the contents of a `.flow` file.
    ///
    /// # Errors
    ///
    /// Fatal on a line with the wrong field count or a malformed position.
    pub fn parse(name: &str, text: &str) -> Result<Self> {
        let mut edges = Vec::new();

        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let items: Vec<&str> = line.split(' ').collect();
            if items.len() != 7 {
                return Err(Error::corpus(format!(
                    "{}:{}: expected 7 fields, found {}",
                    name,
                    lineno + 1,
                    items.len()
                )));
            }
            let source = Position::from_fields(&items[..3]).map_err(|e| {
                Error::corpus(format!("{}:{}: {}", name, lineno + 1, e))
            })?;
            let dest = Position::from_fields(&items[4..]).map_err(|e| {
                Error::corpus(format!("{}:{}: {}", name, lineno + 1, e))
            })?;
            edges.push(RawEdge {
                source,
                dest,
                raw_label: items[3].to_string(),
            });
        }

        Ok(Self { edges })
    }

    /// Number of annotated edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Canonicalized edge labels keyed by the position-ordered endpoint
    /// pair. Direction is recovered from the label suffix, never from key
    /// order.
    #[must_use]
    pub fn label_map(&self) -> BTreeMap<(Position, Position), EdgeLabel> {
        let mut labels = BTreeMap::new();
        for edge in &self.edges {
            let (key, label) = EdgeLabel::from_raw(&edge.raw_label, edge.source, edge.dest);
            labels.insert(key, label);
        }
        labels
    }
}

/// One recipe with its true-edge annotations.
#[derive(Debug, Clone)]
pub struct RecipePair {
    /// Recipe tokens.
    pub recipe: Recipe,
    /// True flow edges.
    pub flow: FlowAnnotations,
}

impl RecipePair {
    /// Verify that every edge endpoint refers to a token of the recipe.
    ///
    /// # Errors
    ///
    /// A dangling endpoint signals a desynchronized `.list`/`.flow` pair and
    /// is fatal.
    pub fn validate(&self) -> Result<()> {
        for edge in &self.flow.edges {
            for endpoint in [&edge.source, &edge.dest] {
                if self.recipe.get(endpoint).is_none() {
                    return Err(Error::corpus(format!(
                        "{}: flow edge endpoint {} has no token record",
                        self.recipe.name, endpoint
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Recipe corpus targets.
///
/// `r-300` is the union of `r-100` and `r-200`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorpusTarget {
    /// The r-100 corpus.
    R100,
    /// The r-200 corpus.
    R200,
    /// r-100 and r-200 combined.
    R300,
}

impl CorpusTarget {
    /// Canonical target name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            CorpusTarget::R100 => "r-100",
            CorpusTarget::R200 => "r-200",
            CorpusTarget::R300 => "r-300",
        }
    }

    /// Corpus subdirectories this target draws from.
    #[must_use]
    pub fn directories(&self) -> &'static [&'static str] {
        match self {
            CorpusTarget::R100 => &["r-100"],
            CorpusTarget::R200 => &["r-200"],
            CorpusTarget::R300 => &["r-100", "r-200"],
        }
    }
}

impl FromStr for CorpusTarget {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "r-100" => Ok(CorpusTarget::R100),
            "r-200" => Ok(CorpusTarget::R200),
            "r-300" => Ok(CorpusTarget::R300),
            other => Err(Error::UnknownTarget(other.to_string())),
        }
    }
}

impl std::fmt::Display for CorpusTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Load every recipe of a corpus target from a corpus root directory.
///
/// `.list`/`.flow` files are globbed per target subdirectory, sorted, and
/// paired by stem; a stem present on one side only is fatal.
///
/// # Errors
///
/// Fails on unreadable files, malformed lines, unpaired stems, or flow
/// endpoints without token records.
pub fn load_corpus(root: &Path, target: CorpusTarget) -> Result<Vec<RecipePair>> {
    let mut list_files: Vec<PathBuf> = Vec::new();
    let mut flow_files: Vec<PathBuf> = Vec::new();

    for dir in target.directories() {
        let base = root.join(dir);
        list_files.extend(glob_sorted(&base, "*.list")?);
        flow_files.extend(glob_sorted(&base, "*.flow")?);
    }
    list_files.sort();
    flow_files.sort();

    if list_files.len() != flow_files.len() {
        return Err(Error::corpus(format!(
            "corpus {}: {} .list files but {} .flow files",
            target,
            list_files.len(),
            flow_files.len()
        )));
    }

    let mut pairs = Vec::with_capacity(list_files.len());
    for (list_path, flow_path) in list_files.iter().zip(&flow_files) {
        let list_stem = file_stem(list_path);
        let flow_stem = file_stem(flow_path);
        if list_stem != flow_stem {
            return Err(Error::corpus(format!(
                "unpaired corpus files: {:?} vs {:?}",
                list_path, flow_path
            )));
        }

        let recipe = Recipe::parse(list_stem, &fs::read_to_string(list_path)?)?;
        let flow = FlowAnnotations::parse(&recipe.name, &fs::read_to_string(flow_path)?)?;
        let pair = RecipePair { recipe, flow };
        pair.validate()?;
        pairs.push(pair);
    }

    log::info!(
        "loaded corpus {}: {} recipes, {} edges",
        target,
        pairs.len(),
        pairs.iter().map(|p| p.flow.edge_count()).sum::<usize>()
    );
    Ok(pairs)
}

fn glob_sorted(base: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let full = base.join(pattern);
    let full = full.to_string_lossy();
    let mut paths = Vec::new();
    for entry in glob::glob(&full)? {
        match entry {
            Ok(path) => paths.push(path),
            Err(e) => return Err(Error::Io(e.into())),
        }
    }
    paths.sort();
    Ok(paths)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
