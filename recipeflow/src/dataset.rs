//! Relation-classification dataset assembly.
//!
//! Walks a corpus, labels every candidate mention pair from the true-edge
//! map (or `non-edge`), rebalances by undersampling the `non-edge` class,
//! and splits into train/validation stratified by label. Output is JSONL
//! per split plus a label-vocabulary file.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use recipeflow_core::{EdgeLabel, Position, NON_EDGE_LABEL};

use crate::corpus::{CorpusTarget, RecipePair};
use crate::error::{Error, Result};
use crate::marker::{mark_pair, MarkerStyle};
use crate::pairs::{candidate_pairs, PairStats};
use crate::relations::RelationSet;

/// The rare label patched by example duplication on the small corpora.
const RARE_LABEL: &str = "t-eq:RL";

/// How candidate pairs are rendered into example text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExampleStyle {
    /// Bare `<e1>`/`<e2>` entity markers.
    #[default]
    Untyped,
    /// Entity markers with type attributes (`<e1 type=F>`).
    Typed,
    /// Marker-free: the two mention words, then the unmarked sentence(s).
    Directional,
}

impl ExampleStyle {
    /// Canonical style name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ExampleStyle::Untyped => "untyped",
            ExampleStyle::Typed => "typed",
            ExampleStyle::Directional => "directional",
        }
    }
}

impl FromStr for ExampleStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "untyped" => Ok(ExampleStyle::Untyped),
            "typed" => Ok(ExampleStyle::Typed),
            "directional" => Ok(ExampleStyle::Directional),
            other => Err(Error::corpus(format!(
                "unknown example style {other:?} (expected untyped, typed or directional)"
            ))),
        }
    }
}

/// One labeled classifier example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairExample {
    /// First text segment.
    pub first: String,
    /// Second segment, absent for single-segment inputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second: Option<String>,
    /// Edge label or `non-edge`.
    pub label: String,
}

/// A train/validation split ready for serialization.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Training examples.
    pub train: Vec<PairExample>,
    /// Validation examples.
    pub valid: Vec<PairExample>,
}

impl Dataset {
    /// Total example count across splits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.train.len() + self.valid.len()
    }

    /// Whether both splits are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.train.is_empty() && self.valid.is_empty()
    }

    /// Sorted label vocabulary over both splits.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self
            .train
            .iter()
            .chain(&self.valid)
            .map(|e| e.label.as_str())
            .collect();
        labels.sort_unstable();
        labels.dedup();
        labels
    }

    /// Write `train.jsonl`, `valid.jsonl` and `labels.json` into a
    /// directory.
    ///
    /// # Errors
    ///
    /// Fails on IO or serialization errors.
    pub fn write(&self, dir: &Path) -> Result<()> {
        write_jsonl(&dir.join("train.jsonl"), &self.train)?;
        write_jsonl(&dir.join("valid.jsonl"), &self.valid)?;
        std::fs::write(
            dir.join("labels.json"),
            serde_json::to_string_pretty(&self.labels())?,
        )?;
        Ok(())
    }
}

fn write_jsonl(path: &Path, examples: &[PairExample]) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for example in examples {
        serde_json::to_writer(&mut out, example)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

/// Configurable dataset assembly.
#[derive(Debug, Clone)]
pub struct DatasetBuilder {
    style: ExampleStyle,
    undersample: f64,
    seed: u64,
    valid_fraction: f64,
}

impl DatasetBuilder {
    /// Create a builder with the default undersampling factor (none), seed
    /// and 80/20 split.
    #[must_use]
    pub fn new(style: ExampleStyle) -> Self {
        Self {
            style,
            undersample: 0.0,
            seed: 42,
            valid_fraction: 0.2,
        }
    }

    /// Fraction of `non-edge` examples to drop, clamped to `[0, 1]`.
    #[must_use]
    pub fn undersample(mut self, factor: f64) -> Self {
        self.undersample = factor.clamp(0.0, 1.0);
        self
    }

    /// RNG seed for undersampling and the shuffle-split.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Fraction of each label group held out for validation.
    #[must_use]
    pub fn valid_fraction(mut self, fraction: f64) -> Self {
        self.valid_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    /// Assemble the dataset for a corpus.
    ///
    /// # Errors
    ///
    /// Fails on marker sanity violations or desynchronized corpus files.
    pub fn build(
        &self,
        recipes: &[RecipePair],
        relations: &RelationSet,
        target: CorpusTarget,
    ) -> Result<Dataset> {
        let mut examples = Vec::new();
        let mut stats = PairStats::default();
        let mut edge_total = 0usize;

        for pair in recipes {
            edge_total += pair.flow.edge_count();
            let labels = pair.flow.label_map();
            for (e1, e2) in candidate_pairs(&pair.recipe, relations, &mut stats) {
                let label = labels
                    .get(&(e1, e2))
                    .map_or_else(|| NON_EDGE_LABEL.to_string(), EdgeLabel::as_label);
                examples.push(self.render(pair, e1, e2, label)?);
            }
        }
        log::info!(
            "candidate pairs: {} accepted, {} rejected",
            stats.accepted,
            stats.rejected
        );

        let positives = examples.iter().filter(|e| e.label != NON_EDGE_LABEL).count();
        if positives != edge_total {
            // The allowlist is recall-oriented; a shortfall here means true
            // edges were pruned or the corpus is inconsistent.
            log::warn!(
                "{} positive examples for {} true edges",
                positives,
                edge_total
            );
        }

        if target != CorpusTarget::R300 {
            patch_rare_label(&mut examples);
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        self.undersample_non_edge(&mut examples, &mut rng);
        Ok(self.split(examples, &mut rng))
    }

    fn render(
        &self,
        pair: &RecipePair,
        e1: Position,
        e2: Position,
        label: String,
    ) -> Result<PairExample> {
        let (first, second) = match self.style {
            ExampleStyle::Untyped => {
                let marked = mark_pair(&pair.recipe, e1, e2, MarkerStyle::Untyped)?;
                (marked.first, marked.second)
            }
            ExampleStyle::Typed => {
                let marked = mark_pair(&pair.recipe, e1, e2, MarkerStyle::Typed)?;
                (marked.first, marked.second)
            }
            ExampleStyle::Directional => {
                let words = mention_words(pair, e1, e2)?;
                let s1 = pair.recipe.sentence_text(e1.doc, e1.sent);
                let sentences = if e1.sentence_id() == e2.sentence_id() {
                    s1
                } else {
                    let s2 = pair.recipe.sentence_text(e2.doc, e2.sent);
                    format!("{s1} {s2}")
                };
                (words, Some(sentences))
            }
        };
        Ok(PairExample {
            first,
            second,
            label,
        })
    }

    /// Drop a seeded-random fraction of the `non-edge` examples.
    fn undersample_non_edge(&self, examples: &mut Vec<PairExample>, rng: &mut StdRng) {
        if self.undersample <= 0.0 {
            return;
        }
        let mut non_edge: Vec<usize> = examples
            .iter()
            .enumerate()
            .filter(|(_, e)| e.label == NON_EDGE_LABEL)
            .map(|(i, _)| i)
            .collect();
        let drop_count = (non_edge.len() as f64 * self.undersample) as usize;
        non_edge.shuffle(rng);
        non_edge.truncate(drop_count);
        non_edge.sort_unstable();

        let mut dropped = non_edge.iter().peekable();
        let mut index = 0usize;
        examples.retain(|_| {
            let drop = dropped.peek() == Some(&&index);
            if drop {
                dropped.next();
            }
            index += 1;
            !drop
        });
        log::info!(
            "undersampled non-edge: dropped {} examples (factor {})",
            drop_count,
            self.undersample
        );
    }

    /// Stratified shuffle-split: shuffle within each label group, then cut
    /// each group at the validation fraction.
    fn split(&self, examples: Vec<PairExample>, rng: &mut StdRng) -> Dataset {
        let mut groups: BTreeMap<String, Vec<PairExample>> = BTreeMap::new();
        for example in examples {
            groups.entry(example.label.clone()).or_default().push(example);
        }

        let mut dataset = Dataset::default();
        for (_, mut group) in groups {
            group.shuffle(rng);
            let valid_len = (group.len() as f64 * self.valid_fraction).round() as usize;
            let valid_len = valid_len.min(group.len());
            let train_part = group.split_off(valid_len);
            dataset.valid.extend(group);
            dataset.train.extend(train_part);
        }
        dataset
    }
}

/// Duplicate one example of the rare label so a stratified split can place
/// it on both sides. The small corpora contain exactly one such edge.
fn patch_rare_label(examples: &mut Vec<PairExample>) {
    if let Some(example) = examples.iter().find(|e| e.label == RARE_LABEL).cloned() {
        log::debug!("duplicating single {RARE_LABEL} example");
        examples.push(example);
    }
}

fn mention_words(pair: &RecipePair, e1: Position, e2: Position) -> Result<String> {
    let mut words = Vec::with_capacity(2);
    for position in [&e1, &e2] {
        let record = pair.recipe.get(position).ok_or_else(|| {
            Error::corpus(format!(
                "{}: marker target {} has no token record",
                pair.recipe.name, position
            ))
        })?;
        words.push(record.word.as_str());
    }
    Ok(words.join(" "))
}
