//! Recipe flow-graph extraction.
//!
//! Turns the r-FG recipe corpus (`.list` token files plus `.flow` edge
//! files) into relation-classification datasets and flow-graph documents:
//!
//! 1. parse the corpus ([`corpus`]),
//! 2. learn which entity-tag pairs ever relate ([`relations`]),
//! 3. enumerate candidate mention pairs ([`pairs`]),
//! 4. merge BIO runs into phrases ([`phrase`]),
//! 5. render entity-marked sentences ([`marker`]),
//! 6. assemble train/validation splits ([`dataset`]),
//! 7. build true and predicted flow graphs ([`builder`]).

#![warn(missing_docs)]

pub mod builder;
pub mod corpus;
pub mod dataset;
pub mod error;
pub mod marker;
pub mod pairs;
pub mod phrase;
pub mod relations;

pub use builder::{predicted_flow_graph, true_flow_graph};
pub use corpus::{load_corpus, CorpusTarget, FlowAnnotations, RawEdge, Recipe, RecipePair, TokenRecord};
pub use dataset::{Dataset, DatasetBuilder, ExampleStyle, PairExample};
pub use error::{Error, Result};
pub use marker::{MarkedPair, MarkerStyle};
pub use pairs::{candidate_pairs, PairStats};
pub use phrase::merge_phrases;
pub use relations::RelationSet;
