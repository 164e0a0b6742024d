//! # recipeflow-core
//!
//! Core types for the recipeflow toolkit: shared data structures used across
//! all crates.
//!
//! This crate provides:
//! - **Positions**: `Position`, the `(doc, sent, token)` triple and its
//!   canonical string key
//! - **Tags**: `EntityTag`, `BioTag` — the r-FG BIO tagging scheme
//! - **Labels**: `EdgeLabel`, `Direction` — directional flow-edge labels
//! - **Graph types**: `FlowGraph`, `FlowNode`, `FlowEdge`
//!
//! All other crates in the recipeflow workspace depend on `recipeflow-core`
//! to ensure type compatibility across the toolbox.

#![warn(missing_docs)]

pub mod error;
pub mod graph;
pub mod label;
pub mod position;
pub mod tag;

// Re-exports for convenience
pub use error::{Error, Result};
pub use graph::{FlowEdge, FlowGraph, FlowNode, GraphExportFormat};
pub use label::{Direction, EdgeLabel, NON_EDGE_LABEL};
pub use position::Position;
pub use tag::{BioTag, EntityTag};
