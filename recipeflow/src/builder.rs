//! Flow-graph assembly.
//!
//! Builds a [`FlowGraph`] either from a recipe's true annotations or from
//! classifier predictions over candidate pairs. Predicted `non-edge` pairs
//! are dropped; the node set is exactly the endpoints of surviving edges.

use std::collections::BTreeMap;

use recipeflow_core::{Direction, EdgeLabel, FlowEdge, FlowGraph, FlowNode, Position};

use crate::corpus::{Recipe, RecipePair};
use crate::error::{Error, Result};
use crate::phrase::merge_phrases;

/// Build the annotated flow graph of one recipe.
///
/// Every `.flow` edge is carried with its annotated direction and its
/// canonicalized relation tag; endpoints are resolved to merged phrases.
///
/// # Errors
///
/// Fails if an edge endpoint is not the head of a merged phrase or carries
/// the `O` tag.
pub fn true_flow_graph(pair: &RecipePair) -> Result<FlowGraph> {
    let phrases = merge_phrases(&pair.recipe);
    let mut graph = FlowGraph::new().with_metadata("recipe", pair.recipe.name.clone());

    for edge in &pair.flow.edges {
        let source = phrase_node(&pair.recipe, &phrases, edge.source)?;
        let dest = phrase_node(&pair.recipe, &phrases, edge.dest)?;
        let relation = EdgeLabel::canonical_tag(&edge.raw_label).to_string();
        let edge = FlowEdge::new(source.id.clone(), dest.id.clone(), relation);
        graph.add_node(source);
        graph.add_node(dest);
        graph.add_edge(edge);
    }

    Ok(graph)
}

/// Build a flow graph from predicted labels over candidate pairs.
///
/// Each prediction pairs a position-ordered candidate with an edge label;
/// `non-edge` predictions are dropped, `:LR` orients the edge first → second
/// and `:RL` reverses it.
///
/// # Errors
///
/// Fails if a surviving endpoint is not the head of a merged phrase or
/// carries the `O` tag.
pub fn predicted_flow_graph(
    recipe: &Recipe,
    predictions: impl IntoIterator<Item = ((Position, Position), EdgeLabel)>,
) -> Result<FlowGraph> {
    let phrases = merge_phrases(recipe);
    let mut graph = FlowGraph::new().with_metadata("recipe", recipe.name.clone());

    for ((first, second), label) in predictions {
        let EdgeLabel::Edge { tag, direction } = label else {
            continue;
        };
        let (upstream, downstream) = match direction {
            Direction::LeftToRight => (first, second),
            Direction::RightToLeft => (second, first),
        };
        let source = phrase_node(recipe, &phrases, upstream)?;
        let dest = phrase_node(recipe, &phrases, downstream)?;
        let edge = FlowEdge::new(source.id.clone(), dest.id.clone(), tag);
        graph.add_node(source);
        graph.add_node(dest);
        graph.add_edge(edge);
    }

    Ok(graph)
}

fn phrase_node(
    recipe: &Recipe,
    phrases: &BTreeMap<Position, String>,
    position: Position,
) -> Result<FlowNode> {
    let phrase = phrases.get(&position).ok_or_else(|| {
        Error::corpus(format!(
            "{}: edge endpoint {} is not a phrase head",
            recipe.name, position
        ))
    })?;
    let tag = recipe
        .tag(&position)
        .and_then(|t| t.base())
        .ok_or_else(|| {
            Error::corpus(format!(
                "{}: edge endpoint {} has no entity tag",
                recipe.name, position
            ))
        })?;
    Ok(FlowNode::new(position.encode(), phrase.clone(), tag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::FlowAnnotations;

    fn sample_pair() -> RecipePair {
        let recipe = Recipe::parse(
            "demo",
            "0 0 0 Whisk VB Ac-B\n\
             0 0 1 the DT O\n\
             0 0 2 egg NN F-B\n\
             0 0 3 whites NNS F-I\n\
             0 0 4 . . O\n",
        )
        .unwrap();
        let flow = FlowAnnotations::parse("demo", "0 0 2 v 0 0 0\n").unwrap();
        RecipePair { recipe, flow }
    }

    #[test]
    fn test_true_graph_resolves_phrases() {
        let graph = true_flow_graph(&sample_pair()).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        let source = graph.node("0;0;2").unwrap();
        assert_eq!(source.phrase, "egg whites");
        // Raw `v` canonicalized; annotated direction preserved.
        assert_eq!(graph.edges[0].relation, "v-tm");
        assert_eq!(graph.edges[0].source, "0;0;2");
        assert_eq!(graph.edges[0].target, "0;0;0");
        assert_eq!(graph.metadata["recipe"], "demo");
    }

    #[test]
    fn test_true_graph_rejects_outside_endpoint() {
        let mut pair = sample_pair();
        pair.flow = FlowAnnotations::parse("demo", "0 0 1 t 0 0 0\n").unwrap();
        assert!(true_flow_graph(&pair).is_err());
    }

    #[test]
    fn test_predicted_graph_orients_by_suffix() {
        let pair = sample_pair();
        let candidates = vec![
            (
                (Position::new(0, 0, 0), Position::new(0, 0, 2)),
                EdgeLabel::parse("t:RL").unwrap(),
            ),
        ];
        let graph = predicted_flow_graph(&pair.recipe, candidates).unwrap();
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edges[0].source, "0;0;2");
        assert_eq!(graph.edges[0].target, "0;0;0");
        assert_eq!(graph.edges[0].relation, "t");
    }

    #[test]
    fn test_predicted_graph_drops_non_edges() {
        let pair = sample_pair();
        let candidates = vec![(
            (Position::new(0, 0, 0), Position::new(0, 0, 2)),
            EdgeLabel::NonEdge,
        )];
        let graph = predicted_flow_graph(&pair.recipe, candidates).unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }
}
