//! Flow-graph documents: the directed graph a recipe's entities form.
//!
//! Nodes are phrase-level entity mentions (position key + merged surface
//! text + base tag); edges carry the base relation tag with the direction
//! already resolved. Export targets are Graphviz DOT for rendering and
//! NetworkX node-link JSON for programmatic consumption:
//!
//! ```python
//! import networkx as nx
//! import json
//! with open('graph.json') as f:
//!     data = json.load(f)
//! G = nx.node_link_graph(data)
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::tag::EntityTag;

/// A node in a flow graph: one phrase-level entity mention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowNode {
    /// Stable node id (the mention head's canonical position key).
    pub id: String,
    /// Merged surface text of the mention's phrase.
    pub phrase: String,
    /// Base entity tag of the mention.
    pub tag: EntityTag,
}

impl FlowNode {
    /// Create a new node.
    #[must_use]
    pub fn new(id: impl Into<String>, phrase: impl Into<String>, tag: EntityTag) -> Self {
        Self {
            id: id.into(),
            phrase: phrase.into(),
            tag,
        }
    }

    /// Human-facing display name (`"<doc> <phrase> [<tag>]"` in the corpus
    /// rendering convention).
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} [{}]", self.phrase, self.tag.as_label())
    }
}

/// A directed edge in a flow graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowEdge {
    /// Source node id.
    pub source: String,
    /// Target node id.
    pub target: String,
    /// Base relation tag (direction suffix already consumed).
    pub relation: String,
}

impl FlowEdge {
    /// Create a new edge.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        relation: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relation: relation.into(),
        }
    }
}

/// A complete flow graph ready for export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowGraph {
    /// Nodes (entity mentions).
    pub nodes: Vec<FlowNode>,
    /// Edges (flow relations).
    pub edges: Vec<FlowEdge>,
    /// Graph metadata (e.g. the recipe name).
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl FlowGraph {
    /// Create an empty flow graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node if its id is not already present. Returns whether the node
    /// was inserted.
    pub fn add_node(&mut self, node: FlowNode) -> bool {
        if self.nodes.iter().any(|n| n.id == node.id) {
            return false;
        }
        self.nodes.push(node);
        true
    }

    /// Add an edge. Endpoint nodes must already have been added.
    pub fn add_edge(&mut self, edge: FlowEdge) {
        self.edges.push(edge);
    }

    /// Look up a node by id.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Attach metadata to the graph.
    #[must_use]
    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Node count.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Edge count.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Export to Graphviz DOT.
    ///
    /// Node shape, color and line style follow the corpus rendering
    /// convention: food is an ellipse, tools are hexagons, chef actions are
    /// rectangles; action and tool nodes are red; tags without a dedicated
    /// shape are drawn dashed.
    #[must_use]
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph flow {\n");
        for node in &self.nodes {
            let style = NodeStyle::for_tag(node.tag);
            dot.push_str(&format!(
                "    \"{}\" [label=\"{}\", shape={}, color={}, style={}];\n",
                escape_dot(&node.id),
                escape_dot(&node.display_name()),
                style.shape,
                style.color,
                style.line
            ));
        }
        for edge in &self.edges {
            dot.push_str(&format!(
                "    \"{}\" -> \"{}\" [label=\"{}\"];\n",
                escape_dot(&edge.source),
                escape_dot(&edge.target),
                escape_dot(&edge.relation)
            ));
        }
        dot.push_str("}\n");
        dot
    }

    /// Export to NetworkX-compatible node-link JSON.
    #[must_use]
    pub fn to_networkx_json(&self) -> String {
        #[derive(Serialize)]
        struct NetworkXGraph<'a> {
            directed: bool,
            multigraph: bool,
            graph: HashMap<String, serde_json::Value>,
            nodes: Vec<NetworkXNode<'a>>,
            links: Vec<NetworkXLink<'a>>,
        }

        #[derive(Serialize)]
        struct NetworkXNode<'a> {
            id: &'a str,
            tag: &'a str,
            phrase: &'a str,
        }

        #[derive(Serialize)]
        struct NetworkXLink<'a> {
            source: &'a str,
            target: &'a str,
            relation: &'a str,
        }

        let graph = NetworkXGraph {
            directed: true,
            multigraph: false,
            graph: self.metadata.clone(),
            nodes: self
                .nodes
                .iter()
                .map(|n| NetworkXNode {
                    id: &n.id,
                    tag: n.tag.as_label(),
                    phrase: &n.phrase,
                })
                .collect(),
            links: self
                .edges
                .iter()
                .map(|e| NetworkXLink {
                    source: &e.source,
                    target: &e.target,
                    relation: &e.relation,
                })
                .collect(),
        };

        serde_json::to_string_pretty(&graph).unwrap_or_else(|_| "{}".to_string())
    }

    /// Export to the specified format.
    #[must_use]
    pub fn export(&self, format: GraphExportFormat) -> String {
        match format {
            GraphExportFormat::Dot => self.to_dot(),
            GraphExportFormat::NetworkXJson => self.to_networkx_json(),
        }
    }
}

/// Supported flow-graph export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphExportFormat {
    /// Graphviz DOT text.
    Dot,
    /// NetworkX-compatible JSON (node_link_graph format).
    NetworkXJson,
}

struct NodeStyle {
    shape: &'static str,
    color: &'static str,
    line: &'static str,
}

impl NodeStyle {
    fn for_tag(tag: EntityTag) -> Self {
        let shape = match tag {
            EntityTag::Food => Some("ellipse"),
            EntityTag::Tool => Some("hexagon"),
            EntityTag::Action | EntityTag::Action2 => Some("rectangle"),
            _ => None,
        };
        let color = match tag {
            EntityTag::Tool | EntityTag::Action | EntityTag::Action2 => "red",
            _ => "black",
        };
        match shape {
            Some(shape) => Self {
                shape,
                color,
                line: "solid",
            },
            None => Self {
                shape: "ellipse",
                color,
                line: "dashed",
            },
        }
    }
}

/// Escape special characters in DOT string literals.
fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> FlowGraph {
        let mut graph = FlowGraph::new().with_metadata("recipe", "pancakes");
        graph.add_node(FlowNode::new("0;0;1", "the eggs", EntityTag::Food));
        graph.add_node(FlowNode::new("0;0;4", "whisk", EntityTag::Action));
        graph.add_edge(FlowEdge::new("0;0;1", "0;0;4", "t"));
        graph
    }

    #[test]
    fn test_node_dedup() {
        let mut graph = sample_graph();
        assert!(!graph.add_node(FlowNode::new("0;0;1", "the eggs", EntityTag::Food)));
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_dot_export() {
        let dot = sample_graph().to_dot();
        assert!(dot.starts_with("digraph flow {"));
        assert!(dot.contains("shape=ellipse"));
        assert!(dot.contains("shape=rectangle"));
        assert!(dot.contains("color=red"));
        assert!(dot.contains("\"0;0;1\" -> \"0;0;4\" [label=\"t\"]"));
    }

    #[test]
    fn test_dot_dashed_for_unstyled_tags() {
        let mut graph = FlowGraph::new();
        graph.add_node(FlowNode::new("0;0;0", "30 minutes", EntityTag::Duration));
        let dot = graph.to_dot();
        assert!(dot.contains("style=dashed"));
        assert!(dot.contains("color=black"));
    }

    #[test]
    fn test_networkx_json() {
        let json = sample_graph().to_networkx_json();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["directed"], true);
        assert_eq!(parsed["multigraph"], false);
        assert_eq!(parsed["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(parsed["links"][0]["relation"], "t");
        assert_eq!(parsed["graph"]["recipe"], "pancakes");
    }

    #[test]
    fn test_dot_escaping() {
        let mut graph = FlowGraph::new();
        graph.add_node(FlowNode::new("0;0;0", "8\" pan", EntityTag::Tool));
        let dot = graph.to_dot();
        assert!(dot.contains("8\\\" pan"));
    }
}
