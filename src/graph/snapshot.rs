//! Read-only views of the graph for rendering.
//!
//! The canvas draws from a [`GraphSnapshot`] and never touches [`Graph`]
//! internals; structural edits go back through the mutation API.

use serde::Serialize;

use crate::graph::category::Category;
use crate::graph::node_type::{NodeType, Rgb};
use crate::graph::store::Graph;

/// Snapshot of a single node.
#[derive(Debug, Clone, Serialize)]
pub struct NodeSnapshot {
    pub name: String,
    pub node_type: NodeType,
    pub category: Category,
    /// Input plug names, live length for dynamic nodes.
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub dynamic_inputs: bool,
    pub position: [f64; 2],
    pub color: Rgb,
    pub dirty: bool,
    pub error: Option<String>,
}

/// Snapshot of a single connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeSnapshot {
    pub from_node: String,
    pub from_index: usize,
    pub to_node: String,
    pub to_index: usize,
}

/// Complete topology snapshot of the graph.
#[derive(Debug, Clone, Serialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<NodeSnapshot>,
    pub edges: Vec<EdgeSnapshot>,
}

impl GraphSnapshot {
    pub fn node(&self, name: &str) -> Option<&NodeSnapshot> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Nodes whose last build failed.
    pub fn errors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.nodes
            .iter()
            .filter_map(|n| n.error.as_deref().map(|e| (n.name.as_str(), e)))
    }
}

impl Graph {
    pub fn snapshot(&self) -> GraphSnapshot {
        let nodes = self
            .nodes()
            .map(|node| NodeSnapshot {
                name: node.name().to_string(),
                node_type: node.node_type(),
                category: node.category(),
                inputs: node.input_names(),
                outputs: node.outputs().iter().map(|s| s.to_string()).collect(),
                dynamic_inputs: node.is_dynamic(),
                position: node.position(),
                color: node.color(),
                dirty: node.is_dirty(),
                error: node.error().map(str::to_string),
            })
            .collect();

        let edges = self
            .nodes()
            .flat_map(|node| {
                node.inputs()
                    .iter()
                    .enumerate()
                    .filter_map(move |(to_index, slot)| {
                        slot.as_ref().map(|plug| EdgeSnapshot {
                            from_node: plug.node.clone(),
                            from_index: plug.index,
                            to_node: node.name().to_string(),
                            to_index,
                        })
                    })
            })
            .collect();

        GraphSnapshot { nodes, edges }
    }
}
