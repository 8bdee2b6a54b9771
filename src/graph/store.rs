//! Graph store: the name-keyed node collection.
//!
//! Plug references are stored by node name, so structural edits (rename,
//! delete) are plain data rewrites over the map.

use std::collections::BTreeMap;

use tracing::debug;

use crate::graph::error::{GraphError, GraphResult};
use crate::graph::node::Node;
use crate::graph::node_type::Rgb;
use crate::nodes::NodeSettings;

/// Name of the graph file block holding the view state. No node may use it.
pub const GRAPH_SETTINGS_NODE: &str = "_graph_settings";

fn check_name(name: &str) -> GraphResult<()> {
    if name == GRAPH_SETTINGS_NODE {
        return Err(GraphError::ReservedName(name.to_string()));
    }
    Ok(())
}

/// The whole pipeline: unique node name → node.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: BTreeMap<String, Node>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn get(&self, name: &str) -> GraphResult<&Node> {
        self.nodes
            .get(name)
            .ok_or_else(|| GraphError::NodeNotFound(name.to_string()))
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> GraphResult<&mut Node> {
        self.nodes
            .get_mut(name)
            .ok_or_else(|| GraphError::NodeNotFound(name.to_string()))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.values_mut()
    }

    /// Insert a node under its own name.
    pub(crate) fn insert(&mut self, node: Node) -> GraphResult<()> {
        check_name(node.name())?;
        if self.nodes.contains_key(node.name()) {
            return Err(GraphError::DuplicateName(node.name().to_string()));
        }
        self.nodes.insert(node.name().to_string(), node);
        Ok(())
    }

    /// Source nodes feeding each input slot of `name`. Empty slots and
    /// references to missing nodes resolve to `None`.
    pub fn input_nodes(&self, name: &str) -> GraphResult<Vec<Option<&Node>>> {
        let node = self.get(name)?;
        Ok(node
            .inputs()
            .iter()
            .map(|slot| slot.as_ref().and_then(|plug| self.nodes.get(&plug.node)))
            .collect())
    }

    /// Rename a node and rewrite every plug reference pointing at it.
    pub fn rename(&mut self, old_name: &str, new_name: &str) -> GraphResult<()> {
        if old_name == new_name {
            return self.get(old_name).map(|_| ());
        }
        check_name(new_name)?;
        if self.nodes.contains_key(new_name) {
            return Err(GraphError::DuplicateName(new_name.to_string()));
        }
        let mut node = self
            .nodes
            .remove(old_name)
            .ok_or_else(|| GraphError::NodeNotFound(old_name.to_string()))?;
        node.set_name(new_name.to_string());
        self.nodes.insert(new_name.to_string(), node);

        for node in self.nodes.values_mut() {
            for plug in node.inputs_mut().iter_mut().flatten() {
                if plug.node == old_name {
                    plug.node = new_name.to_string();
                }
            }
        }
        debug!("Renamed node {} to {}", old_name, new_name);
        Ok(())
    }

    /// Remove a node and null every reference to it. Nodes that lost an input
    /// are invalidated along with their descendants.
    pub fn delete(&mut self, name: &str) -> GraphResult<Node> {
        let downstream = self.downstream_names(name)?;
        let removed = self
            .nodes
            .remove(name)
            .ok_or_else(|| GraphError::NodeNotFound(name.to_string()))?;

        for node in self.nodes.values_mut() {
            let mut touched = false;
            for slot in node.inputs_mut().iter_mut() {
                if slot.as_ref().is_some_and(|plug| plug.node == name) {
                    *slot = None;
                    touched = true;
                }
            }
            if touched {
                node.trim_trailing_inputs();
            }
        }
        for child in downstream {
            self.set_dirty_recursive(&child)?;
        }
        debug!("Deleted node {}", name);
        Ok(removed)
    }

    /// Replace a node's settings and invalidate it and its descendants.
    pub fn update_settings(&mut self, name: &str, settings: NodeSettings) -> GraphResult<()> {
        self.get_mut(name)?.replace_settings(settings)?;
        self.set_dirty_recursive(name)
    }

    /// Move a node on the canvas. Cosmetic, does not invalidate.
    pub fn set_position(&mut self, name: &str, position: [f64; 2]) -> GraphResult<()> {
        self.get_mut(name)?.set_position(position);
        Ok(())
    }

    /// Override a node's color, or restore the type default with `None`.
    /// Cosmetic, does not invalidate.
    pub fn set_color(&mut self, name: &str, color: Option<Rgb>) -> GraphResult<()> {
        self.get_mut(name)?.set_color(color);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::PlugRef;
    use crate::graph::NodeType;

    fn graph_with(nodes: &[(&str, NodeType)]) -> Graph {
        let mut graph = Graph::new();
        for (name, node_type) in nodes {
            graph
                .insert(Node::new(*name, NodeSettings::default_for(*node_type)))
                .unwrap();
        }
        graph
    }

    fn wire(graph: &mut Graph, source: &str, target: &str, index: usize) {
        graph.get_mut(target).unwrap().inputs_mut()[index] = Some(PlugRef::new(source, 0));
    }

    #[test]
    fn test_get_unknown_name() {
        let graph = Graph::new();
        assert_eq!(
            graph.get("Nope").unwrap_err(),
            GraphError::NodeNotFound("Nope".to_string())
        );
    }

    #[test]
    fn test_reserved_name_is_refused() {
        let mut graph = graph_with(&[("Load1", NodeType::Load), ("Dot1", NodeType::Dot)]);
        wire(&mut graph, "Load1", "Dot1", 0);

        let node = Node::new(GRAPH_SETTINGS_NODE, NodeSettings::default_for(NodeType::Dot));
        assert_eq!(
            graph.insert(node).unwrap_err(),
            GraphError::ReservedName(GRAPH_SETTINGS_NODE.to_string())
        );
        assert!(matches!(
            graph.rename("Load1", GRAPH_SETTINGS_NODE),
            Err(GraphError::ReservedName(_))
        ));
        assert!(graph.contains("Load1"));
        assert_eq!(graph.get("Dot1").unwrap().inputs(), &[Some(PlugRef::new("Load1", 0))]);
    }

    #[test]
    fn test_insert_rejects_duplicate() {
        let mut graph = graph_with(&[("Load", NodeType::Load)]);
        let err = graph
            .insert(Node::new("Load", NodeSettings::default_for(NodeType::Load)))
            .unwrap_err();
        assert_eq!(err, GraphError::DuplicateName("Load".to_string()));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_rename_rewrites_references() {
        let mut graph = graph_with(&[
            ("A", NodeType::Load),
            ("B", NodeType::Load),
            ("J", NodeType::Join),
        ]);
        wire(&mut graph, "A", "J", 0);
        wire(&mut graph, "B", "J", 1);

        graph.rename("A", "A2").unwrap();

        assert!(!graph.contains("A"));
        assert_eq!(graph.get("A2").unwrap().name(), "A2");
        let join = graph.get("J").unwrap();
        assert_eq!(join.inputs()[0], Some(PlugRef::new("A2", 0)));
        assert_eq!(join.inputs()[1], Some(PlugRef::new("B", 0)));
    }

    #[test]
    fn test_rename_to_existing_name_fails() {
        let mut graph = graph_with(&[("A", NodeType::Load), ("B", NodeType::Load)]);
        assert!(matches!(
            graph.rename("A", "B"),
            Err(GraphError::DuplicateName(_))
        ));
        assert!(graph.contains("A"));
    }

    #[test]
    fn test_delete_nulls_references_and_dirties() {
        let mut graph = graph_with(&[
            ("A", NodeType::Load),
            ("B", NodeType::Load),
            ("J", NodeType::Join),
        ]);
        wire(&mut graph, "A", "J", 0);
        wire(&mut graph, "B", "J", 1);

        graph.delete("A").unwrap();

        let join = graph.get("J").unwrap();
        assert_eq!(join.inputs().len(), 2);
        assert!(join.inputs()[0].is_none());
        assert!(join.inputs()[1].is_some());
        assert!(join.is_dirty());
    }

    #[test]
    fn test_delete_trims_dynamic_inputs() {
        let mut graph = graph_with(&[
            ("A", NodeType::Load),
            ("B", NodeType::Load),
            ("S", NodeType::Switch),
        ]);
        *graph.get_mut("S").unwrap().inputs_mut() =
            vec![Some(PlugRef::new("A", 0)), Some(PlugRef::new("B", 0))];

        graph.delete("B").unwrap();
        assert_eq!(graph.get("S").unwrap().inputs().len(), 1);
    }

    #[test]
    fn test_update_settings_rejects_other_type() {
        let mut graph = graph_with(&[("D", NodeType::Derive)]);
        let err = graph
            .update_settings("D", NodeSettings::default_for(NodeType::Sort))
            .unwrap_err();
        assert!(matches!(err, GraphError::SettingsMismatch { .. }));
    }
}
