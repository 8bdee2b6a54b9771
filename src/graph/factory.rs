//! Node creation.

use std::collections::BTreeMap;

use tracing::debug;

use crate::graph::error::{GraphError, GraphResult};
use crate::graph::node::Node;
use crate::graph::node_type::NodeType;
use crate::graph::store::Graph;
use crate::nodes::NodeSettings;

/// Registry of creatable node types, keyed by type tag.
#[derive(Debug, Clone)]
pub struct NodeRegistry {
    types: BTreeMap<&'static str, NodeType>,
}

impl NodeRegistry {
    /// Registry holding every built-in node type.
    pub fn builtin() -> Self {
        Self::with_types(NodeType::all())
    }

    /// Registry restricted to the given types.
    pub fn with_types(types: &[NodeType]) -> Self {
        Self {
            types: types.iter().map(|t| (t.as_str(), *t)).collect(),
        }
    }

    pub fn register(&mut self, node_type: NodeType) {
        self.types.insert(node_type.as_str(), node_type);
    }

    /// Look up a type tag. Legacy aliases are accepted.
    pub fn resolve(&self, tag: &str) -> GraphResult<NodeType> {
        let node_type: NodeType = tag.parse()?;
        if self.types.contains_key(node_type.as_str()) {
            Ok(node_type)
        } else {
            Err(GraphError::UnknownType(tag.to_string()))
        }
    }

    pub fn types(&self) -> impl Iterator<Item = NodeType> + '_ {
        self.types.values().copied()
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Create a node of type `type_tag` and insert it into `graph`.
///
/// The name defaults to the type's display name. On collision the trailing
/// number is incremented until the name is free, unless `auto_increment` is
/// false, in which case the call fails. Returns the allocated name.
pub fn create_node(
    graph: &mut Graph,
    registry: &NodeRegistry,
    type_tag: &str,
    name: Option<&str>,
    settings: Option<NodeSettings>,
    auto_increment: bool,
) -> GraphResult<String> {
    let node_type = registry.resolve(type_tag)?;
    let settings = settings.unwrap_or_else(|| NodeSettings::default_for(node_type));
    if settings.node_type() != node_type {
        return Err(GraphError::SettingsMismatch {
            node: name.unwrap_or(node_type.display_name()).to_string(),
            node_type: node_type.as_str(),
            settings: settings.node_type().as_str(),
        });
    }

    let mut name = name.unwrap_or(node_type.display_name()).to_string();
    while graph.contains(&name) {
        if !auto_increment {
            return Err(GraphError::DuplicateName(name));
        }
        name = increment_name(&name);
    }

    graph.insert(Node::new(name.clone(), settings))?;
    debug!("Created {} node {}", node_type.as_str(), name);
    Ok(name)
}

/// `Load` → `Load1`, `Load1` → `Load2`, `Load09` → `Load10`.
pub fn increment_name(name: &str) -> String {
    let stem = name.trim_end_matches(|c: char| c.is_ascii_digit());
    let digits = &name[stem.len()..];
    match digits.parse::<u64>() {
        Ok(number) => match number.checked_add(1) {
            Some(next) => format!("{}{}", stem, next),
            None => format!("{}1", name),
        },
        Err(_) => format!("{}1", name),
    }
}
