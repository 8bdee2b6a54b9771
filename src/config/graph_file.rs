//! Graph file reading and writing.
//!
//! A graph file is a sequence of blocks, one per node: the node name on its
//! own line, then the node record as JSON indented below it.
//!
//! ```text
//! _graph_settings
//!     {"zoom": 1.0, "origin": [0.0, 0.0], "current_display": "Table1"}
//! Load1
//!     {"type": "load", "path": "sales.csv", "inputs": [], "position": [0.0, 0.0]}
//! Table1
//!     {"type": "table", "inputs": [["Load1", 0]], "position": [240.0, 0.0]}
//! ```
//!
//! Loading is lenient: unknown node types are skipped, references to
//! missing nodes or plugs are dropped, and fixed-arity input lists are
//! padded or cut to size. Loaded nodes are dirty.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::config::view::ViewState;
use crate::error::{Result, ResultExt, TableGraphError};
pub use crate::graph::GRAPH_SETTINGS_NODE;
use crate::graph::{Graph, Node, NodeRegistry, PlugRef, Rgb};
use crate::nodes::NodeSettings;

const INDENT: &str = "    ";

#[derive(Debug, Deserialize)]
struct NodeRecord {
    #[serde(flatten)]
    settings: NodeSettings,
    #[serde(default)]
    inputs: Vec<Option<PlugRef>>,
    #[serde(default)]
    position: [f64; 2],
    #[serde(default)]
    color: Option<Rgb>,
}

#[derive(Serialize)]
struct LayoutFields<'a> {
    inputs: &'a [Option<PlugRef>],
    position: [f64; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<Rgb>,
}

struct Block {
    line: usize,
    name: String,
    body: String,
}

fn file_error(line: usize, message: impl Into<String>) -> TableGraphError {
    TableGraphError::GraphFile {
        line,
        message: message.into(),
    }
}

fn split_blocks(text: &str) -> Result<Vec<Block>> {
    let mut blocks: Vec<Block> = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let number = index + 1;
        if line.trim().is_empty() {
            continue;
        }
        if line.starts_with([' ', '\t']) {
            match blocks.last_mut() {
                Some(block) => {
                    block.body.push_str(line.trim());
                    block.body.push('\n');
                }
                None => return Err(file_error(number, "record before any node name")),
            }
        } else {
            blocks.push(Block {
                line: number,
                name: line.trim_end().to_string(),
                body: String::new(),
            });
        }
    }
    Ok(blocks)
}

fn node_value(node: &Node) -> Result<Value> {
    let mut record = match serde_json::to_value(node.settings())? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    let layout = LayoutFields {
        inputs: node.inputs(),
        position: node.position(),
        color: node.color_override(),
    };
    if let Value::Object(fields) = serde_json::to_value(layout)? {
        record.extend(fields);
    }
    Ok(Value::Object(record))
}

/// Render a graph and its view state as graph file text.
pub fn to_string(graph: &Graph, view: &ViewState) -> Result<String> {
    let mut out = String::new();
    let mut push = |name: &str, value: Value| -> Result<()> {
        out.push_str(name);
        out.push('\n');
        out.push_str(INDENT);
        out.push_str(&serde_json::to_string(&value)?);
        out.push('\n');
        Ok(())
    };
    push(GRAPH_SETTINGS_NODE, serde_json::to_value(view)?)?;
    for node in graph.nodes() {
        push(node.name(), node_value(node)?)?;
    }
    Ok(out)
}

/// Parse graph file text.
pub fn from_str(text: &str) -> Result<(Graph, ViewState)> {
    let registry = NodeRegistry::builtin();
    let mut graph = Graph::new();
    let mut view = ViewState::default();
    let mut pending_inputs: Vec<(String, Vec<Option<PlugRef>>)> = Vec::new();

    for block in split_blocks(text)? {
        let value: Value = serde_json::from_str(&block.body)
            .map_err(|e| file_error(block.line, format!("{}: {}", block.name, e)))?;

        if block.name == GRAPH_SETTINGS_NODE {
            view = serde_json::from_value(value).unwrap_or_else(|e| {
                warn!("Ignoring unreadable view settings: {}", e);
                ViewState::default()
            });
            continue;
        }

        let tag = value.get("type").and_then(Value::as_str).unwrap_or_default();
        if let Err(e) = registry.resolve(tag) {
            warn!("Skipping node {}: {}", block.name, e);
            continue;
        }
        let record: NodeRecord = serde_json::from_value(value)
            .map_err(|e| file_error(block.line, format!("{}: {}", block.name, e)))?;

        let mut node = Node::new(block.name.clone(), record.settings);
        node.set_position(record.position);
        node.set_color(record.color);
        if let Err(e) = graph.insert(node) {
            warn!("Skipping node at line {}: {}", block.line, e);
            continue;
        }
        pending_inputs.push((block.name, record.inputs));
    }

    // References are resolved once every node exists.
    for (name, inputs) in pending_inputs {
        let inputs: Vec<Option<PlugRef>> = inputs
            .into_iter()
            .map(|slot| {
                let plug = slot?;
                let source = graph.get(&plug.node).ok()?;
                if plug.index < source.outputs().len() {
                    Some(plug)
                } else {
                    None
                }
            })
            .collect();
        graph.get_mut(&name)?.set_inputs(inputs);
    }

    view.retain_display(|name| graph.contains(name));
    Ok((graph, view))
}

/// Write a graph file.
pub fn save_graph(path: impl AsRef<Path>, graph: &Graph, view: &ViewState) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, to_string(graph, view)?)?;
    info!("Saved {} node(s) to {}", graph.len(), path.display());
    Ok(())
}

/// Read a graph file.
pub fn load_graph(path: impl AsRef<Path>) -> Result<(Graph, ViewState)> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let loaded = from_str(&text)?;
    info!("Loaded {} node(s) from {}", loaded.0.len(), path.display());
    Ok(loaded)
}
