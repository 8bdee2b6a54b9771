//! Graph-specific error types.

use thiserror::Error;

use crate::graph::category::PlugKind;

/// Errors raised by graph mutation and traversal.
///
/// None of these leave the graph partially modified: every operation that
/// returns one of them has checked its preconditions before writing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Node name already exists: {0}")]
    DuplicateName(String),

    #[error("Node name is reserved: {0}")]
    ReservedName(String),

    #[error("Unknown node type: {0}")]
    UnknownType(String),

    #[error("Node {0} references itself")]
    CyclicGraph(String),

    #[error("Cannot connect {0} to itself")]
    SelfConnection(String),

    #[error("Cannot connect {source_kind} output of {source_node} to {target_kind} input of {target}")]
    IncompatiblePlugs {
        source_node: String,
        source_kind: PlugDescription,
        target: String,
        target_kind: PlugDescription,
    },

    #[error("Connecting {source_node} to {target} would create a cycle")]
    WouldCreateCycle { source_node: String, target: String },

    #[error("{source_node} is already displayed in dashboard {target}")]
    DuplicateDashboardWidget { source_node: String, target: String },

    #[error("Invalid {direction} plug index {index} on {node}")]
    InvalidPlugIndex {
        node: String,
        direction: &'static str,
        index: usize,
    },

    #[error("Settings of type {settings} do not fit node {node} of type {node_type}")]
    SettingsMismatch {
        node: String,
        node_type: &'static str,
        settings: &'static str,
    },
}

/// Printable form of an optional plug kind, used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlugDescription(pub Option<PlugKind>);

impl std::fmt::Display for PlugDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(kind) => write!(f, "{}", kind),
            None => write!(f, "no"),
        }
    }
}

pub type GraphResult<T> = std::result::Result<T, GraphError>;
