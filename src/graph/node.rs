//! Graph nodes and plug references.

use serde::{Deserialize, Serialize};

use crate::graph::category::{Arity, Category};
use crate::graph::error::{GraphError, GraphResult};
use crate::graph::node_type::{NodeType, Rgb};
use crate::graph::table::{TableHandle, TableMap};
use crate::nodes::NodeSettings;

/// Reference to an output plug of another node.
///
/// Serialized as `[node, index]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(String, usize)", into = "(String, usize)")]
pub struct PlugRef {
    pub node: String,
    pub index: usize,
}

impl PlugRef {
    pub fn new(node: impl Into<String>, index: usize) -> Self {
        Self {
            node: node.into(),
            index,
        }
    }
}

impl From<(String, usize)> for PlugRef {
    fn from((node, index): (String, usize)) -> Self {
        Self { node, index }
    }
}

impl From<PlugRef> for (String, usize) {
    fn from(plug: PlugRef) -> Self {
        (plug.node, plug.index)
    }
}

/// A named unit of computation in a [`Graph`](crate::graph::Graph).
#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    node_type: NodeType,
    settings: NodeSettings,
    inputs: Vec<Option<PlugRef>>,
    position: [f64; 2],
    color: Option<Rgb>,
    dirty: bool,
    tables: TableMap,
    error: Option<String>,
}

impl Node {
    /// Create a dirty node with all-empty inputs sized to its declared arity.
    pub fn new(name: impl Into<String>, settings: NodeSettings) -> Self {
        let node_type = settings.node_type();
        Self {
            name: name.into(),
            node_type,
            settings,
            inputs: vec![None; node_type.inputs().initial_len()],
            position: [0.0, 0.0],
            color: None,
            dirty: true,
            tables: TableMap::new(),
            error: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn category(&self) -> Category {
        self.node_type.category()
    }

    pub fn arity(&self) -> Arity {
        self.node_type.inputs()
    }

    pub fn is_dynamic(&self) -> bool {
        self.arity().is_dynamic()
    }

    pub fn settings(&self) -> &NodeSettings {
        &self.settings
    }

    pub fn inputs(&self) -> &[Option<PlugRef>] {
        &self.inputs
    }

    /// Output plug names.
    pub fn outputs(&self) -> &'static [&'static str] {
        self.node_type.outputs()
    }

    /// Input plug names, using the live length for dynamic nodes.
    pub fn input_names(&self) -> Vec<String> {
        (0..self.inputs.len())
            .map(|i| self.node_type.input_name(i))
            .collect()
    }

    /// Names of connected source nodes, one entry per connected slot.
    pub fn source_names(&self) -> impl Iterator<Item = &str> {
        self.inputs.iter().flatten().map(|plug| plug.node.as_str())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn tables(&self) -> &TableMap {
        &self.tables
    }

    /// Cached handle of the output plug at `index`.
    pub fn output_table(&self, index: usize) -> Option<&TableHandle> {
        self.outputs()
            .get(index)
            .and_then(|plug| self.tables.get(*plug))
    }

    pub fn position(&self) -> [f64; 2] {
        self.position
    }

    /// Node color, falling back to the type default.
    pub fn color(&self) -> Rgb {
        self.color.unwrap_or_else(|| self.node_type.default_color())
    }

    /// Explicit color override, if one was set.
    pub fn color_override(&self) -> Option<Rgb> {
        self.color
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub(crate) fn set_position(&mut self, position: [f64; 2]) {
        self.position = position;
    }

    pub(crate) fn set_color(&mut self, color: Option<Rgb>) {
        self.color = color;
    }

    pub(crate) fn inputs_mut(&mut self) -> &mut Vec<Option<PlugRef>> {
        &mut self.inputs
    }

    pub(crate) fn set_inputs(&mut self, inputs: Vec<Option<PlugRef>>) {
        self.inputs = inputs;
        if let Arity::Fixed(names) = self.arity() {
            self.inputs.resize(names.len(), None);
        } else {
            self.trim_trailing_inputs();
        }
    }

    pub(crate) fn replace_settings(&mut self, settings: NodeSettings) -> GraphResult<()> {
        if settings.node_type() != self.node_type {
            return Err(GraphError::SettingsMismatch {
                node: self.name.clone(),
                node_type: self.node_type.as_str(),
                settings: settings.node_type().as_str(),
            });
        }
        self.settings = settings;
        Ok(())
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Record a successful build.
    pub(crate) fn store_outputs(&mut self, tables: TableMap) {
        self.tables = tables;
        self.dirty = false;
        self.error = None;
    }

    /// Record a failed build. The cache is left untouched and the node stays
    /// dirty.
    pub(crate) fn store_error(&mut self, message: String) {
        self.error = Some(message);
        self.dirty = true;
    }

    /// Drop the trailing run of empty slots of a dynamic node. Interior empty
    /// slots keep later indices stable and are left in place.
    pub(crate) fn trim_trailing_inputs(&mut self) {
        if !self.is_dynamic() {
            return;
        }
        while matches!(self.inputs.last(), Some(None)) {
            self.inputs.pop();
        }
    }
}
