//! Editor view state stored alongside a graph.

use serde::{Deserialize, Serialize};

/// Zoom, pan and the display node last shown. Stored in graph files under
/// the `_graph_settings` pseudo-node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    pub zoom: f64,
    pub origin: [f64; 2],
    pub current_display: Option<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            origin: [0.0, 0.0],
            current_display: None,
        }
    }
}

impl ViewState {
    /// Forget the current display if it names a node that no longer exists.
    pub fn retain_display(&mut self, exists: impl Fn(&str) -> bool) {
        if self.current_display.as_deref().is_some_and(|name| !exists(name)) {
            self.current_display = None;
        }
    }
}
