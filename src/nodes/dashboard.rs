//! Dashboard node: collects display widgets into a grid.

use serde::{Deserialize, Serialize};

use crate::graph::{TableHandle, TableMap};
use crate::nodes::{ComputeContext, NodeCompute, NodeResult};

/// Grid cell span of one widget: `[x, y, width, height]`.
pub type WidgetRect = [u32; 4];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    pub spacing: u32,
    pub margins: u32,
    pub grid_width: u32,
    pub grid_height: u32,
    /// Placement of each widget slot, by input index.
    pub widget_rects: Vec<WidgetRect>,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            spacing: 2,
            margins: 2,
            grid_width: 16,
            grid_height: 16,
            widget_rects: Vec::new(),
        }
    }
}

impl NodeCompute for DashboardSettings {
    /// Connected widgets are stored as `widget1`, `widget2`, ... by slot.
    /// Empty slots are skipped.
    fn compute(&self, _ctx: &ComputeContext, inputs: &[Option<TableHandle>]) -> NodeResult<TableMap> {
        Ok(inputs
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| Some((format!("widget{}", index + 1), slot.clone()?)))
            .collect())
    }
}
