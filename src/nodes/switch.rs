//! Switch node: forwards one of its dynamic inputs.

use serde::{Deserialize, Serialize};

use crate::graph::{TableHandle, TableMap};
use crate::nodes::{required, table_output, ComputeContext, NodeCompute, NodeError, NodeResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitchSettings {
    /// 1-based input number.
    pub which: usize,
}

impl Default for SwitchSettings {
    fn default() -> Self {
        Self { which: 1 }
    }
}

impl NodeCompute for SwitchSettings {
    fn compute(&self, _ctx: &ComputeContext, inputs: &[Option<TableHandle>]) -> NodeResult<TableMap> {
        if self.which == 0 {
            return Err(NodeError::invalid("which", "input numbers start at 1"));
        }
        let index = self.which - 1;
        table_output(required(inputs, index, &self.which.to_string())?)
    }
}
