//! Dot node: a reroute point that forwards its input unchanged.

use serde::{Deserialize, Serialize};

use crate::graph::{TableHandle, TableMap};
use crate::nodes::{required, table_output, ComputeContext, NodeCompute, NodeResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DotSettings {}

impl NodeCompute for DotSettings {
    fn compute(&self, _ctx: &ComputeContext, inputs: &[Option<TableHandle>]) -> NodeResult<TableMap> {
        table_output(required(inputs, 0, "table")?)
    }
}
