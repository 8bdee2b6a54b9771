//! Filter node: keeps the rows where a boolean formula holds.

use serde::{Deserialize, Serialize};

use crate::formula;
use crate::graph::{TableHandle, TableMap};
use crate::nodes::{required, table_output, ComputeContext, NodeCompute, NodeResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    pub formula: String,
}

impl NodeCompute for FilterSettings {
    fn compute(&self, _ctx: &ComputeContext, inputs: &[Option<TableHandle>]) -> NodeResult<TableMap> {
        let table = required(inputs, 0, "table")?;
        let predicate = formula::compile(&self.formula)?;
        table_output(table.filter(predicate))
    }
}
