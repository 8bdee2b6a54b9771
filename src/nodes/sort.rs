//! Sort node.

use polars::prelude::{col, Expr, SortMultipleOptions};
use serde::{Deserialize, Serialize};

use crate::graph::{TableHandle, TableMap};
use crate::nodes::{required, table_output, ComputeContext, NodeCompute, NodeResult};

/// One sort key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortColumn {
    pub column: String,
    pub descending: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortSettings {
    /// Keys in priority order. No keys passes the table through.
    pub columns: Vec<SortColumn>,
}

impl NodeCompute for SortSettings {
    fn compute(&self, _ctx: &ComputeContext, inputs: &[Option<TableHandle>]) -> NodeResult<TableMap> {
        let table = required(inputs, 0, "table")?;
        let keys: Vec<&SortColumn> = self.columns.iter().filter(|k| !k.column.is_empty()).collect();
        if keys.is_empty() {
            return table_output(table);
        }
        let exprs: Vec<Expr> = keys.iter().map(|k| col(k.column.as_str())).collect();
        let options = SortMultipleOptions::default()
            .with_order_descending_multi(keys.iter().map(|k| k.descending))
            .with_maintain_order(true);
        table_output(table.sort_by_exprs(exprs, options))
    }
}
