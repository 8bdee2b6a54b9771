//! Reorder node: puts listed columns first.

use polars::prelude::{col, Expr};
use serde::{Deserialize, Serialize};

use crate::graph::{TableHandle, TableMap};
use crate::nodes::{
    column_names, required, table_output, ComputeContext, NodeCompute, NodeError, NodeResult,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReorderSettings {
    pub columns_order: Vec<String>,
    /// Append the columns not listed, in their original order.
    pub keep_unlisted: bool,
}

impl Default for ReorderSettings {
    fn default() -> Self {
        Self {
            columns_order: Vec::new(),
            keep_unlisted: true,
        }
    }
}

impl NodeCompute for ReorderSettings {
    fn compute(&self, _ctx: &ComputeContext, inputs: &[Option<TableHandle>]) -> NodeResult<TableMap> {
        let table = required(inputs, 0, "table")?;
        let names = column_names(&table)?;
        if let Some(missing) = self.columns_order.iter().find(|c| !names.contains(c)) {
            return Err(NodeError::invalid(
                "columns_order",
                format!("no column named '{}'", missing),
            ));
        }

        let mut order: Vec<&String> = Vec::with_capacity(names.len());
        for name in &self.columns_order {
            if !order.contains(&name) {
                order.push(name);
            }
        }
        if self.keep_unlisted {
            order.extend(names.iter().filter(|n| !self.columns_order.contains(n)));
        }
        let exprs: Vec<Expr> = order.iter().map(|name| col(name.as_str())).collect();
        table_output(table.select(exprs))
    }
}
