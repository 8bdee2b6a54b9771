//! Constant node: broadcasts one cell of a second table as a new column.

use polars::prelude::{col, lit};
use serde::{Deserialize, Serialize};

use crate::graph::{TableHandle, TableMap};
use crate::nodes::{
    required, row_offset, table_output, ComputeContext, NodeCompute, NodeError, NodeResult,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstantSettings {
    pub new_column_name: String,
    pub source_column: String,
    /// 0-based row in the constant source.
    pub source_row: usize,
}

impl Default for ConstantSettings {
    fn default() -> Self {
        Self {
            new_column_name: "ref".to_string(),
            source_column: String::new(),
            source_row: 0,
        }
    }
}

impl NodeCompute for ConstantSettings {
    fn compute(&self, _ctx: &ComputeContext, inputs: &[Option<TableHandle>]) -> NodeResult<TableMap> {
        let table = required(inputs, 0, "table")?;
        let source = required(inputs, 1, "constant source")?;
        if self.source_column.is_empty() {
            return Err(NodeError::MissingSetting("source_column"));
        }
        let name = match self.new_column_name.as_str() {
            "" => "ref",
            name => name,
        };

        // The value is read now; the output plan only carries the literal.
        let cell = source
            .select([col(self.source_column.as_str())])
            .slice(row_offset("source_row", self.source_row)?, 1)
            .collect()?;
        if cell.height() == 0 {
            return Err(NodeError::invalid(
                "source_row",
                format!("row {} is past the end of the constant source", self.source_row),
            ));
        }
        let value = cell
            .column(self.source_column.as_str())?
            .as_materialized_series()
            .clone();
        table_output(table.with_column(lit(value).first().alias(name)))
    }
}
