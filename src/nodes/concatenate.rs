//! Concatenate node: stacks two tables vertically or side by side.

use polars::prelude::{concat, concat_lf_horizontal, UnionArgs};
use serde::{Deserialize, Serialize};

use crate::graph::{TableHandle, TableMap};
use crate::nodes::{required, table_output, ComputeContext, NodeCompute, NodeResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcatHow {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcatenateSettings {
    pub how: ConcatHow,
}

impl NodeCompute for ConcatenateSettings {
    fn compute(&self, _ctx: &ComputeContext, inputs: &[Option<TableHandle>]) -> NodeResult<TableMap> {
        let first = required(inputs, 0, "table1")?;
        let second = required(inputs, 1, "table2")?;
        let frame = match self.how {
            ConcatHow::Vertical => concat([first, second], UnionArgs::default())?,
            ConcatHow::Horizontal => concat_lf_horizontal([first, second], UnionArgs::default())?,
        };
        table_output(frame)
    }
}
