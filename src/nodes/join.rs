//! Join node.
//!
//! When the key columns have different names, both sides are renamed to the
//! shorter of the two before joining so the result holds a single key column.

use std::collections::BTreeMap;

use polars::prelude::{col, JoinArgs, JoinCoalesce, JoinType, LazyFrame};
use serde::{Deserialize, Serialize};

use crate::graph::{TableHandle, TableMap};
use crate::nodes::{
    rename_columns, required, table_output, ComputeContext, NodeCompute, NodeError, NodeResult,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinHow {
    #[default]
    Inner,
    Left,
    Right,
    #[serde(alias = "outer")]
    Full,
    Semi,
    Anti,
    Cross,
}

impl From<JoinHow> for JoinType {
    fn from(how: JoinHow) -> Self {
        match how {
            JoinHow::Inner => JoinType::Inner,
            JoinHow::Left => JoinType::Left,
            JoinHow::Right => JoinType::Right,
            JoinHow::Full => JoinType::Full,
            JoinHow::Semi => JoinType::Semi,
            JoinHow::Anti => JoinType::Anti,
            JoinHow::Cross => JoinType::Cross,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinSettings {
    pub left_column: String,
    pub right_column: String,
    pub how: JoinHow,
}

impl JoinSettings {
    /// Name the key column carries in the result. Ties go to the right side.
    pub fn key_name(&self) -> &str {
        if self.left_column.len() < self.right_column.len() {
            &self.left_column
        } else {
            &self.right_column
        }
    }
}

fn rename_key(frame: LazyFrame, from: &str, to: &str) -> NodeResult<LazyFrame> {
    if from == to {
        return Ok(frame);
    }
    rename_columns(frame, &BTreeMap::from([(from.to_string(), to.to_string())]))
}

impl NodeCompute for JoinSettings {
    fn compute(&self, _ctx: &ComputeContext, inputs: &[Option<TableHandle>]) -> NodeResult<TableMap> {
        let left = required(inputs, 0, "left")?;
        let right = required(inputs, 1, "right")?;

        if self.how == JoinHow::Cross {
            return table_output(left.cross_join(right, None));
        }
        if self.left_column.is_empty() {
            return Err(NodeError::MissingSetting("left_column"));
        }
        if self.right_column.is_empty() {
            return Err(NodeError::MissingSetting("right_column"));
        }

        let key = self.key_name().to_string();
        let left = rename_key(left, &self.left_column, &key)?;
        let right = rename_key(right, &self.right_column, &key)?;
        let args = JoinArgs::new(self.how.into()).with_coalesce(JoinCoalesce::CoalesceColumns);
        table_output(left.join(right, [col(key.as_str())], [col(key.as_str())], args))
    }
}
