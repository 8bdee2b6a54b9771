//! Group node: group-by with per-column aggregations.
//!
//! Only columns listed in `aggregations` survive next to the group keys.
//! Grouping by `*` (or by nothing) aggregates the whole table into one row.
//! Groups keep the order in which their first row appears.

use std::collections::BTreeMap;

use polars::prelude::{col, Expr, LazyFrame};
use serde::{Deserialize, Deserializer, Serialize};

use crate::graph::{TableHandle, TableMap};
use crate::nodes::{
    column_names, required, table_output, ComputeContext, NodeCompute, NodeError, NodeResult,
};

/// Group key meaning "no grouping".
pub const ALL_ROWS: &str = "* aggregate all rows";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    Sum,
    Mean,
    Min,
    Max,
    Count,
    NUnique,
    First,
    Last,
    Median,
    /// Drop the column from the result.
    #[serde(alias = "delete column")]
    Delete,
}

impl Aggregation {
    fn expr(self, column: &str) -> Option<Expr> {
        let c = col(column);
        Some(match self {
            Aggregation::Sum => c.sum(),
            Aggregation::Mean => c.mean(),
            Aggregation::Min => c.min(),
            Aggregation::Max => c.max(),
            Aggregation::Count => c.count(),
            Aggregation::NUnique => c.n_unique(),
            Aggregation::First => c.first(),
            Aggregation::Last => c.last(),
            Aggregation::Median => c.median(),
            Aggregation::Delete => return None,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupSettings {
    #[serde(deserialize_with = "one_or_many")]
    pub group_by: Vec<String>,
    #[serde(alias = "columns_aggregations")]
    pub aggregations: BTreeMap<String, Aggregation>,
    /// Decimals to round float results to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<u32>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Older graphs store a single group column as a plain string.
fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(column)) => vec![column],
        Some(OneOrMany::Many(columns)) => columns,
        None => Vec::new(),
    })
}

impl GroupSettings {
    fn keys(&self) -> Vec<&str> {
        self.group_by
            .iter()
            .map(String::as_str)
            .filter(|key| !key.is_empty() && *key != "*" && *key != ALL_ROWS)
            .collect()
    }
}

fn round_floats(mut frame: LazyFrame, decimals: u32) -> NodeResult<LazyFrame> {
    let schema = frame.collect_schema()?;
    let exprs: Vec<Expr> = schema
        .iter()
        .filter(|(_, dtype)| dtype.is_float())
        .map(|(name, _)| col(name.clone()).round(decimals))
        .collect();
    if exprs.is_empty() {
        return Ok(frame);
    }
    Ok(frame.with_columns(exprs))
}

impl NodeCompute for GroupSettings {
    fn compute(&self, _ctx: &ComputeContext, inputs: &[Option<TableHandle>]) -> NodeResult<TableMap> {
        let table = required(inputs, 0, "table")?;
        let names = column_names(&table)?;
        let keys = self.keys();
        let referenced = keys
            .iter()
            .copied()
            .chain(self.aggregations.keys().map(String::as_str));
        for column in referenced {
            if !names.iter().any(|name| name == column) {
                return Err(NodeError::invalid(
                    "aggregations",
                    format!("no column named '{}'", column),
                ));
            }
        }

        let aggs: Vec<Expr> = names
            .iter()
            .filter(|name| !keys.contains(&name.as_str()))
            .filter_map(|name| self.aggregations.get(name)?.expr(name))
            .collect();

        let grouped = if keys.is_empty() {
            table.select(aggs)
        } else {
            let by: Vec<Expr> = keys.iter().map(|k| col(*k)).collect();
            table.group_by_stable(by).agg(aggs)
        };
        let grouped = match self.round {
            Some(decimals) => round_floats(grouped, decimals)?,
            None => grouped,
        };
        table_output(grouped)
    }
}
