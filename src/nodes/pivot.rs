//! Pivot node: long to wide.
//!
//! Each distinct value of `column` becomes a new column holding the first
//! `values` entry for that index row. The distinct values are read when the
//! node is built, so the output schema is fixed from then on.

use polars::prelude::{col, lit, DataType, Expr};
use serde::{Deserialize, Serialize};

use crate::graph::{TableHandle, TableMap};
use crate::nodes::{required, table_output, ComputeContext, NodeCompute, NodeError, NodeResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PivotSettings {
    pub index: String,
    pub column: String,
    pub values: String,
}

fn setting<'a>(value: &'a str, name: &'static str) -> NodeResult<&'a str> {
    if value.is_empty() {
        Err(NodeError::MissingSetting(name))
    } else {
        Ok(value)
    }
}

impl NodeCompute for PivotSettings {
    fn compute(&self, _ctx: &ComputeContext, inputs: &[Option<TableHandle>]) -> NodeResult<TableMap> {
        let table = required(inputs, 0, "table")?;
        let index = setting(&self.index, "index")?;
        let column = setting(&self.column, "column")?;
        let values = setting(&self.values, "values")?;

        let distinct = table
            .clone()
            .select([col(column).cast(DataType::String).unique_stable()])
            .collect()?;
        let headers: Vec<String> = distinct
            .column(column)?
            .str()?
            .into_iter()
            .flatten()
            .map(str::to_string)
            .collect();

        let cells: Vec<Expr> = headers
            .iter()
            .map(|header| {
                col(values)
                    .filter(col(column).cast(DataType::String).eq(lit(header.as_str())))
                    .first()
                    .alias(header.as_str())
            })
            .collect();
        table_output(table.group_by_stable([col(index)]).agg(cells))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::test_support::{collect, handle, i64s, names, strs};
    use crate::nodes::TABLE_PLUG;
    use polars::prelude::*;

    #[test]
    fn test_pivot_long_to_wide() {
        let inputs = vec![handle(
            df!(
                "city" => ["Paris", "Paris", "Oslo", "Oslo", "Paris"],
                "year" => [2020i64, 2021, 2020, 2021, 2020],
                "visits" => [10i64, 11, 20, 21, 99],
            )
            .unwrap(),
        )];
        let settings = PivotSettings {
            index: "city".into(),
            column: "year".into(),
            values: "visits".into(),
        };
        let df = collect(
            &settings.compute(&ComputeContext::default(), &inputs).unwrap(),
            TABLE_PLUG,
        );
        assert_eq!(names(&df), vec!["city", "2020", "2021"]);
        assert_eq!(strs(&df, "city"), vec![Some("Paris".into()), Some("Oslo".into())]);
        assert_eq!(i64s(&df, "2020"), vec![Some(10), Some(20)]);
        assert_eq!(i64s(&df, "2021"), vec![Some(11), Some(21)]);
    }

    #[test]
    fn test_missing_cell_is_null() {
        let inputs = vec![handle(
            df!(
                "k" => ["a", "b"],
                "c" => ["x", "y"],
                "v" => [1i64, 2],
            )
            .unwrap(),
        )];
        let settings = PivotSettings {
            index: "k".into(),
            column: "c".into(),
            values: "v".into(),
        };
        let df = collect(
            &settings.compute(&ComputeContext::default(), &inputs).unwrap(),
            TABLE_PLUG,
        );
        assert_eq!(i64s(&df, "x"), vec![Some(1), None]);
    }

    #[test]
    fn test_requires_settings() {
        let inputs = vec![handle(df!("a" => [1i64]).unwrap())];
        assert!(matches!(
            PivotSettings::default().compute(&ComputeContext::default(), &inputs),
            Err(NodeError::MissingSetting("index"))
        ));
    }
}
