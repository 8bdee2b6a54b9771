//! Display nodes: table views, charts and single-value labels.
//!
//! A display node caches the table its widget shows under the `widget`
//! output, which dashboards read. Rendering itself happens outside the
//! engine.

use polars::df;
use polars::prelude::{col, DataType, Expr, IntoLazy};
use serde::{Deserialize, Serialize};

use crate::graph::{TableHandle, TableMap};
use crate::nodes::format::ColumnFormat;
use crate::nodes::{
    column_names, required, row_offset, single_output, ComputeContext, NodeCompute, NodeError,
    NodeResult, WIDGET_PLUG,
};

/// Settings of a table view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    /// Columns to show. Empty shows all.
    pub columns: Vec<String>,
}

impl NodeCompute for TableSettings {
    fn compute(&self, _ctx: &ComputeContext, inputs: &[Option<TableHandle>]) -> NodeResult<TableMap> {
        let table = required(inputs, 0, "table")?;
        if self.columns.is_empty() {
            return single_output(WIDGET_PLUG, table);
        }
        let names = column_names(&table)?;
        if let Some(missing) = self.columns.iter().find(|c| !names.contains(c)) {
            return Err(NodeError::invalid(
                "columns",
                format!("no column named '{}'", missing),
            ));
        }
        let exprs: Vec<Expr> = self.columns.iter().map(|c| col(c.as_str())).collect();
        single_output(WIDGET_PLUG, table.select(exprs))
    }
}

/// Settings shared by bar, pie and line charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    pub invert_axes: bool,
}

impl NodeCompute for ChartSettings {
    fn compute(&self, _ctx: &ComputeContext, inputs: &[Option<TableHandle>]) -> NodeResult<TableMap> {
        single_output(WIDGET_PLUG, required(inputs, 0, "table")?)
    }
}

/// Settings of a label showing one formatted cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelSettings {
    pub source_column: String,
    pub source_row: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<ColumnFormat>,
}

impl NodeCompute for LabelSettings {
    /// The widget table has a single `value` text cell, null when the row
    /// does not exist.
    fn compute(&self, _ctx: &ComputeContext, inputs: &[Option<TableHandle>]) -> NodeResult<TableMap> {
        let table = required(inputs, 0, "table")?;
        if self.source_column.is_empty() {
            return Err(NodeError::MissingSetting("source_column"));
        }
        let mut value = col(self.source_column.as_str());
        if let Some(format) = &self.format {
            value = format.apply(value);
        }
        let cell = table
            .select([value.cast(DataType::String).alias("value")])
            .slice(row_offset("source_row", self.source_row)?, 1)
            .collect()?;
        let text = cell
            .column("value")?
            .str()?
            .iter()
            .next()
            .flatten()
            .map(str::to_string);
        let frame = df!("value" => [text])?.lazy();
        single_output(WIDGET_PLUG, frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::test_support::{collect, handle, names, strs};
    use polars::prelude::*;

    fn inputs() -> Vec<Option<TableHandle>> {
        vec![handle(
            df!("name" => ["Ada", "Alan"], "share" => [0.25f64, 0.5]).unwrap(),
        )]
    }

    #[test]
    fn test_chart_passes_table_to_widget() {
        let tables = ChartSettings::default()
            .compute(&ComputeContext::default(), &inputs())
            .unwrap();
        assert!(tables.get("table").is_none());
        assert_eq!(collect(&tables, WIDGET_PLUG).height(), 2);
    }

    #[test]
    fn test_table_column_selection() {
        let settings = TableSettings {
            columns: vec!["share".into()],
            ..TableSettings::default()
        };
        let tables = settings.compute(&ComputeContext::default(), &inputs()).unwrap();
        assert_eq!(names(&collect(&tables, WIDGET_PLUG)), vec!["share"]);
    }

    #[test]
    fn test_label_formats_cell() {
        let settings = LabelSettings {
            source_column: "share".into(),
            source_row: 1,
            format: Some(ColumnFormat::Percent { decimals: 0 }),
        };
        let tables = settings.compute(&ComputeContext::default(), &inputs()).unwrap();
        let df = collect(&tables, WIDGET_PLUG);
        assert_eq!(strs(&df, "value"), vec![Some("50.0%".into())]);
    }

    #[test]
    fn test_label_missing_row_is_null() {
        let settings = LabelSettings {
            source_column: "name".into(),
            source_row: 7,
            format: None,
        };
        let tables = settings.compute(&ComputeContext::default(), &inputs()).unwrap();
        assert_eq!(strs(&collect(&tables, WIDGET_PLUG), "value"), vec![None]);
    }

    #[test]
    fn test_label_huge_row_is_rejected() {
        let settings = LabelSettings {
            source_column: "name".into(),
            source_row: usize::MAX,
            format: None,
        };
        assert!(matches!(
            settings.compute(&ComputeContext::default(), &inputs()),
            Err(NodeError::InvalidSetting { setting: "source_row", .. })
        ));
    }
}
