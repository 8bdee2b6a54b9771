//! Format node: per-column display formatting.

use std::collections::BTreeMap;

use polars::prelude::{col, lit, DataType, Expr};
use serde::{Deserialize, Serialize};

use crate::graph::{TableHandle, TableMap};
use crate::nodes::{
    column_names, required, table_output, ComputeContext, NodeCompute, NodeError, NodeResult,
};

/// How to present one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnFormat {
    /// Round numbers to `decimals` places.
    Round { decimals: u32 },
    /// Multiply by 100, round, and append `%`. The result is text.
    Percent { decimals: u32 },
    Text,
    Upper,
    Lower,
}

impl ColumnFormat {
    pub fn apply(&self, value: Expr) -> Expr {
        match self {
            ColumnFormat::Round { decimals } => value.round(*decimals),
            ColumnFormat::Percent { decimals } => {
                (value.cast(DataType::Float64) * lit(100.0))
                    .round(*decimals)
                    .cast(DataType::String)
                    + lit("%")
            }
            ColumnFormat::Text => value.cast(DataType::String),
            ColumnFormat::Upper => value.cast(DataType::String).str().to_uppercase(),
            ColumnFormat::Lower => value.cast(DataType::String).str().to_lowercase(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatSettings {
    pub formats: BTreeMap<String, ColumnFormat>,
    /// Cast every column to text after formatting.
    pub all_to_string: bool,
}

impl NodeCompute for FormatSettings {
    fn compute(&self, _ctx: &ComputeContext, inputs: &[Option<TableHandle>]) -> NodeResult<TableMap> {
        let table = required(inputs, 0, "table")?;
        let names = column_names(&table)?;
        if let Some(missing) = self.formats.keys().find(|c| !names.contains(c)) {
            return Err(NodeError::invalid(
                "formats",
                format!("no column named '{}'", missing),
            ));
        }

        let exprs: Vec<Expr> = names
            .iter()
            .filter_map(|name| {
                let format = self.formats.get(name);
                if format.is_none() && !self.all_to_string {
                    return None;
                }
                let mut expr = col(name.as_str());
                if let Some(format) = format {
                    expr = format.apply(expr);
                }
                if self.all_to_string {
                    expr = expr.cast(DataType::String);
                }
                Some(expr.alias(name.as_str()))
            })
            .collect();
        if exprs.is_empty() {
            return table_output(table);
        }
        table_output(table.with_columns(exprs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::test_support::{collect, f64s, handle, strs};
    use crate::nodes::TABLE_PLUG;
    use polars::prelude::*;

    fn inputs() -> Vec<Option<TableHandle>> {
        vec![handle(
            df!(
                "share" => [0.1234f64, 0.5],
                "price" => [1.256f64, 3.0],
                "name" => ["Ada", "alan"],
                "count" => [3i64, 4],
            )
            .unwrap(),
        )]
    }

    fn format(settings: FormatSettings) -> DataFrame {
        collect(
            &settings.compute(&ComputeContext::default(), &inputs()).unwrap(),
            TABLE_PLUG,
        )
    }

    #[test]
    fn test_column_formats() {
        let df = format(FormatSettings {
            formats: BTreeMap::from([
                ("share".into(), ColumnFormat::Percent { decimals: 1 }),
                ("price".into(), ColumnFormat::Round { decimals: 1 }),
                ("name".into(), ColumnFormat::Upper),
            ]),
            all_to_string: false,
        });
        assert_eq!(strs(&df, "share"), vec![Some("12.3%".into()), Some("50.0%".into())]);
        assert_eq!(f64s(&df, "price"), vec![Some(1.3), Some(3.0)]);
        assert_eq!(strs(&df, "name"), vec![Some("ADA".into()), Some("ALAN".into())]);
    }

    #[test]
    fn test_all_to_string() {
        let df = format(FormatSettings {
            formats: BTreeMap::new(),
            all_to_string: true,
        });
        assert!(df.get_columns().iter().all(|c| c.dtype() == &DataType::String));
        assert_eq!(strs(&df, "count"), vec![Some("3".into()), Some("4".into())]);
    }

    #[test]
    fn test_format_settings_json() {
        let settings: FormatSettings = serde_json::from_str(
            r#"{"formats": {"a": {"kind": "round", "decimals": 2}, "b": {"kind": "text"}}}"#,
        )
        .unwrap();
        assert_eq!(settings.formats["a"], ColumnFormat::Round { decimals: 2 });
        assert_eq!(settings.formats["b"], ColumnFormat::Text);
        assert!(!settings.all_to_string);
    }
}
