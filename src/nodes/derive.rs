//! Derive node: adds or replaces one column computed by a formula.

use serde::{Deserialize, Serialize};

use crate::formula;
use crate::graph::{TableHandle, TableMap};
use crate::nodes::{required, table_output, ComputeContext, NodeCompute, NodeError, NodeResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeriveSettings {
    pub column: String,
    pub formula: String,
}

impl Default for DeriveSettings {
    fn default() -> Self {
        Self {
            column: "Derived column".to_string(),
            formula: String::new(),
        }
    }
}

impl NodeCompute for DeriveSettings {
    fn compute(&self, _ctx: &ComputeContext, inputs: &[Option<TableHandle>]) -> NodeResult<TableMap> {
        let table = required(inputs, 0, "table")?;
        if self.column.is_empty() {
            return Err(NodeError::MissingSetting("column"));
        }
        let expr = formula::compile(&self.formula)?;
        table_output(table.with_column(expr.alias(self.column.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::FormulaError;
    use crate::nodes::test_support::{collect, f64s, handle, names};
    use crate::nodes::TABLE_PLUG;
    use polars::prelude::*;

    fn input() -> Vec<Option<TableHandle>> {
        vec![handle(df!("x" => [1i64, 3], "y" => [4i64, 4]).unwrap())]
    }

    fn derive(column: &str, formula: &str) -> NodeResult<TableMap> {
        DeriveSettings {
            column: column.to_string(),
            formula: formula.to_string(),
        }
        .compute(&ComputeContext::default(), &input())
    }

    #[test]
    fn test_adds_column() {
        let df = collect(&derive("ratio", "{x} / {y}").unwrap(), TABLE_PLUG);
        assert_eq!(names(&df), vec!["x", "y", "ratio"]);
        assert_eq!(f64s(&df, "ratio"), vec![Some(0.25), Some(0.75)]);
    }

    #[test]
    fn test_replaces_existing_column() {
        let df = collect(&derive("x", "{x} * 1.5").unwrap(), TABLE_PLUG);
        assert_eq!(names(&df), vec!["x", "y"]);
        assert_eq!(f64s(&df, "x"), vec![Some(1.5), Some(4.5)]);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            derive("out", ""),
            Err(NodeError::Formula(FormulaError::Empty))
        ));
        assert!(matches!(derive("out", "{missing} + 1"), Err(NodeError::Polars(_))));
        assert!(matches!(derive("", "1"), Err(NodeError::MissingSetting("column"))));
    }
}
