//! Rename node.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::graph::{TableHandle, TableMap};
use crate::nodes::{rename_columns, required, table_output, ComputeContext, NodeCompute, NodeResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenameSettings {
    /// Old name to new name. Empty new names leave the column as is.
    pub renames: BTreeMap<String, String>,
}

impl NodeCompute for RenameSettings {
    fn compute(&self, _ctx: &ComputeContext, inputs: &[Option<TableHandle>]) -> NodeResult<TableMap> {
        let table = required(inputs, 0, "table")?;
        table_output(rename_columns(table, &self.renames)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::test_support::{collect, handle, names};
    use crate::nodes::{NodeError, TABLE_PLUG};
    use polars::prelude::*;

    fn inputs() -> Vec<Option<TableHandle>> {
        vec![handle(df!("a" => [1i64], "b" => [2i64], "c" => [3i64]).unwrap())]
    }

    #[test]
    fn test_rename_keeps_order() {
        let settings = RenameSettings {
            renames: BTreeMap::from([
                ("a".to_string(), "alpha".to_string()),
                ("c".to_string(), String::new()),
            ]),
        };
        let df = collect(
            &settings.compute(&ComputeContext::default(), &inputs()).unwrap(),
            TABLE_PLUG,
        );
        assert_eq!(names(&df), vec!["alpha", "b", "c"]);
    }

    #[test]
    fn test_unknown_column_rejected() {
        let settings = RenameSettings {
            renames: BTreeMap::from([("zzz".to_string(), "x".to_string())]),
        };
        assert!(matches!(
            settings.compute(&ComputeContext::default(), &inputs()),
            Err(NodeError::InvalidSetting { setting: "renames", .. })
        ));
    }
}
