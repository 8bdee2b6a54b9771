//! Table handles passed between nodes.

use std::collections::BTreeMap;

use polars::prelude::{DataFrame, IntoLazy, LazyFrame, PolarsResult};

/// Opaque reference to a lazily computed table.
///
/// Handles are never mutated after a node produces them. Rebuilding a node
/// replaces the handle in its cache; holders of the previous one keep reading
/// the old (consistent) plan.
#[derive(Clone)]
pub struct TableHandle(LazyFrame);

/// Output plug name to produced handle.
pub type TableMap = BTreeMap<String, TableHandle>;

impl TableHandle {
    pub fn new(frame: LazyFrame) -> Self {
        Self(frame)
    }

    /// Cheap clone of the underlying plan for further composition.
    pub fn lazy(&self) -> LazyFrame {
        self.0.clone()
    }

    /// Column names, resolving the schema without collecting rows.
    pub fn column_names(&self) -> PolarsResult<Vec<String>> {
        let schema = self.0.clone().collect_schema()?;
        Ok(schema.iter_names().map(|name| name.to_string()).collect())
    }

    /// Execute the plan.
    pub fn collect(&self) -> PolarsResult<DataFrame> {
        self.0.clone().collect()
    }
}

impl From<LazyFrame> for TableHandle {
    fn from(frame: LazyFrame) -> Self {
        Self(frame)
    }
}

impl From<DataFrame> for TableHandle {
    fn from(frame: DataFrame) -> Self {
        Self(frame.lazy())
    }
}

impl std::fmt::Debug for TableHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TableHandle(..)")
    }
}
