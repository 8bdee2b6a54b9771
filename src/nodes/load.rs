//! Load node: scans a CSV file.
//!
//! The path may start with `~` and is otherwise taken relative to the graph
//! file's directory. Separator and header detection default to the engine
//! configuration and can be overridden per node.

use polars::prelude::{LazyCsvReader, LazyFileListReader};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::graph::{TableHandle, TableMap};
use crate::nodes::{table_output, ComputeContext, NodeCompute, NodeError, NodeResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadSettings {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separator: Option<char>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_header: Option<bool>,
}

impl LoadSettings {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}

impl NodeCompute for LoadSettings {
    fn compute(&self, ctx: &ComputeContext, _inputs: &[Option<TableHandle>]) -> NodeResult<TableMap> {
        if self.path.trim().is_empty() {
            return Err(NodeError::MissingSetting("path"));
        }
        let path = ctx.resolve_path(self.path.trim());
        if !path.is_file() {
            return Err(NodeError::FileNotFound(path));
        }

        let separator = self.separator.unwrap_or(ctx.csv.separator);
        let separator = u8::try_from(separator)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                NodeError::invalid("separator", format!("'{}' is not a single-byte character", separator))
            })?;
        let has_header = self.has_header.unwrap_or(ctx.csv.has_header);

        debug!("Scanning {}", path.display());
        let frame = LazyCsvReader::new(&path)
            .with_has_header(has_header)
            .with_separator(separator)
            .with_infer_schema_length(ctx.csv.infer_schema_length)
            .finish()?;
        table_output(frame)
    }
}
