//! Built-in node computations.
//!
//! Every node type has a settings struct that knows how to turn its input
//! tables into output tables. [`NodeSettings`] is the closed set of those
//! structs; the scheduler calls [`NodeSettings::compute`] without knowing
//! which type it holds.
//!
//! # Design
//!
//! - Settings serialize with a `type` tag matching [`NodeType::as_str`], so a
//!   node's record in a graph file is its settings plus layout fields.
//! - Missing keys fall back to defaults. Bad values surface when the node is
//!   built, not when it is loaded.
//! - Computations stay lazy. Output plans have their schema resolved before
//!   they are cached, which reports missing columns at the node that
//!   references them.

pub mod backdrop;
pub mod concatenate;
pub mod constant;
pub mod dashboard;
pub mod derive;
pub mod display;
pub mod dot;
pub mod error;
pub mod filter;
pub mod format;
pub mod group;
pub mod join;
pub mod load;
pub mod pivot;
pub mod rename;
pub mod reorder;
pub mod sort;
pub mod switch;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use polars::prelude::{col, Expr, LazyFrame};
use serde::{Deserialize, Serialize};

use crate::config::CsvOptions;
use crate::graph::{NodeType, TableHandle, TableMap};

pub use backdrop::BackdropSettings;
pub use concatenate::{ConcatHow, ConcatenateSettings};
pub use constant::ConstantSettings;
pub use dashboard::DashboardSettings;
pub use derive::DeriveSettings;
pub use display::{ChartSettings, LabelSettings, TableSettings};
pub use dot::DotSettings;
pub use error::{NodeError, NodeResult};
pub use filter::FilterSettings;
pub use format::{ColumnFormat, FormatSettings};
pub use group::{Aggregation, GroupSettings};
pub use join::{JoinHow, JoinSettings};
pub use load::LoadSettings;
pub use pivot::PivotSettings;
pub use rename::RenameSettings;
pub use reorder::ReorderSettings;
pub use sort::{SortColumn, SortSettings};
pub use switch::SwitchSettings;

/// Output plug of load and manipulate nodes.
pub const TABLE_PLUG: &str = "table";
/// Output plug of display nodes.
pub const WIDGET_PLUG: &str = "widget";

/// Environment shared by every compute call of one build.
#[derive(Debug, Clone, Default)]
pub struct ComputeContext {
    /// CSV reading defaults for load nodes.
    pub csv: CsvOptions,
    /// Directory relative paths are resolved against, usually the graph
    /// file's directory.
    pub base_dir: Option<PathBuf>,
}

impl ComputeContext {
    pub fn new(csv: CsvOptions) -> Self {
        Self {
            csv,
            base_dir: None,
        }
    }

    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Expand a leading `~` and anchor relative paths at the base directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let expanded = match (path.strip_prefix('~'), dirs_next::home_dir()) {
            (Some(rest), Some(home)) => home.join(rest.trim_start_matches(['/', '\\'])),
            _ => PathBuf::from(path),
        };
        match &self.base_dir {
            Some(base) if expanded.is_relative() => base.join(expanded),
            _ => expanded,
        }
    }
}

/// Turns input tables into output tables.
pub trait NodeCompute {
    /// `inputs` holds one slot per input plug, `None` where nothing usable
    /// is connected.
    fn compute(&self, ctx: &ComputeContext, inputs: &[Option<TableHandle>]) -> NodeResult<TableMap>;
}

/// Settings of any built-in node type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeSettings {
    Load(LoadSettings),
    Join(JoinSettings),
    Derive(DeriveSettings),
    Group(GroupSettings),
    Filter(FilterSettings),
    Sort(SortSettings),
    Rename(RenameSettings),
    Reorder(ReorderSettings),
    Switch(SwitchSettings),
    Concatenate(ConcatenateSettings),
    Pivot(PivotSettings),
    Format(FormatSettings),
    #[serde(alias = "constant ref")]
    Constant(ConstantSettings),
    Dot(DotSettings),
    Table(TableSettings),
    Bars(ChartSettings),
    Pie(ChartSettings),
    Lines(ChartSettings),
    Label(LabelSettings),
    Dashboard(DashboardSettings),
    Backdrop(BackdropSettings),
}

impl NodeSettings {
    /// Default settings for a fresh node of `node_type`.
    pub fn default_for(node_type: NodeType) -> Self {
        match node_type {
            NodeType::Load => Self::Load(LoadSettings::default()),
            NodeType::Join => Self::Join(JoinSettings::default()),
            NodeType::Derive => Self::Derive(DeriveSettings::default()),
            NodeType::Group => Self::Group(GroupSettings::default()),
            NodeType::Filter => Self::Filter(FilterSettings::default()),
            NodeType::Sort => Self::Sort(SortSettings::default()),
            NodeType::Rename => Self::Rename(RenameSettings::default()),
            NodeType::Reorder => Self::Reorder(ReorderSettings::default()),
            NodeType::Switch => Self::Switch(SwitchSettings::default()),
            NodeType::Concatenate => Self::Concatenate(ConcatenateSettings::default()),
            NodeType::Pivot => Self::Pivot(PivotSettings::default()),
            NodeType::Format => Self::Format(FormatSettings::default()),
            NodeType::Constant => Self::Constant(ConstantSettings::default()),
            NodeType::Dot => Self::Dot(DotSettings::default()),
            NodeType::Table => Self::Table(TableSettings::default()),
            NodeType::Bars => Self::Bars(ChartSettings::default()),
            NodeType::Pie => Self::Pie(ChartSettings::default()),
            NodeType::Lines => Self::Lines(ChartSettings::default()),
            NodeType::Label => Self::Label(LabelSettings::default()),
            NodeType::Dashboard => Self::Dashboard(DashboardSettings::default()),
            NodeType::Backdrop => Self::Backdrop(BackdropSettings::default()),
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Load(_) => NodeType::Load,
            Self::Join(_) => NodeType::Join,
            Self::Derive(_) => NodeType::Derive,
            Self::Group(_) => NodeType::Group,
            Self::Filter(_) => NodeType::Filter,
            Self::Sort(_) => NodeType::Sort,
            Self::Rename(_) => NodeType::Rename,
            Self::Reorder(_) => NodeType::Reorder,
            Self::Switch(_) => NodeType::Switch,
            Self::Concatenate(_) => NodeType::Concatenate,
            Self::Pivot(_) => NodeType::Pivot,
            Self::Format(_) => NodeType::Format,
            Self::Constant(_) => NodeType::Constant,
            Self::Dot(_) => NodeType::Dot,
            Self::Table(_) => NodeType::Table,
            Self::Bars(_) => NodeType::Bars,
            Self::Pie(_) => NodeType::Pie,
            Self::Lines(_) => NodeType::Lines,
            Self::Label(_) => NodeType::Label,
            Self::Dashboard(_) => NodeType::Dashboard,
            Self::Backdrop(_) => NodeType::Backdrop,
        }
    }

    fn as_compute(&self) -> &dyn NodeCompute {
        match self {
            Self::Load(s) => s,
            Self::Join(s) => s,
            Self::Derive(s) => s,
            Self::Group(s) => s,
            Self::Filter(s) => s,
            Self::Sort(s) => s,
            Self::Rename(s) => s,
            Self::Reorder(s) => s,
            Self::Switch(s) => s,
            Self::Concatenate(s) => s,
            Self::Pivot(s) => s,
            Self::Format(s) => s,
            Self::Constant(s) => s,
            Self::Dot(s) => s,
            Self::Table(s) => s,
            Self::Bars(s) | Self::Pie(s) | Self::Lines(s) => s,
            Self::Label(s) => s,
            Self::Dashboard(s) => s,
            Self::Backdrop(s) => s,
        }
    }

    /// Compute this node's outputs from its input slots.
    pub fn compute(
        &self,
        ctx: &ComputeContext,
        inputs: &[Option<TableHandle>],
    ) -> NodeResult<TableMap> {
        self.as_compute().compute(ctx, inputs)
    }
}

// ==================== Helpers ====================

/// The plan connected to input `index`, or `MissingInput` naming the plug.
pub(crate) fn required(
    inputs: &[Option<TableHandle>],
    index: usize,
    plug: &str,
) -> NodeResult<LazyFrame> {
    inputs
        .get(index)
        .and_then(Option::as_ref)
        .map(TableHandle::lazy)
        .ok_or_else(|| NodeError::MissingInput(plug.to_string()))
}

/// Slice offset of `setting`'s row index, rejecting rows no offset can reach.
pub(crate) fn row_offset(setting: &'static str, row: usize) -> NodeResult<i64> {
    i64::try_from(row)
        .map_err(|_| NodeError::invalid(setting, format!("row {} is out of range", row)))
}

/// Column names of a plan.
pub(crate) fn column_names(frame: &LazyFrame) -> NodeResult<Vec<String>> {
    let schema = frame.clone().collect_schema()?;
    Ok(schema.iter_names().map(|name| name.to_string()).collect())
}

/// Resolve the plan's schema and cache it under `plug`.
pub(crate) fn single_output(plug: &str, mut frame: LazyFrame) -> NodeResult<TableMap> {
    frame.collect_schema()?;
    let mut tables = TableMap::new();
    tables.insert(plug.to_string(), TableHandle::new(frame));
    Ok(tables)
}

/// Output of a load or manipulate node.
pub(crate) fn table_output(frame: LazyFrame) -> NodeResult<TableMap> {
    single_output(TABLE_PLUG, frame)
}

/// Rename columns in place, keeping column order. Names absent from the
/// table are an error.
pub(crate) fn rename_columns(
    frame: LazyFrame,
    renames: &BTreeMap<String, String>,
) -> NodeResult<LazyFrame> {
    let names = column_names(&frame)?;
    if let Some(missing) = renames.keys().find(|old| !names.contains(old)) {
        return Err(NodeError::invalid(
            "renames",
            format!("no column named '{}'", missing),
        ));
    }
    let exprs: Vec<Expr> = names
        .iter()
        .map(|name| match renames.get(name) {
            Some(new) if !new.is_empty() => col(name.as_str()).alias(new.as_str()),
            _ => col(name.as_str()),
        })
        .collect();
    Ok(frame.select(exprs))
}

/// Directory containing `path`, used as the base for relative load paths.
pub fn base_dir_of(path: &Path) -> Option<PathBuf> {
    path.parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
}

#[cfg(test)]
pub(crate) mod test_support {
    use polars::prelude::*;

    use crate::graph::TableHandle;

    pub fn handle(df: DataFrame) -> Option<TableHandle> {
        Some(TableHandle::from(df))
    }

    pub fn collect(tables: &crate::graph::TableMap, plug: &str) -> DataFrame {
        tables.get(plug).unwrap().collect().unwrap()
    }

    pub fn i64s(df: &DataFrame, name: &str) -> Vec<Option<i64>> {
        df.column(name).unwrap().i64().unwrap().into_iter().collect()
    }

    pub fn f64s(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        df.column(name).unwrap().f64().unwrap().into_iter().collect()
    }

    pub fn strs(df: &DataFrame, name: &str) -> Vec<Option<String>> {
        df.column(name)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect()
    }

    pub fn names(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_match_type() {
        for node_type in NodeType::all() {
            assert_eq!(NodeSettings::default_for(*node_type).node_type(), *node_type);
        }
    }

    #[test]
    fn test_type_tag_matches_node_type() {
        for node_type in NodeType::all() {
            let value = serde_json::to_value(NodeSettings::default_for(*node_type)).unwrap();
            assert_eq!(value["type"], node_type.as_str());
        }
    }

    #[test]
    fn test_missing_keys_default() {
        let settings: NodeSettings =
            serde_json::from_str(r#"{"type": "derive", "formula": "{a} + 1"}"#).unwrap();
        assert_eq!(
            settings,
            NodeSettings::Derive(DeriveSettings {
                column: "Derived column".to_string(),
                formula: "{a} + 1".to_string(),
            })
        );
    }

    #[test]
    fn test_constant_ref_alias() {
        let settings: NodeSettings = serde_json::from_str(r#"{"type": "constant ref"}"#).unwrap();
        assert_eq!(settings.node_type(), NodeType::Constant);
    }

    #[test]
    fn test_resolve_path() {
        let ctx = ComputeContext::default().with_base_dir("/data/graphs");
        assert_eq!(ctx.resolve_path("a.csv"), PathBuf::from("/data/graphs/a.csv"));
        assert_eq!(ctx.resolve_path("/tmp/a.csv"), PathBuf::from("/tmp/a.csv"));
        if let Some(home) = dirs_next::home_dir() {
            assert_eq!(ctx.resolve_path("~/a.csv"), home.join("a.csv"));
        }
    }

    #[test]
    fn test_row_offset_rejects_huge_rows() {
        assert_eq!(row_offset("source_row", 3).unwrap(), 3);
        assert!(matches!(
            row_offset("source_row", usize::MAX),
            Err(NodeError::InvalidSetting { setting: "source_row", .. })
        ));
    }

    #[test]
    fn test_required_input() {
        let inputs = vec![None];
        assert!(matches!(
            required(&inputs, 0, "table"),
            Err(NodeError::MissingInput(plug)) if plug == "table"
        ));
        assert!(required(&[], 3, "right").is_err());
    }

    #[test]
    fn test_base_dir_of() {
        assert_eq!(base_dir_of(Path::new("graph.tg")), None);
        assert_eq!(
            base_dir_of(Path::new("/a/b/graph.tg")),
            Some(PathBuf::from("/a/b"))
        );
    }
}
