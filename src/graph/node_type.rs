//! Node type enumeration.
//!
//! This module defines the closed set of node types a graph may contain,
//! together with the static metadata the graph needs about each of them:
//! category, declared plugs, default display name and color.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::graph::category::{Arity, Category};
use crate::graph::error::GraphError;

/// RGB color as stored in graph files.
pub type Rgb = [u8; 3];

const BLUE: Rgb = [38, 101, 168];
const PINK: Rgb = [176, 82, 124];
const GREEN: Rgb = [54, 140, 92];
const ORANGE: Rgb = [196, 120, 36];
const GRAY: Rgb = [70, 70, 70];
const BLACK: Rgb = [5, 5, 5];
const PURPLE: Rgb = [166, 75, 132];

const TABLE: &[&str] = &["table"];
const WIDGET: &[&str] = &["widget"];
const NONE: &[&str] = &[];

/// Types of nodes that can be created in a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    // Load
    Load,

    // Manipulate
    Join,
    Derive,
    Group,
    Filter,
    Sort,
    Rename,
    Reorder,
    Switch,
    Concatenate,
    Pivot,
    Format,
    Constant,
    Dot,

    // Display
    Table,
    Bars,
    Pie,
    Lines,
    Label,

    // Dashboard
    Dashboard,

    // Cosmetic
    Backdrop,
}

impl NodeType {
    /// Tag used in graph files.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Load => "load",
            NodeType::Join => "join",
            NodeType::Derive => "derive",
            NodeType::Group => "group",
            NodeType::Filter => "filter",
            NodeType::Sort => "sort",
            NodeType::Rename => "rename",
            NodeType::Reorder => "reorder",
            NodeType::Switch => "switch",
            NodeType::Concatenate => "concatenate",
            NodeType::Pivot => "pivot",
            NodeType::Format => "format",
            NodeType::Constant => "constant",
            NodeType::Dot => "dot",
            NodeType::Table => "table",
            NodeType::Bars => "bars",
            NodeType::Pie => "pie",
            NodeType::Lines => "lines",
            NodeType::Label => "label",
            NodeType::Dashboard => "dashboard",
            NodeType::Backdrop => "backdrop",
        }
    }

    /// Get the display name for this node type. Also the base of generated
    /// node names.
    pub fn display_name(&self) -> &'static str {
        match self {
            NodeType::Load => "Load",
            NodeType::Join => "Join",
            NodeType::Derive => "Derive",
            NodeType::Group => "Group",
            NodeType::Filter => "Filter",
            NodeType::Sort => "Sort",
            NodeType::Rename => "Rename",
            NodeType::Reorder => "Reorder",
            NodeType::Switch => "Switch",
            NodeType::Concatenate => "Concatenate",
            NodeType::Pivot => "Pivot",
            NodeType::Format => "Format",
            NodeType::Constant => "Constant",
            NodeType::Dot => "Dot",
            NodeType::Table => "Table",
            NodeType::Bars => "Bars",
            NodeType::Pie => "Pie",
            NodeType::Lines => "Lines",
            NodeType::Label => "Label",
            NodeType::Dashboard => "Dashboard",
            NodeType::Backdrop => "Backdrop",
        }
    }

    /// Get all available node types.
    pub fn all() -> &'static [NodeType] {
        &[
            NodeType::Load,
            NodeType::Join,
            NodeType::Derive,
            NodeType::Group,
            NodeType::Filter,
            NodeType::Sort,
            NodeType::Rename,
            NodeType::Reorder,
            NodeType::Switch,
            NodeType::Concatenate,
            NodeType::Pivot,
            NodeType::Format,
            NodeType::Constant,
            NodeType::Dot,
            NodeType::Table,
            NodeType::Bars,
            NodeType::Pie,
            NodeType::Lines,
            NodeType::Label,
            NodeType::Dashboard,
            NodeType::Backdrop,
        ]
    }

    pub fn category(&self) -> Category {
        match self {
            NodeType::Load => Category::Load,
            NodeType::Table
            | NodeType::Bars
            | NodeType::Pie
            | NodeType::Lines
            | NodeType::Label => Category::Display,
            NodeType::Dashboard => Category::Dashboard,
            NodeType::Backdrop => Category::Backdrop,
            _ => Category::Manipulate,
        }
    }

    /// Declared input plugs.
    pub fn inputs(&self) -> Arity {
        match self {
            NodeType::Load | NodeType::Backdrop => Arity::Fixed(NONE),
            NodeType::Join => Arity::Fixed(&["left", "right"]),
            NodeType::Concatenate => Arity::Fixed(&["table1", "table2"]),
            NodeType::Constant => Arity::Fixed(&["table", "constant source"]),
            NodeType::Switch | NodeType::Dashboard => Arity::Dynamic,
            _ => Arity::Fixed(TABLE),
        }
    }

    /// Declared output plugs.
    pub fn outputs(&self) -> &'static [&'static str] {
        match self.category() {
            Category::Load | Category::Manipulate => TABLE,
            Category::Display => WIDGET,
            Category::Dashboard | Category::Backdrop => NONE,
        }
    }

    /// Name of the input plug at `index`, including slots of dynamic nodes.
    pub fn input_name(&self, index: usize) -> String {
        match (self, self.inputs()) {
            (NodeType::Dashboard, _) => format!("widget{}", index + 1),
            (_, Arity::Dynamic) => (index + 1).to_string(),
            (_, Arity::Fixed(names)) => names
                .get(index)
                .map(|name| name.to_string())
                .unwrap_or_default(),
        }
    }

    pub fn default_color(&self) -> Rgb {
        match self {
            NodeType::Load => BLACK,
            NodeType::Group => PURPLE,
            NodeType::Join | NodeType::Pivot | NodeType::Constant => PINK,
            NodeType::Switch | NodeType::Dot => GRAY,
            NodeType::Backdrop => GRAY,
            NodeType::Dashboard => ORANGE,
            _ if self.category() == Category::Display => GREEN,
            _ => BLUE,
        }
    }

    /// Get a detailed description of what this node does.
    pub fn description(&self) -> &'static str {
        match self {
            NodeType::Load => "Reads a CSV file into a table.",
            NodeType::Join => "Joins two tables on a key column of each.",
            NodeType::Derive => "Adds or replaces a column computed from a formula.",
            NodeType::Group => "Groups rows and aggregates the remaining columns.",
            NodeType::Filter => "Keeps rows for which a boolean formula holds.",
            NodeType::Sort => "Sorts rows by one or more columns.",
            NodeType::Rename => "Renames columns.",
            NodeType::Reorder => "Moves columns into a given order.",
            NodeType::Switch => "Passes through one of several inputs.",
            NodeType::Concatenate => "Stacks two tables vertically or side by side.",
            NodeType::Pivot => "Spreads the values of one column into new columns.",
            NodeType::Format => "Rounds, scales or converts columns for display.",
            NodeType::Constant => "Copies one cell of a second table into a new column.",
            NodeType::Dot => "Reroute point. Passes its input through unchanged.",
            NodeType::Table => "Displays a table.",
            NodeType::Bars => "Displays a bar chart.",
            NodeType::Pie => "Displays a pie chart.",
            NodeType::Lines => "Displays a line chart.",
            NodeType::Label => "Displays a single formatted value.",
            NodeType::Dashboard => "Lays out several displays on a grid.",
            NodeType::Backdrop => "Cosmetic frame grouping nodes on the canvas.",
        }
    }
}

impl FromStr for NodeType {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = match s {
            // Older graph files used a more descriptive tag.
            "constant ref" => "constant",
            other => other,
        };
        NodeType::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == tag)
            .ok_or_else(|| GraphError::UnknownType(s.to_string()))
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip() {
        for t in NodeType::all() {
            assert_eq!(t.as_str().parse::<NodeType>().unwrap(), *t);
        }
        assert_eq!("constant ref".parse::<NodeType>().unwrap(), NodeType::Constant);
        assert!("scatter".parse::<NodeType>().is_err());
    }

    #[test]
    fn test_outputs_follow_category() {
        assert_eq!(NodeType::Load.outputs(), &["table"]);
        assert_eq!(NodeType::Bars.outputs(), &["widget"]);
        assert!(NodeType::Dashboard.outputs().is_empty());
        assert!(NodeType::Backdrop.outputs().is_empty());
    }

    #[test]
    fn test_dynamic_input_names() {
        assert_eq!(NodeType::Switch.input_name(0), "1");
        assert_eq!(NodeType::Switch.input_name(2), "3");
        assert_eq!(NodeType::Dashboard.input_name(1), "widget2");
        assert_eq!(NodeType::Join.input_name(1), "right");
    }

    #[test]
    fn test_serde_tag_matches_as_str() {
        for t in NodeType::all() {
            let json = serde_json::to_string(t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
        }
    }
}
