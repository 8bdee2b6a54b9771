//! Node categories and plug kinds.
//!
//! A node's category fixes what kind of value its inputs accept and its
//! outputs produce. The validator only lets an output feed an input when both
//! kinds exist and are equal.

use serde::{Deserialize, Serialize};

/// The kind of value carried across a plug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlugKind {
    /// A lazily evaluated table.
    Table,
    /// A display-ready table destined for a dashboard.
    Widget,
}

impl std::fmt::Display for PlugKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlugKind::Table => write!(f, "table"),
            PlugKind::Widget => write!(f, "widget"),
        }
    }
}

/// Coarse node kind governing which connections are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Load,
    Manipulate,
    Display,
    Dashboard,
    Backdrop,
}

impl Category {
    /// Kind accepted by inputs of nodes in this category.
    pub fn input_kind(&self) -> Option<PlugKind> {
        match self {
            Category::Load | Category::Backdrop => None,
            Category::Manipulate | Category::Display => Some(PlugKind::Table),
            Category::Dashboard => Some(PlugKind::Widget),
        }
    }

    /// Kind produced by outputs of nodes in this category.
    pub fn output_kind(&self) -> Option<PlugKind> {
        match self {
            Category::Load | Category::Manipulate => Some(PlugKind::Table),
            Category::Display => Some(PlugKind::Widget),
            Category::Dashboard | Category::Backdrop => None,
        }
    }

    /// Whether an output of `self` may feed an input of `target`.
    pub fn can_feed(&self, target: Category) -> bool {
        match (self.output_kind(), target.input_kind()) {
            (Some(out), Some(inp)) => out == inp,
            _ => false,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Category::Load => "load",
            Category::Manipulate => "manipulate",
            Category::Display => "display",
            Category::Dashboard => "dashboard",
            Category::Backdrop => "backdrop",
        };
        write!(f, "{}", name)
    }
}

/// Declared input arity of a node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// A fixed list of named input plugs.
    Fixed(&'static [&'static str]),
    /// A list that grows one slot at a time as plugs are connected.
    Dynamic,
}

impl Arity {
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Arity::Dynamic)
    }

    /// Initial number of input slots for a freshly created node.
    pub fn initial_len(&self) -> usize {
        match self {
            Arity::Fixed(names) => names.len(),
            Arity::Dynamic => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_table() {
        assert!(Category::Load.can_feed(Category::Manipulate));
        assert!(Category::Load.can_feed(Category::Display));
        assert!(Category::Manipulate.can_feed(Category::Manipulate));
        assert!(Category::Display.can_feed(Category::Dashboard));

        assert!(!Category::Display.can_feed(Category::Manipulate));
        assert!(!Category::Manipulate.can_feed(Category::Dashboard));
        assert!(!Category::Load.can_feed(Category::Load));
        assert!(!Category::Dashboard.can_feed(Category::Dashboard));
        assert!(!Category::Backdrop.can_feed(Category::Manipulate));
        assert!(!Category::Manipulate.can_feed(Category::Backdrop));
    }

    #[test]
    fn test_arity_initial_len() {
        assert_eq!(Arity::Fixed(&["left", "right"]).initial_len(), 2);
        assert_eq!(Arity::Dynamic.initial_len(), 0);
        assert!(Arity::Dynamic.is_dynamic());
    }
}
