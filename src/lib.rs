//! # tablegraph-rs: dataflow graphs over tables
//!
//! A graph of named nodes, each loading, transforming or displaying a table.
//! Nodes cache their outputs and carry a dirty flag; building a node
//! recomputes only the stale part of its ancestry.
//!
//! ## Architecture
//!
//! - **graph**: node store, connection validator, dependency resolver and
//!   build scheduler
//! - **nodes**: per-type settings and table computations on polars lazy frames
//! - **formula**: compiles `{column}`/`@function()` formulas to column expressions
//! - **config**: engine config, app state and the graph file format
//!
//! ## Example
//!
//! ```ignore
//! use tablegraph_rs::graph::{create_node, Graph, NodeRegistry, Scheduler};
//! use tablegraph_rs::nodes::{ComputeContext, LoadSettings, NodeSettings};
//!
//! let mut graph = Graph::new();
//! let registry = NodeRegistry::builtin();
//! let load = create_node(
//!     &mut graph,
//!     &registry,
//!     "load",
//!     None,
//!     Some(NodeSettings::Load(LoadSettings::new("sales.csv"))),
//!     true,
//! )?;
//! let table = create_node(&mut graph, &registry, "table", None, None, true)?;
//! graph.connect(&load, 0, &table, 0);
//!
//! let scheduler = Scheduler::new(ComputeContext::default());
//! assert!(scheduler.build(&mut graph, &table));
//! ```

pub mod config;
pub mod error;
pub mod formula;
pub mod graph;
pub mod nodes;

// Re-export commonly used types
pub use config::{AppState, EngineConfig, ViewState};
pub use error::{Result, ResultExt, TableGraphError};
pub use graph::{Graph, Node, NodeType, Scheduler};
pub use nodes::{ComputeContext, NodeSettings};
