//! Dataflow graph engine.
//!
//! Nodes are stored by unique name and reference their sources through
//! `(node name, output index)` plugs. Tables flow along those references
//! from load nodes through manipulations into displays and dashboards.
//!
//! # Architecture
//!
//! ```text
//! [Load] ──► [Derive] ──► [Group] ──► [Bars] ──► [Dashboard]
//!       └──► [Join] ◄──── [Load1]           ┌──► [Table]
//!              └────────────────────────────┘
//! ```
//!
//! # Design
//!
//! - **Name-keyed store**: rename and delete rewrite references as plain data.
//! - **Validated wiring**: every connection is checked for plug kind,
//!   cycles and dashboard duplicates before it is written.
//! - **Dirty flags**: edits invalidate a node and its descendants; builds
//!   only recompute dirty nodes, ancestors first, and stop at the first
//!   failure.
//! - **Lazy tables**: nodes exchange polars `LazyFrame` plans, so a build
//!   composes queries and only collects where a node needs concrete values.

pub mod category;
pub mod error;
pub mod factory;
pub mod node;
pub mod node_type;
pub mod resolver;
pub mod scheduler;
pub mod snapshot;
pub mod store;
pub mod table;
pub mod validator;

pub use category::{Arity, Category, PlugKind};
pub use error::{GraphError, GraphResult};
pub use factory::{create_node, increment_name, NodeRegistry};
pub use node::{Node, PlugRef};
pub use node_type::{NodeType, Rgb};
pub use resolver::DownstreamIndex;
pub use scheduler::{build, build_order, BuildReport, Scheduler};
pub use snapshot::{EdgeSnapshot, GraphSnapshot, NodeSnapshot};
pub use store::{Graph, GRAPH_SETTINGS_NODE};
pub use table::{TableHandle, TableMap};
