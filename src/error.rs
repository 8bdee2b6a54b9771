//! Error handling for tablegraph-rs
//!
//! This module defines the crate-level error type and a Result alias used by
//! the persistence layer and the binary. Graph, formula and node errors live
//! next to their subsystems and convert into [`TableGraphError`].

use thiserror::Error;

use crate::formula::FormulaError;
use crate::graph::GraphError;
use crate::nodes::NodeError;

/// Main error type for tablegraph-rs operations
#[derive(Error, Debug)]
pub enum TableGraphError {
    /// Structural errors raised by graph mutation or traversal
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// Errors raised while compiling a formula
    #[error("Formula error: {0}")]
    Formula(#[from] FormulaError),

    /// Errors raised by a node's compute step
    #[error("Node error: {0}")]
    Node(#[from] NodeError),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed graph file
    #[error("Graph file error at line {line}: {message}")]
    GraphFile { line: usize, message: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<TableGraphError>,
    },
}

impl TableGraphError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        TableGraphError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

impl From<serde_json::Error> for TableGraphError {
    fn from(err: serde_json::Error) -> Self {
        TableGraphError::Serialization(err.to_string())
    }
}

/// Result type alias for tablegraph-rs operations
pub type Result<T> = std::result::Result<T, TableGraphError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<TableGraphError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TableGraphError::Config("missing [csv] table".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing [csv] table");
    }

    #[test]
    fn test_error_with_context() {
        let err = TableGraphError::from(GraphError::NodeNotFound("Load1".into()));
        let with_ctx = err.with_context("Failed to build");
        assert!(with_ctx.to_string().contains("Failed to build"));
        assert!(with_ctx.to_string().contains("Load1"));
    }

    #[test]
    fn test_result_ext_converts_source_error() {
        let io: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "graph.tg",
        ));
        let err = io.context("Opening graph").unwrap_err();
        assert!(matches!(err, TableGraphError::WithContext { .. }));
        assert!(err.to_string().starts_with("Opening graph"));
    }

    #[test]
    fn test_graph_file_error() {
        let err = TableGraphError::GraphFile {
            line: 12,
            message: "expected JSON block".to_string(),
        };
        assert!(err.to_string().contains("line 12"));
    }
}
