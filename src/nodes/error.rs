//! Node compute errors.

use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

use crate::formula::FormulaError;

/// Failure while computing one node's outputs.
#[derive(Error, Debug)]
pub enum NodeError {
    #[error("Table operation failed: {0}")]
    Polars(#[from] PolarsError),

    #[error("Invalid formula: {0}")]
    Formula(#[from] FormulaError),

    #[error("Input '{0}' is not connected or has no table")]
    MissingInput(String),

    #[error("Setting '{0}' is required")]
    MissingSetting(&'static str),

    #[error("Invalid value for '{setting}': {message}")]
    InvalidSetting {
        setting: &'static str,
        message: String,
    },

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
}

impl NodeError {
    pub fn invalid(setting: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidSetting {
            setting,
            message: message.into(),
        }
    }
}

pub type NodeResult<T> = std::result::Result<T, NodeError>;
