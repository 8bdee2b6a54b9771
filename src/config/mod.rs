//! Configuration and persistence for tablegraph-rs
//!
//! This module handles:
//! - Engine configuration (`config.toml`): logging, CSV defaults, build options
//! - Application state (`state.json`): recently opened graph files
//! - Graph files: node records plus the editor view state
//!
//! # App Data Location
//!
//! Application data is stored in the platform-appropriate location:
//! - **Linux**: `~/.local/share/dev.tablegraph.tablegraph-rs/`
//! - **macOS**: `~/Library/Application Support/dev.tablegraph.tablegraph-rs/`
//! - **Windows**: `%APPDATA%\dev.tablegraph.tablegraph-rs\`
//!
//! # Example
//!
//! ```ignore
//! use tablegraph_rs::config::{load_graph, AppState, EngineConfig};
//!
//! let config = EngineConfig::load_or_default();
//! let mut state = AppState::load_or_default();
//!
//! let (graph, view) = load_graph("pipeline.tg")?;
//! state.add_recent_graph("pipeline.tg");
//! state.save()?;
//! ```

pub mod graph_file;
pub mod settings;
pub mod view;

pub use graph_file::{from_str, load_graph, save_graph, to_string, GRAPH_SETTINGS_NODE};
pub use settings::*;
pub use view::ViewState;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TableGraphError};

/// Application identifier for data directories
pub const APP_ID: &str = "dev.tablegraph.tablegraph-rs";

/// Engine config filename
pub const CONFIG_FILE: &str = "config.toml";

/// App state filename
pub const APP_STATE_FILE: &str = "state.json";

/// Maximum number of recent graphs to remember
pub const MAX_RECENT_GRAPHS: usize = 10;

// ==================== App Data Directory ====================

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Ensure the app data directory exists
pub fn ensure_app_data_dir() -> Result<PathBuf> {
    let dir = app_data_dir().ok_or_else(|| {
        TableGraphError::Config("Could not determine app data directory".to_string())
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| {
            TableGraphError::Config(format!("Failed to create app data directory: {}", e))
        })?;
    }

    Ok(dir)
}

/// Get the path to the app state file
pub fn app_state_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(APP_STATE_FILE))
}

// ==================== Recent Graphs ====================

/// A recently opened graph file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentGraph {
    pub path: PathBuf,
    pub last_opened: DateTime<Utc>,
}

impl RecentGraph {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_opened: Utc::now(),
        }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

// ==================== App State ====================

/// State that persists across runs, separate from any graph file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppState {
    /// Version for future migration support
    #[serde(default = "default_app_state_version")]
    pub version: u32,

    /// Most recent first
    #[serde(default)]
    pub recent_graphs: Vec<RecentGraph>,

    #[serde(default)]
    pub last_graph_path: Option<PathBuf>,
}

fn default_app_state_version() -> u32 {
    1
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            version: 1,
            recent_graphs: Vec::new(),
            last_graph_path: None,
        }
    }
}

impl AppState {
    /// Load app state from the default location
    pub fn load() -> Result<Self> {
        let path = app_state_path().ok_or_else(|| {
            TableGraphError::Config("Could not determine app state path".to_string())
        })?;

        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| TableGraphError::Config(format!("Failed to read app state: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| TableGraphError::Config(format!("Failed to parse app state: {}", e)))
    }

    /// Load app state, returning defaults on any error
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load app state, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save app state to the default location
    pub fn save(&self) -> Result<()> {
        let dir = ensure_app_data_dir()?;
        self.save_to(dir.join(APP_STATE_FILE))
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| TableGraphError::Config(format!("Failed to serialize app state: {}", e)))?;

        std::fs::write(path.as_ref(), content)
            .map_err(|e| TableGraphError::Config(format!("Failed to write app state: {}", e)))
    }

    /// Move `path` to the front of the recent list and make it the last graph.
    pub fn add_recent_graph(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();

        self.recent_graphs.retain(|g| g.path != path);
        self.recent_graphs.insert(0, RecentGraph::new(path.clone()));
        self.recent_graphs.truncate(MAX_RECENT_GRAPHS);

        self.last_graph_path = Some(path);
    }

    pub fn remove_recent_graph(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        self.recent_graphs.retain(|g| g.path != path);

        if self.last_graph_path.as_deref() == Some(path) {
            self.last_graph_path = None;
        }
    }

    /// Drop entries whose files are gone
    pub fn cleanup_missing_graphs(&mut self) {
        self.recent_graphs.retain(RecentGraph::exists);

        if self.last_graph_path.as_ref().is_some_and(|p| !p.exists()) {
            self.last_graph_path = None;
        }
    }

    /// The last opened graph, if it still exists
    pub fn last_graph(&self) -> Option<&Path> {
        self.last_graph_path
            .as_deref()
            .filter(|p| p.exists())
    }
}

// ==================== Tests ====================
