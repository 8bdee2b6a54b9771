//! tablegraph-rs - command line entry point
//!
//! Loads a graph file, builds one node with its stale ancestors and prints
//! the start of the node's first table.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use polars::prelude::IdxSize;
use tablegraph_rs::{
    config::{load_graph, save_graph, AppState, EngineConfig, LoggingConfig},
    graph::Scheduler,
    nodes::{base_dir_of, ComputeContext},
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(version, about = "Build a node of a graph file and print its table")]
struct Args {
    /// Graph file to load
    graph: PathBuf,

    /// Name of the node to build
    node: String,

    /// Number of rows to print
    #[arg(long, default_value_t = 20)]
    rows: usize,
}

/// Stderr logging plus an optional daily log file. The returned guard must
/// live until exit so buffered file output is flushed.
fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    let (file_layer, guard) = match &config.directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "tablegraph.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();
    guard
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logging depends on the config, so config problems are reported after init.
    let (config, config_error) = match EngineConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (EngineConfig::default(), Some(e)),
    };
    let _guard = init_logging(&config.logging);
    if let Some(e) = config_error {
        tracing::warn!("Failed to load config, using defaults: {}", e);
    }

    let (mut graph, view) = load_graph(&args.graph)
        .with_context(|| format!("Failed to load {}", args.graph.display()))?;

    let mut state = AppState::load_or_default();
    state.add_recent_graph(std::fs::canonicalize(&args.graph).unwrap_or_else(|_| args.graph.clone()));
    if let Err(e) = state.save() {
        tracing::warn!("Failed to save app state: {}", e);
    }

    let mut context = ComputeContext::new(config.csv.clone());
    if let Some(dir) = base_dir_of(&args.graph) {
        context = context.with_base_dir(dir);
    }
    let report = Scheduler::new(context).build_with_report(&mut graph, &args.node)?;
    if !report.success {
        let failed = report.failed.as_deref().unwrap_or(&args.node);
        let message = graph
            .get(failed)
            .ok()
            .and_then(|node| node.error())
            .unwrap_or("unknown error");
        bail!("Build of {} failed at {}: {}", args.node, failed, message);
    }

    if config.build.autosave {
        save_graph(&args.graph, &graph, &view)?;
    }

    let node = graph.get(&args.node)?;
    match node.tables().values().next() {
        Some(table) => {
            let rows = IdxSize::try_from(args.rows).unwrap_or(IdxSize::MAX);
            let df = table.lazy().limit(rows).collect()?;
            println!("{}", df);
        }
        None => println!("{} has no table output", args.node),
    }
    Ok(())
}
