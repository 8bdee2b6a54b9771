//! Build scheduler: dirty-aware, ancestors-first evaluation.
//!
//! A build request for node N:
//! 1. Returns immediately if N is clean.
//! 2. Orders N and its ancestors so every node comes after all of its sources.
//! 3. Computes each dirty node in that order from its sources' cached outputs.
//! 4. Stops at the first failure, leaving the failing node and everything
//!    after it dirty.

use std::collections::BTreeSet;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::graph::error::{GraphError, GraphResult};
use crate::graph::store::Graph;
use crate::graph::table::TableHandle;
use crate::nodes::ComputeContext;

/// Outcome of one build request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Nodes computed by this request, in evaluation order.
    pub built: Vec<String>,
    /// Node whose compute step failed, if any.
    pub failed: Option<String>,
    /// Whether the requested node ended up clean.
    pub success: bool,
}

/// Drives builds with a shared compute context.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    context: ComputeContext,
}

impl Scheduler {
    pub fn new(context: ComputeContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &ComputeContext {
        &self.context
    }

    /// Build `name` and its stale ancestors. Returns whether `name` is clean
    /// afterwards. Failures are recorded on the failing node.
    pub fn build(&self, graph: &mut Graph, name: &str) -> bool {
        match self.build_with_report(graph, name) {
            Ok(report) => report.success,
            Err(e) => {
                warn!("Cannot build {}: {}", name, e);
                false
            }
        }
    }

    /// Same as [`Scheduler::build`], reporting which nodes were computed.
    ///
    /// Errors are reserved for graph-level problems (unknown node, corrupted
    /// references). Node compute failures are reported through
    /// [`BuildReport::failed`] and the node's error slot.
    pub fn build_with_report(&self, graph: &mut Graph, name: &str) -> GraphResult<BuildReport> {
        let mut report = BuildReport::default();
        if !graph.get(name)?.is_dirty() {
            report.success = true;
            return Ok(report);
        }

        let start = Instant::now();
        for current in build_order(graph, name)? {
            let node = graph.get(&current)?;
            if !node.is_dirty() {
                continue;
            }
            let inputs = gather_inputs(graph, &current)?;
            let node_start = Instant::now();
            let result = node.settings().compute(&self.context, &inputs);

            let node = graph.get_mut(&current)?;
            match result {
                Ok(tables) => {
                    node.store_outputs(tables);
                    debug!("Built {} in {:?}", current, node_start.elapsed());
                    report.built.push(current);
                }
                Err(e) => {
                    error!("Failed to build {}: {}", current, e);
                    node.store_error(e.to_string());
                    report.failed = Some(current);
                    break;
                }
            }
        }

        report.success = !graph.get(name)?.is_dirty();
        info!(
            "Build of {} {} after {} node(s) in {:?}",
            name,
            if report.success { "succeeded" } else { "failed" },
            report.built.len(),
            start.elapsed()
        );
        Ok(report)
    }
}

/// Build `name` with a default compute context.
pub fn build(graph: &mut Graph, name: &str) -> bool {
    Scheduler::default().build(graph, name)
}

/// `name` and its ancestors, each after all of its sources.
///
/// Iterative post-order walk. Reaching a node that is still being expanded
/// means the references loop back on themselves, which the validator should
/// have prevented; the walk fails rather than looping.
pub fn build_order(graph: &Graph, name: &str) -> GraphResult<Vec<String>> {
    let mut order = Vec::new();
    let mut done: BTreeSet<String> = BTreeSet::new();
    let mut in_progress: BTreeSet<String> = BTreeSet::new();
    let mut stack = vec![(name.to_string(), false)];

    while let Some((current, expanded)) = stack.pop() {
        if expanded {
            in_progress.remove(&current);
            if done.insert(current.clone()) {
                order.push(current);
            }
            continue;
        }
        if done.contains(&current) {
            continue;
        }
        if !in_progress.insert(current.clone()) {
            return Err(GraphError::CyclicGraph(current));
        }
        let sources = graph.upstream_names(&current)?;
        stack.push((current, true));
        for source in sources.into_iter().rev() {
            if graph.contains(&source) && !done.contains(&source) {
                stack.push((source, false));
            }
        }
    }
    Ok(order)
}

/// Cached source tables for each input slot of `name`. Empty plugs, missing
/// sources and sources without output yield `None`.
fn gather_inputs(graph: &Graph, name: &str) -> GraphResult<Vec<Option<TableHandle>>> {
    let node = graph.get(name)?;
    Ok(node
        .inputs()
        .iter()
        .map(|slot| {
            let plug = slot.as_ref()?;
            let source = graph.get(&plug.node).ok()?;
            source.output_table(plug.index).cloned()
        })
        .collect())
}
