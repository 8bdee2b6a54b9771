//! Connection validation.
//!
//! Every wiring edit goes through [`Graph::try_connect`] or
//! [`Graph::disconnect`]. A connection is checked completely before anything
//! is written, so a rejected call leaves the graph untouched.

use tracing::{debug, warn};

use crate::graph::category::{Arity, Category};
use crate::graph::error::{GraphError, GraphResult, PlugDescription};
use crate::graph::node::PlugRef;
use crate::graph::store::Graph;

impl Graph {
    /// Whether any output of `source` may feed an input of `target`, judged by
    /// category alone. Used by the canvas for drag-to-connect feedback.
    pub fn accepts(&self, source: &str, target: &str) -> bool {
        match (self.get(source), self.get(target)) {
            (Ok(s), Ok(t)) => source != target && s.category().can_feed(t.category()),
            _ => false,
        }
    }

    /// Wire output `source_index` of `source` into input `target_index` of
    /// `target`, logging and returning `false` when the connection is refused.
    pub fn connect(
        &mut self,
        source: &str,
        source_index: usize,
        target: &str,
        target_index: usize,
    ) -> bool {
        match self.try_connect(source, source_index, target, target_index) {
            Ok(()) => true,
            Err(e) => {
                warn!("Connection refused: {}", e);
                false
            }
        }
    }

    /// Checked form of [`Graph::connect`].
    pub fn try_connect(
        &mut self,
        source: &str,
        source_index: usize,
        target: &str,
        target_index: usize,
    ) -> GraphResult<()> {
        if source == target {
            return Err(GraphError::SelfConnection(source.to_string()));
        }
        let source_node = self.get(source)?;
        let target_node = self.get(target)?;

        let source_kind = source_node.category().output_kind();
        let target_kind = target_node.category().input_kind();
        if source_kind.is_none() || source_kind != target_kind {
            return Err(GraphError::IncompatiblePlugs {
                source_node: source.to_string(),
                source_kind: PlugDescription(source_kind),
                target: target.to_string(),
                target_kind: PlugDescription(target_kind),
            });
        }

        if self.all_upstream_names(source)?.iter().any(|n| n == target) {
            return Err(GraphError::WouldCreateCycle {
                source_node: source.to_string(),
                target: target.to_string(),
            });
        }

        if target_node.category() == Category::Dashboard
            && target_node.source_names().any(|n| n == source)
        {
            return Err(GraphError::DuplicateDashboardWidget {
                source_node: source.to_string(),
                target: target.to_string(),
            });
        }

        if source_index >= source_node.outputs().len() {
            return Err(GraphError::InvalidPlugIndex {
                node: source.to_string(),
                direction: "output",
                index: source_index,
            });
        }

        let slot_count = match target_node.arity() {
            Arity::Fixed(names) => names.len(),
            Arity::Dynamic => trailing_trimmed_len(target_node.inputs()) + 1,
        };
        if target_index >= slot_count {
            return Err(GraphError::InvalidPlugIndex {
                node: target.to_string(),
                direction: "input",
                index: target_index,
            });
        }

        // All checks passed, from here on the edit cannot fail.
        let node = self.get_mut(target)?;
        if node.is_dynamic() {
            node.trim_trailing_inputs();
            if target_index >= node.inputs().len() {
                node.inputs_mut().push(None);
            }
        }
        node.inputs_mut()[target_index] = Some(PlugRef::new(source, source_index));
        debug!(
            "Connected {}[{}] -> {}[{}]",
            source, source_index, target, target_index
        );

        self.set_dirty_recursive(target)
    }

    /// Clear input `index` of `name`. Dynamic nodes then drop their trailing
    /// empty slots. Clearing an out-of-range or already empty slot is a no-op.
    pub fn disconnect(&mut self, name: &str, index: usize) -> GraphResult<()> {
        let node = self.get_mut(name)?;
        let Some(slot) = node.inputs_mut().get_mut(index) else {
            return Ok(());
        };
        if slot.take().is_none() {
            return Ok(());
        }
        node.trim_trailing_inputs();
        debug!("Disconnected {}[{}]", name, index);
        self.set_dirty_recursive(name)
    }
}

/// Length of a dynamic input list once its trailing empty run is dropped.
fn trailing_trimmed_len(inputs: &[Option<PlugRef>]) -> usize {
    inputs
        .iter()
        .rposition(Option::is_some)
        .map_or(0, |last| last + 1)
}
