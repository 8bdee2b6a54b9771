//! Dependency resolution over plug references.
//!
//! All traversals are iterative so deep chains do not grow the call stack.

use std::collections::{BTreeMap, BTreeSet};

use crate::graph::error::{GraphError, GraphResult};
use crate::graph::store::Graph;

/// Map from node name to the names of nodes that read from it.
pub type DownstreamIndex = BTreeMap<String, Vec<String>>;

impl Graph {
    /// Immediate source names of `name`'s connected plugs, in slot order.
    ///
    /// Fails with [`GraphError::CyclicGraph`] if a plug references its owner.
    pub fn upstream_names(&self, name: &str) -> GraphResult<Vec<String>> {
        let node = self.get(name)?;
        let mut names = Vec::new();
        for source in node.source_names() {
            if source == name {
                return Err(GraphError::CyclicGraph(name.to_string()));
            }
            if !names.iter().any(|n| n == source) {
                names.push(source.to_string());
            }
        }
        Ok(names)
    }

    /// Transitive ancestors of `name`, each at most once, in discovery order.
    pub fn all_upstream_names(&self, name: &str) -> GraphResult<Vec<String>> {
        let mut found: Vec<String> = Vec::new();
        let mut seen: BTreeSet<String> = BTreeSet::new();
        seen.insert(name.to_string());
        let mut stack = vec![name.to_string()];

        while let Some(current) = stack.pop() {
            for source in self.upstream_names(&current)? {
                if !self.contains(&source) {
                    continue;
                }
                if seen.insert(source.clone()) {
                    found.push(source.clone());
                    stack.push(source);
                }
            }
        }
        Ok(found)
    }

    /// Invert every edge of the graph once.
    pub fn downstream_index(&self) -> DownstreamIndex {
        let mut index: DownstreamIndex = BTreeMap::new();
        for node in self.nodes() {
            let mut sources: Vec<&str> = node.source_names().collect();
            sources.dedup();
            for source in sources {
                let readers = index.entry(source.to_string()).or_default();
                if !readers.iter().any(|r| r == node.name()) {
                    readers.push(node.name().to_string());
                }
            }
        }
        index
    }

    /// Immediate readers of `name`. Inverts the full edge set on each call;
    /// use [`Graph::downstream_index`] for repeated lookups.
    pub fn downstream_names(&self, name: &str) -> GraphResult<Vec<String>> {
        self.get(name)?;
        Ok(self.downstream_index().remove(name).unwrap_or_default())
    }

    /// Transitive readers of `name`, each at most once.
    pub fn all_downstream_names(&self, name: &str) -> GraphResult<Vec<String>> {
        self.get(name)?;
        let index = self.downstream_index();
        let mut found = Vec::new();
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        seen.insert(name);
        let mut stack = vec![name];

        while let Some(current) = stack.pop() {
            for reader in index.get(current).into_iter().flatten() {
                if seen.insert(reader.as_str()) {
                    found.push(reader.clone());
                    stack.push(reader.as_str());
                }
            }
        }
        Ok(found)
    }

    /// Mark `name` and everything downstream of it dirty.
    pub fn set_dirty_recursive(&mut self, name: &str) -> GraphResult<()> {
        let descendants = self.all_downstream_names(name)?;
        self.get_mut(name)?.mark_dirty();
        for descendant in descendants {
            self.get_mut(&descendant)?.mark_dirty();
        }
        Ok(())
    }

    /// Whether `ancestor` is `name` itself or one of its transitive sources.
    pub fn depends_on(&self, name: &str, ancestor: &str) -> GraphResult<bool> {
        if name == ancestor {
            return Ok(true);
        }
        Ok(self
            .all_upstream_names(name)?
            .iter()
            .any(|upstream| upstream == ancestor))
    }
}
