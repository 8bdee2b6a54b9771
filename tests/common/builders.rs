//! Test data builders for graphs and CSV fixtures

use std::path::{Path, PathBuf};

use tablegraph_rs::graph::{create_node, Graph, NodeRegistry, NodeType};
use tablegraph_rs::nodes::{ComputeContext, DeriveSettings, LoadSettings, NodeSettings};
use tempfile::TempDir;

/// Builder for wiring small graphs
pub struct GraphBuilder {
    graph: Graph,
    registry: NodeRegistry,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
            registry: NodeRegistry::builtin(),
        }
    }

    pub fn node(mut self, name: &str, settings: NodeSettings) -> Self {
        let tag = settings.node_type().as_str();
        create_node(&mut self.graph, &self.registry, tag, Some(name), Some(settings), false)
            .expect("node is created");
        self
    }

    pub fn of_type(self, name: &str, node_type: NodeType) -> Self {
        self.node(name, NodeSettings::default_for(node_type))
    }

    pub fn load(self, name: &str, path: &str) -> Self {
        self.node(name, NodeSettings::Load(LoadSettings::new(path)))
    }

    pub fn derive(self, name: &str, column: &str, formula: &str) -> Self {
        self.node(
            name,
            NodeSettings::Derive(DeriveSettings {
                column: column.to_string(),
                formula: formula.to_string(),
            }),
        )
    }

    /// Connect output 0 of `source` to input `index` of `target`.
    pub fn connect(mut self, source: &str, target: &str, index: usize) -> Self {
        self.graph
            .try_connect(source, 0, target, index)
            .expect("connection is accepted");
        self
    }

    pub fn build(self) -> Graph {
        self.graph
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Temporary directory holding CSV files
pub struct CsvFixture {
    dir: TempDir,
}

impl CsvFixture {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("temp dir"),
        }
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).expect("fixture written");
        path
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Compute context resolving relative paths inside the fixture dir.
    pub fn context(&self) -> ComputeContext {
        ComputeContext::default().with_base_dir(self.dir.path())
    }

    /// Sales and region tables shared by several tests.
    pub fn with_sales() -> Self {
        let fixture = Self::new();
        fixture.write(
            "sales.csv",
            "region_id,product,amount\n1,apple,10\n2,pear,5\n1,pear,7\n3,apple,4\n2,apple,1\n",
        );
        fixture.write("regions.csv", "id,region\n1,north\n2,south\n3,east\n");
        fixture
    }
}

impl Default for CsvFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_builder() {
        let graph = GraphBuilder::new()
            .load("Load1", "a.csv")
            .of_type("Table1", NodeType::Table)
            .connect("Load1", "Table1", 0)
            .build();

        assert_eq!(graph.len(), 2);
        assert_eq!(graph.upstream_names("Table1").unwrap(), vec!["Load1".to_string()]);
    }
}
