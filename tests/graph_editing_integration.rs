//! Integration tests for graph editing
//!
//! These tests validate structural edits through the public API:
//! - Renaming keeps every edge
//! - Dynamic inputs grow on connect and shrink on disconnect
//! - Deleting a node detaches and invalidates its consumers
//! - The validator refuses bad wiring

mod common;

use common::builders::{CsvFixture, GraphBuilder};
use tablegraph_rs::graph::{create_node, GraphError, NodeRegistry, NodeType, PlugRef, Scheduler};

#[test]
fn test_rename_preserves_edges() {
    let mut graph = GraphBuilder::new()
        .load("Load1", "a.csv")
        .of_type("Dot1", NodeType::Dot)
        .of_type("Join1", NodeType::Join)
        .connect("Load1", "Dot1", 0)
        .connect("Load1", "Join1", 0)
        .connect("Dot1", "Join1", 1)
        .build();

    graph.rename("Load1", "Source").unwrap();

    assert!(!graph.contains("Load1"));
    assert_eq!(graph.get("Source").unwrap().name(), "Source");
    assert_eq!(graph.get("Dot1").unwrap().inputs(), &[Some(PlugRef::new("Source", 0))]);
    assert_eq!(
        graph.get("Join1").unwrap().inputs(),
        &[Some(PlugRef::new("Source", 0)), Some(PlugRef::new("Dot1", 0))]
    );
    assert_eq!(
        graph.all_downstream_names("Source").unwrap(),
        vec!["Dot1".to_string(), "Join1".to_string()]
    );
    assert!(matches!(
        graph.rename("Dot1", "Join1"),
        Err(GraphError::DuplicateName(_))
    ));
}

#[test]
fn test_dynamic_inputs_grow_and_trim() {
    let mut graph = GraphBuilder::new()
        .load("A", "a.csv")
        .load("B", "b.csv")
        .load("C", "c.csv")
        .of_type("Switch1", NodeType::Switch)
        .connect("A", "Switch1", 0)
        .connect("B", "Switch1", 1)
        .connect("C", "Switch1", 2)
        .build();
    assert_eq!(graph.get("Switch1").unwrap().inputs().len(), 3);
    assert_eq!(
        graph.get("Switch1").unwrap().input_names(),
        vec!["1".to_string(), "2".to_string(), "3".to_string()]
    );

    // Interior gaps stay, trailing gaps go.
    graph.disconnect("Switch1", 1).unwrap();
    assert_eq!(graph.get("Switch1").unwrap().inputs().len(), 3);
    graph.disconnect("Switch1", 2).unwrap();
    assert_eq!(
        graph.get("Switch1").unwrap().inputs(),
        &[Some(PlugRef::new("A", 0))]
    );

    // Only the next free slot can be appended.
    assert!(!graph.connect("B", 0, "Switch1", 3));
    assert!(graph.connect("B", 0, "Switch1", 1));
}

#[test]
fn test_delete_detaches_and_invalidates() {
    let fixture = CsvFixture::with_sales();
    let mut graph = GraphBuilder::new()
        .load("Load1", "sales.csv")
        .load("Load2", "regions.csv")
        .of_type("Switch1", NodeType::Switch)
        .of_type("Table1", NodeType::Table)
        .connect("Load1", "Switch1", 0)
        .connect("Load2", "Switch1", 1)
        .connect("Switch1", "Table1", 0)
        .build();
    assert!(Scheduler::new(fixture.context()).build(&mut graph, "Table1"));

    let removed = graph.delete("Load2").unwrap();
    assert_eq!(removed.name(), "Load2");
    let switch = graph.get("Switch1").unwrap();
    assert_eq!(switch.inputs(), &[Some(PlugRef::new("Load1", 0))]);
    assert!(switch.is_dirty());
    assert!(graph.get("Table1").unwrap().is_dirty());
    assert!(!graph.get("Load1").unwrap().is_dirty());
}

#[test]
fn test_validator_refusals() {
    let mut graph = GraphBuilder::new()
        .load("Load1", "a.csv")
        .of_type("Dot1", NodeType::Dot)
        .of_type("Dot2", NodeType::Dot)
        .of_type("Table1", NodeType::Table)
        .of_type("Dashboard1", NodeType::Dashboard)
        .connect("Load1", "Dot1", 0)
        .connect("Dot1", "Dot2", 0)
        .connect("Load1", "Table1", 0)
        .connect("Table1", "Dashboard1", 0)
        .build();

    assert!(matches!(
        graph.try_connect("Dot2", 0, "Dot1", 0),
        Err(GraphError::WouldCreateCycle { .. })
    ));
    assert!(matches!(
        graph.try_connect("Dot1", 0, "Dot1", 0),
        Err(GraphError::SelfConnection(_))
    ));
    assert!(matches!(
        graph.try_connect("Table1", 0, "Dot2", 0),
        Err(GraphError::IncompatiblePlugs { .. })
    ));
    assert!(matches!(
        graph.try_connect("Load1", 0, "Dashboard1", 1),
        Err(GraphError::IncompatiblePlugs { .. })
    ));
    assert!(matches!(
        graph.try_connect("Table1", 0, "Dashboard1", 1),
        Err(GraphError::DuplicateDashboardWidget { .. })
    ));

    // Refusals leave the graph untouched.
    assert_eq!(graph.get("Dot1").unwrap().inputs(), &[Some(PlugRef::new("Load1", 0))]);
    assert_eq!(graph.get("Dashboard1").unwrap().inputs().len(), 1);
}

#[test]
fn test_create_node_names_and_snapshot() {
    let mut graph = GraphBuilder::new().build();
    let registry = NodeRegistry::builtin();
    let first = create_node(&mut graph, &registry, "load", None, None, true).unwrap();
    let second = create_node(&mut graph, &registry, "load", None, None, true).unwrap();
    assert_eq!(first, "Load");
    assert_eq!(second, "Load1");
    assert!(create_node(&mut graph, &registry, "load", Some("Load"), None, false).is_err());
    assert!(create_node(&mut graph, &registry, "teleport", None, None, true).is_err());

    let table = create_node(&mut graph, &registry, "table", None, None, true).unwrap();
    assert!(graph.connect(&second, 0, &table, 0));

    let snapshot = graph.snapshot();
    assert_eq!(snapshot.nodes.len(), 3);
    assert_eq!(snapshot.edges.len(), 1);
    assert_eq!(snapshot.edges[0].from_node, "Load1");
    assert_eq!(snapshot.edges[0].to_node, "Table");
}
