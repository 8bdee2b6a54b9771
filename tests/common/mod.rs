//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;

use polars::prelude::DataFrame;
use tablegraph_rs::Graph;

/// Collect the first table cached on `name`.
pub fn output(graph: &Graph, name: &str) -> DataFrame {
    let node = graph.get(name).expect("node exists");
    let table = node.tables().values().next().expect("node has an output");
    table.collect().expect("table collects")
}

/// Values of an integer column.
pub fn i64_column(df: &DataFrame, column: &str) -> Vec<Option<i64>> {
    df.column(column)
        .expect("column exists")
        .i64()
        .expect("integer column")
        .into_iter()
        .collect()
}

/// Values of a text column.
pub fn str_column(df: &DataFrame, column: &str) -> Vec<Option<String>> {
    df.column(column)
        .expect("column exists")
        .str()
        .expect("text column")
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect()
}

/// Assert two floats are approximately equal
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64) {
    assert!(
        (a - b).abs() < epsilon,
        "Expected {} to be approximately equal to {} (epsilon: {})",
        a,
        b,
        epsilon
    );
}
