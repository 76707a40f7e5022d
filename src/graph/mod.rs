// src/graph/mod.rs

//! Module graph built from the dependency report, and impact analysis on it.

pub mod module_graph;

pub use module_graph::ModuleGraph;
