//! Hierarch Registry crate.
//!
//! The fact base the resolution engine queries:
//!
//! - [`ClassGraph`]: registered classes and their inheritance edges
//! - [`SymbolRegistry`]: the class graph plus free-function overload sets

mod class_graph;
mod registry;

pub use class_graph::{BaseEdge, ClassGraph, InheritanceClosure, InheritanceEdge};
pub use registry::SymbolRegistry;

pub use petgraph::graph::NodeIndex;
