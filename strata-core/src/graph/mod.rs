//! Object Graph
//!
//! This module turns a set of named objects into a leveled dependency graph.
//!
//! # Overview
//!
//! The graph is a directed acyclic graph (DAG) where:
//!
//! - Nodes represent caller objects, plus a synthetic root when needed
//! - Edges represent dependencies: if A depends on B, there is an edge from
//!   B to A
//!
//! Building runs a fixed pipeline, each step consuming the previous step's
//! snapshot and producing the next:
//!
//! 1. `validate`: assign offsets, check names, add edges, reject cycles
//! 2. `root`: pick the single natural root or synthesize one
//! 3. `levels`: longest-path leveling from the root
//!
//! The finished snapshot is immutable and shared with walks and exporters.

mod export;
mod index;
mod levels;
mod model;
mod object;
mod object_graph;
mod root;
mod validate;

#[cfg(test)]
pub(crate) mod testing;

pub(crate) use levels::Leveled;
pub use model::Digraph;
pub use object::{GraphObject, SyntheticRoot, Vertex};
pub use object_graph::{GraphInfo, ObjectGraph};
