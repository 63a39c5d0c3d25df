//! Strata Core
//!
//! This crate builds a dependency graph out of named objects and runs work
//! over it level by level. It implements:
//!
//! - Graph construction with strict validation (names, dependencies, cycles)
//! - Root resolution, synthesizing a single root when several exist
//! - Longest-path leveling of every node
//! - A concurrent, cancellable, level-ordered walk
//! - Graphviz DOT export and read-only introspection
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `graph`: object contract, directed-graph engine and the build pipeline
//! - `walk`: level-ordered concurrent execution of a per-node action
//! - `config`: the reserved root name and walk settings
//! - `error`: the error type shared by every operation
//!
//! # Example
//!
//! ```rust,ignore
//! use strata_core::{Cancellation, GraphObject, ObjectGraph};
//!
//! let graph = ObjectGraph::new();
//! graph.build(objects)?;
//!
//! let cancel = Cancellation::new();
//! graph
//!     .walk(&cancel, |obj| async move {
//!         println!("processing {}", obj.name());
//!         Ok::<_, std::io::Error>(())
//!     })
//!     .await?;
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod walk;

pub use config::{WalkConfig, ROOT_NAME};
pub use error::{GraphError, Result};
pub use graph::{GraphInfo, GraphObject, ObjectGraph, SyntheticRoot, Vertex};
pub use walk::{Cancellation, WalkReport};
