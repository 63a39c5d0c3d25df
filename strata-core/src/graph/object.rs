//! Graph Objects
//!
//! This module defines the contract caller objects satisfy to become nodes,
//! and the vertex type the graph stores for each node.

use std::sync::Arc;

use crate::config::ROOT_NAME;

/// An object that will become a node in the graph.
pub trait GraphObject: Send + Sync {
    /// The unique name for the object.
    fn name(&self) -> &str;

    /// The display label used as the node identifier in DOT output.
    fn label(&self) -> String {
        self.name().to_string()
    }

    /// Names of the objects this one depends on, in any order.
    fn dependencies(&self) -> Vec<String>;
}

/// The virtual root created when a graph has more than one natural root.
///
/// It depends on every natural root and is never handed to a walk action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticRoot {
    dependencies: Vec<String>,
}

impl SyntheticRoot {
    pub(crate) fn new(dependencies: Vec<String>) -> Self {
        Self { dependencies }
    }
}

impl GraphObject for SyntheticRoot {
    fn name(&self) -> &str {
        ROOT_NAME
    }

    fn dependencies(&self) -> Vec<String> {
        self.dependencies.clone()
    }
}

/// A node of the graph: either a caller object or the synthetic root.
#[derive(Debug)]
pub enum Vertex<O> {
    /// An object supplied to the build.
    Object(Arc<O>),
    /// The root synthesized during root resolution.
    Root(SyntheticRoot),
}

impl<O> Clone for Vertex<O> {
    fn clone(&self) -> Self {
        match self {
            Self::Object(obj) => Self::Object(Arc::clone(obj)),
            Self::Root(root) => Self::Root(root.clone()),
        }
    }
}

impl<O: GraphObject> Vertex<O> {
    pub fn name(&self) -> &str {
        match self {
            Self::Object(obj) => obj.name(),
            Self::Root(root) => root.name(),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Object(obj) => obj.label(),
            Self::Root(root) => root.label(),
        }
    }

    pub fn dependencies(&self) -> Vec<String> {
        match self {
            Self::Object(obj) => obj.dependencies(),
            Self::Root(root) => root.dependencies(),
        }
    }
}

impl<O> Vertex<O> {
    /// The caller object, or `None` for the synthetic root.
    pub fn object(&self) -> Option<&Arc<O>> {
        match self {
            Self::Object(obj) => Some(obj),
            Self::Root(_) => None,
        }
    }

    /// Check if this is the synthetic root.
    pub fn is_synthetic(&self) -> bool {
        matches!(self, Self::Root(_))
    }
}
