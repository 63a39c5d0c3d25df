//! Object Graph Facade
//!
//! `ObjectGraph` owns the most recent successful build. Each build produces
//! a fresh immutable snapshot; readers clone the snapshot handle, so a walk
//! in progress keeps the graph it started with even if a new build lands.

use std::future::Future;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::export::to_dot;
use super::levels::{compute_levels, Leveled};
use super::object::{GraphObject, Vertex};
use super::root::resolve_root;
use super::validate::populate;
use crate::config::WalkConfig;
use crate::error::{ActionError, GraphError, Result};
use crate::walk::{walk_levels, Cancellation, WalkReport};

/// Root and level grouping of a built graph.
#[derive(Debug)]
pub struct GraphInfo<O> {
    pub root: Vertex<O>,

    /// Nodes grouped by level; index 0 holds only the root.
    pub levels: Vec<Vec<Vertex<O>>>,
}

impl<O> Clone for GraphInfo<O> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            levels: self.levels.clone(),
        }
    }
}

impl<O: GraphObject> GraphInfo<O> {
    /// Names per level, for quick inspection.
    pub fn level_names(&self) -> Vec<Vec<String>> {
        self.levels
            .iter()
            .map(|group| group.iter().map(|v| v.name().to_string()).collect())
            .collect()
    }
}

/// Builds and analyzes a graph of the supplied objects.
pub struct ObjectGraph<O> {
    state: RwLock<Option<Arc<Leveled<O>>>>,
}

impl<O> Default for ObjectGraph<O> {
    fn default() -> Self {
        Self {
            state: RwLock::new(None),
        }
    }
}

impl<O: GraphObject> ObjectGraph<O> {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate the graph with `objects`, replacing any earlier build.
    ///
    /// On failure the graph is left empty.
    pub fn build<I>(&self, objects: I) -> Result<()>
    where
        I: IntoIterator<Item = O>,
    {
        self.build_shared(objects.into_iter().map(Arc::new).collect())
    }

    /// Like [`build`](Self::build), for objects the caller already shares.
    pub fn build_shared(&self, objects: Vec<Arc<O>>) -> Result<()> {
        *self.state.write() = None;

        let populated = populate(objects)?;
        let rooted = resolve_root(populated)?;
        let leveled = compute_levels(rooted)?;

        debug!(
            nodes = leveled.vertices.len(),
            levels = leveled.levels.len(),
            root = leveled.vertices[leveled.root].name(),
            "object graph built"
        );

        *self.state.write() = Some(Arc::new(leveled));
        Ok(())
    }

    /// Check if a build has succeeded.
    pub fn is_built(&self) -> bool {
        self.state.read().is_some()
    }

    fn snapshot(&self) -> Result<Arc<Leveled<O>>> {
        self.state.read().clone().ok_or(GraphError::EmptyGraph)
    }

    /// Return the root and levels of the graph.
    pub fn info(&self) -> Result<GraphInfo<O>> {
        let snapshot = self.snapshot()?;
        let levels = snapshot
            .levels
            .iter()
            .map(|group| {
                group
                    .iter()
                    .map(|&offset| snapshot.vertices[offset].clone())
                    .collect()
            })
            .collect();
        Ok(GraphInfo {
            root: snapshot.vertices[snapshot.root].clone(),
            levels,
        })
    }

    /// Level of the named node, if the graph holds it.
    pub fn level_of(&self, name: &str) -> Option<usize> {
        let snapshot = self.snapshot().ok()?;
        let offset = snapshot.index.offset(name)?;
        snapshot.depth.get(offset).copied()
    }

    /// Render the graph as Graphviz DOT, named `name`.
    pub fn describe(&self, name: &str) -> Result<Vec<u8>> {
        let snapshot = self.snapshot()?;
        Ok(to_dot(&snapshot.graph, name)?.into_bytes())
    }
}

impl<O: GraphObject + 'static> ObjectGraph<O> {
    /// Run `action` for every non-root node, one level at a time starting
    /// from the deepest level. Nodes in a level run concurrently.
    pub async fn walk<F, Fut, E>(&self, cancel: &Cancellation, action: F) -> Result<WalkReport>
    where
        F: Fn(Arc<O>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<(), E>> + Send + 'static,
        E: Into<ActionError> + Send + 'static,
    {
        self.walk_with(&WalkConfig::default(), cancel, action).await
    }

    /// [`walk`](Self::walk) with explicit settings.
    pub async fn walk_with<F, Fut, E>(
        &self,
        config: &WalkConfig,
        cancel: &Cancellation,
        action: F,
    ) -> Result<WalkReport>
    where
        F: Fn(Arc<O>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<(), E>> + Send + 'static,
        E: Into<ActionError> + Send + 'static,
    {
        let snapshot = self.snapshot()?;
        walk_levels(snapshot, config, cancel, action).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ROOT_NAME;
    use crate::graph::testing::{obj, TestObject};

    fn built(specs: &[(&str, &[&str])]) -> ObjectGraph<TestObject> {
        let graph = ObjectGraph::new();
        graph
            .build(specs.iter().map(|(name, deps)| obj(name, deps)))
            .unwrap();
        graph
    }

    #[test]
    fn info_before_build_is_empty_graph() {
        let graph: ObjectGraph<TestObject> = ObjectGraph::new();
        assert!(!graph.is_built());
        assert!(matches!(graph.info(), Err(GraphError::EmptyGraph)));
        assert!(matches!(graph.describe("g"), Err(GraphError::EmptyGraph)));
    }

    #[test]
    fn info_reports_synthetic_root_and_levels() {
        let graph = built(&[("a", &[]), ("b", &[]), ("c", &["a", "b"])]);
        let info = graph.info().unwrap();
        assert_eq!(info.root.name(), ROOT_NAME);
        assert!(info.root.is_synthetic());
        assert_eq!(
            info.level_names(),
            vec![vec![ROOT_NAME.to_string()], vec!["a".into(), "b".into()], vec!["c".into()]]
        );
        assert_eq!(graph.level_of("c"), Some(2));
        assert_eq!(graph.level_of("missing"), None);
    }

    #[test]
    fn single_object_is_the_root() {
        let graph = built(&[("solo", &[])]);
        let info = graph.info().unwrap();
        assert_eq!(info.root.name(), "solo");
        assert!(!info.root.is_synthetic());
        assert_eq!(info.level_names(), vec![vec!["solo".to_string()]]);
    }

    #[test]
    fn rebuild_replaces_previous_state() {
        let graph = built(&[("a", &[]), ("b", &[]), ("c", &["a", "b"])]);
        graph.build(vec![obj("x", &[]), obj("y", &["x"])]).unwrap();

        let info = graph.info().unwrap();
        assert_eq!(info.root.name(), "x");
        assert_eq!(
            info.level_names(),
            vec![vec!["x".to_string()], vec!["y".to_string()]]
        );
        assert_eq!(graph.level_of("c"), None);
        assert_eq!(graph.level_of(ROOT_NAME), None);

        let dot = String::from_utf8(graph.describe("g").unwrap()).unwrap();
        assert!(!dot.contains("c;"));
        assert!(dot.contains("x -> y;"));
    }

    #[test]
    fn failed_build_clears_previous_state() {
        let graph = built(&[("a", &[])]);
        let err = graph.build(vec![obj("a", &["b"]), obj("b", &["a"])]).unwrap_err();
        assert!(matches!(err, GraphError::CycleDetected(_)));
        assert!(!graph.is_built());
        assert!(matches!(graph.info(), Err(GraphError::EmptyGraph)));
    }

    #[test]
    fn empty_input_has_no_root() {
        let graph: ObjectGraph<TestObject> = ObjectGraph::new();
        assert!(matches!(graph.build(Vec::new()), Err(GraphError::NoRootFound)));
    }

    #[test]
    fn describe_uses_labels() {
        let mut api = obj("api", &["db"]);
        api.label = Some("api-server".to_string());
        let graph = ObjectGraph::new();
        graph.build(vec![obj("db", &[]), api]).unwrap();

        let dot = String::from_utf8(graph.describe("stack").unwrap()).unwrap();
        assert!(dot.starts_with("strict digraph stack {"));
        assert!(dot.contains("db -> \"api-server\";"));
    }
}
