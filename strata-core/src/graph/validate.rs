//! Population and Validation
//!
//! Turns the caller's objects into a directed graph, rejecting anything that
//! would make the graph ill-formed. Cycle detection runs once, after every
//! edge is in place, so that all cycles are reported together.
//!
//! Edges run from a dependency to its dependent. Objects without
//! dependencies therefore have no incoming edges and become natural roots.

use std::sync::Arc;

use tracing::debug;

use super::index::NameIndex;
use super::model::Digraph;
use super::object::{GraphObject, Vertex};
use crate::config::ROOT_NAME;
use crate::error::{GraphError, Result};

/// A validated, acyclic graph that does not yet have a designated root.
#[derive(Debug)]
pub struct Populated<O> {
    pub vertices: Vec<Vertex<O>>,
    pub graph: Digraph,
    pub index: NameIndex,
}

/// Build the graph for `objects`, in input order.
///
/// Offset `i` is the `i`-th object.
pub fn populate<O: GraphObject>(objects: Vec<Arc<O>>) -> Result<Populated<O>> {
    let mut index = NameIndex::with_capacity(objects.len());
    let mut graph = Digraph::new();

    for (offset, obj) in objects.iter().enumerate() {
        let name = obj.name();
        if name.is_empty() {
            return Err(GraphError::InvalidName {
                offset,
                reason: "empty object name".to_string(),
            });
        }
        if name == ROOT_NAME {
            return Err(GraphError::InvalidName {
                offset,
                reason: format!("reserved name {ROOT_NAME}"),
            });
        }
        if let Err(first) = index.insert(name) {
            return Err(GraphError::DuplicateName {
                name: name.to_string(),
                offset,
                first,
            });
        }
        graph.add_node(obj.label());
    }

    for (offset, obj) in objects.iter().enumerate() {
        for dependency in obj.dependencies() {
            let Some(target) = index.offset(&dependency) else {
                return Err(GraphError::UnknownDependency {
                    dependent: obj.name().to_string(),
                    missing: dependency,
                });
            };
            if target == offset {
                return Err(GraphError::SelfDependency(dependency));
            }
            graph.set_edge(target, offset);
        }
    }

    let cycles = graph.directed_cycles();
    if !cycles.is_empty() {
        // Reversed so each chain reads as "depends on"
        let named = cycles
            .into_iter()
            .map(|cycle| {
                cycle
                    .into_iter()
                    .rev()
                    .map(|node| index.name(node).unwrap_or_default().to_string())
                    .collect()
            })
            .collect();
        return Err(GraphError::CycleDetected(named));
    }

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "populated object graph"
    );

    Ok(Populated {
        vertices: objects.into_iter().map(Vertex::Object).collect(),
        graph,
        index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::testing::{obj, objects};

    #[test]
    fn builds_nodes_and_edges_in_input_order() {
        let populated = populate(objects(&[("a", &[]), ("b", &["a"]), ("c", &["a", "b"])])).unwrap();
        assert_eq!(populated.graph.node_count(), 3);
        assert_eq!(populated.graph.edge_count(), 3);
        assert!(populated.graph.has_edge(0, 1));
        assert!(populated.graph.has_edge(0, 2));
        assert!(populated.graph.has_edge(1, 2));
        assert!(!populated.graph.has_edge(2, 1));
        assert_eq!(populated.index.offset("c"), Some(2));
        assert_eq!(populated.vertices[1].name(), "b");
    }

    #[test]
    fn nodes_carry_labels() {
        let mut a = obj("a", &[]);
        a.label = Some("alpha".to_string());
        let populated = populate(vec![Arc::new(a)]).unwrap();
        assert_eq!(populated.graph.label(0), "alpha");
    }

    #[test]
    fn rejects_empty_name() {
        let err = populate(objects(&[("a", &[]), ("", &[])])).unwrap_err();
        assert!(matches!(err, GraphError::InvalidName { offset: 1, .. }));
    }

    #[test]
    fn rejects_reserved_name() {
        let err = populate(objects(&[(ROOT_NAME, &[])])).unwrap_err();
        assert!(matches!(err, GraphError::InvalidName { offset: 0, .. }));
        assert!(err.to_string().contains(ROOT_NAME));
    }

    #[test]
    fn rejects_duplicate_name() {
        let err = populate(objects(&[("a", &[]), ("b", &[]), ("a", &[])])).unwrap_err();
        assert!(matches!(
            err,
            GraphError::DuplicateName { offset: 2, first: 0, .. }
        ));
    }

    #[test]
    fn rejects_unknown_dependency() {
        let err = populate(objects(&[("a", &["ghost"])])).unwrap_err();
        match err {
            GraphError::UnknownDependency { dependent, missing } => {
                assert_eq!(dependent, "a");
                assert_eq!(missing, "ghost");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_self_dependency() {
        let err = populate(objects(&[("a", &[]), ("b", &["a", "b"])])).unwrap_err();
        assert!(matches!(err, GraphError::SelfDependency(ref name) if name == "b"));
    }

    #[test]
    fn duplicate_dependencies_are_tolerated() {
        let populated = populate(objects(&[("a", &[]), ("b", &["a", "a"])])).unwrap();
        assert_eq!(populated.graph.edge_count(), 1);
    }

    #[test]
    fn reports_every_cycle_by_name() {
        let err = populate(objects(&[
            ("a", &["b"]),
            ("b", &["a"]),
            ("c", &["d"]),
            ("d", &["e"]),
            ("e", &["c"]),
            ("f", &[]),
        ]))
        .unwrap_err();

        let cycles = err.cycles().unwrap();
        assert_eq!(
            cycles,
            &[
                vec!["a".to_string(), "b".into(), "a".into()],
                vec!["c".to_string(), "d".into(), "e".into(), "c".into()],
            ]
        );
    }

    #[test]
    fn empty_input_populates_empty_graph() {
        let populated = populate::<crate::graph::testing::TestObject>(Vec::new()).unwrap();
        assert_eq!(populated.index.len(), 0);
        assert_eq!(populated.graph.node_count(), 0);
    }
}
