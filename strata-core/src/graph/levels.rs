//! Leveling
//!
//! Assigns every node a level equal to the number of edges on the longest
//! path from the root to it, then groups nodes by level. Using the longest
//! path places a node below every chain that leads to it, so all of a
//! node's predecessors sit at strictly smaller levels.

use tracing::{debug, error};

use super::index::NameIndex;
use super::model::Digraph;
use super::object::Vertex;
use super::root::Rooted;
use crate::error::{GraphError, Result};

/// A fully built graph. Immutable once constructed.
#[derive(Debug)]
pub struct Leveled<O> {
    pub vertices: Vec<Vertex<O>>,
    pub graph: Digraph,
    pub index: NameIndex,
    pub root: usize,

    /// Offsets grouped by level, index = level. Offsets ascend within a
    /// group.
    pub levels: Vec<Vec<usize>>,

    /// Level of each offset.
    pub depth: Vec<usize>,
}

/// Compute the level partition of `rooted`.
pub fn compute_levels<O>(rooted: Rooted<O>) -> Result<Leveled<O>> {
    let Rooted {
        vertices,
        graph,
        index,
        root,
    } = rooted;

    let distances = graph.longest_paths_from(root);
    let mut depth = Vec::with_capacity(distances.len());
    let mut levels: Vec<Vec<usize>> = Vec::new();

    for (offset, distance) in distances.into_iter().enumerate() {
        let Some(level) = distance else {
            let name = index.name(offset).unwrap_or_default().to_string();
            error!(node = %name, "node unreachable from graph root");
            return Err(GraphError::Unreachable(name));
        };
        if level + 1 > levels.len() {
            levels.resize_with(level + 1, Vec::new);
        }
        levels[level].push(offset);
        depth.push(level);
    }

    debug!(levels = levels.len(), root, "computed graph levels");

    Ok(Leveled {
        vertices,
        graph,
        index,
        root,
        levels,
        depth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::root::resolve_root;
    use crate::graph::testing::objects;
    use crate::graph::validate::populate;

    fn level(specs: &[(&str, &[&str])]) -> Leveled<crate::graph::testing::TestObject> {
        let populated = populate(objects(specs)).unwrap();
        compute_levels(resolve_root(populated).unwrap()).unwrap()
    }

    #[test]
    fn synthetic_root_sits_alone_at_level_zero() {
        let leveled = level(&[("a", &[]), ("b", &[]), ("c", &["a", "b"])]);
        assert_eq!(leveled.levels, vec![vec![3], vec![0, 1], vec![2]]);
        assert_eq!(leveled.depth, vec![1, 1, 2, 0]);
    }

    #[test]
    fn single_object_is_its_own_level() {
        let leveled = level(&[("only", &[])]);
        assert_eq!(leveled.root, 0);
        assert_eq!(leveled.levels, vec![vec![0]]);
    }

    #[test]
    fn uses_longest_path_not_shortest() {
        // d depends on a directly and through b -> c
        let leveled = level(&[
            ("a", &[]),
            ("b", &["a"]),
            ("c", &["b"]),
            ("d", &["a", "c"]),
        ]);
        assert_eq!(leveled.depth, vec![0, 1, 2, 3]);
        assert_eq!(leveled.levels, vec![vec![0], vec![1], vec![2], vec![3]]);
    }

    #[test]
    fn predecessors_always_sit_lower() {
        let leveled = level(&[
            ("base", &[]),
            ("util", &[]),
            ("net", &["base"]),
            ("db", &["base", "util"]),
            ("api", &["net", "db"]),
            ("cli", &["api", "util"]),
        ]);
        for (from, to) in leveled.graph.edges() {
            assert!(leveled.depth[from] < leveled.depth[to]);
        }
        assert!(leveled.levels.iter().all(|group| !group.is_empty()));
    }

    #[test]
    fn unreachable_node_is_reported() {
        let mut graph = Digraph::new();
        let mut index = NameIndex::default();
        for name in ["root", "stray"] {
            index.insert(name).unwrap();
            graph.add_node(name);
        }
        let rooted: Rooted<crate::graph::testing::TestObject> = Rooted {
            vertices: Vec::new(),
            graph,
            index,
            root: 0,
        };
        let err = compute_levels(rooted).unwrap_err();
        assert!(matches!(err, GraphError::Unreachable(ref name) if name == "stray"));
    }
}
