//! Root Resolution
//!
//! Every walk needs a single entry point. A graph with one natural root
//! (node without incoming edges, i.e. an object without dependencies) keeps
//! it; a graph with several gets a synthetic root that depends on all of
//! them.

use tracing::debug;

use super::index::NameIndex;
use super::model::Digraph;
use super::object::{SyntheticRoot, Vertex};
use super::validate::Populated;
use crate::config::ROOT_NAME;
use crate::error::{GraphError, Result};

/// A validated graph with a designated root.
#[derive(Debug)]
pub struct Rooted<O> {
    pub vertices: Vec<Vertex<O>>,
    pub graph: Digraph,
    pub index: NameIndex,
    pub root: usize,
}

/// Pick or synthesize the root of `populated`.
pub fn resolve_root<O>(populated: Populated<O>) -> Result<Rooted<O>> {
    let Populated {
        mut vertices,
        mut graph,
        mut index,
    } = populated;

    let sources = graph.sources();
    let root = match sources.as_slice() {
        [] => return Err(GraphError::NoRootFound),
        [only] => *only,
        _ => {
            let offset = index
                .insert(ROOT_NAME)
                .map_err(|_| GraphError::InvalidName {
                    offset: index.len(),
                    reason: format!("reserved name {ROOT_NAME}"),
                })?;
            graph.add_node(ROOT_NAME);
            let mut dependencies = Vec::with_capacity(sources.len());
            for &source in &sources {
                dependencies.push(index.name(source).unwrap_or_default().to_string());
                graph.set_edge(offset, source);
            }
            vertices.push(Vertex::Root(SyntheticRoot::new(dependencies)));
            debug!(natural_roots = sources.len(), "synthesized graph root");
            offset
        }
    };

    Ok(Rooted {
        vertices,
        graph,
        index,
        root,
    })
}
