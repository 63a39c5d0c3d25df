//! Directed Graph Engine
//!
//! Node and edge storage keyed by integer offsets. Edges point from a
//! dependency to its dependent, so the nodes without incoming edges are the
//! objects that depend on nothing.
//!
//! # Algorithms
//!
//! - Cycle enumeration uses Johnson's algorithm: strongly connected
//!   components are found with Tarjan's algorithm, then every elementary
//!   circuit through the least vertex of each component is reported.
//!   Both searches keep explicit work stacks, so path length is bounded by
//!   heap memory rather than the thread stack.
//! - Longest paths use Kahn's topological order restricted to the nodes
//!   reachable from the source, relaxing each edge with `dist + 1`. This is
//!   only valid on an acyclic graph.

use std::collections::VecDeque;

use smallvec::SmallVec;

type Adjacency = SmallVec<[usize; 4]>;

/// A node in the directed graph.
#[derive(Debug, Clone)]
struct NodeData {
    /// Display label used when exporting.
    label: String,

    /// Nodes this node has an edge to (its dependents).
    outgoing: Adjacency,

    /// Nodes that have an edge to this node (its dependencies).
    incoming: Adjacency,
}

/// Adjacency-list directed graph.
#[derive(Debug, Clone, Default)]
pub struct Digraph {
    nodes: Vec<NodeData>,
}

impl Digraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and return its offset.
    pub fn add_node(&mut self, label: impl Into<String>) -> usize {
        let offset = self.nodes.len();
        self.nodes.push(NodeData {
            label: label.into(),
            outgoing: Adjacency::new(),
            incoming: Adjacency::new(),
        });
        offset
    }

    /// Add an edge `from -> to`. Adding an existing edge has no effect.
    ///
    /// Both offsets must already exist and differ.
    pub fn set_edge(&mut self, from: usize, to: usize) {
        debug_assert!(from != to, "self loop on node {from}");
        if self.nodes[from].outgoing.contains(&to) {
            return;
        }
        self.nodes[from].outgoing.push(to);
        self.nodes[to].incoming.push(from);
    }

    /// Get the total number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the total number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|node| node.outgoing.len()).sum()
    }

    pub fn label(&self, node: usize) -> &str {
        &self.nodes[node].label
    }

    /// Nodes with an edge into `node`.
    pub fn incoming(&self, node: usize) -> &[usize] {
        &self.nodes[node].incoming
    }

    /// Nodes `node` has an edge to.
    pub fn outgoing(&self, node: usize) -> &[usize] {
        &self.nodes[node].outgoing
    }

    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        self.nodes
            .get(from)
            .is_some_and(|node| node.outgoing.contains(&to))
    }

    /// All edges as `(from, to)` pairs, ordered by source offset then
    /// insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .flat_map(|(from, node)| node.outgoing.iter().map(move |&to| (from, to)))
    }

    /// Nodes with no incoming edges, in offset order.
    pub fn sources(&self) -> Vec<usize> {
        (0..self.nodes.len())
            .filter(|&node| self.nodes[node].incoming.is_empty())
            .collect()
    }

    /// Enumerate every elementary cycle.
    ///
    /// Each cycle starts at its least offset and ends with that same offset
    /// repeated. Cycles are ordered by starting offset.
    pub fn directed_cycles(&self) -> Vec<Vec<usize>> {
        let n = self.nodes.len();
        let mut cycles = Vec::new();
        let mut start = 0;

        while start < n {
            // Component with the least vertex among nontrivial SCCs of the
            // subgraph induced by nodes >= start.
            let component = self
                .strongly_connected(start)
                .into_iter()
                .filter(|scc| scc.len() > 1)
                .min_by_key(|scc| scc.iter().copied().min().unwrap_or(usize::MAX));

            let Some(component) = component else {
                break;
            };

            let least = component.iter().copied().min().unwrap_or(start);
            let mut in_component = vec![false; n];
            for &node in &component {
                in_component[node] = true;
            }

            let mut search = CircuitSearch {
                graph: self,
                start: least,
                in_component,
                blocked: vec![false; n],
                blocked_by: vec![Vec::new(); n],
                stack: Vec::new(),
                cycles: &mut cycles,
            };
            search.circuit(least);

            start = least + 1;
        }

        cycles
    }

    /// Strongly connected components of the subgraph induced by nodes with
    /// offset >= `min_node` (Tarjan).
    fn strongly_connected(&self, min_node: usize) -> Vec<Vec<usize>> {
        let mut tarjan = Tarjan {
            graph: self,
            min_node,
            index: 0,
            indices: vec![None; self.nodes.len()],
            lowlink: vec![0; self.nodes.len()],
            on_stack: vec![false; self.nodes.len()],
            stack: Vec::new(),
            components: Vec::new(),
        };
        for node in min_node..self.nodes.len() {
            if tarjan.indices[node].is_none() {
                tarjan.connect(node);
            }
        }
        tarjan.components
    }

    /// Length of the longest path from `source` to every node.
    ///
    /// Entries are `None` for nodes not reachable from `source`. The graph
    /// must be acyclic.
    pub fn longest_paths_from(&self, source: usize) -> Vec<Option<usize>> {
        let n = self.nodes.len();
        let mut reachable = vec![false; n];
        let mut queue = VecDeque::from([source]);
        reachable[source] = true;
        while let Some(node) = queue.pop_front() {
            for &next in &self.nodes[node].outgoing {
                if !reachable[next] {
                    reachable[next] = true;
                    queue.push_back(next);
                }
            }
        }

        // In-degrees counting only edges within the reachable set
        let mut in_degree = vec![0usize; n];
        for (from, to) in self.edges() {
            if reachable[from] {
                in_degree[to] += 1;
            }
        }

        let mut dist: Vec<Option<usize>> = vec![None; n];
        dist[source] = Some(0);
        let mut queue = VecDeque::from([source]);

        // Kahn's algorithm
        while let Some(node) = queue.pop_front() {
            let here = dist[node].unwrap_or(0);
            for &next in &self.nodes[node].outgoing {
                dist[next] = Some(dist[next].map_or(here + 1, |d| d.max(here + 1)));
                in_degree[next] = in_degree[next].saturating_sub(1);
                if in_degree[next] == 0 {
                    queue.push_back(next);
                }
            }
        }

        dist
    }
}

struct Tarjan<'a> {
    graph: &'a Digraph,
    min_node: usize,
    index: usize,
    indices: Vec<Option<usize>>,
    lowlink: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    components: Vec<Vec<usize>>,
}

impl Tarjan<'_> {
    fn visit(&mut self, node: usize) {
        self.indices[node] = Some(self.index);
        self.lowlink[node] = self.index;
        self.index += 1;
        self.stack.push(node);
        self.on_stack[node] = true;
    }

    /// Depth-first search from `root`. Each frame is a node and the index
    /// of its next outgoing edge to examine.
    fn connect(&mut self, root: usize) {
        let graph = self.graph;
        let mut frames: Vec<(usize, usize)> = vec![(root, 0)];
        self.visit(root);

        while let Some(&(node, edge)) = frames.last() {
            let outgoing = graph.outgoing(node);
            if let Some(&next) = outgoing.get(edge) {
                if let Some(frame) = frames.last_mut() {
                    frame.1 += 1;
                }
                if next < self.min_node {
                    continue;
                }
                match self.indices[next] {
                    None => {
                        self.visit(next);
                        frames.push((next, 0));
                    }
                    Some(index) if self.on_stack[next] => {
                        self.lowlink[node] = self.lowlink[node].min(index);
                    }
                    Some(_) => {}
                }
                continue;
            }

            frames.pop();
            if Some(self.lowlink[node]) == self.indices[node] {
                let mut component = Vec::new();
                while let Some(member) = self.stack.pop() {
                    self.on_stack[member] = false;
                    component.push(member);
                    if member == node {
                        break;
                    }
                }
                self.components.push(component);
            }
            if let Some(&(parent, _)) = frames.last() {
                self.lowlink[parent] = self.lowlink[parent].min(self.lowlink[node]);
            }
        }
    }
}

struct CircuitSearch<'a> {
    graph: &'a Digraph,
    start: usize,
    in_component: Vec<bool>,
    blocked: Vec<bool>,
    blocked_by: Vec<Vec<usize>>,
    stack: Vec<usize>,
    cycles: &'a mut Vec<Vec<usize>>,
}

/// One node on the current circuit path.
struct CircuitFrame {
    node: usize,
    next_edge: usize,
    found: bool,
}

impl CircuitSearch<'_> {
    /// Enumerate every elementary circuit through `start`.
    fn circuit(&mut self, start: usize) {
        let graph = self.graph;
        let mut frames = vec![CircuitFrame {
            node: start,
            next_edge: 0,
            found: false,
        }];
        self.stack.push(start);
        self.blocked[start] = true;

        while let Some(frame) = frames.last_mut() {
            let node = frame.node;
            if let Some(&next) = graph.outgoing(node).get(frame.next_edge) {
                frame.next_edge += 1;
                if !self.in_component[next] {
                    continue;
                }
                if next == self.start {
                    let mut cycle = self.stack.clone();
                    cycle.push(self.start);
                    self.cycles.push(cycle);
                    frame.found = true;
                } else if !self.blocked[next] {
                    self.stack.push(next);
                    self.blocked[next] = true;
                    frames.push(CircuitFrame {
                        node: next,
                        next_edge: 0,
                        found: false,
                    });
                }
                continue;
            }

            let found = frame.found;
            frames.pop();
            if found {
                self.unblock(node);
                if let Some(parent) = frames.last_mut() {
                    parent.found = true;
                }
            } else {
                for &next in graph.outgoing(node) {
                    if self.in_component[next] && !self.blocked_by[next].contains(&node) {
                        self.blocked_by[next].push(node);
                    }
                }
            }
            self.stack.pop();
        }
    }

    fn unblock(&mut self, node: usize) {
        self.blocked[node] = false;
        let mut pending = vec![node];
        while let Some(current) = pending.pop() {
            for waiting in std::mem::take(&mut self.blocked_by[current]) {
                if self.blocked[waiting] {
                    self.blocked[waiting] = false;
                    pending.push(waiting);
                }
            }
        }
    }
}
