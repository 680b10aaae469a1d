use std::collections::BTreeMap;

use crate::types::FlowEdge;

/// Input network: per-node adjacency of non-negative edge capacities.
///
/// `add_capacity` accumulates when the same (from, to) pair is declared more
/// than once; nothing is ever overwritten. Every node mentioned as an
/// endpoint gets a top-level entry, so solvers can index by any node they
/// encounter. Iteration follows label order, which keeps residual-graph
/// construction and solver runs reproducible.
///
/// Capacities must fit in `i64`; the parse and server boundaries enforce
/// this before a graph is built.
#[derive(Clone, Debug)]
pub struct CapacityGraph<N> {
    adjacency: BTreeMap<N, BTreeMap<N, u64>>,
}

impl<N: Ord + Clone> CapacityGraph<N> {
    pub fn new() -> Self {
        CapacityGraph {
            adjacency: BTreeMap::new(),
        }
    }

    /// Adds `capacity` on the edge `from -> to`, accumulating with any
    /// capacity already declared for that pair.
    pub fn add_capacity(&mut self, from: N, to: N, capacity: u64) {
        self.adjacency.entry(to.clone()).or_default();
        *self
            .adjacency
            .entry(from)
            .or_default()
            .entry(to)
            .or_insert(0) += capacity;
    }

    pub fn ensure_node(&mut self, node: N) {
        self.adjacency.entry(node).or_default();
    }

    pub fn capacity(&self, from: &N, to: &N) -> u64 {
        self.adjacency
            .get(from)
            .and_then(|out| out.get(to))
            .copied()
            .unwrap_or(0)
    }

    pub fn contains_node(&self, node: &N) -> bool {
        self.adjacency.contains_key(node)
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeMap::len).sum()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.adjacency.keys()
    }

    pub fn edges(&self) -> impl Iterator<Item = (&N, &N, u64)> {
        self.adjacency.iter().flat_map(|(from, out)| {
            out.iter().map(move |(to, &capacity)| (from, to, capacity))
        })
    }
}

impl<N: Ord + Clone> Default for CapacityGraph<N> {
    fn default() -> Self {
        CapacityGraph::new()
    }
}

/// One direction of a residual edge pair. `flow` may go negative on the
/// zero-capacity companion of a forward edge; `capacity - flow` never does.
#[derive(Clone, Debug)]
pub struct ResidualEdge {
    pub to: usize,
    pub capacity: u64,
    pub flow: i64,
    /// Index of the paired edge in the opposite direction.
    pub rev: usize,
    /// True for edges instantiated from the capacity map.
    pub forward: bool,
}

impl ResidualEdge {
    #[inline]
    pub fn residual(&self) -> i64 {
        self.capacity as i64 - self.flow
    }
}

/// Residual/flow graph over interned node indices.
///
/// Labels are mapped to dense `usize` indices once at construction; the
/// solving loops touch only the flat adjacency and edge vectors. Every
/// declared edge gets a companion reverse edge of capacity zero, linked
/// through `rev`, so pushing flow on one side cancels it on the other.
/// Antiparallel input edges stay independent, each with its own companion.
#[derive(Clone, Debug)]
pub struct ResidualGraph<N> {
    labels: Vec<N>,
    index: BTreeMap<N, usize>,
    adjacency: Vec<Vec<usize>>,
    edges: Vec<ResidualEdge>,
}

impl<N: Ord + Clone> ResidualGraph<N> {
    pub fn from_capacities(capacities: &CapacityGraph<N>) -> Self {
        let mut graph = ResidualGraph {
            labels: Vec::new(),
            index: BTreeMap::new(),
            adjacency: Vec::new(),
            edges: Vec::new(),
        };
        for node in capacities.nodes() {
            graph.intern(node);
        }
        for (from, to, capacity) in capacities.edges() {
            debug_assert!(capacity <= i64::MAX as u64);
            let u = graph.intern(from);
            let v = graph.intern(to);
            let id = graph.edges.len();
            graph.edges.push(ResidualEdge {
                to: v,
                capacity,
                flow: 0,
                rev: id + 1,
                forward: true,
            });
            graph.edges.push(ResidualEdge {
                to: u,
                capacity: 0,
                flow: 0,
                rev: id,
                forward: false,
            });
            graph.adjacency[u].push(id);
            graph.adjacency[v].push(id + 1);
        }
        graph
    }

    fn intern(&mut self, label: &N) -> usize {
        if let Some(&id) = self.index.get(label) {
            return id;
        }
        let id = self.labels.len();
        self.labels.push(label.clone());
        self.index.insert(label.clone(), id);
        self.adjacency.push(Vec::new());
        id
    }

    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn index_of(&self, label: &N) -> Option<usize> {
        self.index.get(label).copied()
    }

    pub fn label(&self, node: usize) -> &N {
        &self.labels[node]
    }

    pub fn outgoing(&self, node: usize) -> &[usize] {
        &self.adjacency[node]
    }

    pub fn edge(&self, id: usize) -> &ResidualEdge {
        &self.edges[id]
    }

    /// Tail node of an edge, read off its companion.
    pub fn tail(&self, id: usize) -> usize {
        self.edges[self.edges[id].rev].to
    }

    /// Pushes `amount` along edge `id` and cancels it on the companion.
    pub fn push(&mut self, id: usize, amount: i64) {
        debug_assert!(amount >= 0 && amount <= self.edges[id].residual());
        let rev = self.edges[id].rev;
        self.edges[id].flow += amount;
        self.edges[rev].flow -= amount;
    }

    /// Node labels along an edge chain starting at `start`.
    pub fn path_labels(&self, start: usize, path: &[usize]) -> Vec<N> {
        let mut labels = Vec::with_capacity(path.len() + 1);
        labels.push(self.labels[start].clone());
        for &id in path {
            labels.push(self.labels[self.edges[id].to].clone());
        }
        labels
    }

    /// Total flow leaving `source` on forward edges. For a solved graph this
    /// is the flow value of the network.
    pub fn flow_value(&self, source: &N) -> u64 {
        match self.index_of(source) {
            Some(s) => self.adjacency[s]
                .iter()
                .map(|&id| &self.edges[id])
                .filter(|edge| edge.forward)
                .map(|edge| edge.flow.max(0) as u64)
                .sum(),
            None => 0,
        }
    }

    /// Forward edges leaving `node`, as labelled records.
    pub fn forward_edges_from(&self, node: &N) -> Vec<FlowEdge<N>> {
        match self.index_of(node) {
            Some(u) => self.adjacency[u]
                .iter()
                .map(|&id| &self.edges[id])
                .filter(|edge| edge.forward)
                .map(|edge| self.labelled(node.clone(), edge))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Forward edges entering `node`, as labelled records.
    pub fn forward_edges_into(&self, node: &N) -> Vec<FlowEdge<N>> {
        self.forward_edges()
            .into_iter()
            .filter(|edge| &edge.to == node)
            .collect()
    }

    /// Every forward edge of the graph, as labelled records.
    pub fn forward_edges(&self) -> Vec<FlowEdge<N>> {
        let mut result = Vec::new();
        for (u, out) in self.adjacency.iter().enumerate() {
            for &id in out {
                let edge = &self.edges[id];
                if edge.forward {
                    result.push(self.labelled(self.labels[u].clone(), edge));
                }
            }
        }
        result
    }

    fn labelled(&self, from: N, edge: &ResidualEdge) -> FlowEdge<N> {
        FlowEdge {
            from,
            to: self.labels[edge.to].clone(),
            capacity: edge.capacity,
            flow: edge.flow.max(0) as u64,
        }
    }
}
