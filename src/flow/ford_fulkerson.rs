use std::collections::VecDeque;

use crate::flow::graph::{CapacityGraph, ResidualGraph};
use crate::flow::solver::{MaxFlowAlgorithm, MaxFlowOutcome};
use crate::flow::trace::FlowTrace;

/// Ford-Fulkerson driven by breadth-first search: each round augments along
/// a shortest residual path (Edmonds-Karp), so successive path lengths never
/// decrease and the run is O(V * E^2).
#[derive(Clone, Default)]
pub struct FordFulkerson;

impl MaxFlowAlgorithm for FordFulkerson {
    fn compute_flow<N: Ord + Clone>(
        &self,
        capacities: &CapacityGraph<N>,
        source: &N,
        sink: &N,
        mut trace: Option<&mut FlowTrace<N>>,
    ) -> MaxFlowOutcome<N> {
        let mut residual = ResidualGraph::from_capacities(capacities);
        let (s, t) = match (residual.index_of(source), residual.index_of(sink)) {
            (Some(s), Some(t)) => (s, t),
            _ => return MaxFlowOutcome { value: 0, residual },
        };
        if s == t {
            return MaxFlowOutcome { value: 0, residual };
        }

        let mut total = 0u64;
        while let Some(path) = shortest_augmenting_path(&residual, s, t) {
            let mut bottleneck = i64::MAX;
            for &id in &path {
                bottleneck = bottleneck.min(residual.edge(id).residual());
            }
            for &id in &path {
                residual.push(id, bottleneck);
            }
            total += bottleneck as u64;
            if let Some(recorder) = trace.as_deref_mut() {
                recorder.record_step(residual.path_labels(s, &path), bottleneck as u64, total);
            }
        }

        MaxFlowOutcome {
            value: total,
            residual,
        }
    }
}

/// BFS over positive-residual edges, recording the predecessor edge of each
/// discovered node and stopping as soon as the sink turns up. Returns the
/// edge chain from source to sink, or None once no augmenting path remains.
fn shortest_augmenting_path<N: Ord + Clone>(
    residual: &ResidualGraph<N>,
    s: usize,
    t: usize,
) -> Option<Vec<usize>> {
    let mut pred: Vec<Option<usize>> = vec![None; residual.node_count()];
    let mut queue = VecDeque::new();
    queue.push_back(s);

    'search: while let Some(u) = queue.pop_front() {
        for &id in residual.outgoing(u) {
            let edge = residual.edge(id);
            if edge.residual() > 0 && edge.to != s && pred[edge.to].is_none() {
                pred[edge.to] = Some(id);
                if edge.to == t {
                    break 'search;
                }
                queue.push_back(edge.to);
            }
        }
    }

    pred[t]?;
    let mut path = Vec::new();
    let mut node = t;
    while node != s {
        let id = pred[node].expect("discovered nodes have a predecessor");
        path.push(id);
        node = residual.tail(id);
    }
    path.reverse();
    Some(path)
}
