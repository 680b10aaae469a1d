use std::collections::VecDeque;

use crate::flow::graph::{CapacityGraph, ResidualGraph};
use crate::flow::solver::{MaxFlowAlgorithm, MaxFlowOutcome};
use crate::flow::trace::FlowTrace;

/// Dinic's algorithm: BFS level phases alternating with blocking flows
/// restricted to edges that advance the level by exactly one. The shortest
/// augmenting distance grows strictly between phases, bounding the outer
/// loop to O(V) iterations and the whole run to O(V^2 * E).
#[derive(Clone, Default)]
pub struct Dinic;

impl MaxFlowAlgorithm for Dinic {
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
        while let Some(levels) = level_graph(&residual, s, t) {
            blocking_flow(&mut residual, &levels, s, t, &mut total, trace.as_deref_mut());
        }

        MaxFlowOutcome {
            value: total,
            residual,
        }
    }
}

/// BFS distances from the source over positive-residual edges. Nodes are
/// levelled at most once; expansion stops as soon as the sink is dequeued.
/// Returns None when the sink is unreachable, which ends the outer loop.
fn level_graph<N: Ord + Clone>(
    residual: &ResidualGraph<N>,
    s: usize,
    t: usize,
) -> Option<Vec<Option<u32>>> {
    let mut levels: Vec<Option<u32>> = vec![None; residual.node_count()];
    let mut queue = VecDeque::new();
    levels[s] = Some(0);
    queue.push_back((s, 0u32));

    while let Some((u, depth)) = queue.pop_front() {
        if u == t {
            return Some(levels);
        }
        for &id in residual.outgoing(u) {
            let edge = residual.edge(id);
            if edge.residual() > 0 && levels[edge.to].is_none() {
                levels[edge.to] = Some(depth + 1);
                queue.push_back((edge.to, depth + 1));
            }
        }
    }

    None
}

/// One blocking flow on the level DAG, via depth-first advance/retreat with
/// an explicit path stack. The per-node cursor into the adjacency list never
/// rewinds within a phase: an edge proven saturated or dead-ended is not
/// rescanned, which is the memoization that keeps a phase at O(V * E).
/// Afterwards no level-respecting source-to-sink path remains.
fn blocking_flow<N: Ord + Clone>(
    residual: &mut ResidualGraph<N>,
    levels: &[Option<u32>],
    s: usize,
    t: usize,
    total: &mut u64,
    mut trace: Option<&mut FlowTrace<N>>,
) {
    let mut cursor = vec![0usize; residual.node_count()];
    // (tail, edge) pairs forming the current partial path from the source.
    let mut path: Vec<(usize, usize)> = Vec::new();
    let mut u = s;

    loop {
        if u == t {
            let mut bottleneck = i64::MAX;
            let mut narrowest = 0;
            for (k, &(_, id)) in path.iter().enumerate() {
                let r = residual.edge(id).residual();
                if r < bottleneck {
                    bottleneck = r;
                    narrowest = k;
                }
            }
            for &(_, id) in &path {
                residual.push(id, bottleneck);
            }
            *total += bottleneck as u64;
            if let Some(recorder) = trace.as_deref_mut() {
                let ids: Vec<usize> = path.iter().map(|&(_, id)| id).collect();
                recorder.record_step(residual.path_labels(s, &ids), bottleneck as u64, *total);
            }
            // Retreat to the shallowest edge this augmentation saturated;
            // the cursor there now sees zero residual and skips it.
            u = path[narrowest].0;
            path.truncate(narrowest);
            continue;
        }

        let mut advanced = false;
        while cursor[u] < residual.outgoing(u).len() {
            let id = residual.outgoing(u)[cursor[u]];
            let edge = residual.edge(id);
            let advances_level = match (levels[u], levels[edge.to]) {
                (Some(a), Some(b)) => b == a + 1,
                _ => false,
            };
            if edge.residual() > 0 && advances_level {
                path.push((u, id));
                u = edge.to;
                advanced = true;
                break;
            }
            cursor[u] += 1;
        }

        if !advanced {
            match path.pop() {
                Some((tail, _)) => {
                    u = tail;
                    // The edge into the dead end is spent for this phase.
                    cursor[u] += 1;
                }
                None => break,
            }
        }
    }
}
