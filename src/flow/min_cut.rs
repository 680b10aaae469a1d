use std::collections::{BTreeSet, VecDeque};

use crate::flow::graph::ResidualGraph;

/// Splits the node set of a solved residual graph into the side reachable
/// from `source` over positive-residual edges and its complement. Once a
/// solver has reached its fixed point this is a minimum cut: every
/// capacity-map edge crossing out of the reachable side is saturated and
/// their capacities sum to the flow value. A source that is not a node of
/// the graph yields an empty reachable side.
pub fn min_cut<N: Ord + Clone>(
    residual: &ResidualGraph<N>,
    source: &N,
) -> (BTreeSet<N>, BTreeSet<N>) {
    let mut reached = vec![false; residual.node_count()];
    if let Some(s) = residual.index_of(source) {
        let mut queue = VecDeque::new();
        reached[s] = true;
        queue.push_back(s);
        while let Some(u) = queue.pop_front() {
            for &id in residual.outgoing(u) {
                let edge = residual.edge(id);
                if edge.residual() > 0 && !reached[edge.to] {
                    reached[edge.to] = true;
                    queue.push_back(edge.to);
                }
            }
        }
    }

    let mut reachable = BTreeSet::new();
    let mut complement = BTreeSet::new();
    for (node, flag) in reached.iter().enumerate() {
        if *flag {
            reachable.insert(residual.label(node).clone());
        } else {
            complement.insert(residual.label(node).clone());
        }
    }
    (reachable, complement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::ford_fulkerson::FordFulkerson;
    use crate::flow::graph::CapacityGraph;
    use crate::flow::solver::MaxFlowAlgorithm;

    fn classic_network() -> CapacityGraph<&'static str> {
        let mut capacities = CapacityGraph::new();
        capacities.add_capacity("s", "u", 15);
        capacities.add_capacity("s", "v", 5);
        capacities.add_capacity("s", "x", 12);
        capacities.add_capacity("u", "x", 8);
        capacities.add_capacity("u", "v", 10);
        capacities.add_capacity("v", "z", 8);
        capacities.add_capacity("x", "y", 5);
        capacities.add_capacity("x", "t", 5);
        capacities.add_capacity("y", "t", 15);
        capacities.add_capacity("z", "t", 10);
        capacities
    }

    #[test]
    fn classic_network_cut_partition() {
        let capacities = classic_network();
        let outcome = FordFulkerson.compute_flow(&capacities, &"s", &"t", None);
        let (reachable, complement) = min_cut(&outcome.residual, &"s");

        let expected_reachable: BTreeSet<&str> = ["s", "u", "v", "x"].into_iter().collect();
        let expected_complement: BTreeSet<&str> = ["t", "y", "z"].into_iter().collect();
        assert_eq!(reachable, expected_reachable);
        assert_eq!(complement, expected_complement);
    }

    #[test]
    fn crossing_edges_are_saturated_and_sum_to_the_flow() {
        let capacities = classic_network();
        let outcome = FordFulkerson.compute_flow(&capacities, &"s", &"t", None);
        let (reachable, complement) = min_cut(&outcome.residual, &"s");

        let mut cut_capacity = 0;
        for (from, to, capacity) in capacities.edges() {
            if reachable.contains(from) && complement.contains(to) {
                cut_capacity += capacity;
                let crossing = outcome
                    .residual
                    .forward_edges_from(from)
                    .into_iter()
                    .find(|edge| &edge.to == to)
                    .expect("capacity-map edge exists in the residual graph");
                assert!(crossing.is_saturated());
            }
        }
        assert_eq!(cut_capacity, outcome.value);
    }

    #[test]
    fn unknown_source_yields_empty_reachable_side() {
        let capacities = classic_network();
        let residual = crate::flow::graph::ResidualGraph::from_capacities(&capacities);
        let (reachable, complement) = min_cut(&residual, &"missing");
        assert!(reachable.is_empty());
        assert_eq!(complement.len(), 7);
    }
}
