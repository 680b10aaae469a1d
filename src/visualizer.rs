use std::collections::BTreeMap;
use std::fmt::Display;

use petgraph::dot::Dot;
use petgraph::graph::DiGraph;

use crate::flow::{CapacityGraph, ResidualGraph};
use crate::types::FlowEdge;

/// DOT rendering of a capacity map, edges labelled with their capacity.
pub fn capacity_graph_dot<N: Ord + Clone + Display>(network: &CapacityGraph<N>) -> String {
    let mut graph: DiGraph<String, String> = DiGraph::new();
    let mut node_indices = BTreeMap::new();

    for node in network.nodes() {
        let index = graph.add_node(node.to_string());
        node_indices.insert(node.clone(), index);
    }
    for (from, to, capacity) in network.edges() {
        if let (Some(&a), Some(&b)) = (node_indices.get(from), node_indices.get(to)) {
            graph.add_edge(a, b, capacity.to_string());
        }
    }

    format!("{}", Dot::new(&graph))
}

/// DOT rendering of the positive flows in a solved residual graph, edges
/// labelled "flow/capacity".
pub fn flow_graph_dot<N: Ord + Clone + Display>(residual: &ResidualGraph<N>) -> String {
    let edges: Vec<FlowEdge<N>> = residual
        .forward_edges()
        .into_iter()
        .filter(|edge| edge.flow > 0)
        .collect();

    let mut node_ids: BTreeMap<N, usize> = BTreeMap::new();
    for edge in &edges {
        let next = node_ids.len();
        node_ids.entry(edge.from.clone()).or_insert(next);
        let next = node_ids.len();
        node_ids.entry(edge.to.clone()).or_insert(next);
    }

    let nodes = node_ids
        .iter()
        .map(|(node, id)| format!("    {id} [label=\"{node}\"]"))
        .collect::<Vec<_>>()
        .join("\n");
    let links = edges
        .iter()
        .map(|edge| {
            format!(
                "    {} -> {} [label=\"{}/{}\"]",
                node_ids[&edge.from], node_ids[&edge.to], edge.flow, edge.capacity
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "digraph {{\n    node [shape=circle, style=filled, fillcolor=lightblue];\n{nodes}\n{links}\n}}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{Dinic, MaxFlowAlgorithm};

    #[test]
    fn capacity_dot_mentions_every_edge_label() {
        let mut capacities = CapacityGraph::new();
        capacities.add_capacity("s", "a", 3);
        capacities.add_capacity("a", "t", 2);
        let dot = capacity_graph_dot(&capacities);
        assert!(dot.contains("digraph"));
        assert!(dot.contains('3') && dot.contains('2'));
    }

    #[test]
    fn flow_dot_skips_idle_edges() {
        let mut capacities = CapacityGraph::new();
        capacities.add_capacity("s", "a", 3);
        capacities.add_capacity("a", "t", 3);
        capacities.add_capacity("s", "idle", 4);
        let outcome = Dinic.compute_flow(&capacities, &"s", &"t", None);
        let dot = flow_graph_dot(&outcome.residual);
        assert!(dot.contains("3/3"));
        assert!(!dot.contains("idle"));
    }
}
