use crate::flow::graph::{CapacityGraph, ResidualGraph};
use crate::flow::trace::FlowTrace;

/// Result of one max-flow computation: the flow value and the residual graph
/// it was read from.
pub struct MaxFlowOutcome<N> {
    pub value: u64,
    pub residual: ResidualGraph<N>,
}

pub trait MaxFlowAlgorithm {
    fn compute_flow<N: Ord + Clone>(
        &self,
        capacities: &CapacityGraph<N>,
        source: &N,
        sink: &N,
        trace: Option<&mut FlowTrace<N>>,
    ) -> MaxFlowOutcome<N>;
}
