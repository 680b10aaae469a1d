//! Max-flow engine with two solver strategies (shortest augmenting paths and
//! Dinic's level-graph algorithm), a min-cut extractor, and a scheduling
//! feasibility layer that encodes per-period demand against slot-limited
//! worker availability as a flow network.

pub mod flow;
pub mod schedule;
pub mod server;
pub mod types;
pub mod visualizer;

pub use flow::{
    min_cut, CapacityGraph, Dinic, FlowTrace, FordFulkerson, MaxFlowAlgorithm, MaxFlowOutcome,
    ResidualGraph,
};
pub use schedule::{check_feasibility, Verdict};
