pub mod dinic;
pub mod ford_fulkerson;
pub mod graph;
pub mod min_cut;
pub mod solver;
pub mod trace;

pub use dinic::Dinic;
pub use ford_fulkerson::FordFulkerson;
pub use graph::{CapacityGraph, ResidualEdge, ResidualGraph};
pub use min_cut::min_cut;
pub use solver::{MaxFlowAlgorithm, MaxFlowOutcome};
pub use trace::FlowTrace;
