use std::fmt::{Display, Formatter};

use crate::flow::ResidualGraph;

/// Binary outcome of a feasibility check.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Verdict {
    Possible,
    Impossible,
}

impl Display for Verdict {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Verdict::Possible => "possible",
            Verdict::Impossible => "impossible",
        })
    }
}

/// Reads the verdict off a solved residual graph: feasible iff both rims are
/// saturated, i.e. every forward edge leaving `source` and every forward
/// edge entering `sink` carries flow equal to its capacity. Zero-capacity
/// edges trivially count as saturated. Pure inspection; re-running it on the
/// same graph yields the same verdict.
pub fn saturation_verdict<N: Ord + Clone>(
    residual: &ResidualGraph<N>,
    source: &N,
    sink: &N,
) -> Verdict {
    let supply_used = residual
        .forward_edges_from(source)
        .iter()
        .all(|edge| edge.is_saturated());
    let demand_met = residual
        .forward_edges_into(sink)
        .iter()
        .all(|edge| edge.is_saturated());

    if supply_used && demand_met {
        Verdict::Possible
    } else {
        Verdict::Impossible
    }
}
