pub mod encoder;
pub mod feasibility;
pub mod instance;

pub use encoder::{encode, ScheduleNode};
pub use feasibility::{saturation_verdict, Verdict};
pub use instance::{Instance, Period};

use crate::flow::{Dinic, MaxFlowAlgorithm, MaxFlowOutcome};
use crate::types::InputError;

/// Encodes and solves an instance with Dinic's algorithm.
pub fn solve_instance(instance: &Instance) -> MaxFlowOutcome<ScheduleNode> {
    let network = encode(instance);
    Dinic.compute_flow(&network, &ScheduleNode::Source, &ScheduleNode::Sink, None)
}

/// Verdict for an already-parsed instance.
pub fn check_instance(instance: &Instance) -> Verdict {
    let outcome = solve_instance(instance);
    saturation_verdict(&outcome.residual, &ScheduleNode::Source, &ScheduleNode::Sink)
}

/// Parses the wire format, encodes, solves, and reports.
pub fn check_feasibility(input: &str) -> Result<Verdict, InputError> {
    let instance = Instance::parse(input)?;
    Ok(check_instance(&instance))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_supply_and_demand_is_possible() {
        assert_eq!(check_feasibility("1\n1\n5\n5 5\n").unwrap(), Verdict::Possible);
    }

    #[test]
    fn short_supply_is_impossible() {
        assert_eq!(
            check_feasibility("1\n1\n5\n5 3\n").unwrap(),
            Verdict::Impossible
        );
    }

    #[test]
    fn oversupply_beyond_demand_is_impossible() {
        assert_eq!(
            check_feasibility("1\n1\n5\n5 7\n").unwrap(),
            Verdict::Impossible
        );
    }

    #[test]
    fn surplus_rides_the_carry_chain() {
        // Period one supplies 3 against demand 1; the surplus persists in
        // the slot and covers period two, which supplies 1 against demand 3.
        let input = "2\n1\n4\n1 3\n3 1\n";
        assert_eq!(check_feasibility(input).unwrap(), Verdict::Possible);
    }

    #[test]
    fn slot_capacity_limits_the_carry_chain() {
        // Same instance with a slot of size 1: the surplus cannot persist.
        let input = "2\n1\n1\n1 3\n3 1\n";
        assert_eq!(check_feasibility(input).unwrap(), Verdict::Impossible);
    }

    #[test]
    fn demand_free_instance_is_possible() {
        assert_eq!(check_feasibility("0\n1 1\n5\n").unwrap(), Verdict::Possible);
    }

    #[test]
    fn parse_errors_propagate() {
        assert!(check_feasibility("1\n1\n5\nnope 3\n").is_err());
    }
}
