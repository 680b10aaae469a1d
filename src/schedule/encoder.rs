use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use crate::flow::CapacityGraph;
use crate::schedule::instance::Instance;

/// Node families of an encoded instance. Derived ordering keeps network
/// construction deterministic; `Display` gives the short labels used in DOT
/// output.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ScheduleNode {
    Source,
    Sink,
    /// Aggregated availability for one slot in one period.
    Avail { period: usize, slot: usize },
    /// Slot-capacity-limited passthrough, chained across periods.
    Carry { period: usize, slot: usize },
    /// Sink-adjacent demand node of one period.
    Demand { period: usize },
}

impl Display for ScheduleNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleNode::Source => write!(f, "s"),
            ScheduleNode::Sink => write!(f, "t"),
            ScheduleNode::Avail { period, slot } => write!(f, "a{period}q{slot}"),
            ScheduleNode::Carry { period, slot } => write!(f, "c{period}q{slot}"),
            ScheduleNode::Demand { period } => write!(f, "d{period}"),
        }
    }
}

/// Encodes an instance as a capacity map.
///
/// Layered topology per period: the source feeds one availability node per
/// occupied (period, slot) pair; availability drains through a carry node
/// capped at the slot capacity into the period's demand node, which feeds
/// the sink with the period's demand. Carry nodes additionally feed the next
/// period's availability node of the same slot, so unused slot capacity
/// persists across consecutive periods.
///
/// Workers sharing a slot contribute to the same availability node; their
/// amounts accumulate on the source edge.
pub fn encode(instance: &Instance) -> CapacityGraph<ScheduleNode> {
    let mut network = CapacityGraph::new();
    network.ensure_node(ScheduleNode::Source);
    network.ensure_node(ScheduleNode::Sink);

    let mut occupied: BTreeSet<(usize, usize)> = BTreeSet::new();
    for (period, data) in instance.periods.iter().enumerate() {
        network.add_capacity(
            ScheduleNode::Demand { period },
            ScheduleNode::Sink,
            data.demand,
        );

        for (worker, &amount) in data.availability.iter().enumerate() {
            let slot = instance.worker_slots[worker];
            let avail = ScheduleNode::Avail { period, slot };
            let carry = ScheduleNode::Carry { period, slot };

            network.add_capacity(ScheduleNode::Source, avail, amount);

            // Structural edges once per occupied (period, slot) pair.
            if occupied.insert((period, slot)) {
                let slot_capacity = instance.slot_capacities[slot];
                network.add_capacity(avail, carry, slot_capacity);
                network.add_capacity(
                    carry,
                    ScheduleNode::Demand { period },
                    slot_capacity.min(data.demand),
                );
                if period > 0 {
                    network.add_capacity(
                        ScheduleNode::Carry {
                            period: period - 1,
                            slot,
                        },
                        avail,
                        slot_capacity,
                    );
                }
            }
        }
    }

    network
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::instance::Period;

    fn single_worker_instance() -> Instance {
        Instance {
            worker_slots: vec![0],
            slot_capacities: vec![5],
            periods: vec![Period {
                demand: 4,
                availability: vec![3],
            }],
        }
    }

    #[test]
    fn single_worker_topology() {
        let network = encode(&single_worker_instance());
        let avail = ScheduleNode::Avail { period: 0, slot: 0 };
        let carry = ScheduleNode::Carry { period: 0, slot: 0 };
        let demand = ScheduleNode::Demand { period: 0 };

        assert_eq!(network.capacity(&ScheduleNode::Source, &avail), 3);
        assert_eq!(network.capacity(&avail, &carry), 5);
        assert_eq!(network.capacity(&carry, &demand), 4);
        assert_eq!(network.capacity(&demand, &ScheduleNode::Sink), 4);
        assert_eq!(network.edge_count(), 4);
    }

    #[test]
    fn shared_slot_contributions_accumulate() {
        let instance = Instance {
            worker_slots: vec![0, 0],
            slot_capacities: vec![9],
            periods: vec![Period {
                demand: 7,
                availability: vec![2, 4],
            }],
        };
        let network = encode(&instance);
        let avail = ScheduleNode::Avail { period: 0, slot: 0 };
        let carry = ScheduleNode::Carry { period: 0, slot: 0 };

        assert_eq!(network.capacity(&ScheduleNode::Source, &avail), 6);
        // Structural capacities are not doubled by the second worker.
        assert_eq!(network.capacity(&avail, &carry), 9);
    }

    #[test]
    fn carry_nodes_chain_across_periods() {
        let instance = Instance {
            worker_slots: vec![0],
            slot_capacities: vec![6],
            periods: vec![
                Period {
                    demand: 2,
                    availability: vec![5],
                },
                Period {
                    demand: 8,
                    availability: vec![1],
                },
            ],
        };
        let network = encode(&instance);
        let carry_first = ScheduleNode::Carry { period: 0, slot: 0 };
        let avail_second = ScheduleNode::Avail { period: 1, slot: 0 };

        assert_eq!(network.capacity(&carry_first, &avail_second), 6);
        // Sink-side edge of the second period is clamped by the slot size.
        let carry_second = ScheduleNode::Carry { period: 1, slot: 0 };
        let demand_second = ScheduleNode::Demand { period: 1 };
        assert_eq!(network.capacity(&carry_second, &demand_second), 6);
    }

    #[test]
    fn untouched_slots_get_no_nodes() {
        let instance = Instance {
            worker_slots: vec![0],
            slot_capacities: vec![5, 9],
            periods: vec![Period {
                demand: 1,
                availability: vec![1],
            }],
        };
        let network = encode(&instance);
        assert!(!network.contains_node(&ScheduleNode::Avail { period: 0, slot: 1 }));
    }
}
