use shiftflow::schedule::{check_feasibility, saturation_verdict, solve_instance, Instance, ScheduleNode};
use shiftflow::Verdict;

#[test]
fn matching_supply_meets_demand() {
    assert_eq!(
        check_feasibility("1\n1\n5\n5 5\n").unwrap(),
        Verdict::Possible
    );
}

#[test]
fn short_supply_cannot_meet_demand() {
    assert_eq!(
        check_feasibility("1\n1\n5\n5 3\n").unwrap(),
        Verdict::Impossible
    );
}

#[test]
fn balanced_two_slot_instance_is_possible() {
    let input = "2\n1 2\n5 5\n4 2 2\n6 3 3\n";
    assert_eq!(check_feasibility(input).unwrap(), Verdict::Possible);
}

#[test]
fn surplus_persists_across_periods_up_to_slot_capacity() {
    // All supply arrives in the first period; demand drains it over the
    // following two. The slot is large enough to hold the backlog.
    assert_eq!(
        check_feasibility("3\n1\n10\n0 4\n2 0\n2 0\n").unwrap(),
        Verdict::Possible
    );
    // A slot of size 1 cannot hold it.
    assert_eq!(
        check_feasibility("3\n1\n1\n0 4\n2 0\n2 0\n").unwrap(),
        Verdict::Impossible
    );
}

#[test]
fn workers_sharing_a_slot_accumulate() {
    // 3 + 2 from two workers on the same slot covers the demand of 5; a
    // verdict of impossible here would mean one contribution was dropped.
    assert_eq!(
        check_feasibility("1\n1 1\n5\n5 3 2\n").unwrap(),
        Verdict::Possible
    );
}

#[test]
fn verdicts_print_the_wire_words() {
    assert_eq!(Verdict::Possible.to_string(), "possible");
    assert_eq!(Verdict::Impossible.to_string(), "impossible");
}

#[test]
fn checking_twice_gives_the_same_verdict() {
    let instance = Instance::parse("1\n1\n5\n5 3\n").unwrap();
    let outcome = solve_instance(&instance);
    let first = saturation_verdict(&outcome.residual, &ScheduleNode::Source, &ScheduleNode::Sink);
    let second = saturation_verdict(&outcome.residual, &ScheduleNode::Source, &ScheduleNode::Sink);
    assert_eq!(first, Verdict::Impossible);
    assert_eq!(first, second);
}

#[test]
fn malformed_inputs_are_rejected() {
    assert!(check_feasibility("").is_err());
    assert!(check_feasibility("1\n1\n").is_err());
    assert!(check_feasibility("1\n1\nfive\n5 5\n").is_err());
    assert!(check_feasibility("1\n1\n5\n5\n").is_err());
    assert!(check_feasibility("1\n1\n5\n5 -1\n").is_err());
    assert!(check_feasibility("1\n9\n5\n5 5\n").is_err());
}
