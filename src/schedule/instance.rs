use crate::types::InputError;

/// One planning period: the amount the sink side must absorb, plus one
/// availability figure per worker in the instance's worker order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Period {
    pub demand: u64,
    pub availability: Vec<u64>,
}

/// A scheduling feasibility instance.
///
/// Wire format, whitespace-delimited integers:
///   line 1: header, ignored
///   line 2: one 1-based slot index per worker
///   line 3: one capacity per slot
///   rest:   one line per period, `d a_1 .. a_W`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Instance {
    /// 0-based slot index per worker.
    pub worker_slots: Vec<usize>,
    pub slot_capacities: Vec<u64>,
    pub periods: Vec<Period>,
}

impl Instance {
    pub fn worker_count(&self) -> usize {
        self.worker_slots.len()
    }

    pub fn slot_count(&self) -> usize {
        self.slot_capacities.len()
    }

    /// Parses the wire format. Fails fast on the first malformed line;
    /// negative amounts and out-of-range slot indices are rejected before
    /// anything is solved.
    pub fn parse(input: &str) -> Result<Self, InputError> {
        let mut lines = input.lines();

        lines.next().ok_or_else(|| InputError::Malformed {
            line: 1,
            message: "missing header line".to_string(),
        })?;
        let slots_line = lines.next().ok_or_else(|| InputError::Malformed {
            line: 2,
            message: "missing worker slot assignments".to_string(),
        })?;
        let capacities_line = lines.next().ok_or_else(|| InputError::Malformed {
            line: 3,
            message: "missing slot capacities".to_string(),
        })?;

        let slot_capacities = parse_amounts(3, capacities_line)?;
        let worker_slots = parse_integers(2, slots_line)?
            .into_iter()
            .map(|slot| {
                if slot < 1 || slot as usize > slot_capacities.len() {
                    Err(InputError::SlotOutOfRange {
                        line: 2,
                        slot,
                        slots: slot_capacities.len(),
                    })
                } else {
                    Ok(slot as usize - 1)
                }
            })
            .collect::<Result<Vec<usize>, InputError>>()?;

        let mut periods = Vec::new();
        for (offset, period_line) in lines.enumerate() {
            let line = 4 + offset;
            let values = parse_amounts(line, period_line)?;
            if values.len() != worker_slots.len() + 1 {
                return Err(InputError::Malformed {
                    line,
                    message: format!(
                        "expected a demand and {} availability values, found {} values",
                        worker_slots.len(),
                        values.len()
                    ),
                });
            }
            periods.push(Period {
                demand: values[0],
                availability: values[1..].to_vec(),
            });
        }

        Ok(Instance {
            worker_slots,
            slot_capacities,
            periods,
        })
    }
}

fn parse_integers(line: usize, text: &str) -> Result<Vec<i64>, InputError> {
    text.split_whitespace()
        .map(|token| {
            token.parse::<i64>().map_err(|_| InputError::Malformed {
                line,
                message: format!("expected an integer, found {token:?}"),
            })
        })
        .collect()
}

fn parse_amounts(line: usize, text: &str) -> Result<Vec<u64>, InputError> {
    parse_integers(line, text)?
        .into_iter()
        .map(|value| {
            if value < 0 {
                Err(InputError::NegativeAmount { line, value })
            } else {
                Ok(value as u64)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_two_period_instance() {
        let instance = Instance::parse("2\n1 2\n5 3\n4 2 2\n6 3 3\n").unwrap();
        assert_eq!(instance.worker_slots, vec![0, 1]);
        assert_eq!(instance.slot_capacities, vec![5, 3]);
        assert_eq!(
            instance.periods,
            vec![
                Period {
                    demand: 4,
                    availability: vec![2, 2]
                },
                Period {
                    demand: 6,
                    availability: vec![3, 3]
                },
            ]
        );
    }

    #[test]
    fn rejects_non_integer_tokens() {
        let error = Instance::parse("1\n1\nfive\n3 3\n").unwrap_err();
        assert_eq!(
            error,
            InputError::Malformed {
                line: 3,
                message: "expected an integer, found \"five\"".to_string(),
            }
        );
    }

    #[test]
    fn rejects_short_period_lines() {
        let error = Instance::parse("1\n1 1\n5\n4 2\n").unwrap_err();
        assert!(matches!(error, InputError::Malformed { line: 4, .. }));
    }

    #[test]
    fn rejects_overlong_period_lines() {
        let error = Instance::parse("1\n1\n5\n4 2 9\n").unwrap_err();
        assert!(matches!(error, InputError::Malformed { line: 4, .. }));
    }

    #[test]
    fn rejects_out_of_range_slot_indices() {
        let error = Instance::parse("1\n3\n5 4\n4 2\n").unwrap_err();
        assert_eq!(
            error,
            InputError::SlotOutOfRange {
                line: 2,
                slot: 3,
                slots: 2,
            }
        );
    }

    #[test]
    fn rejects_zero_slot_indices() {
        let error = Instance::parse("1\n0\n5\n4 2\n").unwrap_err();
        assert!(matches!(error, InputError::SlotOutOfRange { slot: 0, .. }));
    }

    #[test]
    fn rejects_negative_amounts() {
        let error = Instance::parse("1\n1\n5\n4 -2\n").unwrap_err();
        assert_eq!(
            error,
            InputError::NegativeAmount { line: 4, value: -2 }
        );
    }

    #[test]
    fn accepts_instances_without_periods() {
        let instance = Instance::parse("0\n1 1\n5\n").unwrap();
        assert!(instance.periods.is_empty());
        assert_eq!(instance.worker_count(), 2);
    }
}
