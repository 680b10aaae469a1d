use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejected instance input. Line numbers are 1-based positions in the wire
/// format; validation happens before any solving starts and nothing partial
/// is produced.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InputError {
    Malformed { line: usize, message: String },
    NegativeAmount { line: usize, value: i64 },
    SlotOutOfRange { line: usize, slot: i64, slots: usize },
}

impl Display for InputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::Malformed { line, message } => {
                write!(f, "line {line}: {message}")
            }
            InputError::NegativeAmount { line, value } => {
                write!(f, "line {line}: negative amount {value}")
            }
            InputError::SlotOutOfRange { line, slot, slots } => {
                write!(
                    f,
                    "line {line}: slot index {slot} outside 1..={slots}"
                )
            }
        }
    }
}

impl Error for InputError {}
