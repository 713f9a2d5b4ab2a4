//! Errors raised when building puzzles or applying moves.

use thiserror::Error;

use crate::state::Label;

/// Rejections of ill-formed puzzles and violated move contracts.
///
/// None of these describe a puzzle without a solution: an exhausted search
/// is reported by the solver as `None`, not as an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("pile capacity must be at least 1")]
    ZeroCapacity,
    #[error("pile {pile} holds {len} items but the capacity is {capacity}")]
    PileOverflow {
        pile: usize,
        len: usize,
        capacity: usize,
    },
    #[error("label {0:?} is reserved as a separator")]
    ReservedLabel(Label),
    #[error("a puzzle needs at least 2 piles, got {0}")]
    TooFewPiles(usize),
    #[error("puzzle holds {actual} items, expected {expected} (capacity x (piles - 2))")]
    WrongItemCount { actual: usize, expected: usize },
    #[error("label {label:?} appears {count} times, expected {capacity}")]
    WrongLabelCount {
        label: Label,
        count: usize,
        capacity: usize,
    },
    #[error("pile {0} is empty, nothing to move")]
    EmptySource(usize),
    #[error("cannot move from pile {from} to pile {to}")]
    IllegalMove { from: usize, to: usize },
}
