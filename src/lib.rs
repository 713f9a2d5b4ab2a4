//! Ball Sort Puzzle Solver Library
//!
//! Sorts labelled items across capacity-limited piles until every pile is
//! empty or full of one label. The search is a depth-first backtracking
//! solver that tries the tidiest successors first and remembers every state
//! it has seen.

pub mod error;
pub mod puzzles;
pub mod render;
pub mod solver;
pub mod state;
pub mod visited;

pub use error::PuzzleError;
pub use solver::{SearchLimits, Solution, SolveError, Solver, Statistics};
pub use state::{Label, Move, PuzzleState};
pub use visited::VisitedSet;
