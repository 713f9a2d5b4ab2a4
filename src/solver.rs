//! Depth-first backtracking solver with best-first sibling ordering.
//!
//! Key points:
//! - Explicit frame stack instead of native recursion, so long move paths
//!   cannot overflow the call stack
//! - Successors are sorted by heterogeneity, tidier states first
//! - One visited set shared by every branch, keyed by canonical signature
//! - Optional state/time budget turns a runaway search into an error

use std::time::{Duration, Instant};

use log::{debug, info, trace};
use thiserror::Error;

use crate::state::{Move, PuzzleState};
use crate::visited::VisitedSet;

/// Budget breaches reported by [`Solver::solve_within`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    #[error("gave up after checking {0} states")]
    StateLimitExceeded(u64),
    #[error("gave up after {0:?}")]
    TimeLimitExceeded(Duration),
}

/// Search budget. `None` means unbounded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_states: Option<u64>,
    pub time_limit: Option<Duration>,
}

/// Counters collected while searching.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Statistics {
    pub pile_capacity: usize,
    /// New states that were explored.
    pub states_checked: u64,
    /// Nodes whose candidates ran out without reaching the goal.
    pub dead_ends: u64,
    /// Candidates skipped because their signature was already visited.
    pub already_tried: u64,
    pub initial_heterogeneity: usize,
    /// Heterogeneity of any goal state: one per distinct label.
    pub target_heterogeneity: usize,
    pub lowest_heterogeneity: Option<usize>,
    pub elapsed: Duration,
}

/// A move sequence from the initial state to a goal state.
#[derive(Clone, Debug)]
pub struct Solution {
    pub moves: Vec<Move>,
    /// Initial state first, goal state last; one longer than `moves`.
    pub states: Vec<PuzzleState>,
    pub statistics: Statistics,
}

impl Solution {
    pub fn final_state(&self) -> Option<&PuzzleState> {
        self.states.last()
    }
}

/// One level of the search path.
struct Frame {
    state: PuzzleState,
    /// Move that produced `state`; `None` for the root.
    via: Option<Move>,
    /// Successors not yet tried, tidiest first.
    candidates: std::vec::IntoIter<(Move, PuzzleState)>,
}

impl Frame {
    fn expand(state: PuzzleState, via: Option<Move>) -> Self {
        let mut candidates: Vec<(Move, PuzzleState)> = state
            .legal_moves()
            .into_iter()
            .map(|mv| (mv, state.moved(mv.source, mv.target)))
            .collect();
        // stable, so equally tidy successors keep move generation order
        candidates.sort_by_key(|(_, successor)| successor.heterogeneity());

        Self {
            state,
            via,
            candidates: candidates.into_iter(),
        }
    }
}

/// Owns the visited set and statistics for one search at a time.
#[derive(Debug, Default)]
pub struct Solver {
    limits: SearchLimits,
    visited: VisitedSet,
    statistics: Statistics,
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: SearchLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    /// Statistics of the latest search, also after it failed.
    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Searches without any budget.
    ///
    /// Returns `None` when every branch from `initial` is exhausted. The
    /// caller is expected to have checked [`PuzzleState::validate`] first.
    pub fn solve(&mut self, initial: &PuzzleState) -> Option<Solution> {
        // without limits the search cannot fail
        self.search(initial, SearchLimits::default()).unwrap_or_default()
    }

    /// Searches within the configured [`SearchLimits`].
    pub fn solve_within(
        &mut self,
        initial: &PuzzleState,
    ) -> Result<Option<Solution>, SolveError> {
        self.search(initial, self.limits)
    }

    fn search(
        &mut self,
        initial: &PuzzleState,
        limits: SearchLimits,
    ) -> Result<Option<Solution>, SolveError> {
        let started = Instant::now();
        self.visited = VisitedSet::new();
        self.statistics = Statistics {
            pile_capacity: initial.pile_capacity(),
            initial_heterogeneity: initial.heterogeneity(),
            target_heterogeneity: initial.distinct_labels(),
            ..Statistics::default()
        };
        debug!(
            "searching {} piles of capacity {}",
            initial.piles().len(),
            initial.pile_capacity()
        );

        let result = self.run(initial, limits, started);
        self.statistics.elapsed = started.elapsed();

        match &result {
            Ok(Some((moves, _))) => debug!(
                "solved in {} moves after {} states",
                moves.len(),
                self.statistics.states_checked
            ),
            Ok(None) => debug!("exhausted search space"),
            Err(error) => debug!("search aborted: {error}"),
        }

        result.map(|found| {
            found.map(|(moves, states)| Solution {
                moves,
                states,
                statistics: self.statistics.clone(),
            })
        })
    }

    fn run(
        &mut self,
        initial: &PuzzleState,
        limits: SearchLimits,
        started: Instant,
    ) -> Result<Option<(Vec<Move>, Vec<PuzzleState>)>, SolveError> {
        self.visited.insert(initial.signature());
        if initial.is_goal() {
            return Ok(Some((Vec::new(), vec![initial.clone()])));
        }

        let mut stack = vec![Frame::expand(initial.clone(), None)];

        loop {
            if let Some(time_limit) = limits.time_limit {
                if started.elapsed() > time_limit {
                    return Err(SolveError::TimeLimitExceeded(time_limit));
                }
            }

            let Some(frame) = stack.last_mut() else {
                return Ok(None);
            };

            let Some((mv, candidate)) = frame.candidates.next() else {
                // out of moves, backtrack to the parent
                self.statistics.dead_ends += 1;
                trace!("dead end at depth {}", stack.len() - 1);
                stack.pop();
                continue;
            };

            if self.visited.contains(candidate.signature()) {
                self.statistics.already_tried += 1;
                continue;
            }

            if let Some(max_states) = limits.max_states {
                if self.statistics.states_checked >= max_states {
                    return Err(SolveError::StateLimitExceeded(max_states));
                }
            }

            self.statistics.states_checked += 1;
            let heterogeneity = candidate.heterogeneity();
            if self
                .statistics
                .lowest_heterogeneity
                .map_or(true, |lowest| heterogeneity < lowest)
            {
                self.statistics.lowest_heterogeneity = Some(heterogeneity);
                info!(
                    "new best heterogeneity {} after {} states",
                    heterogeneity, self.statistics.states_checked
                );
            }

            self.visited.insert(candidate.signature());

            if candidate.is_goal() {
                let mut moves: Vec<Move> = stack.iter().filter_map(|frame| frame.via).collect();
                moves.push(mv);
                let mut states: Vec<PuzzleState> =
                    stack.into_iter().map(|frame| frame.state).collect();
                states.push(candidate);
                return Ok(Some((moves, states)));
            }

            stack.push(Frame::expand(candidate, Some(mv)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzles;

    fn state(capacity: usize, text: &str) -> PuzzleState {
        PuzzleState::parse(capacity, text).unwrap()
    }

    /// Checks that each recorded move replays onto the next recorded state.
    fn assert_replays(solution: &Solution) {
        assert_eq!(solution.states.len(), solution.moves.len() + 1);
        for (step, mv) in solution.moves.iter().enumerate() {
            let before = &solution.states[step];
            assert_eq!(
                before.piles()[mv.source].last(),
                Some(&mv.label),
                "Move {step} reports the wrong label"
            );
            let after = before
                .apply_move(mv.source, mv.target)
                .unwrap_or_else(|e| panic!("Move {step} ({mv}) is illegal: {e}"));
            assert_eq!(
                after.signature(),
                solution.states[step + 1].signature(),
                "Move {step} does not lead to the next state"
            );
        }
    }

    #[test]
    fn test_tiny_puzzle() {
        let initial = state(2, "ab,ab,,");
        let solution = Solver::new().solve(&initial).expect("tiny puzzle is solvable");

        assert_eq!(solution.states[0].signature(), initial.signature());
        assert!(solution.final_state().is_some_and(PuzzleState::is_goal));
        assert_replays(&solution);
        assert_eq!(
            solution.moves,
            vec![
                Move { source: 0, target: 2, label: 'b' },
                Move { source: 1, target: 2, label: 'b' },
                Move { source: 0, target: 1, label: 'a' },
            ]
        );
        assert_eq!(solution.statistics.states_checked, 3);
        assert_eq!(solution.statistics.dead_ends, 0);
        assert_eq!(solution.statistics.already_tried, 0);
        assert_eq!(solution.statistics.initial_heterogeneity, 4);
        assert_eq!(solution.statistics.target_heterogeneity, 2);
        assert_eq!(solution.statistics.lowest_heterogeneity, Some(2));
    }

    #[test]
    fn test_already_solved_state() {
        let initial = state(2, "aa,,bb,");
        let solution = Solver::new().solve(&initial).expect("goal state is its own solution");
        assert!(solution.moves.is_empty());
        assert_eq!(solution.states, vec![initial]);
        assert_eq!(solution.statistics.states_checked, 0);
    }

    #[test]
    fn test_four_puzzle_statistics() {
        let solution = Solver::new()
            .solve(&puzzles::FOUR.state().unwrap())
            .expect("four is solvable");
        assert_replays(&solution);
        assert_eq!(solution.moves.len(), 23);
        assert_eq!(solution.statistics.states_checked, 26);
        assert_eq!(solution.statistics.dead_ends, 3);
        assert_eq!(solution.statistics.already_tried, 20);
        assert_eq!(solution.statistics.lowest_heterogeneity, Some(4));
    }

    #[test]
    fn test_eleven_puzzle_statistics() {
        let solution = Solver::new()
            .solve(&puzzles::ELEVEN.state().unwrap())
            .expect("eleven is solvable");
        assert_replays(&solution);
        assert_eq!(solution.moves.len(), 47);
        assert_eq!(solution.statistics.states_checked, 66);
        assert_eq!(solution.statistics.dead_ends, 19);
        assert_eq!(solution.statistics.already_tried, 33);
        assert_eq!(solution.statistics.lowest_heterogeneity, Some(9));
    }

    #[test]
    fn test_classic_puzzle() {
        let solution = Solver::new()
            .solve(&puzzles::CLASSIC.state().unwrap())
            .expect("classic is solvable");
        assert_replays(&solution);
        assert_eq!(solution.moves.len(), 127);
        assert_eq!(solution.statistics.states_checked, 2777);
        assert_eq!(solution.statistics.dead_ends, 2650);
        assert_eq!(solution.statistics.already_tried, 5129);
        assert_eq!(solution.statistics.target_heterogeneity, 12);
    }

    #[test]
    fn test_exhausted_search_returns_none() {
        // no free pile and mismatched tops: nothing can move
        let initial = state(2, "ab,ba");
        let mut solver = Solver::new();
        assert!(solver.solve(&initial).is_none());
        assert_eq!(solver.statistics().dead_ends, 1);
        assert_eq!(solver.statistics().states_checked, 0);
    }

    #[test]
    fn test_every_branch_is_explored_before_giving_up() {
        // one free pile is not enough to untangle these
        let initial = state(3, "abc,abc,");
        let mut solver = Solver::new();
        assert!(solver.solve(&initial).is_none());
        let stats = solver.statistics();
        assert_eq!(stats.states_checked, 3);
        assert_eq!(stats.already_tried, 2);
        assert_eq!(
            stats.dead_ends,
            stats.states_checked + 1,
            "Every explored node, root included, must end as a dead end"
        );
    }

    #[test]
    fn test_state_limit() {
        let mut solver = Solver::with_limits(SearchLimits {
            max_states: Some(10),
            time_limit: None,
        });
        let result = solver.solve_within(&puzzles::ELEVEN.state().unwrap());
        assert_eq!(result.err(), Some(SolveError::StateLimitExceeded(10)));
        assert_eq!(solver.statistics().states_checked, 10);
    }

    #[test]
    fn test_time_limit() {
        let mut solver = Solver::with_limits(SearchLimits {
            max_states: None,
            time_limit: Some(Duration::ZERO),
        });
        let result = solver.solve_within(&puzzles::ELEVEN.state().unwrap());
        assert_eq!(
            result.err(),
            Some(SolveError::TimeLimitExceeded(Duration::ZERO))
        );
        let stats = solver.statistics();
        assert_eq!(stats.pile_capacity, 4);
        assert_eq!(stats.states_checked, 0, "No state is checked past the deadline");
        assert!(stats.elapsed > Duration::ZERO);
    }

    #[test]
    fn test_generous_limits_still_solve() {
        let mut solver = Solver::with_limits(SearchLimits {
            max_states: Some(1_000),
            time_limit: Some(Duration::from_secs(60)),
        });
        let solution = solver
            .solve_within(&puzzles::ELEVEN.state().unwrap())
            .unwrap()
            .expect("eleven is solvable within budget");
        assert_eq!(solution.moves.len(), 47);
    }

    #[test]
    fn test_solver_resets_between_runs() {
        let mut solver = Solver::new();
        let initial = state(2, "ab,ab,,");
        let first = solver.solve(&initial).unwrap();
        let second = solver.solve(&initial).unwrap();
        assert_eq!(first.moves, second.moves);
        assert_eq!(
            first.statistics.states_checked,
            second.statistics.states_checked
        );
    }
}
