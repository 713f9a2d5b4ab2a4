//! Human-readable formatting of states, solutions and statistics.

use crate::solver::{Solution, Statistics};
use crate::state::PuzzleState;

/// Formats the piles side by side, bottom first, padded to the capacity.
///
/// `ab,a,,` with capacity 2 renders as `[ab|a |  |  ]`.
pub fn format_state(state: &PuzzleState) -> String {
    let width = state.pile_capacity();
    let mut output = String::from("[");
    for (index, pile) in state.piles().iter().enumerate() {
        if index > 0 {
            output.push('|');
        }
        let contents: String = pile.iter().collect();
        output.push_str(&format!("{contents:<width$}"));
    }
    output.push(']');
    output
}

/// Formats the initial state followed by one line per move.
pub fn format_solution(solution: &Solution) -> String {
    let mut output = String::new();
    let mut states = solution.states.iter();

    if let Some(initial) = states.next() {
        output.push_str(&format!("start:          {}\n", format_state(initial)));
    }
    for (step, (mv, state)) in solution.moves.iter().zip(states).enumerate() {
        output.push_str(&format!(
            "{:>4}  {:<9} {}\n",
            step + 1,
            mv.to_string(),
            format_state(state)
        ));
    }

    output
}

/// Formats the search counters, one per line. Timing is left out so the
/// output stays reproducible.
pub fn format_statistics(stats: &Statistics) -> String {
    let lowest = stats
        .lowest_heterogeneity
        .map_or_else(|| "-".to_string(), |lowest| lowest.to_string());

    let mut output = String::new();
    output.push_str(&format!("Pile capacity: {}\n", stats.pile_capacity));
    output.push_str(&format!("States checked: {}\n", stats.states_checked));
    output.push_str(&format!("Dead ends encountered: {}\n", stats.dead_ends));
    output.push_str(&format!("Already tried: {}\n", stats.already_tried));
    output.push_str(&format!(
        "Heterogeneity: {} initial, {} lowest, {} target\n",
        stats.initial_heterogeneity, lowest, stats.target_heterogeneity
    ));
    output
}
