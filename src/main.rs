//! Ball Sort Puzzle Solver
//!
//! Picks a starting configuration, either from the built-in catalogue or from
//! the command line, checks that it is well formed and prints the moves that
//! sort it.

use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use log::info;
use thiserror::Error;

use ballsort::{puzzles, render, PuzzleError, PuzzleState, SearchLimits, SolveError, Solver};

/// Solves ball sort puzzles by depth-first search.
#[derive(Parser)]
#[command(name = "ballsort")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a puzzle and print the moves.
    Solve(SolveArgs),
    /// List the built-in puzzles.
    List,
}

#[derive(Args, Default)]
struct SolveArgs {
    /// Name of a built-in puzzle.
    #[arg(long, conflicts_with = "piles")]
    puzzle: Option<String>,
    /// Capacity of every pile, for a puzzle given with --piles.
    #[arg(long, requires = "piles")]
    capacity: Option<usize>,
    /// Comma separated piles, bottom first, e.g. "ab,ab,,".
    #[arg(long, requires = "capacity", allow_hyphen_values = true)]
    piles: Option<String>,
    /// Give up after checking this many states.
    #[arg(long)]
    max_states: Option<u64>,
    /// Give up after this many milliseconds.
    #[arg(long)]
    time_limit_ms: Option<u64>,
    /// Print only the statistics.
    #[arg(long)]
    quiet: bool,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("unknown puzzle {0:?}, run `ballsort list` to see the choices")]
    UnknownPuzzle(String),
    #[error("invalid puzzle: {0}")]
    Puzzle(#[from] PuzzleError),
    #[error(transparent)]
    Search(#[from] SolveError),
}

/// Puzzle solved when no other is selected.
const DEFAULT_PUZZLE: &str = "classic";

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Command::Solve(args)) => run_solve(&args),
        Some(Command::List) => Ok(run_list()),
        None => run_solve(&SolveArgs::default()),
    };

    match result {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Resolves the starting state from the catalogue or from explicit piles.
fn load_puzzle(args: &SolveArgs) -> Result<PuzzleState, CliError> {
    match (&args.piles, args.capacity) {
        (Some(piles), Some(capacity)) => Ok(PuzzleState::parse(capacity, piles)?),
        _ => {
            let name = args.puzzle.as_deref().unwrap_or(DEFAULT_PUZZLE);
            let puzzle =
                puzzles::find(name).ok_or_else(|| CliError::UnknownPuzzle(name.to_string()))?;
            Ok(puzzle.state()?)
        }
    }
}

/// Validates and solves the selected puzzle, returning the report.
fn run_solve(args: &SolveArgs) -> Result<String, CliError> {
    let initial = load_puzzle(args)?;
    // ill-formed puzzles never reach the solver
    initial.validate()?;

    let mut solver = Solver::with_limits(SearchLimits {
        max_states: args.max_states,
        time_limit: args.time_limit_ms.map(Duration::from_millis),
    });

    let mut output = String::new();
    match solver.solve_within(&initial)? {
        Some(solution) => {
            if !args.quiet {
                output.push_str(&render::format_solution(&solution));
                output.push('\n');
            }
            output.push_str(&format!("Total moves in solution: {}\n", solution.moves.len()));
        }
        None => output.push_str("No solution.\n"),
    }
    output.push_str(&render::format_statistics(solver.statistics()));
    info!("search took {:?}", solver.statistics().elapsed);

    Ok(output)
}

/// Lists the catalogue, one puzzle per line.
fn run_list() -> String {
    puzzles::ALL
        .iter()
        .map(|puzzle| {
            format!(
                "{:<8} capacity {}  {}\n",
                puzzle.name,
                puzzle.pile_capacity,
                puzzle.piles.join(",")
            )
        })
        .collect()
}
