//! CLI entry point for the 8-puzzle solver.
//!
//! Usage:
//!   eight-puzzle solve [FILE] [options]
//!   eight-puzzle solve --stdin [options]
//!   eight-puzzle show <CELLS>
//!
//! Solve options:
//!   --start <cells>       Start state, e.g. 2,8,3,1,6,4,7,0,5 (default: random)
//!   --goal <cells>        Goal state (default: 1,2,3,8,0,4,7,6,5)
//!   --seed <n>            Seed for the random start
//!   --strategy <name>     bfs, greedy or a_star (default: bfs)
//!   --timeout <seconds>   Maximum search time, 0 for none (default: 15)
//!   --max-nodes <n>       Maximum generated nodes, 0 for none (default: 2000000)
//!   --skip-revisits       Never generate a state twice
//!   --incremental         Score only new nodes in Greedy/A*
//!   --json                Print the result as JSON

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use eight_puzzle::{
    render_board, solve, Cost, Move, PuzzleConfig, RescoreMode, SearchOutcome, SearchResult,
    SolverConfig, State, Strategy,
};

#[derive(Parser)]
#[command(name = "eight-puzzle")]
#[command(about = "Breadth-first, greedy and A* search for the 8-puzzle")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for a sequence of blank moves from a start state to the goal
    Solve {
        /// Path to a puzzle JSON file: {"start": [...], "goal": [...]}
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read the puzzle JSON from stdin instead of a file
        #[arg(long)]
        stdin: bool,

        /// Start state as comma-separated tiles
        #[arg(long, value_name = "CELLS", conflicts_with_all = ["file", "stdin"])]
        start: Option<State>,

        /// Goal state as comma-separated tiles
        #[arg(long, value_name = "CELLS")]
        goal: Option<State>,

        /// Seed for the random start state
        #[arg(long)]
        seed: Option<u64>,

        /// Search strategy: bfs, greedy or a_star
        #[arg(long, default_value = "bfs")]
        strategy: Strategy,

        /// Maximum search time in seconds (0 disables)
        #[arg(long, default_value = "15")]
        timeout: u64,

        /// Maximum generated nodes (0 disables)
        #[arg(long, default_value = "2000000")]
        max_nodes: usize,

        /// Never generate a state that was generated before
        #[arg(long)]
        skip_revisits: bool,

        /// Score only newly generated nodes (Greedy/A*)
        #[arg(long)]
        incremental: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Print search settings to stderr
        #[arg(short, long)]
        verbose: bool,
    },
    /// Print a board as three rows of three
    Show {
        /// Comma-separated cells
        #[arg(value_name = "CELLS")]
        cells: String,
    },
}

/// JSON output for a search
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput<'a> {
    solved: bool,
    outcome: SearchOutcome,
    strategy: Strategy,
    start: State,
    goal: State,
    moves: &'a [Move],
    nodes_generated: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    cost: Option<&'a Cost>,
    nodes_expanded: usize,
    max_frontier: usize,
    time_elapsed_ms: u64,
}

fn main() {
    let cli = Cli::parse();

    let code = match run(cli.command) {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };
    std::process::exit(code);
}

/// Returns whether the command succeeded
fn run(command: Commands) -> Result<bool> {
    match command {
        Commands::Solve {
            file,
            stdin,
            start,
            goal,
            seed,
            strategy,
            timeout,
            max_nodes,
            skip_revisits,
            incremental,
            json,
            verbose,
        } => {
            let puzzle = load_puzzle(file, stdin, start, goal, seed)?;

            let config = SolverConfig {
                timeout: (timeout > 0).then(|| Duration::from_secs(timeout)),
                max_nodes: (max_nodes > 0).then_some(max_nodes),
                skip_revisits,
                rescore: if incremental {
                    RescoreMode::Incremental
                } else {
                    RescoreMode::Full
                },
            };

            if verbose {
                eprintln!("strategy: {}", strategy);
                eprintln!("start: {:?}", puzzle.start.cells());
                eprintln!("goal: {:?}", puzzle.goal.cells());
                eprintln!("limits: {:?}", config);
            }

            let result = solve(strategy, &puzzle.start, &puzzle.goal, &config);

            if json {
                let output = SolveOutput {
                    solved: result.is_solved(),
                    outcome: result.outcome,
                    strategy: result.strategy,
                    start: puzzle.start,
                    goal: puzzle.goal,
                    moves: &result.moves,
                    nodes_generated: result.nodes_generated,
                    cost: result.cost.as_ref(),
                    nodes_expanded: result.stats.nodes_expanded,
                    max_frontier: result.stats.max_frontier,
                    time_elapsed_ms: result.stats.time_elapsed_ms,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("Initial state:\n{}\n", puzzle.start);
                print_report(&result);
            }

            Ok(result.is_solved())
        }
        Commands::Show { cells } => {
            let cells = cells
                .split(',')
                .map(|t| t.trim().parse::<u8>())
                .collect::<std::result::Result<Vec<u8>, _>>()
                .context("cells must be comma-separated numbers")?;
            match render_board(&cells) {
                Ok(board) => {
                    println!("{}", board);
                    Ok(true)
                }
                Err(e) => {
                    eprintln!("Cannot print board: {}", e);
                    Ok(false)
                }
            }
        }
    }
}

fn load_puzzle(
    file: Option<PathBuf>,
    stdin: bool,
    start: Option<State>,
    goal: Option<State>,
    seed: Option<u64>,
) -> Result<PuzzleConfig> {
    let random_start = !stdin && file.is_none() && start.is_none();
    if seed.is_some() && !random_start {
        bail!("--seed only applies to a random start state");
    }

    let mut puzzle = if stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read from stdin")?;
        PuzzleConfig::from_json(&buffer)?
    } else if let Some(path) = file {
        let json = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        PuzzleConfig::from_json(&json)?
    } else {
        let goal = goal.unwrap_or_else(State::goal);
        let start = match start {
            Some(start) => start,
            None => {
                let mut rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                goal.shuffled(&mut rng)
            }
        };
        PuzzleConfig { start, goal }
    };

    // An explicit --goal overrides the one in the file
    if let Some(goal) = goal {
        puzzle.goal = goal;
    }
    Ok(puzzle)
}

fn print_report(result: &SearchResult) {
    print!("{}", format_report(result));
}

fn format_report(result: &SearchResult) -> String {
    let mut out = String::new();

    let unsolved = match result.outcome {
        SearchOutcome::Solved => None,
        SearchOutcome::Exhausted => Some("every reachable state was searched"),
        SearchOutcome::NodeLimit => Some("node limit reached"),
        SearchOutcome::Timeout => Some("time limit reached"),
    };
    if let Some(why) = unsolved {
        let _ = writeln!(out, "No solution found ({})", why);
        let _ = writeln!(out, "Total number of nodes generated: {}", result.nodes_generated);
        return out;
    }

    // Greedy and A* always print their trace, even when it has only a header
    let solution = match result.trace() {
        Some(trace) => {
            let mut parts = vec![format!("({}, {})", trace.header[0], trace.header[1])];
            parts.extend(
                trace
                    .entries
                    .iter()
                    .map(|e| format!("({}, {})", e.mov, e.score)),
            );
            parts.join(" ")
        }
        None if result.moves.is_empty() => {
            let _ = writeln!(out, "Start node was the goal!");
            return out;
        }
        None => result
            .moves
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(", "),
    };

    let _ = writeln!(out, "Solution: {}", solution);
    let _ = writeln!(out, "{} moves to get to goal state", result.moves.len());
    let _ = writeln!(out, "Total number of nodes generated: {}", result.nodes_generated);
    if let Some(cost) = &result.cost {
        let _ = writeln!(out, "Path cost for solution: {}", cost);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use eight_puzzle::{search_astar, search_bfs, search_greedy};

    #[test]
    fn test_report_start_is_goal_bfs() {
        let goal = State::goal();
        let report = format_report(&search_bfs(&goal, &goal));
        assert_eq!(report, "Start node was the goal!\n");
    }

    #[test]
    fn test_report_start_is_goal_informed_prints_header() {
        let goal = State::goal();

        let greedy = format_report(&search_greedy(&goal, &goal));
        assert!(!greedy.contains("Start node was the goal!"));
        assert!(greedy.starts_with("Solution: (operator, heuristic)\n"));
        assert!(greedy.contains("0 moves to get to goal state"));
        assert!(greedy.contains("Path cost for solution: See heuristic values in path"));

        let astar = format_report(&search_astar(&goal, &goal));
        assert!(astar.starts_with("Solution: (operator, path cost)\n"));
    }

    #[test]
    fn test_report_lists_moves() {
        let start: State = "1,2,3,8,4,0,7,6,5".parse().unwrap();
        let goal = State::goal();

        let bfs = format_report(&search_bfs(&start, &goal));
        assert_eq!(
            bfs,
            "Solution: left\n\
             1 moves to get to goal state\n\
             Total number of nodes generated: 8\n\
             Path cost for solution: 1\n"
        );

        let greedy = format_report(&search_greedy(&start, &goal));
        assert!(greedy.starts_with("Solution: (operator, heuristic) (left, 0)\n"));
    }

    #[test]
    fn test_report_unsolved() {
        let start: State = "2,1,3,8,0,4,7,6,5".parse().unwrap();
        let config = SolverConfig {
            max_nodes: Some(100),
            ..SolverConfig::unbounded()
        };
        let result = solve(Strategy::Bfs, &start, &State::goal(), &config);
        let report = format_report(&result);
        assert!(report.starts_with("No solution found (node limit reached)\n"));
    }
}
