//! Search engine for the 8-puzzle.
//!
//! Given a start and a goal arrangement of the tiles 0..=8 (0 is the blank),
//! finds a sequence of blank moves leading from one to the other using
//! breadth-first, greedy best-first or A* search over a shared node model.

pub mod error;
pub mod expander;
pub mod frontier;
pub mod node;
pub mod puzzle;
pub mod scorer;
pub mod solver;

// Re-export main types
pub use error::{Error, Result};
pub use frontier::RescoreMode;
pub use puzzle::{render_board, Move, PuzzleConfig, State, DEFAULT_GOAL};
pub use scorer::heuristic;
pub use solver::{
    search_astar, search_bfs, search_greedy, solve, Cost, ScoreTrace, SearchOutcome,
    SearchResult, SearchStats, SolverConfig, Strategy, TraceEntry, DEFAULT_MAX_NODES,
};
