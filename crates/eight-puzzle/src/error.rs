//! Error types for the puzzle engine.
//!
//! Only malformed input is an error. A search that ends without reaching the
//! goal is reported through [`crate::solver::SearchOutcome`] instead.

use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("a board needs exactly {expected} cells, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("cell {position} holds {value}, tiles must be between 0 and 8")]
    ValueOutOfRange { position: usize, value: u8 },

    #[error("tile {value} appears more than once (again at cell {position})")]
    DuplicateValue { position: usize, value: u8 },

    #[error("'{token}' is not a tile number")]
    InvalidNumber { token: String },

    #[error("unknown strategy '{name}' (expected bfs, greedy or a_star)")]
    UnknownStrategy { name: String },

    #[error("unknown move '{name}' (expected up, down, left or right)")]
    UnknownMove { name: String },

    #[error("invalid puzzle JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
