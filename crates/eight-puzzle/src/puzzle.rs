//! Board representation for the 3x3 sliding-tile puzzle.
//!
//! A [`State`] is always a valid permutation of the tiles 0..=8, with 0 as the
//! blank. Construction validates; afterwards the invariant holds for free.

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Width and height of the board
pub const SIDE: usize = 3;

/// Number of cells on the board
pub const CELLS: usize = SIDE * SIDE;

/// The blank tile
pub const BLANK: u8 = 0;

/// Goal arrangement used when none is supplied (blank in the centre)
pub const DEFAULT_GOAL: [u8; CELLS] = [1, 2, 3, 8, 0, 4, 7, 6, 5];

/// Direction the blank moves in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// Fixed expansion order. Tie-breaks in every strategy depend on it.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    pub fn opposite(self) -> Move {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
        }
    }

    /// Index of the cell the blank would move into, or `None` at the edge
    fn target(self, blank: usize) -> Option<usize> {
        let (row, col) = (blank / SIDE, blank % SIDE);
        match self {
            Move::Up if row > 0 => Some(blank - SIDE),
            Move::Down if row < SIDE - 1 => Some(blank + SIDE),
            Move::Left if col > 0 => Some(blank - 1),
            Move::Right if col < SIDE - 1 => Some(blank + 1),
            _ => None,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Move {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Move::Up),
            "down" => Ok(Move::Down),
            "left" => Ok(Move::Left),
            "right" => Ok(Move::Right),
            _ => Err(Error::UnknownMove {
                name: s.to_string(),
            }),
        }
    }
}

/// An arrangement of the nine tiles.
///
/// Two states are equal exactly when all nine cells are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct State {
    cells: [u8; CELLS],
    blank: u8,
}

impl State {
    /// Build a state, rejecting anything that is not a permutation of 0..=8
    pub fn new(cells: &[u8]) -> Result<Self> {
        if cells.len() != CELLS {
            return Err(Error::InvalidLength {
                expected: CELLS,
                got: cells.len(),
            });
        }

        let mut seen = [false; CELLS];
        let mut board = [BLANK; CELLS];
        let mut blank = 0;
        for (position, &value) in cells.iter().enumerate() {
            let slot = seen
                .get_mut(value as usize)
                .ok_or(Error::ValueOutOfRange { position, value })?;
            if *slot {
                return Err(Error::DuplicateValue { position, value });
            }
            *slot = true;
            board[position] = value;
            if value == BLANK {
                blank = position as u8;
            }
        }

        Ok(Self {
            cells: board,
            blank,
        })
    }

    /// The default goal, `[1, 2, 3, 8, 0, 4, 7, 6, 5]`
    pub fn goal() -> Self {
        Self {
            cells: DEFAULT_GOAL,
            blank: 4,
        }
    }

    /// A uniformly random rearrangement of `self`.
    ///
    /// No parity filter is applied, so roughly half the results are unsolvable.
    pub fn shuffled<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let mut cells = self.cells;
        cells.shuffle(rng);
        let blank = cells.iter().position(|&c| c == BLANK).unwrap_or(0) as u8;
        Self { cells, blank }
    }

    pub fn cells(&self) -> &[u8; CELLS] {
        &self.cells
    }

    pub fn blank_index(&self) -> usize {
        self.blank as usize
    }

    /// Move the blank one cell, returning the new state.
    ///
    /// `None` means the move would push the blank off the board. `self` is
    /// left untouched either way.
    pub fn apply(&self, mov: Move) -> Option<Self> {
        let blank = self.blank_index();
        let target = mov.target(blank)?;
        let mut next = *self;
        next.cells.swap(blank, target);
        next.blank = target as u8;
        Some(next)
    }

    /// Number of moves that are legal from here (2, 3 or 4)
    pub fn legal_move_count(&self) -> usize {
        Move::ALL
            .iter()
            .filter(|m| m.target(self.blank_index()).is_some())
            .count()
    }
}

impl TryFrom<Vec<u8>> for State {
    type Error = Error;

    fn try_from(cells: Vec<u8>) -> Result<Self> {
        State::new(&cells)
    }
}

impl From<State> for Vec<u8> {
    fn from(state: State) -> Self {
        state.cells.to_vec()
    }
}

impl FromStr for State {
    type Err = Error;

    /// Parse a comma-separated list such as `1,2,3,8,0,4,7,6,5`
    fn from_str(s: &str) -> Result<Self> {
        let mut cells = Vec::with_capacity(CELLS);
        for token in s.split(',') {
            let token = token.trim();
            let value = token.parse::<u8>().map_err(|_| Error::InvalidNumber {
                token: token.to_string(),
            })?;
            cells.push(value);
        }
        State::new(&cells)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, chunk) in self.cells.chunks(SIDE).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for (col, value) in chunk.iter().enumerate() {
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", value)?;
            }
        }
        Ok(())
    }
}

/// Lay out raw cells as three rows of three.
///
/// Unlike `State`'s `Display`, this takes unchecked input; anything that is
/// not nine cells long yields an error describing the problem instead.
pub fn render_board(cells: &[u8]) -> Result<String> {
    if cells.len() != CELLS {
        return Err(Error::InvalidLength {
            expected: CELLS,
            got: cells.len(),
        });
    }
    let rows: Vec<String> = cells
        .chunks(SIDE)
        .map(|row| {
            row.iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    Ok(rows.join("\n"))
}

/// Puzzle input as read from a JSON file or stdin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleConfig {
    pub start: State,
    #[serde(default = "State::goal")]
    pub goal: State,
}

impl PuzzleConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn state(cells: [u8; CELLS]) -> State {
        State::new(&cells).unwrap()
    }

    #[test]
    fn test_apply_each_direction() {
        let goal = State::goal();
        assert_eq!(goal.apply(Move::Up), Some(state([1, 0, 3, 8, 2, 4, 7, 6, 5])));
        assert_eq!(goal.apply(Move::Down), Some(state([1, 2, 3, 8, 6, 4, 7, 0, 5])));
        assert_eq!(goal.apply(Move::Left), Some(state([1, 2, 3, 0, 8, 4, 7, 6, 5])));
        assert_eq!(goal.apply(Move::Right), Some(state([1, 2, 3, 8, 4, 0, 7, 6, 5])));
    }

    #[test]
    fn test_apply_off_the_edge_is_none() {
        let top_left = state([0, 1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(top_left.apply(Move::Up), None);
        assert_eq!(top_left.apply(Move::Left), None);

        let bottom_right = state([1, 2, 3, 4, 5, 6, 7, 8, 0]);
        assert_eq!(bottom_right.apply(Move::Down), None);
        assert_eq!(bottom_right.apply(Move::Right), None);
    }

    #[test]
    fn test_apply_leaves_input_untouched() {
        let goal = State::goal();
        let _ = goal.apply(Move::Up);
        assert_eq!(goal.cells(), &DEFAULT_GOAL);
        assert_eq!(goal.blank_index(), 4);
    }

    #[test]
    fn test_move_then_inverse_restores_state() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let s = State::goal().shuffled(&mut rng);
            for mov in Move::ALL {
                if let Some(next) = s.apply(mov) {
                    assert_eq!(next.apply(mov.opposite()), Some(s));
                }
            }
        }
    }

    #[test]
    fn test_legal_move_count_by_blank_position() {
        assert_eq!(state([0, 1, 2, 3, 4, 5, 6, 7, 8]).legal_move_count(), 2);
        assert_eq!(state([1, 0, 2, 3, 4, 5, 6, 7, 8]).legal_move_count(), 3);
        assert_eq!(State::goal().legal_move_count(), 4);
    }

    #[test]
    fn test_new_rejects_malformed() {
        assert!(matches!(
            State::new(&[1, 2, 3]),
            Err(Error::InvalidLength { expected: 9, got: 3 })
        ));
        assert!(matches!(
            State::new(&[1, 2, 3, 8, 9, 4, 7, 6, 5]),
            Err(Error::ValueOutOfRange { position: 4, value: 9 })
        ));
        assert!(matches!(
            State::new(&[1, 1, 3, 8, 0, 4, 7, 6, 5]),
            Err(Error::DuplicateValue { position: 1, value: 1 })
        ));
    }

    #[test]
    fn test_parse_comma_separated() {
        let parsed: State = "1, 2,3,8,4,0,7,6,5".parse().unwrap();
        assert_eq!(parsed.cells(), &[1, 2, 3, 8, 4, 0, 7, 6, 5]);
        assert_eq!(parsed.blank_index(), 5);

        assert!(matches!(
            "1,2,x".parse::<State>(),
            Err(Error::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_shuffled_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(42);
        let shuffled = State::goal().shuffled(&mut rng);
        let mut cells = shuffled.cells().to_vec();
        cells.sort_unstable();
        assert_eq!(cells, (0..9).collect::<Vec<u8>>());
        assert_eq!(shuffled.cells()[shuffled.blank_index()], BLANK);
    }

    #[test]
    fn test_render_board() {
        assert_eq!(
            render_board(&DEFAULT_GOAL).unwrap(),
            "1 2 3\n8 0 4\n7 6 5"
        );
        assert_eq!(State::goal().to_string(), "1 2 3\n8 0 4\n7 6 5");
        assert!(render_board(&[1, 2, 3, 4]).is_err());
    }

    #[test]
    fn test_puzzle_config_json() {
        let config = PuzzleConfig::from_json(r#"{"start": [1,2,3,8,4,0,7,6,5]}"#).unwrap();
        assert_eq!(config.goal, State::goal());
        assert_eq!(config.start.blank_index(), 5);

        assert!(PuzzleConfig::from_json(r#"{"start": [1,2,3]}"#).is_err());

        let json = serde_json::to_string(&Move::Left).unwrap();
        assert_eq!(json, "\"left\"");
    }
}
