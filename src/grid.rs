//! Fifteen puzzle arrangements.
//!
//! An [`Arrangement`] is a permutation mapping each board position to the
//! tile occupying it. The empty cell is tile 16, so the solved board is the
//! identity permutation.
//!
//! Text format: sixteen whitespace-separated tokens in row-major order, each
//! a tile 1-15 or `E` for the empty cell.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::geometry::{coordinates, is_position, manhattan_distance, Direction, CELLS, EMPTY};
use crate::permutation::{Permutation, PermutationError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("expected {expected} tokens, found {found}")]
    WrongTokenCount { expected: usize, found: usize },
    #[error("token {index} ({token:?}) is not a tile: expected 1-15 or E")]
    InvalidToken { index: usize, token: String },
    #[error("{0} is not a board position or tile (1-16)")]
    OutOfRange(i64),
    #[error("invalid direction {0:?}")]
    InvalidDirection(String),
    #[error("the empty cell cannot move {0}")]
    IllegalMove(Direction),
    #[error("not a valid puzzle layout")]
    Unsolvable,
    #[error(transparent)]
    Permutation(#[from] PermutationError),
}

/// Token used for the empty cell in board text.
const EMPTY_TOKEN: &str = "E";

/// A permutation of 1..=16 read as position -> tile.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Arrangement(Permutation);

impl Arrangement {
    /// The solved board: tiles 1-15 in order, empty cell last.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Builds an arrangement from the tiles listed in row-major order.
    pub fn from_tiles(tiles: &[i64]) -> Result<Self, PuzzleError> {
        if tiles.len() != CELLS as usize {
            return Err(PuzzleError::WrongTokenCount {
                expected: CELLS as usize,
                found: tiles.len(),
            });
        }
        if let Some(&tile) = tiles.iter().find(|&&tile| !is_position(tile)) {
            return Err(PuzzleError::OutOfRange(tile));
        }
        let permutation = Permutation::from_mapping((1..=CELLS).zip(tiles.iter().copied()))?;
        Ok(Self(permutation))
    }

    pub fn permutation(&self) -> &Permutation {
        &self.0
    }

    pub fn into_permutation(self) -> Permutation {
        self.0
    }

    /// Tile at `position`.
    #[inline]
    pub fn tile_at(&self, position: i64) -> i64 {
        self.0.apply(position)
    }

    /// Position holding `tile`.
    #[inline]
    pub fn position_of(&self, tile: i64) -> i64 {
        self.0.apply_inverse(tile)
    }

    pub fn empty_position(&self) -> i64 {
        self.position_of(EMPTY)
    }

    /// Tiles in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = i64> + '_ {
        (1..=CELLS).map(|position| self.tile_at(position))
    }

    pub fn is_solved(&self) -> bool {
        self.0.is_identity()
    }

    /// Parity of the tile -> position permutation.
    pub fn parity(&self) -> u8 {
        self.0.inverse().parity()
    }

    /// Whether sliding moves can bring this arrangement to the solved board.
    ///
    /// Every move is a transposition and shifts the empty cell by one step,
    /// so the permutation parity and the empty cell's distance from the
    /// bottom-right corner always change together.
    pub fn is_solvable(&self) -> bool {
        let distance = manhattan_distance(self.empty_position(), CELLS);
        (u32::from(self.parity()) + distance) % 2 == 0
    }

    /// Fails with [`PuzzleError::Unsolvable`] unless [`Self::is_solvable`].
    pub fn validate(&self) -> Result<(), PuzzleError> {
        if self.is_solvable() {
            Ok(())
        } else {
            Err(PuzzleError::Unsolvable)
        }
    }

    /// Carries out a move given as a transposition of positions.
    ///
    /// The move must only touch board positions.
    pub(crate) fn apply_move(&self, swap: &Permutation) -> Self {
        debug_assert!(swap.support().all(is_position));
        Self(self.0.compose(swap))
    }

    /// Tile in the direction of travel of the empty cell, if any.
    pub fn tile_towards(&self, direction: Direction) -> Option<i64> {
        direction
            .neighbor(self.empty_position())
            .map(|position| self.tile_at(position))
    }
}

/// Applies the full legality test to a raw permutation: every moved point
/// must be a board position, and the arrangement must be solvable.
pub fn is_solvable_permutation(permutation: &Permutation) -> bool {
    Arrangement::try_from(permutation.clone()).is_ok_and(|arrangement| arrangement.is_solvable())
}

impl TryFrom<Permutation> for Arrangement {
    type Error = PuzzleError;

    fn try_from(permutation: Permutation) -> Result<Self, Self::Error> {
        let stray = permutation.support().find(|&point| !is_position(point));
        match stray {
            Some(point) => Err(PuzzleError::OutOfRange(point)),
            None => Ok(Self(permutation)),
        }
    }
}

impl From<Arrangement> for Permutation {
    fn from(arrangement: Arrangement) -> Self {
        arrangement.0
    }
}

fn parse_token(index: usize, token: &str) -> Result<i64, PuzzleError> {
    if token == EMPTY_TOKEN {
        return Ok(EMPTY);
    }
    match token.parse::<i64>() {
        Ok(tile) if (1..EMPTY).contains(&tile) => Ok(tile),
        _ => Err(PuzzleError::InvalidToken {
            index,
            token: token.to_string(),
        }),
    }
}

impl FromStr for Arrangement {
    type Err = PuzzleError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.len() != CELLS as usize {
            return Err(PuzzleError::WrongTokenCount {
                expected: CELLS as usize,
                found: tokens.len(),
            });
        }

        let tiles = tokens
            .iter()
            .enumerate()
            .map(|(index, token)| parse_token(index, token))
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_tiles(&tiles)
    }
}

/// Four lines of four tokens, in the input format. The alternate form
/// (`{:#}`) right-aligns tokens to two columns.
impl fmt::Display for Arrangement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, tile) in self.tiles().enumerate() {
            let (row, column) = coordinates(index as i64 + 1);
            if column == 0 && row > 0 {
                f.write_str("\n")?;
            } else if column > 0 {
                f.write_str(" ")?;
            }

            let token = if tile == EMPTY {
                EMPTY_TOKEN.to_string()
            } else {
                tile.to_string()
            };
            if f.alternate() {
                write!(f, "{:>2}", token)?;
            } else {
                f.write_str(&token)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Arrangement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Arrangement({})", self.0)
    }
}
