//! Board coordinates and sliding directions.
//!
//! Positions are numbered 1..=16 in row-major order: position `p` sits at
//! row `(p - 1) / 4` and column `(p - 1) % 4`. In the solved board position
//! `p` holds tile `p`, with tile 16 standing for the empty cell.

use std::fmt;
use std::str::FromStr;

use crate::grid::PuzzleError;

/// Number of cells along each side of the board.
pub const SIDE: i64 = 4;

/// Number of cells on the board.
pub const CELLS: i64 = SIDE * SIDE;

/// Tile label of the empty cell. It is solved at the last position.
pub const EMPTY: i64 = CELLS;

/// Converts a position to `(row, column)`.
#[inline(always)]
pub const fn coordinates(position: i64) -> (i64, i64) {
    ((position - 1) / SIDE, (position - 1) % SIDE)
}

/// Converts `(row, column)` to a position.
#[inline(always)]
pub const fn position(row: i64, column: i64) -> i64 {
    row * SIDE + column + 1
}

#[inline(always)]
pub const fn is_position(value: i64) -> bool {
    1 <= value && value <= CELLS
}

/// Taxicab distance between two positions.
#[inline]
pub fn manhattan_distance(a: i64, b: i64) -> u32 {
    debug_assert!(is_position(a) && is_position(b), "{a} or {b} is off the board");
    let (a_row, a_column) = coordinates(a);
    let (b_row, b_column) = coordinates(b);
    (a_row.abs_diff(b_row) + a_column.abs_diff(b_column)) as u32
}

/// Direction in which the empty cell travels. The tile in that direction
/// slides the opposite way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Up,
    Down,
    Right,
    Left,
}

impl Direction {
    /// All directions, in the order moves are enumerated.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Right,
        Direction::Left,
    ];

    /// `(row, column)` step of the empty cell.
    pub const fn as_offset(self) -> (i64, i64) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Right => (0, 1),
            Direction::Left => (0, -1),
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Right => "right",
            Direction::Left => "left",
        }
    }

    /// Single-letter abbreviation, as typed at a prompt.
    pub const fn letter(self) -> char {
        match self {
            Direction::Up => 'u',
            Direction::Down => 'd',
            Direction::Right => 'r',
            Direction::Left => 'l',
        }
    }

    /// The position one step from `from`, or `None` past the edge.
    pub fn neighbor(self, from: i64) -> Option<i64> {
        let (row, column) = coordinates(from);
        let (row_step, column_step) = self.as_offset();
        let (row, column) = (row + row_step, column + column_step);

        if (0..SIDE).contains(&row) && (0..SIDE).contains(&column) {
            Some(position(row, column))
        } else {
            None
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts any word whose first letter names a direction, ignoring case:
/// `u`, `Up` and `UPWARDS` all parse as [`Direction::Up`].
impl FromStr for Direction {
    type Err = PuzzleError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let letter = text.trim().chars().next().map(|c| c.to_ascii_lowercase());
        Direction::ALL
            .into_iter()
            .find(|direction| Some(direction.letter()) == letter)
            .ok_or_else(|| PuzzleError::InvalidDirection(text.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_conversion_roundtrip() {
        for p in 1..=CELLS {
            let (row, column) = coordinates(p);
            assert!((0..SIDE).contains(&row) && (0..SIDE).contains(&column));
            assert_eq!(position(row, column), p, "Roundtrip failed for position {p}");
        }
    }

    #[test]
    fn test_manhattan_distance_to_corner() {
        assert_eq!(manhattan_distance(16, 16), 0);
        assert_eq!(manhattan_distance(1, 16), 6);
        assert_eq!(manhattan_distance(13, 16), 3);
        assert_eq!(manhattan_distance(7, 16), 3);
        assert_eq!(manhattan_distance(4, 13), 6);
        assert_eq!(manhattan_distance(6, 11), manhattan_distance(11, 6));
    }

    #[test]
    fn test_neighbors_stay_on_board() {
        assert_eq!(Direction::Up.neighbor(1), None);
        assert_eq!(Direction::Left.neighbor(1), None);
        assert_eq!(Direction::Down.neighbor(1), Some(5));
        assert_eq!(Direction::Right.neighbor(1), Some(2));

        assert_eq!(Direction::Right.neighbor(4), None);
        assert_eq!(Direction::Left.neighbor(5), None);
        assert_eq!(Direction::Down.neighbor(16), None);
        assert_eq!(Direction::Up.neighbor(16), Some(12));

        for p in 1..=CELLS {
            for direction in Direction::ALL {
                if let Some(q) = direction.neighbor(p) {
                    assert_eq!(manhattan_distance(p, q), 1);
                    assert_eq!(direction.opposite().neighbor(q), Some(p));
                }
            }
        }
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!("up".parse::<Direction>().unwrap(), Direction::Up);
        assert_eq!("D".parse::<Direction>().unwrap(), Direction::Down);
        assert_eq!(" Right ".parse::<Direction>().unwrap(), Direction::Right);
        assert_eq!("l".parse::<Direction>().unwrap(), Direction::Left);
        assert_eq!(
            "sideways".parse::<Direction>().unwrap_err(),
            PuzzleError::InvalidDirection("sideways".to_string())
        );
        assert!("".parse::<Direction>().is_err());
    }

    #[test]
    fn test_display_matches_name() {
        for direction in Direction::ALL {
            assert_eq!(direction.to_string(), direction.name());
            assert_eq!(direction.to_string().parse::<Direction>().unwrap(), direction);
        }
    }
}
