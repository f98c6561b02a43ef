//! Legal moves of the fifteen puzzle.
//!
//! A move swaps the empty cell with an orthogonally adjacent position. It is
//! represented as the transposition of those two positions, and carrying it
//! out composes the transposition onto the right of the arrangement.

use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};

use crate::geometry::Direction;
use crate::grid::{Arrangement, PuzzleError};
use crate::permutation::Permutation;

/// Number of random moves used by [`scramble_default`].
pub const DEFAULT_SCRAMBLE_MOVES: usize = 256;

/// Moves available from `arrangement`, keyed by the direction the empty cell
/// travels. Directions blocked by the edge of the board are absent.
pub fn legal_moves(arrangement: &Arrangement) -> Vec<(Direction, Permutation)> {
    let empty = arrangement.empty_position();
    Direction::ALL
        .into_iter()
        .filter_map(|direction| {
            direction
                .neighbor(empty)
                .map(|target| (direction, Permutation::transposition(empty, target)))
        })
        .collect()
}

/// Label of the tile that slides when the empty cell travels `direction`.
///
/// `None` means the move is blocked by the edge of the board.
pub fn tile_for_move(arrangement: &Arrangement, direction: Direction) -> Option<i64> {
    arrangement.tile_towards(direction)
}

/// Carries out one move, returning the new arrangement and the moved tile.
pub fn slide(arrangement: &Arrangement, direction: Direction) -> Option<(Arrangement, i64)> {
    let empty = arrangement.empty_position();
    let target = direction.neighbor(empty)?;
    let moved = arrangement.apply_move(&Permutation::transposition(empty, target));
    Some((moved, arrangement.tile_at(target)))
}

/// Every arrangement one move away, with the direction and moved tile.
pub fn neighbors(arrangement: &Arrangement) -> Vec<(Direction, Arrangement, i64)> {
    legal_moves(arrangement)
        .into_iter()
        .map(|(direction, swap)| {
            let tile = arrangement.tile_at(swap.apply(arrangement.empty_position()));
            (direction, arrangement.apply_move(&swap), tile)
        })
        .collect()
}

/// Applies `directions` in order.
pub fn replay(start: &Arrangement, directions: &[Direction]) -> Result<Arrangement, PuzzleError> {
    directions
        .iter()
        .try_fold(start.clone(), |current, &direction| {
            slide(&current, direction)
                .map(|(next, _)| next)
                .ok_or(PuzzleError::IllegalMove(direction))
        })
}

/// Applies `num_moves` uniformly random legal moves to `start`.
///
/// The result is reachable from `start`, so it is solvable whenever `start`
/// is.
pub fn scramble<R: Rng + ?Sized>(start: &Arrangement, num_moves: usize, rng: &mut R) -> Arrangement {
    let mut current = start.clone();
    for _ in 0..num_moves {
        let moves = legal_moves(&current);
        // every position has at least two neighbors
        if let Some((_, swap)) = moves.choose(rng) {
            current = current.apply_move(swap);
        }
    }
    current
}

/// A random solvable board: [`DEFAULT_SCRAMBLE_MOVES`] moves from solved.
pub fn scramble_default() -> Arrangement {
    scramble(&Arrangement::identity(), DEFAULT_SCRAMBLE_MOVES, &mut thread_rng())
}
