use fifteen::moves::{replay, scramble, tile_for_move};
use fifteen::{solve, Arrangement, Direction, PuzzleError, SolveError};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

const REVERSED_BOARD: &str = "15 14 13 12\n11 10 9 8\n7 6 5 4\n3 2 1 E";
const SCRAMBLED_BOARD: &str = "12 1 2 15\n11 6 5 8\n7 10 9 4\nE 13 14 3";
const SOLVED_BOARD: &str = "1 2 3 4\n5 6 7 8\n9 10 11 12\n13 14 15 E";

/// Replays a solution one slide at a time, checking that each recorded tile
/// is the one that actually moves.
fn check_solution(start: &Arrangement, directions: &[Direction], tiles: &[i64]) -> Arrangement {
    assert_eq!(directions.len(), tiles.len());
    let mut current = start.clone();
    for (&direction, &tile) in directions.iter().zip(tiles) {
        assert_eq!(tile_for_move(&current, direction), Some(tile));
        current = replay(&current, &[direction]).unwrap();
    }
    current
}

#[test_log::test]
fn test_reversed_board_is_rejected_before_search() {
    let arrangement: Arrangement = REVERSED_BOARD.parse().unwrap();
    assert!(!arrangement.is_solvable());
    assert_eq!(arrangement.validate(), Err(PuzzleError::Unsolvable));
    assert_eq!(solve(&arrangement), Err(SolveError::Unsolvable));
}

#[test_log::test]
fn test_scrambled_board_end_to_end() {
    let arrangement: Arrangement = SCRAMBLED_BOARD.parse().unwrap();
    assert!(arrangement.is_solvable());

    let solution = solve(&arrangement).unwrap();
    info!(
        "{} moves, {} expansions, {} discovered",
        solution.len(),
        solution.expansions,
        solution.discovered
    );

    let end = check_solution(&arrangement, &solution.route.directions, &solution.route.tiles);
    assert!(end.is_solved());
    assert_eq!(end.to_string(), SOLVED_BOARD);
}

#[test_log::test]
fn test_random_scrambles_are_solved() {
    let mut rng = StdRng::seed_from_u64(2023);
    for _ in 0..5 {
        let start = scramble(&Arrangement::identity(), 40, &mut rng);
        let solution = solve(&start).unwrap();
        let end = check_solution(&start, &solution.route.directions, &solution.route.tiles);
        assert!(end.is_solved(), "solution failed for\n{}", start);
    }
}

#[test_log::test]
fn test_board_text_roundtrip() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..20 {
        let arrangement = scramble(&Arrangement::identity(), 100, &mut rng);
        let text = arrangement.to_string();
        assert_eq!(text.lines().count(), 4);
        assert_eq!(text.parse::<Arrangement>().unwrap(), arrangement);
    }
}
