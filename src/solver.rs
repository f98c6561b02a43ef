//! Best-first search for a solving move sequence.
//!
//! Every discovered arrangement gets a [`SearchNode`] in a table owned by a
//! single `solve` call. The default strategy repeatedly expands the
//! unexhausted node with the lowest score, records the shortest route seen
//! so far for each neighbor, and stops as soon as the solved board has been
//! discovered. Scores are estimates rather than distances from the start, so
//! the result is short but not guaranteed minimal; [`Strategy::Strict`] runs
//! A* with an admissible heuristic when a shortest solution is required.
//!
//! Key choices:
//! - Node table is an arena indexed through an `FxHashMap`
//! - A node's score never changes, so the frontier is a binary heap keyed by
//!   `(score, discovery index)`, which picks the first-found node on ties
//! - Routes are copied into each node, never shared

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;

use log::{debug, info, trace};
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::geometry::{manhattan_distance, Direction, CELLS, EMPTY};
use crate::grid::Arrangement;
use crate::moves;

/// Expansions between progress log lines.
const PROGRESS_INTERVAL: usize = 10_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    #[error("not a valid puzzle layout")]
    Unsolvable,
    #[error("gave up after expanding {0} arrangements")]
    BudgetExceeded(usize),
    #[error("search space exhausted without reaching the solved board")]
    Exhausted,
}

/// How the next arrangement to expand is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Lowest score first; stops once the solved board is discovered.
    #[default]
    BestFirst,
    /// A* over route length plus Manhattan distance of tiles 1-15; returns a
    /// shortest solution.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolverConfig {
    pub strategy: Strategy,
    /// Stop with [`SolveError::BudgetExceeded`] after this many expansions.
    pub max_expansions: Option<usize>,
}

/// Moves from the start, as directions of the empty cell and the tiles that
/// slid. Both lists have the same length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    pub directions: Vec<Direction>,
    pub tiles: Vec<i64>,
}

impl Route {
    fn extended(&self, direction: Direction, tile: i64) -> Route {
        let mut route = self.clone();
        route.directions.push(direction);
        route.tiles.push(tile);
        route
    }

    pub fn len(&self) -> usize {
        self.directions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }
}

/// Bookkeeping for one discovered arrangement.
#[derive(Debug, Clone)]
pub struct SearchNode {
    pub arrangement: Arrangement,
    pub score: u32,
    /// Shortest route from the start recorded so far.
    pub route: Route,
    /// Set once the neighbors have been expanded.
    pub exhausted: bool,
}

impl SearchNode {
    fn new(arrangement: Arrangement, route: Route) -> Self {
        Self {
            score: score(&arrangement),
            arrangement,
            route,
            exhausted: false,
        }
    }

    /// Arrangements one move away, with the direction and the moved tile.
    pub fn neighbors(&self) -> Vec<(Direction, Arrangement, i64)> {
        moves::neighbors(&self.arrangement)
    }
}

/// Sum over all sixteen tiles, the empty cell included, of the distance
/// from the tile to its solved position. Zero only for the solved board.
pub fn score(arrangement: &Arrangement) -> u32 {
    (1..=CELLS)
        .map(|tile| manhattan_distance(arrangement.position_of(tile), tile))
        .sum()
}

/// As [`score`] but ignoring the empty cell, which never overestimates the
/// number of moves left.
fn admissible_score(arrangement: &Arrangement) -> u32 {
    (1..EMPTY)
        .map(|tile| manhattan_distance(arrangement.position_of(tile), tile))
        .sum()
}

/// A solving move sequence and search statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub route: Route,
    /// Nodes expanded.
    pub expansions: usize,
    /// Arrangements discovered, including the start.
    pub discovered: usize,
}

impl Solution {
    pub fn len(&self) -> usize {
        self.route.len()
    }

    pub fn is_empty(&self) -> bool {
        self.route.is_empty()
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tiles: Vec<String> = self.route.tiles.iter().map(i64::to_string).collect();
        let slides: Vec<&str> = self.route.directions.iter().map(|d| d.name()).collect();
        writeln!(f, "Solution (sequence of tiles): {}", tiles.join(", "))?;
        write!(f, "Solution (sequence of slides): {}", slides.join(", "))
    }
}

/// Discovered arrangements. Nodes are never removed.
#[derive(Default)]
struct NodeTable {
    nodes: Vec<SearchNode>,
    index: FxHashMap<Arrangement, usize>,
}

impl NodeTable {
    fn insert(&mut self, node: SearchNode) -> usize {
        let id = self.nodes.len();
        self.index.insert(node.arrangement.clone(), id);
        self.nodes.push(node);
        id
    }

    fn find(&self, arrangement: &Arrangement) -> Option<usize> {
        self.index.get(arrangement).copied()
    }

    /// Offers `candidate` as a route to `arrangement`. Returns the id of a
    /// newly discovered node. A known node keeps its route unless the
    /// candidate is strictly shorter.
    fn record(&mut self, arrangement: Arrangement, candidate: Route) -> Option<usize> {
        match self.find(&arrangement) {
            Some(id) => {
                let node = &mut self.nodes[id];
                if candidate.len() < node.route.len() {
                    node.route = candidate;
                }
                None
            }
            None => Some(self.insert(SearchNode::new(arrangement, candidate))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Finds moves carrying `start` to the solved board.
    ///
    /// Unsolvable input is rejected before the search starts, since the
    /// solved board would never be discovered.
    pub fn solve(&self, start: &Arrangement) -> Result<Solution, SolveError> {
        if !start.is_solvable() {
            return Err(SolveError::Unsolvable);
        }
        debug!(
            "solving with {:?} from score {}: {:?}",
            self.config.strategy,
            score(start),
            start
        );

        let solution = match self.config.strategy {
            Strategy::BestFirst => self.best_first(start)?,
            Strategy::Strict => self.strict(start)?,
        };

        info!(
            "found {} moves after expanding {} of {} discovered arrangements",
            solution.len(),
            solution.expansions,
            solution.discovered
        );
        Ok(solution)
    }

    fn check_budget(&self, expansions: usize) -> Result<(), SolveError> {
        match self.config.max_expansions {
            Some(limit) if expansions >= limit => Err(SolveError::BudgetExceeded(expansions)),
            _ => Ok(()),
        }
    }

    fn best_first(&self, start: &Arrangement) -> Result<Solution, SolveError> {
        let goal = Arrangement::identity();
        let mut table = NodeTable::default();
        let mut frontier = BinaryHeap::new();

        let root = table.insert(SearchNode::new(start.clone(), Route::default()));
        frontier.push(Reverse((table.nodes[root].score, root)));
        let mut expansions = 0;

        // the loop ends on discovery of the goal, not on its expansion
        while table.find(&goal).is_none() {
            let Some(Reverse((_, selected))) = frontier.pop() else {
                return Err(SolveError::Exhausted);
            };
            self.check_budget(expansions)?;
            expansions += 1;
            if expansions % PROGRESS_INTERVAL == 0 {
                trace!(
                    "examined {} arrangements, {} discovered",
                    expansions,
                    table.nodes.len()
                );
            }

            let route = table.nodes[selected].route.clone();
            for (direction, neighbor, tile) in table.nodes[selected].neighbors() {
                let candidate = route.extended(direction, tile);
                if let Some(id) = table.record(neighbor, candidate) {
                    frontier.push(Reverse((table.nodes[id].score, id)));
                }
            }
            table.nodes[selected].exhausted = true;
        }

        let id = table.find(&goal).ok_or(SolveError::Exhausted)?;
        Ok(Self::finish(&table, id, expansions))
    }

    fn strict(&self, start: &Arrangement) -> Result<Solution, SolveError> {
        let mut table = NodeTable::default();
        let mut frontier = BinaryHeap::new();

        let root = table.insert(SearchNode::new(start.clone(), Route::default()));
        frontier.push(Reverse((admissible_score(start), 0, root)));
        let mut expansions = 0;

        while let Some(Reverse((_, cost, selected))) = frontier.pop() {
            let node = &table.nodes[selected];
            // stale entry for a node whose route has since been shortened
            if node.exhausted || cost > node.route.len() {
                continue;
            }
            if node.arrangement.is_solved() {
                return Ok(Self::finish(&table, selected, expansions));
            }
            self.check_budget(expansions)?;
            expansions += 1;
            if expansions % PROGRESS_INTERVAL == 0 {
                trace!(
                    "examined {} arrangements, {} discovered",
                    expansions,
                    table.nodes.len()
                );
            }

            let route = node.route.clone();
            for (direction, neighbor, tile) in node.neighbors() {
                let candidate = route.extended(direction, tile);
                let cost = candidate.len();
                let id = match table.find(&neighbor) {
                    Some(id) => {
                        let known = &mut table.nodes[id];
                        if known.exhausted || cost >= known.route.len() {
                            continue;
                        }
                        known.route = candidate;
                        id
                    }
                    None => table.insert(SearchNode::new(neighbor, candidate)),
                };
                let estimate = cost as u32 + admissible_score(&table.nodes[id].arrangement);
                frontier.push(Reverse((estimate, cost, id)));
            }
            table.nodes[selected].exhausted = true;
        }

        Err(SolveError::Exhausted)
    }

    fn finish(table: &NodeTable, goal: usize, expansions: usize) -> Solution {
        Solution {
            route: table.nodes[goal].route.clone(),
            expansions,
            discovered: table.nodes.len(),
        }
    }
}

/// Solves with the default best-first strategy and no budget.
pub fn solve(start: &Arrangement) -> Result<Solution, SolveError> {
    Solver::default().solve(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::{replay, scramble, slide};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn scrambled(directions: &[Direction]) -> Arrangement {
        replay(&Arrangement::identity(), directions).unwrap()
    }

    #[test]
    fn test_score_is_zero_only_when_solved() {
        assert_eq!(score(&Arrangement::identity()), 0);

        let (one_move, _) = slide(&Arrangement::identity(), Direction::Up).unwrap();
        assert_eq!(score(&one_move), 2);
        assert_eq!(admissible_score(&one_move), 1);

        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            let arrangement = scramble(&Arrangement::identity(), 20, &mut rng);
            assert_eq!(score(&arrangement) == 0, arrangement.is_solved());
        }
    }

    #[test_log::test]
    fn test_solved_board_needs_no_moves() {
        let solution = solve(&Arrangement::identity()).unwrap();
        assert!(solution.is_empty());
        assert!(solution.route.tiles.is_empty());
        assert_eq!(solution.expansions, 0);
        assert_eq!(solution.discovered, 1);

        let strict = Solver::new(SolverConfig {
            strategy: Strategy::Strict,
            ..SolverConfig::default()
        });
        assert!(strict.solve(&Arrangement::identity()).unwrap().is_empty());
    }

    #[test_log::test]
    fn test_three_slides_are_undone() {
        let start = scrambled(&[Direction::Up, Direction::Up, Direction::Left]);
        let solution = solve(&start).unwrap();

        assert_eq!(
            solution.route.directions,
            vec![Direction::Right, Direction::Down, Direction::Down]
        );
        assert_eq!(solution.route.tiles, vec![7, 8, 12]);
        assert!(replay(&start, &solution.route.directions).unwrap().is_solved());
    }

    #[test_log::test]
    fn test_unsolvable_board_is_rejected() {
        let reversed: Arrangement = "15 14 13 12 11 10 9 8 7 6 5 4 3 2 1 E".parse().unwrap();
        assert_eq!(solve(&reversed), Err(SolveError::Unsolvable));

        let strict = Solver::new(SolverConfig {
            strategy: Strategy::Strict,
            max_expansions: None,
        });
        assert_eq!(strict.solve(&reversed), Err(SolveError::Unsolvable));
    }

    #[test_log::test]
    fn test_budget_is_enforced() {
        let start = scramble(&Arrangement::identity(), 200, &mut StdRng::seed_from_u64(8));
        assert!(score(&start) > 10);
        for strategy in [Strategy::BestFirst, Strategy::Strict] {
            let solver = Solver::new(SolverConfig {
                strategy,
                max_expansions: Some(3),
            });
            assert_eq!(solver.solve(&start), Err(SolveError::BudgetExceeded(3)));
        }
    }

    #[test_log::test]
    fn test_strict_is_never_longer() {
        let mut rng = StdRng::seed_from_u64(21);
        let strict = Solver::new(SolverConfig {
            strategy: Strategy::Strict,
            max_expansions: None,
        });
        for num_moves in [4, 8, 12, 16] {
            let start = scramble(&Arrangement::identity(), num_moves, &mut rng);

            let greedy = solve(&start).unwrap();
            assert!(replay(&start, &greedy.route.directions).unwrap().is_solved());
            assert_eq!(greedy.route.directions.len(), greedy.route.tiles.len());

            let shortest = strict.solve(&start).unwrap();
            assert!(replay(&start, &shortest.route.directions).unwrap().is_solved());
            assert!(shortest.len() <= greedy.len());
            assert!(shortest.len() <= num_moves);
            assert_eq!(shortest.len() % 2, num_moves % 2);
        }
    }

    #[test]
    fn test_shorter_route_replaces_recorded_route() {
        let mut table = NodeTable::default();
        let start = Arrangement::identity();
        let (target, tile) = slide(&start, Direction::Up).unwrap();

        let detour = [Direction::Up, Direction::Left, Direction::Right]
            .into_iter()
            .fold(Route::default(), |route, direction| route.extended(direction, tile));
        let id = table.record(target.clone(), detour.clone()).unwrap();
        assert_eq!(table.nodes[id].route, detour);

        let direct = Route::default().extended(Direction::Up, tile);
        assert_eq!(table.record(target.clone(), direct.clone()), None);
        assert_eq!(table.nodes[id].route, direct, "shorter route not recorded");

        // equal or longer candidates leave the route alone
        let other = Route::default().extended(Direction::Left, 15);
        assert_eq!(table.record(target.clone(), other), None);
        assert_eq!(table.record(target.clone(), detour), None);
        assert_eq!(table.nodes[id].route, direct);
        assert_eq!(table.nodes.len(), 1);
        assert_eq!(table.find(&target), Some(id));
    }

    #[test]
    fn test_solution_display() {
        let start = scrambled(&[Direction::Up, Direction::Up, Direction::Left]);
        let solution = solve(&start).unwrap();
        insta::assert_snapshot!(solution.to_string(), @r"
        Solution (sequence of tiles): 7, 8, 12
        Solution (sequence of slides): right, down, down
        ");
    }
}
