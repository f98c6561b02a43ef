//! Fifteen Puzzle Library
//!
//! Provides finite-support integer permutations, the 4x4 sliding-tile puzzle
//! built on them, and a best-first solver.
//!
//! A board is a [`Permutation`] from positions to tiles, so sliding a tile is
//! composition with a transposition and solvability follows from parity.

pub mod geometry;
pub mod grid;
pub mod moves;
pub mod permutation;
pub mod solver;

pub use geometry::Direction;
pub use grid::{Arrangement, PuzzleError};
pub use permutation::{Permutation, PermutationError};
pub use solver::{solve, Solution, SolveError, Solver, SolverConfig, Strategy};
