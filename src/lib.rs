//! # Scramble Solver Library
//!
//! This library provides state models for two classic permutation puzzles,
//! the NxN sliding-tile puzzle and the NxNxN rotation cube, together with a
//! best-first search engine that solves either of them from an arbitrary
//! solvable configuration.
//!
//! It is used by two binaries:
//! - `tile_solver`: Generates or loads a sliding-tile grid, checks its
//!   solvability, and prints the move sequence that sorts it.
//! - `cube_solver`: Scrambles a cube with random quarter-turns and prints
//!   the twist sequence that restores it.
//!
//! The engine is generic over the [`state::PuzzleState`] trait, so each
//! puzzle gets its own monomorphised search loop. The tile heuristic
//! (Manhattan distance) never overestimates; the cube heuristic (misplaced
//! stickers) can, so cube solutions are valid but not necessarily shortest.
//!
//! ## Modules
//! - `state`: The `PuzzleState` trait every searchable puzzle implements
//!   (goal test, heuristic estimate, successor generation).
//! - `tile`: The sliding-tile grid (`TilePuzzle`), its moves, the inversion
//!   parity solvability check, and the random instance generator.
//! - `cube`: The cube (`Cube`), its faces, the twelve quarter-turn
//!   generators, and the scramble generator.
//! - `solver`: The `solve`/`solve_with_config` entry points, search budgets
//!   (`SolverConfig`), and the `Solution` and `SearchStats` result types.
//! - `report`: Renders a `Solution` as a human-readable move transcript.

use thiserror::Error;

pub mod cube;
pub mod report;
pub mod solver;
pub mod state;
pub mod tile;

/// Reasons a puzzle instance cannot be constructed or searched.
///
/// All variants are detected while building the instance; the search
/// engine itself only ever sees well-formed, solvable states.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InstanceError {
    /// Puzzle orders below 2 have no moves worth searching.
    #[error("puzzle order must be at least 2, got {0}")]
    OrderTooSmall(usize),

    /// The grid contents are malformed: wrong shape, duplicate values,
    /// out-of-range values, or unbalanced sticker counts.
    #[error("invalid puzzle instance: {0}")]
    InvalidInstance(String),

    /// The tile grid is a valid permutation but its inversion parity puts
    /// it in the unreachable half of the state space.
    #[error(
        "unsolvable grid: {inversions} inversions with the blank on row {blank_row_from_bottom} \
         (counted from the bottom)"
    )]
    Unsolvable {
        /// Out-of-order pairs in the flattened grid, blank excluded.
        inversions: usize,
        /// 1-based row of the blank, counting up from the bottom row.
        blank_row_from_bottom: usize,
    },
}
