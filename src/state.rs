//! State-space abstraction shared by every puzzle model.
//!
//! A puzzle plugs into the search engine by implementing [`PuzzleState`]:
//! a goal test, a heuristic estimate, and successor generation. The engine
//! is generic over this trait, so each puzzle gets a monomorphised search
//! loop with no dynamic dispatch on the hot path.

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Capabilities a puzzle state must provide to be searchable.
///
/// States are immutable values: applying a move produces a fresh state and
/// leaves the original untouched. `Eq` and `Hash` must cover the entire
/// configuration, so that two states reached along different move sequences
/// compare equal exactly when they are the same configuration. The engine's
/// duplicate detection relies on this.
pub trait PuzzleState: Clone + Eq + Hash {
    /// Label of a single move, e.g. a blank direction or a face twist.
    type Move: Copy + Eq + Debug + Display;

    /// Returns `true` if this state is the goal configuration.
    fn is_goal(&self) -> bool;

    /// Estimated number of moves remaining to reach the goal.
    ///
    /// Must be zero exactly at the goal. The estimate does not have to be
    /// admissible; an overestimate costs solution optimality, not search
    /// completeness.
    fn heuristic(&self) -> u32;

    /// Every state reachable in one move, paired with the move that
    /// reaches it. The order is fixed per puzzle, which keeps searches
    /// deterministic.
    fn successors(&self) -> Vec<(Self, Self::Move)>;
}
