//! Renders solved searches as human-readable text.
//!
//! The full [`transcript`] walks the solution path state by state, the
//! way a person would replay it by hand; [`describe_moves`] gives just
//! the numbered move list and [`summary`] a one-line wrap-up with the
//! search counters.

use std::fmt::Display;

use crate::solver::Solution;
use crate::state::PuzzleState;

/// One numbered line per move, e.g. `Step 3: LEFT`.
pub fn describe_moves<S: PuzzleState>(solution: &Solution<S>) -> Vec<String> {
    solution
        .moves
        .iter()
        .enumerate()
        .map(|(i, mv)| format!("Step {}: {}", i + 1, mv))
        .collect()
}

/// The full solution walk: the initial state, every move with the state
/// it produces, and the closing summary line.
pub fn transcript<S>(solution: &Solution<S>) -> String
where
    S: PuzzleState + Display,
{
    let mut out = String::new();
    out.push_str("Initial state:\n");
    out.push_str(&solution.path[0].to_string());
    for (i, mv) in solution.moves.iter().enumerate() {
        out.push_str(&format!("\nStep {}: {}\n", i + 1, mv));
        out.push_str(&solution.path[i + 1].to_string());
    }
    out.push('\n');
    out.push_str(&summary(solution));
    out.push('\n');
    out
}

/// Single line with the move count and the search effort behind it.
pub fn summary<S: PuzzleState>(solution: &Solution<S>) -> String {
    let stats = &solution.stats;
    if solution.moves.is_empty() {
        return format!(
            "Already solved; {} nodes expanded, {} generated.",
            stats.expanded, stats.generated
        );
    }
    let noun = if solution.moves.len() == 1 {
        "move"
    } else {
        "moves"
    };
    format!(
        "Solved in {} {}; {} nodes expanded, {} generated, {} duplicates skipped, peak frontier {}.",
        solution.moves.len(),
        noun,
        stats.expanded,
        stats.generated,
        stats.duplicates,
        stats.frontier_peak
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::Cube;
    use crate::solver::solve;
    use crate::tile::TilePuzzle;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn two_move_solution() -> Solution<TilePuzzle> {
        let start = TilePuzzle::from_rows(&[&[1, 2, 3], &[4, 5, 6], &[9, 7, 8]]).unwrap();
        solve(&start).unwrap()
    }

    #[test]
    fn test_describe_moves_numbering() {
        let lines = describe_moves(&two_move_solution());
        assert_eq!(lines, vec!["Step 1: RIGHT", "Step 2: RIGHT"]);
    }

    #[test]
    fn test_describe_cube_moves() {
        let (cube, scramble) = Cube::scramble(2, 1, &mut SmallRng::seed_from_u64(4)).unwrap();
        let solution = solve(&cube).unwrap();
        let lines = describe_moves(&solution);
        assert_eq!(lines, vec![format!("Step 1: {}", scramble[0].inverse())]);
    }

    #[test]
    fn test_transcript_walks_every_state() {
        let solution = two_move_solution();
        let text = transcript(&solution);
        assert!(text.starts_with("Initial state:\n"));
        assert_eq!(text.matches("Step ").count(), 2);
        // Each state box appears once per path entry.
        let boxes = text.matches("+-----").count();
        assert_eq!(boxes, solution.path.len() * 2);
        assert!(text.trim_end().ends_with('.'));
    }

    #[test]
    fn test_summary_counts_moves() {
        let text = summary(&two_move_solution());
        assert!(text.starts_with("Solved in 2 moves;"));
        assert!(text.contains("nodes expanded"));
    }

    #[test]
    fn test_summary_for_already_solved() {
        let solution = solve(&TilePuzzle::solved(3).unwrap()).unwrap();
        let text = summary(&solution);
        assert!(text.starts_with("Already solved;"));
    }
}
