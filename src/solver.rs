//! Best-first search over puzzle states.
//!
//! The engine keeps an arena of search nodes, a binary min-heap frontier
//! ordered by `depth + heuristic`, and a hash set of expanded states. It
//! is generic over [`PuzzleState`], so each puzzle model gets its own
//! monomorphised search loop. With an admissible heuristic the first
//! solution found is a shortest one; with an overestimating heuristic the
//! search is still complete but the solution can be longer than optimal.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use log::{debug, info, trace, warn};
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::state::PuzzleState;

/// Handle into the search arena.
type NodeId = usize;

const ROOT: NodeId = 0;

/// One node of the search tree.
struct SearchNode<S: PuzzleState> {
    state: S,
    parent: Option<NodeId>,
    /// The move that produced this state; `None` only for the root.
    arriving_move: Option<S::Move>,
    depth: u32,
    /// `depth + heuristic`, computed once at creation.
    priority: u32,
    expanded: bool,
    children: Vec<NodeId>,
}

/// Arena-backed search tree. Nodes refer to each other by index, so the
/// whole tree is one flat `Vec` with no reference cycles to manage.
struct SearchTree<S: PuzzleState> {
    nodes: Vec<SearchNode<S>>,
}

impl<S: PuzzleState> SearchTree<S> {
    fn with_root(state: S) -> SearchTree<S> {
        let priority = state.heuristic();
        SearchTree {
            nodes: vec![SearchNode {
                state,
                parent: None,
                arriving_move: None,
                depth: 0,
                priority,
                expanded: false,
                children: Vec::new(),
            }],
        }
    }

    fn node(&self, id: NodeId) -> &SearchNode<S> {
        &self.nodes[id]
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Generates the children of `id`, once. A second call returns the
    /// already-built children without touching the arena.
    ///
    /// The successor that merely undoes the arriving move is dropped
    /// here; the visited set catches all longer cycles.
    fn expand(&mut self, id: NodeId) -> Vec<NodeId> {
        if self.nodes[id].expanded {
            return self.nodes[id].children.clone();
        }
        self.nodes[id].expanded = true;
        let depth = self.nodes[id].depth + 1;
        let grandparent_state = self.nodes[id].parent.map(|p| self.nodes[p].state.clone());
        let successors = self.nodes[id].state.successors();
        let mut children = Vec::with_capacity(successors.len());
        for (state, mv) in successors {
            if grandparent_state.as_ref() == Some(&state) {
                continue;
            }
            let priority = depth + state.heuristic();
            let child = self.nodes.len();
            self.nodes.push(SearchNode {
                state,
                parent: Some(id),
                arriving_move: Some(mv),
                depth,
                priority,
                expanded: false,
                children: Vec::new(),
            });
            children.push(child);
        }
        self.nodes[id].children = children.clone();
        children
    }

    /// Walks parent links from `id` back to the root and returns the
    /// root-first state path with the move labels between the states.
    fn path_to_root(&self, id: NodeId) -> (Vec<S>, Vec<S::Move>) {
        let mut states = Vec::new();
        let mut moves = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = &self.nodes[current];
            states.push(node.state.clone());
            if let Some(mv) = node.arriving_move {
                moves.push(mv);
            }
            cursor = node.parent;
        }
        states.reverse();
        moves.reverse();
        (states, moves)
    }
}

/// Frontier entry. `BinaryHeap` is a max-heap, so the ordering is
/// reversed to pop the lowest priority first; the insertion sequence
/// breaks ties first-in-first-out, which keeps searches deterministic.
#[derive(Debug)]
struct FrontierEntry {
    priority: u32,
    seq: u64,
    node: NodeId,
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

/// Resource limits for one search run. Both budgets default to
/// unbounded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SolverConfig {
    /// Maximum number of node expansions before giving up.
    pub max_expansions: Option<u64>,
    /// Maximum wall-clock time before giving up, checked once per
    /// iteration of the expansion loop.
    pub timeout: Option<Duration>,
}

/// Counters describing the work one search performed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes popped from the frontier and expanded.
    pub expanded: u64,
    /// Child nodes created across all expansions.
    pub generated: u64,
    /// Children discarded against the visited set, at push or pop time.
    pub duplicates: u64,
    /// Largest frontier size observed.
    pub frontier_peak: usize,
}

/// A solved search: the move sequence, the state path, and the work done.
#[derive(Clone, Debug)]
pub struct Solution<S: PuzzleState> {
    /// Moves from the initial state to the goal, in order.
    pub moves: Vec<S::Move>,
    /// States along the path, initial state first, goal last. Always one
    /// longer than `moves`.
    pub path: Vec<S>,
    /// Search counters.
    pub stats: SearchStats,
}

/// Why a search ended without a solution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The frontier ran dry, so no goal is reachable from the start
    /// state. Instances vetted by a solvability check never hit this.
    #[error("search space exhausted after {expanded} expansions without reaching a goal")]
    Exhausted { expanded: u64 },

    /// The expansion budget ran out.
    #[error("expansion budget of {limit} exceeded")]
    ExpansionBudgetExceeded { limit: u64 },

    /// The wall-clock budget ran out.
    #[error("time budget of {limit:?} exceeded after {expanded} expansions")]
    TimeBudgetExceeded { limit: Duration, expanded: u64 },
}

/// Lifecycle of one search run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchStatus {
    /// Constructed, not yet run.
    Initialized,
    /// Inside the expansion loop.
    Running,
    /// A goal state was reached.
    Solved,
    /// The frontier emptied without reaching a goal.
    Exhausted,
    /// A budget terminated the run early.
    OutOfBudget,
}

/// Best-first search from one start state.
///
/// A state is expanded at most once: the same state can be pushed onto
/// the frontier along different paths, but stale pops are skipped against
/// the visited set. Children are goal-checked as they are generated, so a
/// goal ends the search without waiting for its own expansion.
pub struct BestFirstSearch<S: PuzzleState> {
    tree: SearchTree<S>,
    frontier: BinaryHeap<FrontierEntry>,
    visited: FxHashSet<S>,
    stats: SearchStats,
    status: SearchStatus,
    next_seq: u64,
}

impl<S: PuzzleState> BestFirstSearch<S> {
    /// Prepares a search from `start`. No work happens until [`run`].
    ///
    /// [`run`]: BestFirstSearch::run
    pub fn new(start: S) -> BestFirstSearch<S> {
        BestFirstSearch {
            tree: SearchTree::with_root(start),
            frontier: BinaryHeap::new(),
            visited: FxHashSet::default(),
            stats: SearchStats::default(),
            status: SearchStatus::Initialized,
            next_seq: 0,
        }
    }

    /// Current lifecycle state.
    pub fn status(&self) -> SearchStatus {
        self.status
    }

    /// Counters accumulated so far.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Runs the search until a goal is generated, the frontier empties,
    /// or a budget trips.
    ///
    /// On a budget error the search state is kept intact, so calling
    /// `run` again with a larger budget resumes where the previous call
    /// stopped.
    pub fn run(&mut self, config: &SolverConfig) -> Result<Solution<S>, SearchError> {
        if self.status == SearchStatus::Initialized {
            if self.tree.node(ROOT).state.is_goal() {
                info!("start state is already the goal");
                self.status = SearchStatus::Solved;
                return Ok(self.solution(ROOT));
            }
            self.push(ROOT);
        }
        self.status = SearchStatus::Running;
        let started = Instant::now();

        loop {
            if let Some(limit) = config.max_expansions {
                if self.stats.expanded >= limit {
                    warn!("expansion budget of {} exhausted", limit);
                    self.status = SearchStatus::OutOfBudget;
                    return Err(SearchError::ExpansionBudgetExceeded { limit });
                }
            }
            if let Some(limit) = config.timeout {
                if started.elapsed() >= limit {
                    warn!(
                        "time budget of {:?} exhausted after {} expansions",
                        limit, self.stats.expanded
                    );
                    self.status = SearchStatus::OutOfBudget;
                    return Err(SearchError::TimeBudgetExceeded {
                        limit,
                        expanded: self.stats.expanded,
                    });
                }
            }

            let entry = match self.frontier.pop() {
                Some(entry) => entry,
                None => {
                    info!(
                        "frontier empty after {} expansions, no goal reachable",
                        self.stats.expanded
                    );
                    self.status = SearchStatus::Exhausted;
                    return Err(SearchError::Exhausted {
                        expanded: self.stats.expanded,
                    });
                }
            };

            if !self.visited.insert(self.tree.node(entry.node).state.clone()) {
                self.stats.duplicates += 1;
                continue;
            }

            self.stats.expanded += 1;
            trace!(
                "expanding node {} at depth {} with priority {}",
                entry.node,
                self.tree.node(entry.node).depth,
                entry.priority
            );
            if self.stats.expanded % 10_000 == 0 {
                debug!(
                    "{} expanded, frontier {}, visited {}",
                    self.stats.expanded,
                    self.frontier.len(),
                    self.visited.len()
                );
            }

            for child in self.tree.expand(entry.node) {
                self.stats.generated += 1;
                let child_state = &self.tree.node(child).state;
                if child_state.is_goal() {
                    info!(
                        "goal reached at depth {} after {} expansions",
                        self.tree.node(child).depth,
                        self.stats.expanded
                    );
                    self.status = SearchStatus::Solved;
                    return Ok(self.solution(child));
                }
                if self.visited.contains(child_state) {
                    self.stats.duplicates += 1;
                    continue;
                }
                self.push(child);
            }
        }
    }

    fn push(&mut self, id: NodeId) {
        let priority = self.tree.node(id).priority;
        self.frontier.push(FrontierEntry {
            priority,
            seq: self.next_seq,
            node: id,
        });
        self.next_seq += 1;
        self.stats.frontier_peak = self.stats.frontier_peak.max(self.frontier.len());
    }

    fn solution(&self, goal: NodeId) -> Solution<S> {
        let (path, moves) = self.tree.path_to_root(goal);
        Solution {
            moves,
            path,
            stats: self.stats,
        }
    }
}

/// Solves `start` with unbounded budgets.
///
/// # Examples
/// ```
/// use scramble_solver::solver::solve;
/// use scramble_solver::tile::TilePuzzle;
///
/// let start = TilePuzzle::from_rows(&[&[1, 2, 3], &[4, 5, 6], &[7, 9, 8]]).unwrap();
/// let solution = solve(&start).unwrap();
/// assert_eq!(solution.moves.len(), 1);
/// ```
pub fn solve<S: PuzzleState>(start: &S) -> Result<Solution<S>, SearchError> {
    solve_with_config(start, &SolverConfig::default())
}

/// Solves `start` under the given budgets.
pub fn solve_with_config<S: PuzzleState>(
    start: &S,
    config: &SolverConfig,
) -> Result<Solution<S>, SearchError> {
    BestFirstSearch::new(start.clone()).run(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::Cube;
    use crate::tile::{TileMove, TilePuzzle};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::fmt;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    struct Step(&'static str);

    impl fmt::Display for Step {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.0)
        }
    }

    /// Chain `0 -> 1 -> 2 -> 3` with no goal anywhere.
    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    struct DeadEnd(u8);

    impl PuzzleState for DeadEnd {
        type Move = Step;

        fn is_goal(&self) -> bool {
            false
        }

        fn heuristic(&self) -> u32 {
            u32::from(3u8.saturating_sub(self.0))
        }

        fn successors(&self) -> Vec<(Self, Step)> {
            if self.0 >= 3 {
                Vec::new()
            } else {
                vec![(DeadEnd(self.0 + 1), Step("on"))]
            }
        }
    }

    /// Two length-two paths that rejoin, then a tail to the goal. The
    /// rejoin exercises the duplicate bookkeeping.
    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    enum Diamond {
        A,
        B,
        C,
        D,
        E,
        G,
    }

    impl PuzzleState for Diamond {
        type Move = Step;

        fn is_goal(&self) -> bool {
            *self == Diamond::G
        }

        fn heuristic(&self) -> u32 {
            0
        }

        fn successors(&self) -> Vec<(Self, Step)> {
            match self {
                Diamond::A => vec![(Diamond::B, Step("ab")), (Diamond::C, Step("ac"))],
                Diamond::B => vec![(Diamond::D, Step("bd"))],
                Diamond::C => vec![(Diamond::D, Step("cd"))],
                Diamond::D => vec![(Diamond::E, Step("de"))],
                Diamond::E => vec![(Diamond::G, Step("eg"))],
                Diamond::G => Vec::new(),
            }
        }
    }

    fn assert_path_replays<S: PuzzleState>(solution: &Solution<S>) {
        assert_eq!(solution.path.len(), solution.moves.len() + 1);
        assert!(solution.path.last().map_or(false, |s| s.is_goal()));
    }

    #[test]
    fn test_root_already_goal() {
        let start = TilePuzzle::solved(3).unwrap();
        let solution = solve(&start).unwrap();
        assert!(solution.moves.is_empty());
        assert_eq!(solution.path, vec![start]);
        assert_eq!(solution.stats.expanded, 0);
    }

    #[test]
    fn test_solves_two_moves_from_goal() {
        let start = TilePuzzle::from_rows(&[&[1, 2, 3], &[4, 5, 6], &[9, 7, 8]]).unwrap();
        let solution = solve(&start).unwrap();
        assert_eq!(solution.moves, vec![TileMove::Right, TileMove::Right]);
        assert_path_replays(&solution);
    }

    #[test]
    fn test_solves_random_three_by_three() {
        let start = TilePuzzle::random(3, &mut SmallRng::seed_from_u64(42)).unwrap();
        let solution = solve(&start).unwrap();
        assert_eq!(solution.path[0], start);
        assert_path_replays(&solution);

        // Replaying the moves over the start grid reproduces every state
        // on the path.
        let mut grid = start;
        for (i, mv) in solution.moves.iter().enumerate() {
            grid = grid.apply(*mv).unwrap();
            assert_eq!(grid, solution.path[i + 1]);
        }
        assert!(grid.is_goal());
    }

    #[test]
    fn test_expansions_bounded_by_state_space() {
        // The 2x2 puzzle has 4!/2 = 12 reachable states; no state is
        // expanded twice, so the counter can never pass that.
        let start = TilePuzzle::from_rows(&[&[3, 1], &[2, 4]]).unwrap();
        let solution = solve(&start).unwrap();
        assert!(!solution.moves.is_empty());
        assert!(solution.stats.expanded <= 12);
        assert_path_replays(&solution);
    }

    #[test]
    fn test_solves_short_cube_scramble() {
        let (cube, scramble) = Cube::scramble(2, 2, &mut SmallRng::seed_from_u64(9)).unwrap();
        let solution = solve(&cube).unwrap();
        assert!(!solution.moves.is_empty());
        assert!(solution.moves.len() <= 2 * scramble.len());
        assert!(cube.apply_all(&solution.moves).is_goal());
        assert_path_replays(&solution);
    }

    #[test]
    fn test_deterministic_across_runs() {
        let start = TilePuzzle::random(3, &mut SmallRng::seed_from_u64(5)).unwrap();
        let first = solve(&start).unwrap();
        let second = solve(&start).unwrap();
        assert_eq!(first.moves, second.moves);
        assert_eq!(first.stats, second.stats);
    }

    #[test]
    fn test_exhausts_goal_free_space() {
        let result = solve(&DeadEnd(0));
        assert_eq!(result.unwrap_err(), SearchError::Exhausted { expanded: 4 });
    }

    #[test]
    fn test_expansion_budget() {
        let config = SolverConfig {
            max_expansions: Some(2),
            ..SolverConfig::default()
        };
        let result = solve_with_config(&DeadEnd(0), &config);
        assert_eq!(
            result.unwrap_err(),
            SearchError::ExpansionBudgetExceeded { limit: 2 }
        );

        // A zero budget fails before the first expansion.
        let mut search = BestFirstSearch::new(DeadEnd(0));
        let config = SolverConfig {
            max_expansions: Some(0),
            ..SolverConfig::default()
        };
        assert!(search.run(&config).is_err());
        assert_eq!(search.stats().expanded, 0);
        assert_eq!(search.status(), SearchStatus::OutOfBudget);
    }

    #[test]
    fn test_budget_run_can_resume() {
        let mut search = BestFirstSearch::new(Diamond::A);
        let tight = SolverConfig {
            max_expansions: Some(1),
            ..SolverConfig::default()
        };
        assert!(search.run(&tight).is_err());
        assert_eq!(search.status(), SearchStatus::OutOfBudget);

        let solution = search.run(&SolverConfig::default()).unwrap();
        assert_eq!(search.status(), SearchStatus::Solved);
        assert_eq!(solution.moves.len(), 4);
    }

    #[test]
    fn test_time_budget() {
        let config = SolverConfig {
            timeout: Some(Duration::ZERO),
            ..SolverConfig::default()
        };
        match solve_with_config(&DeadEnd(0), &config) {
            Err(SearchError::TimeBudgetExceeded { expanded, .. }) => assert_eq!(expanded, 0),
            other => panic!("expected TimeBudgetExceeded, got {:?}", other),
        }
    }

    #[test]
    fn test_diamond_duplicate_bookkeeping() {
        let mut search = BestFirstSearch::new(Diamond::A);
        let solution = search.run(&SolverConfig::default()).unwrap();
        assert_eq!(
            solution.moves,
            vec![Step("ab"), Step("bd"), Step("de"), Step("eg")]
        );
        // D is generated twice and expanded once; the stale frontier copy
        // is skipped on pop.
        assert_eq!(solution.stats.expanded, 5);
        assert_eq!(solution.stats.generated, 6);
        assert_eq!(solution.stats.duplicates, 1);
        assert_eq!(solution.stats.frontier_peak, 2);
    }

    #[test]
    fn test_status_lifecycle() {
        let search = BestFirstSearch::new(Diamond::A);
        assert_eq!(search.status(), SearchStatus::Initialized);

        let mut search = search;
        search.run(&SolverConfig::default()).unwrap();
        assert_eq!(search.status(), SearchStatus::Solved);

        let mut dead = BestFirstSearch::new(DeadEnd(0));
        assert!(dead.run(&SolverConfig::default()).is_err());
        assert_eq!(dead.status(), SearchStatus::Exhausted);
    }

    #[test]
    fn test_expansion_is_idempotent() {
        let start = TilePuzzle::solved(3)
            .unwrap()
            .apply(TileMove::Up)
            .unwrap();
        let mut tree = SearchTree::with_root(start);
        let first = tree.expand(ROOT);
        let len_after_first = tree.len();
        let second = tree.expand(ROOT);
        assert_eq!(first, second);
        assert_eq!(tree.len(), len_after_first);
    }

    #[test]
    fn test_expansion_drops_move_reversal() {
        let root_state = TilePuzzle::solved(3).unwrap();
        let mut tree = SearchTree::with_root(root_state.clone());
        let children = tree.expand(ROOT);
        // The root has no parent, so nothing is filtered there.
        assert_eq!(children.len(), 2);

        let child = children[0];
        let grandchildren = tree.expand(child);
        for id in grandchildren {
            assert_ne!(
                tree.node(id).state,
                root_state,
                "the move back to the root must be filtered"
            );
        }
    }

    #[test]
    fn test_frontier_pops_lowest_priority_fifo() {
        let mut heap = BinaryHeap::new();
        heap.push(FrontierEntry {
            priority: 2,
            seq: 0,
            node: 0,
        });
        heap.push(FrontierEntry {
            priority: 1,
            seq: 1,
            node: 1,
        });
        heap.push(FrontierEntry {
            priority: 1,
            seq: 2,
            node: 2,
        });
        let order: Vec<NodeId> = std::iter::from_fn(|| heap.pop().map(|e| e.node)).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }
}
