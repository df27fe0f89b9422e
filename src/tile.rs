//! Sliding-tile puzzle state model.
//!
//! The board is a square grid of order `N` holding the values `1..=N*N` in
//! row-major order; the largest value stands for the blank. A move slides a
//! neighbouring tile into the blank and is named after the direction the
//! blank travels. Solvability is decided up front from the inversion parity
//! of the grid, so the search engine only ever receives solvable instances.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::state::PuzzleState;
use crate::InstanceError;

/// A direction the blank can travel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileMove {
    Up,
    Down,
    Left,
    Right,
}

impl TileMove {
    /// All four directions, in the order successors are generated.
    pub const ALL: [TileMove; 4] = [
        TileMove::Up,
        TileMove::Down,
        TileMove::Left,
        TileMove::Right,
    ];

    /// The move that undoes this one.
    pub fn inverse(&self) -> TileMove {
        match self {
            TileMove::Up => TileMove::Down,
            TileMove::Down => TileMove::Up,
            TileMove::Left => TileMove::Right,
            TileMove::Right => TileMove::Left,
        }
    }

    /// Row and column offset the blank moves by.
    fn offset(&self) -> (isize, isize) {
        match self {
            TileMove::Up => (-1, 0),
            TileMove::Down => (1, 0),
            TileMove::Left => (0, -1),
            TileMove::Right => (0, 1),
        }
    }
}

impl fmt::Display for TileMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TileMove::Up => "UP",
            TileMove::Down => "DOWN",
            TileMove::Left => "LEFT",
            TileMove::Right => "RIGHT",
        };
        write!(f, "{}", name)
    }
}

/// An order-`N` sliding-tile grid.
///
/// Cells hold each value in `1..=N*N` exactly once, row-major; the value
/// `N*N` is the blank. In the goal configuration cell `(i, j)` holds
/// `N*i + j + 1`, which places the blank in the bottom-right corner.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TilePuzzle {
    order: usize,
    cells: Vec<u16>,
    /// Row-major index of the blank cell, kept in step with `cells`.
    blank: usize,
}

impl TilePuzzle {
    /// Smallest supported grid order.
    pub const MIN_ORDER: usize = 2;
    /// Largest supported grid order; cell values must fit in a `u16`.
    pub const MAX_ORDER: usize = 255;

    /// Creates the goal grid of the given order.
    ///
    /// # Examples
    /// ```
    /// use scramble_solver::state::PuzzleState;
    /// use scramble_solver::tile::TilePuzzle;
    ///
    /// let puzzle = TilePuzzle::solved(3).unwrap();
    /// assert!(puzzle.is_goal());
    /// assert_eq!(puzzle.blank_position(), (2, 2));
    /// ```
    pub fn solved(order: usize) -> Result<TilePuzzle, InstanceError> {
        check_order(order)?;
        let count = order * order;
        let cells = (1..=count as u16).collect();
        Ok(TilePuzzle {
            order,
            cells,
            blank: count - 1,
        })
    }

    /// Builds a grid from explicit rows.
    ///
    /// The input must be square with order at least 2 and must contain
    /// every value in `1..=N*N` exactly once. No solvability check is
    /// performed here; call [`TilePuzzle::check_solvable`] before handing
    /// the grid to the search engine.
    ///
    /// # Arguments
    /// * `rows`: One slice per grid row, top to bottom.
    ///
    /// # Examples
    /// ```
    /// use scramble_solver::tile::TilePuzzle;
    ///
    /// let puzzle = TilePuzzle::from_rows(&[&[1, 2, 3], &[4, 5, 6], &[7, 9, 8]]).unwrap();
    /// assert_eq!(puzzle.blank_position(), (2, 1));
    ///
    /// let ragged = TilePuzzle::from_rows(&[&[1, 2], &[3]]);
    /// assert!(ragged.is_err());
    /// ```
    pub fn from_rows(rows: &[&[u16]]) -> Result<TilePuzzle, InstanceError> {
        let order = rows.len();
        check_order(order)?;
        let mut cells = Vec::with_capacity(order * order);
        for (r, row) in rows.iter().enumerate() {
            if row.len() != order {
                return Err(InstanceError::InvalidInstance(format!(
                    "row {} has {} cells, expected {} (the grid must be square)",
                    r,
                    row.len(),
                    order
                )));
            }
            cells.extend_from_slice(row);
        }
        let blank = validate_cells(order, &cells)?;
        Ok(TilePuzzle {
            order,
            cells,
            blank,
        })
    }

    /// Parses a grid from text: one row per line, cell values separated by
    /// whitespace, blank lines skipped.
    pub fn parse(text: &str) -> Result<TilePuzzle, InstanceError> {
        let mut rows: Vec<Vec<u16>> = Vec::new();
        for (i, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let mut row = Vec::new();
            for token in line.split_whitespace() {
                let value = token.parse::<u16>().map_err(|_| {
                    InstanceError::InvalidInstance(format!(
                        "line {}: '{}' is not a cell value",
                        i + 1,
                        token
                    ))
                })?;
                row.push(value);
            }
            rows.push(row);
        }
        let borrowed: Vec<&[u16]> = rows.iter().map(|r| r.as_slice()).collect();
        TilePuzzle::from_rows(&borrowed)
    }

    /// Generates a random solvable grid of the given order.
    ///
    /// Shuffles the cell values and resamples until the parity check
    /// passes; exactly half of all permutations are solvable, so this
    /// terminates after two attempts on average. The same seed always
    /// produces the same grid.
    ///
    /// # Examples
    /// ```
    /// use rand::rngs::SmallRng;
    /// use rand::SeedableRng;
    /// use scramble_solver::tile::TilePuzzle;
    ///
    /// let mut rng = SmallRng::seed_from_u64(42);
    /// let puzzle = TilePuzzle::random(3, &mut rng).unwrap();
    /// assert!(puzzle.check_solvable().is_ok());
    /// ```
    pub fn random(order: usize, rng: &mut impl Rng) -> Result<TilePuzzle, InstanceError> {
        check_order(order)?;
        let blank_value = (order * order) as u16;
        let mut cells: Vec<u16> = (1..=blank_value).collect();
        loop {
            cells.shuffle(rng);
            let blank = match cells.iter().position(|&v| v == blank_value) {
                Some(i) => i,
                None => unreachable!("shuffling preserves the blank value"),
            };
            let candidate = TilePuzzle {
                order,
                cells: cells.clone(),
                blank,
            };
            if candidate.check_solvable().is_ok() {
                return Ok(candidate);
            }
        }
    }

    /// Grid order `N`.
    pub fn order(&self) -> usize {
        self.order
    }

    /// The value standing for the blank, `N * N`.
    pub fn blank_value(&self) -> u16 {
        (self.order * self.order) as u16
    }

    /// Value held by cell `(r, c)`.
    ///
    /// # Panics
    /// Panics if `r` or `c` are outside the grid.
    pub fn value_at(&self, r: usize, c: usize) -> u16 {
        assert!(
            r < self.order && c < self.order,
            "cell ({}, {}) outside an order-{} grid",
            r,
            c,
            self.order
        );
        self.cells[r * self.order + c]
    }

    /// Position `(row, col)` of the blank.
    pub fn blank_position(&self) -> (usize, usize) {
        (self.blank / self.order, self.blank % self.order)
    }

    /// Applies a single move, returning the resulting grid.
    ///
    /// Returns `None` when the blank sits on the edge the move points
    /// past. The original grid is left untouched.
    pub fn apply(&self, mv: TileMove) -> Option<TilePuzzle> {
        let (r, c) = self.blank_position();
        let (dr, dc) = mv.offset();
        let nr = r.checked_add_signed(dr)?;
        let nc = c.checked_add_signed(dc)?;
        if nr >= self.order || nc >= self.order {
            return None;
        }
        let target = nr * self.order + nc;
        let mut next = self.clone();
        next.cells.swap(self.blank, target);
        next.blank = target;
        Some(next)
    }

    /// Number of out-of-order pairs in the flattened grid, blank excluded.
    pub fn inversions(&self) -> usize {
        let blank = self.blank_value();
        let tiles: Vec<u16> = self
            .cells
            .iter()
            .copied()
            .filter(|&v| v != blank)
            .collect();
        let mut count = 0;
        for i in 0..tiles.len() {
            for j in (i + 1)..tiles.len() {
                if tiles[i] > tiles[j] {
                    count += 1;
                }
            }
        }
        count
    }

    /// Decides solvability from inversion parity.
    ///
    /// Exactly half of all permutations can reach the goal. For odd orders
    /// the grid is solvable when the inversion count is even. For even
    /// orders the blank row matters: counting rows 1-based from the
    /// bottom, a blank on an even row requires an odd inversion count and
    /// a blank on an odd row requires an even one.
    ///
    /// # Examples
    /// ```
    /// use scramble_solver::tile::TilePuzzle;
    ///
    /// let solvable = TilePuzzle::from_rows(&[&[1, 9, 3], &[4, 5, 6], &[7, 8, 2]]).unwrap();
    /// assert!(solvable.check_solvable().is_ok());
    ///
    /// // Swapping one adjacent pair flips the parity.
    /// let unsolvable = TilePuzzle::from_rows(&[&[2, 1, 3], &[4, 5, 6], &[7, 8, 9]]).unwrap();
    /// assert!(unsolvable.check_solvable().is_err());
    /// ```
    pub fn check_solvable(&self) -> Result<(), InstanceError> {
        let inversions = self.inversions();
        let blank_row_from_bottom = self.order - self.blank / self.order;
        let solvable = if self.order % 2 == 1 {
            inversions % 2 == 0
        } else if blank_row_from_bottom % 2 == 0 {
            inversions % 2 == 1
        } else {
            inversions % 2 == 0
        };
        if solvable {
            Ok(())
        } else {
            Err(InstanceError::Unsolvable {
                inversions,
                blank_row_from_bottom,
            })
        }
    }
}

impl PuzzleState for TilePuzzle {
    type Move = TileMove;

    fn is_goal(&self) -> bool {
        self.cells
            .iter()
            .enumerate()
            .all(|(i, &v)| v as usize == i + 1)
    }

    fn heuristic(&self) -> u32 {
        let blank = self.blank_value();
        let mut total = 0u32;
        for (i, &value) in self.cells.iter().enumerate() {
            if value == blank {
                continue;
            }
            let home = (value - 1) as usize;
            let dr = (i / self.order).abs_diff(home / self.order);
            let dc = (i % self.order).abs_diff(home % self.order);
            total += (dr + dc) as u32;
        }
        total
    }

    fn successors(&self) -> Vec<(Self, TileMove)> {
        let mut next = Vec::with_capacity(4);
        for mv in TileMove::ALL {
            if let Some(state) = self.apply(mv) {
                next.push((state, mv));
            }
        }
        next
    }
}

impl fmt::Display for TilePuzzle {
    /// Renders the grid as an ASCII box, the blank as an empty cell.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(9 * self.order - 1);
        writeln!(f, "+{}+", rule)?;
        for r in 0..self.order {
            for c in 0..self.order {
                let value = self.value_at(r, c);
                if value == self.blank_value() {
                    write!(f, "|  {:^4}  ", "")?;
                } else {
                    write!(f, "|  {:^4}  ", value)?;
                }
            }
            writeln!(f, "|")?;
            if r != self.order - 1 {
                writeln!(f, "|{}|", rule)?;
            }
        }
        writeln!(f, "+{}+", rule)
    }
}

fn check_order(order: usize) -> Result<(), InstanceError> {
    if order < TilePuzzle::MIN_ORDER {
        return Err(InstanceError::OrderTooSmall(order));
    }
    if order > TilePuzzle::MAX_ORDER {
        return Err(InstanceError::InvalidInstance(format!(
            "order {} exceeds the supported maximum of {}",
            order,
            TilePuzzle::MAX_ORDER
        )));
    }
    Ok(())
}

/// Checks that `cells` is a permutation of `1..=order*order` and returns
/// the index of the blank.
fn validate_cells(order: usize, cells: &[u16]) -> Result<usize, InstanceError> {
    let count = order * order;
    let mut seen = vec![false; count];
    let mut blank = 0;
    for (i, &value) in cells.iter().enumerate() {
        let v = value as usize;
        if v < 1 || v > count {
            return Err(InstanceError::InvalidInstance(format!(
                "cell value {} is outside 1..={}",
                value, count
            )));
        }
        if seen[v - 1] {
            return Err(InstanceError::InvalidInstance(format!(
                "cell value {} appears more than once",
                value
            )));
        }
        seen[v - 1] = true;
        if v == count {
            blank = i;
        }
    }
    Ok(blank)
}
