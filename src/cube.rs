//! Rotation cube state model.
//!
//! A cube of order `N` is six `NxN` sticker grids on the standard cross
//! unfold: TOP above FRONT, BOTTOM below it, LEFT and RIGHT beside it,
//! BACK behind. Indexing convention: every side face has row 0 at its top
//! edge; the TOP face's last row borders the FRONT while the BOTTOM's row
//! 0 does; the BACK's column 0 sits on the same vertical slice as the
//! FRONT's last column.
//!
//! The twelve generators are clockwise and counterclockwise quarter-turns
//! of each face. A turn rotates the face's own grid by 90 degrees and
//! cycles the adjacent edge strip across the four neighbouring faces.
//! Some strip transfers must reverse their element order to keep the
//! stickers geometrically contiguous; each cycle helper documents which.

use std::fmt;

use rand::Rng;

use crate::state::PuzzleState;
use crate::InstanceError;

/// Identifies one of the six faces. Doubles as a sticker colour: in the
/// solved cube every face is covered in its own identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaceId {
    Top,
    Bottom,
    Left,
    Right,
    Front,
    Back,
}

impl FaceId {
    /// All six faces in index order.
    pub const ALL: [FaceId; 6] = [
        FaceId::Top,
        FaceId::Bottom,
        FaceId::Left,
        FaceId::Right,
        FaceId::Front,
        FaceId::Back,
    ];

    /// Stable index of the face, `0..=5`.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Single-letter code used in the text rendering.
    ///
    /// # Examples
    /// ```
    /// use scramble_solver::cube::FaceId;
    /// assert_eq!(FaceId::Top.to_char(), 'T');
    /// assert_eq!(FaceId::Back.to_char(), 'K');
    /// ```
    pub fn to_char(&self) -> char {
        match self {
            FaceId::Top => 'T',
            FaceId::Bottom => 'B',
            FaceId::Left => 'L',
            FaceId::Right => 'R',
            FaceId::Front => 'F',
            FaceId::Back => 'K',
        }
    }
}

impl fmt::Display for FaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FaceId::Top => "TOP",
            FaceId::Bottom => "BOTTOM",
            FaceId::Left => "LEFT",
            FaceId::Right => "RIGHT",
            FaceId::Front => "FRONT",
            FaceId::Back => "BACK",
        };
        write!(f, "{}", name)
    }
}

/// Direction of a quarter-turn, viewed from outside the turned face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Twist {
    Clockwise,
    Counterclockwise,
}

impl Twist {
    /// The opposite twist direction.
    pub fn inverse(&self) -> Twist {
        match self {
            Twist::Clockwise => Twist::Counterclockwise,
            Twist::Counterclockwise => Twist::Clockwise,
        }
    }
}

impl fmt::Display for Twist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Twist::Clockwise => "clockwise",
            Twist::Counterclockwise => "counterclockwise",
        };
        write!(f, "{}", name)
    }
}

/// A single quarter-turn of one face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CubeMove {
    pub face: FaceId,
    pub twist: Twist,
}

impl CubeMove {
    /// The twelve generators, both twists per face, in the order
    /// successors are generated.
    pub const ALL: [CubeMove; 12] = [
        CubeMove::new(FaceId::Right, Twist::Clockwise),
        CubeMove::new(FaceId::Right, Twist::Counterclockwise),
        CubeMove::new(FaceId::Left, Twist::Clockwise),
        CubeMove::new(FaceId::Left, Twist::Counterclockwise),
        CubeMove::new(FaceId::Top, Twist::Clockwise),
        CubeMove::new(FaceId::Top, Twist::Counterclockwise),
        CubeMove::new(FaceId::Bottom, Twist::Clockwise),
        CubeMove::new(FaceId::Bottom, Twist::Counterclockwise),
        CubeMove::new(FaceId::Front, Twist::Clockwise),
        CubeMove::new(FaceId::Front, Twist::Counterclockwise),
        CubeMove::new(FaceId::Back, Twist::Clockwise),
        CubeMove::new(FaceId::Back, Twist::Counterclockwise),
    ];

    pub const fn new(face: FaceId, twist: Twist) -> CubeMove {
        CubeMove { face, twist }
    }

    /// The quarter-turn that undoes this one.
    pub fn inverse(&self) -> CubeMove {
        CubeMove::new(self.face, self.twist.inverse())
    }
}

impl fmt::Display for CubeMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.face, self.twist)
    }
}

/// One face of the cube: its home identity and an order-`N` sticker grid
/// in row-major order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Face {
    home: FaceId,
    order: usize,
    stickers: Vec<FaceId>,
}

impl Face {
    fn solid(home: FaceId, order: usize) -> Face {
        Face {
            home,
            order,
            stickers: vec![home; order * order],
        }
    }

    /// The face's position on the cube, which is also its solved colour.
    pub fn home(&self) -> FaceId {
        self.home
    }

    /// Colour of the sticker at `(r, c)`.
    ///
    /// # Panics
    /// Panics if `r` or `c` are outside the face.
    pub fn sticker(&self, r: usize, c: usize) -> FaceId {
        assert!(
            r < self.order && c < self.order,
            "sticker ({}, {}) outside an order-{} face",
            r,
            c,
            self.order
        );
        self.stickers[r * self.order + c]
    }

    /// Number of stickers not matching the home colour.
    pub fn mismatches(&self) -> usize {
        self.stickers.iter().filter(|&&s| s != self.home).count()
    }

    /// True when every sticker matches the home colour.
    pub fn is_solved(&self) -> bool {
        self.mismatches() == 0
    }

    fn set_sticker(&mut self, r: usize, c: usize, colour: FaceId) {
        self.stickers[r * self.order + c] = colour;
    }

    fn row(&self, r: usize) -> Vec<FaceId> {
        self.stickers[r * self.order..(r + 1) * self.order].to_vec()
    }

    fn set_row(&mut self, r: usize, values: &[FaceId]) {
        self.stickers[r * self.order..(r + 1) * self.order].copy_from_slice(values);
    }

    fn column(&self, c: usize) -> Vec<FaceId> {
        (0..self.order).map(|r| self.sticker(r, c)).collect()
    }

    fn set_column(&mut self, c: usize, values: &[FaceId]) {
        for (r, &v) in values.iter().enumerate() {
            self.set_sticker(r, c, v);
        }
    }

    /// Rotates the sticker grid 90 degrees clockwise in place.
    fn rotate_clockwise(&mut self) {
        let n = self.order;
        let old = self.stickers.clone();
        for r in 0..n {
            for c in 0..n {
                self.stickers[r * n + c] = old[(n - 1 - c) * n + r];
            }
        }
    }

    /// Rotates the sticker grid 90 degrees counterclockwise in place.
    fn rotate_counterclockwise(&mut self) {
        let n = self.order;
        let old = self.stickers.clone();
        for r in 0..n {
            for c in 0..n {
                self.stickers[r * n + c] = old[c * n + (n - 1 - r)];
            }
        }
    }
}

/// The full cube: six faces indexed by [`FaceId`].
///
/// The goal configuration is the one where every face is uniformly
/// covered in its home colour. For even orders a scramble can end up in a
/// reoriented copy of that configuration, which does not count as solved;
/// the search works with stickers, not with the physical cube.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cube {
    order: usize,
    faces: [Face; 6],
}

impl Cube {
    /// Smallest supported cube order.
    pub const MIN_ORDER: usize = 2;

    /// Creates the solved cube of the given order.
    ///
    /// # Examples
    /// ```
    /// use scramble_solver::state::PuzzleState;
    /// use scramble_solver::cube::Cube;
    ///
    /// let cube = Cube::solved(2).unwrap();
    /// assert!(cube.is_goal());
    /// assert_eq!(cube.sticker_counts(), [4; 6]);
    /// ```
    pub fn solved(order: usize) -> Result<Cube, InstanceError> {
        if order < Cube::MIN_ORDER {
            return Err(InstanceError::OrderTooSmall(order));
        }
        let faces = FaceId::ALL.map(|home| Face::solid(home, order));
        Ok(Cube { order, faces })
    }

    /// Builds a cube from six explicit sticker grids, ordered like
    /// [`FaceId::ALL`].
    ///
    /// Validates that every grid is square with one shared order and that
    /// each colour appears exactly `N * N` times. Balanced sticker counts
    /// are necessary but not sufficient for reachability, so a grid
    /// assembled by hand may still never reach the goal.
    pub fn from_grids(grids: [Vec<Vec<FaceId>>; 6]) -> Result<Cube, InstanceError> {
        let order = grids[0].len();
        if order < Cube::MIN_ORDER {
            return Err(InstanceError::OrderTooSmall(order));
        }
        for (home, grid) in FaceId::ALL.iter().zip(grids.iter()) {
            if grid.len() != order {
                return Err(InstanceError::InvalidInstance(format!(
                    "face {} has {} rows, expected {}",
                    home,
                    grid.len(),
                    order
                )));
            }
            for (r, row) in grid.iter().enumerate() {
                if row.len() != order {
                    return Err(InstanceError::InvalidInstance(format!(
                        "face {} row {} has {} stickers, expected {}",
                        home,
                        r,
                        row.len(),
                        order
                    )));
                }
            }
        }
        let faces = std::array::from_fn(|i| Face {
            home: FaceId::ALL[i],
            order,
            stickers: grids[i].iter().flatten().copied().collect(),
        });
        let cube = Cube { order, faces };
        let counts = cube.sticker_counts();
        for (colour, &count) in FaceId::ALL.iter().zip(counts.iter()) {
            if count != order * order {
                return Err(InstanceError::InvalidInstance(format!(
                    "colour {} appears on {} stickers, expected {}",
                    colour,
                    count,
                    order * order
                )));
            }
        }
        Ok(cube)
    }

    /// Scrambles a solved cube with `turns` random quarter-turns.
    ///
    /// Walking legal generators from the solved cube is the only way this
    /// crate builds cube instances, so every scramble is reachable by
    /// construction. Returns the scramble sequence alongside the cube so
    /// callers can report it. The same seed always produces the same
    /// scramble.
    pub fn scramble(
        order: usize,
        turns: usize,
        rng: &mut impl Rng,
    ) -> Result<(Cube, Vec<CubeMove>), InstanceError> {
        let mut cube = Cube::solved(order)?;
        let mut sequence: Vec<CubeMove> = Vec::with_capacity(turns);
        while sequence.len() < turns {
            let mv = CubeMove::ALL[rng.gen_range(0..CubeMove::ALL.len())];
            // A turn that undoes the previous one wastes scramble depth.
            if sequence.last() == Some(&mv.inverse()) {
                continue;
            }
            cube.twist(mv);
            sequence.push(mv);
        }
        Ok((cube, sequence))
    }

    /// Cube order `N`.
    pub fn order(&self) -> usize {
        self.order
    }

    /// The face at the given position.
    pub fn face(&self, id: FaceId) -> &Face {
        &self.faces[id.index()]
    }

    /// Applies one quarter-turn, returning the new cube. The original is
    /// left untouched.
    pub fn apply(&self, mv: CubeMove) -> Cube {
        let mut next = self.clone();
        next.twist(mv);
        next
    }

    /// Applies a move sequence left to right.
    pub fn apply_all(&self, moves: &[CubeMove]) -> Cube {
        let mut cube = self.clone();
        for &mv in moves {
            cube.twist(mv);
        }
        cube
    }

    /// Count of stickers per colour, indexed like [`FaceId::ALL`]. Every
    /// legal move permutes stickers, so each entry stays at `N * N`.
    pub fn sticker_counts(&self) -> [usize; 6] {
        let mut counts = [0; 6];
        for face in &self.faces {
            for sticker in &face.stickers {
                counts[sticker.index()] += 1;
            }
        }
        counts
    }

    fn face_mut(&mut self, id: FaceId) -> &mut Face {
        &mut self.faces[id.index()]
    }

    /// Rotates the turned face's own grid, then cycles the edge strip of
    /// the four adjacent faces.
    fn twist(&mut self, mv: CubeMove) {
        match mv.twist {
            Twist::Clockwise => self.face_mut(mv.face).rotate_clockwise(),
            Twist::Counterclockwise => self.face_mut(mv.face).rotate_counterclockwise(),
        }
        let last = self.order - 1;
        match (mv.face, mv.twist) {
            (FaceId::Right, Twist::Clockwise) => self.cycle_columns_up(last),
            (FaceId::Right, Twist::Counterclockwise) => self.cycle_columns_down(last),
            (FaceId::Left, Twist::Clockwise) => self.cycle_columns_down(0),
            (FaceId::Left, Twist::Counterclockwise) => self.cycle_columns_up(0),
            (FaceId::Top, Twist::Clockwise) => self.cycle_rows_left(0),
            (FaceId::Top, Twist::Counterclockwise) => self.cycle_rows_right(0),
            (FaceId::Bottom, Twist::Clockwise) => self.cycle_rows_right(last),
            (FaceId::Bottom, Twist::Counterclockwise) => self.cycle_rows_left(last),
            (FaceId::Front, Twist::Clockwise) => self.cycle_ring_clockwise(last),
            (FaceId::Front, Twist::Counterclockwise) => self.cycle_ring_counterclockwise(last),
            (FaceId::Back, Twist::Clockwise) => self.cycle_ring_counterclockwise(0),
            (FaceId::Back, Twist::Counterclockwise) => self.cycle_ring_clockwise(0),
        }
    }

    /// Cycles column `col` upward: FRONT -> TOP -> BACK -> BOTTOM ->
    /// FRONT. The back face holds the mirrored column `N-1-col`, and both
    /// transfers through it reverse their element order.
    fn cycle_columns_up(&mut self, col: usize) {
        let mirrored = self.order - 1 - col;
        let mut top_col = self.face(FaceId::Top).column(col);
        let front_col = self.face(FaceId::Front).column(col);
        let mut back_col = self.face(FaceId::Back).column(mirrored);
        let bottom_col = self.face(FaceId::Bottom).column(col);

        self.face_mut(FaceId::Top).set_column(col, &front_col);
        top_col.reverse();
        self.face_mut(FaceId::Back).set_column(mirrored, &top_col);
        back_col.reverse();
        self.face_mut(FaceId::Bottom).set_column(col, &back_col);
        self.face_mut(FaceId::Front).set_column(col, &bottom_col);
    }

    /// Cycles column `col` downward: TOP -> FRONT -> BOTTOM -> BACK ->
    /// TOP, reversing both transfers through the back face.
    fn cycle_columns_down(&mut self, col: usize) {
        let mirrored = self.order - 1 - col;
        let top_col = self.face(FaceId::Top).column(col);
        let front_col = self.face(FaceId::Front).column(col);
        let mut back_col = self.face(FaceId::Back).column(mirrored);
        let mut bottom_col = self.face(FaceId::Bottom).column(col);

        self.face_mut(FaceId::Front).set_column(col, &top_col);
        self.face_mut(FaceId::Bottom).set_column(col, &front_col);
        bottom_col.reverse();
        self.face_mut(FaceId::Back).set_column(mirrored, &bottom_col);
        back_col.reverse();
        self.face_mut(FaceId::Top).set_column(col, &back_col);
    }

    /// Cycles row `row` leftward: FRONT -> LEFT -> BACK -> RIGHT ->
    /// FRONT. Horizontal strips keep their orientation all the way round.
    fn cycle_rows_left(&mut self, row: usize) {
        let front_row = self.face(FaceId::Front).row(row);
        let left_row = self.face(FaceId::Left).row(row);
        let back_row = self.face(FaceId::Back).row(row);
        let right_row = self.face(FaceId::Right).row(row);

        self.face_mut(FaceId::Left).set_row(row, &front_row);
        self.face_mut(FaceId::Back).set_row(row, &left_row);
        self.face_mut(FaceId::Right).set_row(row, &back_row);
        self.face_mut(FaceId::Front).set_row(row, &right_row);
    }

    /// Cycles row `row` rightward: FRONT -> RIGHT -> BACK -> LEFT ->
    /// FRONT, again without reversals.
    fn cycle_rows_right(&mut self, row: usize) {
        let front_row = self.face(FaceId::Front).row(row);
        let left_row = self.face(FaceId::Left).row(row);
        let back_row = self.face(FaceId::Back).row(row);
        let right_row = self.face(FaceId::Right).row(row);

        self.face_mut(FaceId::Right).set_row(row, &front_row);
        self.face_mut(FaceId::Back).set_row(row, &right_row);
        self.face_mut(FaceId::Left).set_row(row, &back_row);
        self.face_mut(FaceId::Front).set_row(row, &left_row);
    }

    /// Cycles the edge ring around the FRONT/BACK axis clockwise as seen
    /// from the front. `k` is the TOP-face row on the ring (`N-1` for a
    /// FRONT turn, `0` for a BACK turn); the ring also crosses RIGHT
    /// column `N-1-k`, BOTTOM row `N-1-k`, and LEFT column `k`. The
    /// LEFT-to-TOP and RIGHT-to-BOTTOM transfers reverse their order.
    fn cycle_ring_clockwise(&mut self, k: usize) {
        let mirrored = self.order - 1 - k;
        let top_row = self.face(FaceId::Top).row(k);
        let mut left_col = self.face(FaceId::Left).column(k);
        let mut right_col = self.face(FaceId::Right).column(mirrored);
        let bottom_row = self.face(FaceId::Bottom).row(mirrored);

        left_col.reverse();
        self.face_mut(FaceId::Top).set_row(k, &left_col);
        self.face_mut(FaceId::Right).set_column(mirrored, &top_row);
        right_col.reverse();
        self.face_mut(FaceId::Bottom).set_row(mirrored, &right_col);
        self.face_mut(FaceId::Left).set_column(k, &bottom_row);
    }

    /// Cycles the same ring counterclockwise; here the TOP-to-LEFT and
    /// BOTTOM-to-RIGHT transfers reverse their order.
    fn cycle_ring_counterclockwise(&mut self, k: usize) {
        let mirrored = self.order - 1 - k;
        let mut top_row = self.face(FaceId::Top).row(k);
        let left_col = self.face(FaceId::Left).column(k);
        let right_col = self.face(FaceId::Right).column(mirrored);
        let mut bottom_row = self.face(FaceId::Bottom).row(mirrored);

        self.face_mut(FaceId::Top).set_row(k, &right_col);
        top_row.reverse();
        self.face_mut(FaceId::Left).set_column(k, &top_row);
        self.face_mut(FaceId::Bottom).set_row(mirrored, &left_col);
        bottom_row.reverse();
        self.face_mut(FaceId::Right).set_column(mirrored, &bottom_row);
    }
}

impl PuzzleState for Cube {
    type Move = CubeMove;

    fn is_goal(&self) -> bool {
        self.faces.iter().all(Face::is_solved)
    }

    /// Total misplaced stickers. A single turn can fix many stickers at
    /// once, so this estimate can exceed the true remaining depth; the
    /// search stays complete but its solutions are not necessarily
    /// shortest.
    fn heuristic(&self) -> u32 {
        self.faces.iter().map(|f| f.mismatches() as u32).sum()
    }

    fn successors(&self) -> Vec<(Self, CubeMove)> {
        CubeMove::ALL
            .iter()
            .map(|&mv| (self.apply(mv), mv))
            .collect()
    }
}

impl fmt::Display for Cube {
    /// Renders each face as a labelled grid of single-letter colours.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for id in FaceId::ALL {
            let face = self.face(id);
            writeln!(f, "{}:", id)?;
            for r in 0..self.order {
                for c in 0..self.order {
                    if c > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", face.sticker(r, c).to_char())?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
