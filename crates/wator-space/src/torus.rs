//! 2D square grid with periodic boundaries and 4-connected neighbourhood.

use crate::direction::Direction;
use crate::error::SpaceError;
use wator_core::Position;

/// A two-dimensional torus of `width * height` cells.
///
/// Each cell has position `(x, y)` where `0 <= x < width` and
/// `0 <= y < height`. Cells are numbered row-major: the linear index of
/// `(x, y)` is `y * width + x`. Every cell has exactly four neighbours;
/// on grids one or two cells wide the same cell may appear more than
/// once (or be the cell itself).
///
/// # Examples
///
/// ```
/// use wator_core::Position;
/// use wator_space::Torus;
///
/// let torus = Torus::new(10, 10).unwrap();
/// assert_eq!(torus.cell_count(), 100);
/// assert_eq!(torus.west(Position::new(0, 4)), Position::new(9, 4));
/// assert_eq!(torus.south(Position::new(3, 9)), Position::new(3, 0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Torus {
    width: u32,
    height: u32,
}

impl Torus {
    /// Largest supported cell count: linear indices are stored as `u32`.
    pub const MAX_CELLS: u64 = u32::MAX as u64;

    /// Create a torus with `width * height` cells.
    ///
    /// Returns `Err(SpaceError::EmptySpace)` if either dimension is 0, or
    /// `Err(SpaceError::DimensionTooLarge)` if the cell count exceeds
    /// [`MAX_CELLS`](Self::MAX_CELLS).
    pub fn new(width: u32, height: u32) -> Result<Self, SpaceError> {
        if width == 0 || height == 0 {
            return Err(SpaceError::EmptySpace);
        }
        if u64::from(width) * u64::from(height) > Self::MAX_CELLS {
            return Err(SpaceError::DimensionTooLarge { width, height });
        }
        Ok(Self { width, height })
    }

    /// Number of columns.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Whether `pos` lies on the grid.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Linear index of an in-bounds position.
    ///
    /// Callers must pass a position for which [`contains`](Self::contains)
    /// holds; use [`checked_index`](Self::checked_index) for untrusted input.
    pub fn index(&self, pos: Position) -> usize {
        debug_assert!(self.contains(pos), "{pos} outside {}x{}", self.width, self.height);
        (pos.y as usize) * (self.width as usize) + pos.x as usize
    }

    /// Linear index of `pos`, or an error if it lies outside the grid.
    pub fn checked_index(&self, pos: Position) -> Result<usize, SpaceError> {
        if self.contains(pos) {
            Ok(self.index(pos))
        } else {
            Err(SpaceError::OutOfBounds {
                position: pos,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Position of a linear index in `[0, cell_count)`.
    pub fn position(&self, index: usize) -> Position {
        debug_assert!(index < self.cell_count());
        let w = self.width as usize;
        // Both halves are bounded by u32 dimensions.
        Position::new((index % w) as u32, (index / w) as u32)
    }

    /// Neighbour of `pos` one step in `dir`, wrapping at the edges.
    pub fn step(&self, pos: Position, dir: Direction) -> Position {
        let (dx, dy) = dir.offset();
        Position::new(
            wrap_axis(i64::from(pos.x) + dx, self.width),
            wrap_axis(i64::from(pos.y) + dy, self.height),
        )
    }

    /// Cell above `pos`.
    pub fn north(&self, pos: Position) -> Position {
        self.step(pos, Direction::North)
    }

    /// Cell to the right of `pos`.
    pub fn east(&self, pos: Position) -> Position {
        self.step(pos, Direction::East)
    }

    /// Cell below `pos`.
    pub fn south(&self, pos: Position) -> Position {
        self.step(pos, Direction::South)
    }

    /// Cell to the left of `pos`.
    pub fn west(&self, pos: Position) -> Position {
        self.step(pos, Direction::West)
    }

    /// The four neighbours of `pos` in N, E, S, W order.
    pub fn neighbours(&self, pos: Position) -> [Position; 4] {
        Direction::ALL.map(|dir| self.step(pos, dir))
    }

    /// Linear index range covering row `y`.
    pub fn row_range(&self, y: u32) -> std::ops::Range<usize> {
        let w = self.width as usize;
        let start = (y as usize) * w;
        start..start + w
    }

    /// Wraparound (toroidal) Manhattan distance between two positions.
    pub fn distance(&self, a: Position, b: Position) -> u32 {
        axis_distance(a.x, b.x, self.width) + axis_distance(a.y, b.y, self.height)
    }
}

/// Wrap a possibly out-of-range axis value onto `[0, len)`.
fn wrap_axis(val: i64, len: u32) -> u32 {
    // rem_euclid of a positive modulus lies in [0, len), which fits u32.
    val.rem_euclid(i64::from(len)) as u32
}

/// 1D distance along a periodic axis.
fn axis_distance(a: u32, b: u32, len: u32) -> u32 {
    let diff = a.abs_diff(b);
    diff.min(len - diff)
}
