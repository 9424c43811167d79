//! Cardinal directions of the 4-connected neighbourhood.

/// Cardinal direction on the grid.
///
/// North decreases `y`, south increases it; east increases `x`, west
/// decreases it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    /// One row up (`y - 1`).
    North = 0,
    /// One column right (`x + 1`).
    East = 1,
    /// One row down (`y + 1`).
    South = 2,
    /// One column left (`x - 1`).
    West = 3,
}

impl Direction {
    /// All four directions in the order neighbours are examined.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Returns the `(dx, dy)` offset for this direction.
    pub fn offset(self) -> (i64, i64) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }
}
