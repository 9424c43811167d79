//! Error types for space construction and lookups.

use std::fmt;
use wator_core::Position;

/// Errors arising from torus construction or coordinate lookups.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpaceError {
    /// Attempted to construct a space with zero cells.
    EmptySpace,
    /// The cell count does not fit the `u32` linear index used by the
    /// scheduler.
    DimensionTooLarge {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// A position lies outside the grid.
    OutOfBounds {
        /// The offending position.
        position: Position,
        /// Grid width.
        width: u32,
        /// Grid height.
        height: u32,
    },
}

impl fmt::Display for SpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySpace => write!(f, "space must have at least one cell"),
            Self::DimensionTooLarge { width, height } => {
                write!(f, "{width}x{height} grid exceeds u32::MAX cells")
            }
            Self::OutOfBounds {
                position,
                width,
                height,
            } => write!(
                f,
                "position {position} out of bounds: [0, {width}) x [0, {height})"
            ),
        }
    }
}

impl std::error::Error for SpaceError {}
