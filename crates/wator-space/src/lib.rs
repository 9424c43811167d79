//! Toroidal grid topology for the Wator simulation.
//!
//! [`Torus`] owns the grid dimensions and all wraparound arithmetic:
//! linear index mapping and the 4-connected (N/E/S/W) neighbourhood.
//! It holds no cell data; the engine's shared grid does.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod direction;
pub mod error;
pub mod torus;

pub use direction::Direction;
pub use error::SpaceError;
pub use torus::Torus;
