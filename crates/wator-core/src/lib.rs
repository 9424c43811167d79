//! Core types for the Wator predator-prey simulation.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the value types shared by the rest of the workspace: grid positions,
//! step identifiers, the [`Animal`] record with its species tag, and the
//! error types raised while stepping a world.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod animal;
pub mod error;
pub mod id;

pub use animal::{Animal, Species};
pub use error::{ConsistencyFault, StepError};
pub use id::{Position, StepId};
