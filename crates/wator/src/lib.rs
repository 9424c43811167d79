//! Wator: a parallel predator-prey simulation on a toroidal grid.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Wator sub-crates. For most users, adding `wator` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use wator::prelude::*;
//!
//! let config = WatorConfig {
//!     width: 32,
//!     height: 32,
//!     initial_prey_count: 200,
//!     initial_predator_count: 40,
//!     seed: 7,
//!     parallelism: Some(2),
//!     ..WatorConfig::default()
//! };
//! let mut world = WatorWorld::new(config).unwrap();
//! for _ in 0..5 {
//!     world.execute_step().unwrap();
//! }
//! assert_eq!(world.step_id(), StepId(5));
//!
//! let snapshot = world.snapshot();
//! assert_eq!(snapshot.to_rgba().len(), 32 * 32 * 4);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `wator-core` | Positions, step ids, animals, step errors |
//! | [`space`] | `wator-space` | Toroidal topology and neighbourhoods |
//! | [`engine`] | `wator-engine` | Configuration, world, metrics, runner |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core value types and step errors (`wator-core`).
pub use wator_core as types;

/// Toroidal grid topology (`wator-space`).
///
/// [`space::Torus`] maps positions to linear indices and yields the
/// N/E/S/W neighbourhood with wraparound.
pub use wator_space as space;

/// The simulation engine (`wator-engine`).
///
/// [`engine::WatorWorld`] for synchronous stepping,
/// [`engine::WorldRunner`] for stepping on a background thread.
pub use wator_engine as engine;

/// Common imports for typical Wator usage.
///
/// ```rust
/// use wator::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use wator_core::{Animal, Position, Species, StepId};

    // Errors
    pub use wator_core::{ConsistencyFault, StepError};
    pub use wator_engine::ConfigError;

    // Space
    pub use wator_space::{Direction, Torus};

    // Engine
    pub use wator_engine::{
        CellKind, Population, RunSummary, RunnerConfig, StepEvent, StepMetrics, StepReport,
        WatorConfig, WatorWorld, WorldRunner, WorldSnapshot,
    };
}
