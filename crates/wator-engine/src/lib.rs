//! Parallel step engine for the Wator predator-prey simulation.
//!
//! [`WatorWorld`] owns a toroidal grid of prey and predators and advances
//! it one step at a time: the cell visitation order is reshuffled, the
//! shuffled order is split into partitions evaluated on a worker pool,
//! and a commit pass clears every animal's per-step marker. The
//! [`WorldRunner`] drives a world on a background thread and publishes
//! [`WorldSnapshot`]s over a bounded channel.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub(crate) mod behavior;
pub mod config;
pub mod events;
pub(crate) mod grid;
pub mod metrics;
pub mod partition;
pub mod runner;
pub mod schedule;
pub mod snapshot;
pub mod world;

pub use config::{ConfigError, WatorConfig, MAX_ENERGY, MAX_PARALLELISM};
pub use events::StepEvent;
pub use metrics::{Population, StepMetrics};
pub use partition::{Partition, MIN_PARTITION_CELLS};
pub use runner::{RunSummary, RunnerConfig, WorldRunner};
pub use schedule::ShuffleSchedule;
pub use snapshot::{CellKind, WorldSnapshot};
pub use world::{StepReport, WatorWorld};
