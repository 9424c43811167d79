//! Test fixtures and invariant checks for Wator development.
//!
//! Provides a [`WorldBuilder`] for hand-placed scenarios and a
//! [`replay_events`] checker that re-applies a step's event log to the
//! pre-step grid, rejecting any illegal move along the way.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod replay;

pub use fixtures::WorldBuilder;
pub use replay::{occupancy, replay_events, ReplayError};

use wator_engine::{Population, StepMetrics};

/// Assert the per-species bookkeeping identity for one step:
/// `after = before + born - died`.
pub fn assert_conserved(before: Population, metrics: &StepMetrics) {
    let after = metrics.population;
    assert_eq!(
        after.prey as u64 + metrics.prey_eaten,
        before.prey as u64 + metrics.prey_born,
        "prey not conserved: before {before:?}, metrics {metrics:?}"
    );
    assert_eq!(
        after.predators as u64 + metrics.predators_starved,
        before.predators as u64 + metrics.predators_born,
        "predators not conserved: before {before:?}, metrics {metrics:?}"
    );
}
