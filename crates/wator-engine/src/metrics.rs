//! Per-step metrics and population counts.
//!
//! [`StepMetrics`] captures timing and bookkeeping data for a single
//! step. The counters satisfy the conservation law checked by the
//! integration tests:
//!
//! ```text
//! prey_after      = prey_before      + prey_born      - prey_eaten
//! predators_after = predators_before + predators_born - predators_starved
//! ```

use std::ops::Add;

use wator_core::{Animal, Species};

/// Number of animals of each species.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Population {
    /// Living prey.
    pub prey: usize,
    /// Living predators.
    pub predators: usize,
}

impl Population {
    /// Total number of animals.
    pub fn total(&self) -> usize {
        self.prey + self.predators
    }

    /// Count of the given species.
    pub fn of(&self, species: Species) -> usize {
        match species {
            Species::Prey => self.prey,
            Species::Predator => self.predators,
        }
    }

    /// Add one animal to the tally.
    pub fn count(&mut self, animal: &Animal) {
        match animal.species {
            Species::Prey => self.prey += 1,
            Species::Predator => self.predators += 1,
        }
    }
}

impl Add for Population {
    type Output = Population;

    fn add(self, rhs: Population) -> Population {
        Population {
            prey: self.prey + rhs.prey,
            predators: self.predators + rhs.predators,
        }
    }
}

/// Timing and bookkeeping collected during a single step.
///
/// All durations are in microseconds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepMetrics {
    /// Wall-clock time for the entire step.
    pub total_us: u64,
    /// Time spent reshuffling the visitation order.
    pub shuffle_us: u64,
    /// Time spent in the parallel update phase.
    pub update_us: u64,
    /// Time spent in the parallel commit phase.
    pub commit_us: u64,
    /// Number of partitions the update phase was split into.
    pub partitions: usize,
    /// Worker pool size.
    pub workers: usize,
    /// Animals whose transition ran this step.
    pub evaluated: u64,
    /// Moves into an empty cell (feeding moves excluded).
    pub moves: u64,
    /// Prey spawned.
    pub prey_born: u64,
    /// Predators spawned.
    pub predators_born: u64,
    /// Prey eaten by predators.
    pub prey_eaten: u64,
    /// Predators that starved.
    pub predators_starved: u64,
    /// Population after the commit phase.
    pub population: Population,
}
