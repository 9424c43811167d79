//! The [`Animal`] record and its species tag.
//!
//! Animals are plain values stored directly in grid cells. An animal's
//! position is the cell that holds it, so there is no back-reference to
//! keep in sync. This module holds the behaviour shared by both species:
//! the re-entry guard, aging, the predator energy drain, and the
//! end-of-step commit. Species-specific rules live in the engine.

use crate::error::ConsistencyFault;
use crate::id::Position;

/// The two species that inhabit the ocean.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Species {
    /// Wanders randomly and breeds by age ("fish").
    Prey,
    /// Hunts prey, starves without food, breeds by energy ("shark").
    Predator,
}

impl Species {
    /// Short lowercase name, used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Prey => "prey",
            Self::Predator => "predator",
        }
    }
}

/// A single animal occupying one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Animal {
    /// Which rules this animal follows.
    pub species: Species,
    /// Steps survived since creation, minus breeding reductions for prey.
    pub age: u32,
    /// Fuel. Predators lose one unit per step and die at zero.
    pub energy: i64,
    /// Set once the animal has been evaluated in the current step.
    /// Cleared only by [`commit`](Animal::commit).
    pub moved: bool,
}

impl Animal {
    /// A new prey with the given age and energy, not yet evaluated.
    pub fn prey(age: u32, energy: i64) -> Self {
        Self {
            species: Species::Prey,
            age,
            energy,
            moved: false,
        }
    }

    /// A new predator with age 0 and the given energy, not yet evaluated.
    pub fn predator(energy: i64) -> Self {
        Self {
            species: Species::Predator,
            age: 0,
            energy,
            moved: false,
        }
    }

    /// Whether this animal is prey.
    pub fn is_prey(&self) -> bool {
        self.species == Species::Prey
    }

    /// Whether this animal is a predator.
    pub fn is_predator(&self) -> bool {
        self.species == Species::Predator
    }

    /// A newborn of the same species, already marked as moved so it is
    /// not evaluated again in the step that created it.
    pub fn offspring(&self, energy: i64) -> Self {
        Self {
            species: self.species,
            age: 0,
            energy,
            moved: true,
        }
    }

    /// Shared prologue of every transition.
    ///
    /// Rejects an animal that was already evaluated this step, then ages
    /// it by one step and drains one unit of energy from predators. The
    /// animal is marked as moved; the caller writes it back wherever the
    /// species rules leave it.
    pub fn begin_step(&mut self, at: Position) -> Result<(), ConsistencyFault> {
        if self.moved {
            return Err(ConsistencyFault::DoubleMove {
                at,
                species: self.species,
            });
        }
        self.age = self.age.saturating_add(1);
        if self.is_predator() {
            self.energy = self.energy.saturating_sub(1);
        }
        self.moved = true;
        Ok(())
    }

    /// Reset the per-step marker so the animal is evaluated next step.
    pub fn commit(&mut self) {
        self.moved = false;
    }
}
