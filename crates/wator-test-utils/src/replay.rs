//! Event-log replay with move-legality checks.
//!
//! [`replay_events`] starts from the pre-step occupancy and applies each
//! [`StepEvent`] in order. Every move, meal, and birth must go between
//! neighbouring cells and land where the rules allow (an empty cell, or
//! prey for a meal). An animal that already arrived somewhere this step
//! may not move again. With a single worker the log is the exact global
//! order, so the replayed occupancy must equal the post-step grid.

use std::fmt;

use wator_core::{Animal, Position, Species};
use wator_engine::StepEvent;
use wator_space::Torus;

/// Species per cell, row-major.
pub type Occupancy = Vec<Option<Species>>;

/// Row-major occupancy of a list of placed animals.
pub fn occupancy(torus: &Torus, animals: &[(Position, Animal)]) -> Occupancy {
    let mut cells = vec![None; torus.cell_count()];
    for (pos, animal) in animals {
        cells[torus.index(*pos)] = Some(animal.species);
    }
    cells
}

/// The first illegal event found by [`replay_events`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplayError {
    /// Index of the event in the log.
    pub index: usize,
    /// The offending event.
    pub event: StepEvent,
    /// What was wrong with it.
    pub reason: &'static str,
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event #{} {:?}: {}", self.index, self.event, self.reason)
    }
}

impl std::error::Error for ReplayError {}

/// Apply `events` to `before`, returning the resulting occupancy.
pub fn replay_events(
    torus: &Torus,
    before: &Occupancy,
    events: &[StepEvent],
) -> Result<Occupancy, ReplayError> {
    let mut cells = before.clone();
    // Cells holding an animal that was already evaluated this step.
    let mut settled = vec![false; cells.len()];

    for (index, event) in events.iter().enumerate() {
        let fail = |reason| ReplayError {
            index,
            event: *event,
            reason,
        };
        match *event {
            StepEvent::Moved { species, from, to } => {
                let (src, dst) = (torus.index(from), torus.index(to));
                if torus.distance(from, to) != 1 {
                    return Err(fail("move between non-neighbours"));
                }
                if cells[src] != Some(species) {
                    return Err(fail("mover is not at the source cell"));
                }
                if settled[src] {
                    return Err(fail("animal moved twice in one step"));
                }
                if cells[dst].is_some() {
                    return Err(fail("move into an occupied cell"));
                }
                cells[src] = None;
                cells[dst] = Some(species);
                settled[dst] = true;
            }
            StepEvent::Ate {
                predator_from,
                prey_at,
                ..
            } => {
                let (src, dst) = (torus.index(predator_from), torus.index(prey_at));
                if torus.distance(predator_from, prey_at) != 1 {
                    return Err(fail("meal between non-neighbours"));
                }
                if cells[src] != Some(Species::Predator) {
                    return Err(fail("no predator at the source cell"));
                }
                if settled[src] {
                    return Err(fail("animal moved twice in one step"));
                }
                if cells[dst] != Some(Species::Prey) {
                    return Err(fail("meal target holds no prey"));
                }
                cells[src] = None;
                cells[dst] = Some(Species::Predator);
                settled[dst] = true;
            }
            StepEvent::Spawned {
                species,
                parent,
                child,
            } => {
                let (src, dst) = (torus.index(parent), torus.index(child));
                if torus.distance(parent, child) != 1 {
                    return Err(fail("birth between non-neighbours"));
                }
                if cells[src] != Some(species) {
                    return Err(fail("parent is not at the source cell"));
                }
                if cells[dst].is_some() {
                    return Err(fail("birth into an occupied cell"));
                }
                cells[dst] = Some(species);
                settled[src] = true;
                settled[dst] = true;
            }
            StepEvent::Starved { at } => {
                let idx = torus.index(at);
                if cells[idx] != Some(Species::Predator) {
                    return Err(fail("starved cell holds no predator"));
                }
                cells[idx] = None;
                settled[idx] = false;
            }
        }
    }
    Ok(cells)
}
