//! Step event log and per-partition tallies.
//!
//! Every state change made by the species rules is reported to a
//! [`StepTally`]. The tally always keeps counters; when event recording is
//! enabled it also keeps the ordered [`StepEvent`] log. Each partition owns
//! its own tally, and the world merges them in partition order once the
//! update phase is over.

use wator_core::{Position, Species};

/// One state change made during the update phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepEvent {
    /// An animal moved into an empty neighbouring cell.
    Moved {
        /// Species of the mover.
        species: Species,
        /// Cell it left.
        from: Position,
        /// Empty cell it entered.
        to: Position,
    },
    /// A predator ate a neighbouring prey and moved into its cell.
    Ate {
        /// Cell the predator left.
        predator_from: Position,
        /// Cell of the eaten prey, now holding the predator.
        prey_at: Position,
        /// Energy the predator gained.
        prey_energy: i64,
    },
    /// A parent placed a newborn into an empty neighbouring cell.
    Spawned {
        /// Species of parent and child.
        species: Species,
        /// Parent's cell after its own move.
        parent: Position,
        /// Cell of the newborn.
        child: Position,
    },
    /// A predator ran out of energy and was removed.
    Starved {
        /// Cell it died in.
        at: Position,
    },
}

/// Counters and optional event log for one partition (or a whole step).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct StepTally {
    pub evaluated: u64,
    pub moves: u64,
    pub prey_born: u64,
    pub predators_born: u64,
    pub prey_eaten: u64,
    pub predators_starved: u64,
    events: Option<Vec<StepEvent>>,
}

impl StepTally {
    pub fn new(record_events: bool) -> Self {
        Self {
            events: record_events.then(Vec::new),
            ..Self::default()
        }
    }

    pub fn on_evaluate(&mut self) {
        self.evaluated += 1;
    }

    pub fn on_move(&mut self, species: Species, from: Position, to: Position) {
        self.moves += 1;
        self.push(StepEvent::Moved { species, from, to });
    }

    pub fn on_eat(&mut self, predator_from: Position, prey_at: Position, prey_energy: i64) {
        self.prey_eaten += 1;
        self.push(StepEvent::Ate {
            predator_from,
            prey_at,
            prey_energy,
        });
    }

    pub fn on_spawn(&mut self, species: Species, parent: Position, child: Position) {
        match species {
            Species::Prey => self.prey_born += 1,
            Species::Predator => self.predators_born += 1,
        }
        self.push(StepEvent::Spawned {
            species,
            parent,
            child,
        });
    }

    pub fn on_starve(&mut self, at: Position) {
        self.predators_starved += 1;
        self.push(StepEvent::Starved { at });
    }

    /// Append `other` after this tally.
    pub fn merge(&mut self, other: StepTally) {
        self.evaluated += other.evaluated;
        self.moves += other.moves;
        self.prey_born += other.prey_born;
        self.predators_born += other.predators_born;
        self.prey_eaten += other.prey_eaten;
        self.predators_starved += other.predators_starved;
        if let (Some(mine), Some(theirs)) = (&mut self.events, other.events) {
            mine.extend(theirs);
        }
    }

    pub fn into_events(self) -> Vec<StepEvent> {
        self.events.unwrap_or_default()
    }

    fn push(&mut self, event: StepEvent) {
        if let Some(events) = &mut self.events {
            events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_tick_without_recording() {
        let mut t = StepTally::new(false);
        t.on_move(Species::Prey, Position::new(0, 0), Position::new(1, 0));
        t.on_starve(Position::new(2, 2));
        assert_eq!(t.moves, 1);
        assert_eq!(t.predators_starved, 1);
        assert!(t.into_events().is_empty());
    }

    #[test]
    fn merge_preserves_partition_order() {
        let mut first = StepTally::new(true);
        first.on_spawn(Species::Prey, Position::new(0, 0), Position::new(0, 1));
        let mut second = StepTally::new(true);
        second.on_eat(Position::new(3, 3), Position::new(3, 4), 7);
        first.merge(second);
        assert_eq!(first.prey_born, 1);
        assert_eq!(first.prey_eaten, 1);
        let events = first.into_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], StepEvent::Spawned { .. }));
        assert!(matches!(events[1], StepEvent::Ate { prey_energy: 7, .. }));
    }
}
