//! Species rules: one animal's transition for one step.
//!
//! [`evaluate`] runs entirely under one [`GridGuard`], so the neighbour
//! checks it makes stay true until its moves and spawns land. The shared
//! prologue (re-entry guard, aging, predator energy drain) lives on
//! [`Animal::begin_step`]; this module adds what differs per species.

use rand::Rng;
use smallvec::SmallVec;
use wator_core::{Animal, ConsistencyFault, Position, Species};

use crate::config::WatorConfig;
use crate::events::StepTally;
use crate::grid::GridGuard;

/// Breeding and energy constants the species rules need.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Rules {
    pub prey_breed_time: u32,
    pub prey_energy: i64,
    pub predator_breed_energy: i64,
}

impl From<&WatorConfig> for Rules {
    fn from(config: &WatorConfig) -> Self {
        Self {
            prey_breed_time: config.prey_breed_time,
            prey_energy: config.initial_prey_energy,
            predator_breed_energy: config.predator_breed_energy,
        }
    }
}

/// Pick a random neighbour of `pos` whose occupant satisfies `accept`.
///
/// Neighbours are examined in N, E, S, W order. The RNG is only drawn
/// when more than one candidate matches.
fn select_neighbour<R, F>(
    grid: &GridGuard<'_>,
    pos: Position,
    rng: &mut R,
    accept: F,
) -> Option<Position>
where
    R: Rng + ?Sized,
    F: Fn(Option<&Animal>) -> bool,
{
    let candidates: SmallVec<[Position; 4]> = grid
        .torus()
        .neighbours(pos)
        .into_iter()
        .filter(|&n| accept(grid.get(n)))
        .collect();
    match candidates.len() {
        0 => None,
        1 => Some(candidates[0]),
        n => Some(candidates[rng.gen_range(0..n)]),
    }
}

fn is_free(cell: Option<&Animal>) -> bool {
    cell.is_none()
}

fn is_prey(cell: Option<&Animal>) -> bool {
    cell.is_some_and(Animal::is_prey)
}

/// Run one step of the animal at `at`.
///
/// The caller has already checked that `at` holds an animal whose
/// `moved` flag is clear.
pub(crate) fn evaluate<R: Rng + ?Sized>(
    grid: &mut GridGuard<'_>,
    at: Position,
    rules: &Rules,
    rng: &mut R,
    tally: &mut StepTally,
) -> Result<(), ConsistencyFault> {
    let mut animal = *grid
        .get(at)
        .ok_or(ConsistencyFault::MissingAnimal { at })?;
    animal.begin_step(at)?;
    tally.on_evaluate();
    match animal.species {
        Species::Prey => step_prey(grid, at, animal, rules, rng, tally),
        Species::Predator => step_predator(grid, at, animal, rules, rng, tally),
    }
}

/// Prey wander to a random free neighbour, then breed once old enough.
fn step_prey<R: Rng + ?Sized>(
    grid: &mut GridGuard<'_>,
    at: Position,
    mut fish: Animal,
    rules: &Rules,
    rng: &mut R,
    tally: &mut StepTally,
) -> Result<(), ConsistencyFault> {
    let mut pos = at;
    if let Some(free) = select_neighbour(grid, pos, rng, is_free) {
        grid.relocate(pos, free)?;
        tally.on_move(Species::Prey, pos, free);
        pos = free;
    }

    if fish.age >= rules.prey_breed_time {
        if let Some(free) = select_neighbour(grid, pos, rng, is_free) {
            grid.spawn(pos, free, fish.offspring(rules.prey_energy))?;
            tally.on_spawn(Species::Prey, pos, free);
            // Lower rather than reset, so the next litter needs another
            // full breed time.
            fish.age -= rules.prey_breed_time;
        }
    }

    grid.store(pos, fish)
}

/// Predators eat a neighbouring prey if they can, otherwise wander; then
/// breed on surplus energy and starve on none.
fn step_predator<R: Rng + ?Sized>(
    grid: &mut GridGuard<'_>,
    at: Position,
    mut shark: Animal,
    rules: &Rules,
    rng: &mut R,
    tally: &mut StepTally,
) -> Result<(), ConsistencyFault> {
    let mut pos = at;
    if let Some(prey_at) = select_neighbour(grid, pos, rng, is_prey) {
        let prey = grid
            .take(prey_at)
            .ok_or(ConsistencyFault::MissingAnimal { at: prey_at })?;
        shark.energy = shark.energy.saturating_add(prey.energy);
        grid.relocate(pos, prey_at)?;
        tally.on_eat(pos, prey_at, prey.energy);
        pos = prey_at;
    } else if let Some(free) = select_neighbour(grid, pos, rng, is_free) {
        grid.relocate(pos, free)?;
        tally.on_move(Species::Predator, pos, free);
        pos = free;
    }

    if shark.energy >= rules.predator_breed_energy {
        if let Some(free) = select_neighbour(grid, pos, rng, is_free) {
            grid.spawn(pos, free, shark.offspring(shark.energy / 2))?;
            tally.on_spawn(Species::Predator, pos, free);
            shark.energy /= 2;
        }
    }

    if shark.energy <= 0 {
        grid.take(pos);
        tally.on_starve(pos);
        return Ok(());
    }
    grid.store(pos, shark)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_ENERGY;
    use crate::events::StepEvent;
    use crate::grid::SharedGrid;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use wator_space::Torus;

    const RULES: Rules = Rules {
        prey_breed_time: 10,
        prey_energy: 4,
        predator_breed_energy: 100,
    };

    fn p(x: u32, y: u32) -> Position {
        Position::new(x, y)
    }

    fn grid(w: u32, h: u32) -> SharedGrid {
        SharedGrid::new(Torus::new(w, h).unwrap())
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    fn run(
        g: &SharedGrid,
        at: Position,
        rules: &Rules,
        rng: &mut ChaCha8Rng,
    ) -> Result<Vec<StepEvent>, ConsistencyFault> {
        let mut tally = StepTally::new(true);
        evaluate(&mut g.lock(), at, rules, rng, &mut tally)?;
        Ok(tally.into_events())
    }

    #[test]
    fn prey_moves_to_a_free_neighbour() {
        let g = grid(10, 10);
        g.lock().place(p(5, 5), Animal::prey(0, 4)).unwrap();
        let events = run(&g, p(5, 5), &RULES, &mut rng()).unwrap();
        let cells = g.lock();
        assert!(cells.is_free(p(5, 5)));
        let StepEvent::Moved { to, .. } = events[0] else {
            panic!("expected a move, got {events:?}");
        };
        assert!(cells.torus().neighbours(p(5, 5)).contains(&to));
        let fish = cells.get(to).unwrap();
        assert_eq!(fish.age, 1);
        assert!(fish.moved);
    }

    #[test]
    fn boxed_in_prey_stays_put() {
        // On a 1x1 torus every neighbour is the cell itself.
        let g = grid(1, 1);
        g.lock().place(p(0, 0), Animal::prey(9, 4)).unwrap();
        let events = run(&g, p(0, 0), &RULES, &mut rng()).unwrap();
        assert!(events.is_empty());
        // Breeding failed for lack of space, so the age is kept.
        assert_eq!(g.lock().get(p(0, 0)).unwrap().age, 10);
    }

    #[test]
    fn prey_at_breed_age_spawns_next_to_new_position() {
        let g = grid(10, 10);
        g.lock().place(p(0, 0), Animal::prey(9, 4)).unwrap();
        let events = run(&g, p(0, 0), &RULES, &mut rng()).unwrap();
        assert_eq!(events.len(), 2);
        let StepEvent::Moved { to, .. } = events[0] else {
            panic!("expected a move first");
        };
        let StepEvent::Spawned { parent, child, .. } = events[1] else {
            panic!("expected a spawn second");
        };
        let cells = g.lock();
        assert_eq!(parent, to);
        assert!(cells.torus().neighbours(to).contains(&child));
        let mother = cells.get(to).unwrap();
        let baby = cells.get(child).unwrap();
        assert_eq!(mother.age, 0);
        assert_eq!(baby.age, 0);
        assert_eq!(baby.energy, RULES.prey_energy);
        assert!(baby.moved);
    }

    #[test]
    fn breeding_lowers_age_instead_of_resetting() {
        // Parent aged 14 breeds at 15 and keeps 5 years of progress.
        let g = grid(10, 10);
        g.lock().place(p(4, 4), Animal::prey(14, 4)).unwrap();
        let events = run(&g, p(4, 4), &RULES, &mut rng()).unwrap();
        let StepEvent::Spawned { parent, .. } = events[1] else {
            panic!("expected a spawn");
        };
        assert_eq!(g.lock().get(parent).unwrap().age, 5);
    }

    #[test]
    fn breeding_cooldown_is_a_full_breed_time() {
        let g = grid(30, 30);
        let mut at = p(15, 15);
        g.lock().place(at, Animal::prey(0, 4)).unwrap();
        let mut rng = rng();
        let mut litters = Vec::new();
        for step in 1..=25u32 {
            let events = run(&g, at, &RULES, &mut rng).unwrap();
            let mut cells = g.lock();
            for event in events {
                match event {
                    StepEvent::Moved { to, .. } => at = to,
                    StepEvent::Spawned { child, .. } => {
                        litters.push(step);
                        cells.take(child);
                    }
                    other => panic!("unexpected {other:?}"),
                }
            }
            let mut parent = *cells.get(at).unwrap();
            parent.commit();
            cells.store(at, parent).unwrap();
        }
        assert_eq!(litters, vec![10, 20]);
    }

    #[test]
    fn predator_eats_adjacent_prey() {
        let g = grid(10, 10);
        {
            let mut cells = g.lock();
            cells.place(p(5, 5), Animal::predator(20)).unwrap();
            cells.place(p(6, 5), Animal::prey(3, 4)).unwrap();
        }
        let events = run(&g, p(5, 5), &RULES, &mut rng()).unwrap();
        assert_eq!(
            events,
            vec![StepEvent::Ate {
                predator_from: p(5, 5),
                prey_at: p(6, 5),
                prey_energy: 4
            }]
        );
        let cells = g.lock();
        assert!(cells.is_free(p(5, 5)));
        let shark = cells.get(p(6, 5)).unwrap();
        assert!(shark.is_predator());
        assert_eq!(shark.energy, 20 - 1 + 4);
    }

    #[test]
    fn predator_eats_prey_that_already_moved_this_step() {
        let g = grid(3, 1);
        let mut fish = Animal::prey(2, 4);
        fish.moved = true;
        {
            let mut cells = g.lock();
            cells.place(p(0, 0), Animal::predator(20)).unwrap();
            cells.place(p(1, 0), fish).unwrap();
        }
        let events = run(&g, p(0, 0), &RULES, &mut rng()).unwrap();
        assert_eq!(
            events,
            vec![StepEvent::Ate {
                predator_from: p(0, 0),
                prey_at: p(1, 0),
                prey_energy: 4
            }]
        );
        let cells = g.lock();
        assert!(cells.is_free(p(0, 0)));
        assert_eq!(cells.get(p(1, 0)).unwrap().energy, 20 - 1 + 4);
    }

    #[test]
    fn meal_energy_saturates_instead_of_overflowing() {
        let g = grid(2, 1);
        {
            let mut cells = g.lock();
            cells.place(p(1, 0), Animal::predator(i64::MAX - 1)).unwrap();
            cells.place(p(0, 0), Animal::prey(0, MAX_ENERGY)).unwrap();
        }
        let events = run(&g, p(1, 0), &RULES, &mut rng()).unwrap();
        assert_eq!(events.len(), 2);
        let cells = g.lock();
        let parent = cells.get(p(0, 0)).unwrap();
        let pup = cells.get(p(1, 0)).unwrap();
        assert!(parent.is_predator() && pup.is_predator());
        assert_eq!(parent.energy, i64::MAX / 2);
        assert_eq!(pup.energy, i64::MAX / 2);
    }

    #[test]
    fn predator_ignores_other_predators() {
        let g = grid(3, 1);
        {
            let mut cells = g.lock();
            cells.place(p(0, 0), Animal::predator(5)).unwrap();
            cells.place(p(1, 0), Animal::predator(5)).unwrap();
            cells.place(p(2, 0), Animal::predator(5)).unwrap();
        }
        let events = run(&g, p(0, 0), &RULES, &mut rng()).unwrap();
        assert!(events.is_empty());
        assert_eq!(g.lock().get(p(0, 0)).unwrap().energy, 4);
    }

    #[test]
    fn starving_predator_is_removed() {
        let g = grid(10, 10);
        g.lock().place(p(5, 5), Animal::predator(1)).unwrap();
        let events = run(&g, p(5, 5), &RULES, &mut rng()).unwrap();
        let StepEvent::Moved { to, .. } = events[0] else {
            panic!("expected a move before starving");
        };
        assert_eq!(events[1], StepEvent::Starved { at: to });
        let cells = g.lock();
        assert!(cells.is_free(p(5, 5)));
        assert!(cells.is_free(to));
    }

    #[test]
    fn well_fed_predator_splits_energy_with_child() {
        let rules = Rules {
            predator_breed_energy: 10,
            ..RULES
        };
        let g = grid(10, 10);
        g.lock().place(p(2, 2), Animal::predator(13)).unwrap();
        let events = run(&g, p(2, 2), &rules, &mut rng()).unwrap();
        let StepEvent::Spawned {
            species,
            parent,
            child,
        } = events[1]
        else {
            panic!("expected a spawn");
        };
        assert_eq!(species, Species::Predator);
        let cells = g.lock();
        assert_eq!(cells.get(parent).unwrap().energy, 6);
        let pup = cells.get(child).unwrap();
        assert_eq!(pup.energy, 6);
        assert_eq!(pup.age, 0);
        assert!(pup.moved);
    }

    #[test]
    fn evaluating_a_moved_animal_is_a_fault() {
        let g = grid(4, 4);
        let mut shark = Animal::predator(5);
        shark.moved = true;
        g.lock().place(p(1, 1), shark).unwrap();
        assert_eq!(
            run(&g, p(1, 1), &RULES, &mut rng()),
            Err(ConsistencyFault::DoubleMove {
                at: p(1, 1),
                species: Species::Predator
            })
        );
    }

    #[test]
    fn evaluating_an_empty_cell_is_a_fault() {
        let g = grid(4, 4);
        assert_eq!(
            run(&g, p(0, 3), &RULES, &mut rng()),
            Err(ConsistencyFault::MissingAnimal { at: p(0, 3) })
        );
    }
}
