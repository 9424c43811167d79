//! Hand-placed single-step scenarios.
//!
//! Each test seeds a tiny world with known animals, runs one step, and
//! checks the exact outcome of the species rules.

use wator_core::{Position, Species, StepId};
use wator_engine::{CellKind, ConfigError, Population, StepEvent, WatorWorld, MAX_ENERGY};
use wator_test_utils::WorldBuilder;

fn p(x: u32, y: u32) -> Position {
    Position::new(x, y)
}

#[test]
fn prey_at_breed_age_moves_and_spawns() {
    let mut world = WorldBuilder::new(10, 10)
        .prey_breed_time(10)
        .prey_at(0, 0, 9)
        .build();
    let torus = *world.torus();

    let report = world.execute_step().unwrap();

    assert_eq!(report.events.len(), 2, "events: {:?}", report.events);
    let StepEvent::Moved { species, from, to } = report.events[0] else {
        panic!("first event should be the move: {:?}", report.events);
    };
    assert_eq!(species, Species::Prey);
    assert_eq!(from, p(0, 0));
    assert!(torus.neighbours(p(0, 0)).contains(&to));

    let StepEvent::Spawned { parent, child, .. } = report.events[1] else {
        panic!("second event should be the birth: {:?}", report.events);
    };
    assert_eq!(parent, to);
    assert!(torus.neighbours(to).contains(&child));

    assert_eq!(world.animal_at(p(0, 0)), None);
    let mother = world.animal_at(to).unwrap();
    let baby = world.animal_at(child).unwrap();
    assert_eq!(mother.age, 0);
    assert_eq!(baby.age, 0);
    assert!(baby.is_prey());
    assert!(!baby.moved, "commit must reset newborns too");
    assert_eq!(
        report.metrics.population,
        Population {
            prey: 2,
            predators: 0
        }
    );
}

#[test]
fn starving_predator_dies_and_frees_its_cell() {
    let mut world = WorldBuilder::new(10, 10).predator_at(5, 5, 1).build();

    let report = world.execute_step().unwrap();

    assert_eq!(world.animal_at(p(5, 5)), None);
    assert_eq!(world.population().total(), 0);
    assert_eq!(report.metrics.predators_starved, 1);
    assert!(matches!(
        report.events.last(),
        Some(StepEvent::Starved { .. })
    ));
    let snap = world.snapshot();
    assert!(snap.cells().iter().all(|c| *c == CellKind::Water));
}

#[test]
fn predator_eats_its_only_neighbouring_prey() {
    // On a 2x1 torus the prey has no free neighbour, so whichever animal
    // the shuffle visits first, the prey is still there for the predator.
    for seed in 0..8 {
        let mut world = WorldBuilder::new(2, 1)
            .seed(seed)
            .prey_energy(4)
            .predator_at(1, 0, 20)
            .prey_at(0, 0, 0)
            .build();

        let report = world.execute_step().unwrap();

        assert_eq!(world.animal_at(p(1, 0)), None, "seed {seed}");
        let shark = world.animal_at(p(0, 0)).unwrap();
        assert!(shark.is_predator());
        assert_eq!(shark.energy, 20 - 1 + 4, "seed {seed}");
        assert_eq!(report.metrics.prey_eaten, 1);
        assert_eq!(
            world.population(),
            Population {
                prey: 0,
                predators: 1
            }
        );
    }
}

#[test]
fn huge_meal_saturates_instead_of_panicking() {
    for seed in 0..4 {
        let mut world = WorldBuilder::new(2, 1)
            .seed(seed)
            .prey_energy(MAX_ENERGY)
            .predator_at(1, 0, i64::MAX - 1)
            .prey_at(0, 0, 0)
            .build();

        let report = world.execute_step().unwrap();

        assert_eq!(report.metrics.prey_eaten, 1, "seed {seed}");
        assert_eq!(report.metrics.predators_born, 1, "seed {seed}");
        assert_eq!(world.animal_at(p(0, 0)).unwrap().energy, i64::MAX / 2);
        assert_eq!(world.animal_at(p(1, 0)).unwrap().energy, i64::MAX / 2);
        assert!(!world.is_halted());
    }
}

#[test]
fn prey_energy_above_the_cap_is_rejected() {
    let builder = WorldBuilder::new(2, 1).prey_energy(i64::MAX);
    let out = WatorWorld::with_animals(builder.config().clone(), []);
    assert!(matches!(
        out,
        Err(ConfigError::InvalidEnergy {
            name: "initial_prey_energy",
            value: i64::MAX
        })
    ));
}

#[test]
fn boxed_in_predator_stays_and_ages() {
    // 1x1 torus: every neighbour is the predator's own cell.
    let mut world = WorldBuilder::new(1, 1).predator_at(0, 0, 5).build();
    for step in 1..=3u32 {
        let report = world.execute_step().unwrap();
        assert!(report.events.is_empty());
        let shark = world.animal_at(p(0, 0)).unwrap();
        assert_eq!(shark.age, step);
        assert_eq!(shark.energy, 5 - i64::from(step));
    }
}

#[test]
fn well_fed_predator_breeds_after_eating() {
    let mut world = WorldBuilder::new(2, 1)
        .prey_energy(30)
        .predator_breed_energy(40)
        .predator_at(1, 0, 20)
        .prey_at(0, 0, 0)
        .build();

    let report = world.execute_step().unwrap();

    // 20 - 1 + 30 = 49 >= 40, but the only free cell is the one just left.
    assert_eq!(report.metrics.predators_born, 1);
    let parent = world.animal_at(p(0, 0)).unwrap();
    let pup = world.animal_at(p(1, 0)).unwrap();
    assert_eq!(parent.energy, 24);
    assert_eq!(pup.energy, 24);
    assert_eq!(world.step_id(), StepId(1));
}

#[test]
fn prey_breeds_every_breed_time_steps() {
    let mut world = WorldBuilder::new(40, 40)
        .prey_breed_time(4)
        .prey_at(20, 20, 0)
        .build();
    let mut births = Vec::new();
    for _ in 0..8 {
        births.push(world.execute_step().unwrap().metrics.prey_born);
    }
    // The founder breeds at steps 4 and 8. Its first child is born moved
    // at step 4, first ages at step 5, and reaches breed age at step 8.
    assert_eq!(births, vec![0, 0, 0, 1, 0, 0, 0, 2]);
}
