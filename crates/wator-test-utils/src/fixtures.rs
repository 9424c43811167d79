//! Hand-placed world fixtures.

use wator_core::{Animal, Position};
use wator_engine::{WatorConfig, WatorWorld};

/// Builder for small worlds with animals at known positions.
///
/// Defaults to a single worker with event recording on, so every world
/// it builds is reproducible and replayable.
///
/// ```
/// use wator_test_utils::WorldBuilder;
///
/// let world = WorldBuilder::new(10, 10)
///     .prey_at(0, 0, 9)
///     .predator_at(5, 5, 1)
///     .build();
/// assert_eq!(world.population().total(), 2);
/// ```
pub struct WorldBuilder {
    config: WatorConfig,
    animals: Vec<(Position, Animal)>,
}

impl WorldBuilder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            config: WatorConfig {
                width,
                height,
                initial_prey_count: 0,
                initial_predator_count: 0,
                parallelism: Some(1),
                record_events: true,
                ..WatorConfig::default()
            },
            animals: Vec::new(),
        }
    }

    /// Prey of the given age, with the configured prey energy.
    pub fn prey_at(mut self, x: u32, y: u32, age: u32) -> Self {
        let energy = self.config.initial_prey_energy;
        self.animals
            .push((Position::new(x, y), Animal::prey(age, energy)));
        self
    }

    pub fn predator_at(mut self, x: u32, y: u32, energy: i64) -> Self {
        self.animals
            .push((Position::new(x, y), Animal::predator(energy)));
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn parallelism(mut self, workers: usize) -> Self {
        self.config.parallelism = Some(workers);
        self
    }

    pub fn prey_breed_time(mut self, steps: u32) -> Self {
        self.config.prey_breed_time = steps;
        self
    }

    pub fn prey_energy(mut self, energy: i64) -> Self {
        self.config.initial_prey_energy = energy;
        self
    }

    pub fn predator_breed_energy(mut self, energy: i64) -> Self {
        self.config.predator_breed_energy = energy;
        self
    }

    /// The configuration the world will be built from.
    pub fn config(&self) -> &WatorConfig {
        &self.config
    }

    /// Build the world; panics on an invalid fixture.
    pub fn build(self) -> WatorWorld {
        WatorWorld::with_animals(self.config, self.animals).expect("invalid test fixture")
    }
}

/// A randomly populated world with event recording on.
pub fn random_world(
    width: u32,
    height: u32,
    prey: usize,
    predators: usize,
    seed: u64,
    parallelism: usize,
) -> WatorWorld {
    WatorWorld::new(WatorConfig {
        width,
        height,
        initial_prey_count: prey,
        initial_predator_count: predators,
        seed,
        parallelism: Some(parallelism),
        record_events: true,
        ..WatorConfig::default()
    })
    .expect("invalid random world config")
}
