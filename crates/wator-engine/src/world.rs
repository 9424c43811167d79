//! The Wator world and its step pipeline.
//!
//! [`WatorWorld`] owns the shared grid, the visitation schedule, the
//! master RNG, and the worker pool. Each call to
//! [`execute_step()`](WatorWorld::execute_step) runs:
//!
//! 1. **Shuffle** the visitation order from the previous permutation.
//! 2. **Update** every partition of the order on the pool. Each scheduled
//!    cell holding an unmoved animal is evaluated under the grid lock.
//! 3. **Commit** row by row on the pool, clearing every `moved` flag.
//!
//! Commit starts only once every update task has returned, and
//! `execute_step` returns only after commit, so every state the caller
//! can observe is a post-commit state.
//!
//! # Failure
//!
//! A consistency fault aborts the update phase and is returned as
//! [`StepError::Consistency`]. Cells touched before the fault keep their
//! changes and no commit runs. The world is then halted: every later call
//! returns [`StepError::Halted`] without touching the grid.
//!
//! # Reproducibility
//!
//! Every step draws one seed from the master generator. The shuffle runs
//! on stream 0 of that seed and partition `k` on stream `k + 1`. With a
//! parallelism of 1 there is no pool and partitions run in order on the
//! calling thread, so a fixed seed gives bit-identical runs.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, error, info};
use wator_core::{Animal, ConsistencyFault, Position, StepError, StepId};
use wator_space::Torus;

use crate::behavior::{self, Rules};
use crate::config::{ConfigError, WatorConfig};
use crate::events::{StepEvent, StepTally};
use crate::grid::SharedGrid;
use crate::metrics::{Population, StepMetrics};
use crate::partition::{partitions, Partition};
use crate::schedule::ShuffleSchedule;
use crate::snapshot::{CellKind, WorldSnapshot};

// The runner moves the world onto its own thread.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<WatorWorld>();
    }
};

// ── StepReport ──────────────────────────────────────────────────

/// Result of a successful [`WatorWorld::execute_step()`] call.
#[derive(Clone, Debug)]
pub struct StepReport {
    /// The step that just completed.
    pub step: StepId,
    /// Timings and counters for this step.
    pub metrics: StepMetrics,
    /// Every state change in evaluation order, partition by partition.
    /// Empty unless [`WatorConfig::record_events`] is set.
    pub events: Vec<StepEvent>,
}

// ── WatorWorld ──────────────────────────────────────────────────

/// A toroidal ocean of prey and predators.
///
/// # Example
///
/// ```
/// use wator_engine::{WatorConfig, WatorWorld};
///
/// let config = WatorConfig {
///     width: 40,
///     height: 30,
///     initial_prey_count: 300,
///     initial_predator_count: 60,
///     parallelism: Some(1),
///     ..WatorConfig::default()
/// };
/// let mut world = WatorWorld::new(config).unwrap();
/// let report = world.execute_step().unwrap();
/// assert_eq!(report.step.0, 1);
/// assert_eq!(world.snapshot().population(), report.metrics.population);
/// ```
pub struct WatorWorld {
    grid: SharedGrid,
    schedule: ShuffleSchedule,
    partitions: Vec<Partition>,
    rules: Rules,
    rng: ChaCha8Rng,
    pool: Option<rayon::ThreadPool>,
    parallelism: usize,
    step: StepId,
    halted: bool,
    record_events: bool,
    population: Population,
    /// Cell whose evaluation reports a fault, for exercising the halt path.
    #[cfg(test)]
    fault_at: Option<Position>,
}

impl WatorWorld {
    /// Create a world with randomly scattered animals.
    ///
    /// A random permutation of the cell indices decides each cell's
    /// occupant: the first `initial_prey_count` values become prey with a
    /// random age below `prey_breed_time`, the next
    /// `initial_predator_count` become predators, the rest stay empty.
    pub fn new(config: WatorConfig) -> Result<Self, ConfigError> {
        let torus = config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

        let prey = config.initial_prey_count;
        let stocked = prey + config.initial_predator_count;
        let mut matrix: Vec<usize> = (0..torus.cell_count()).collect();
        matrix.shuffle(&mut rng);
        let cells = matrix
            .into_iter()
            .map(|value| {
                if value < prey {
                    let age = rng.gen_range(0..config.prey_breed_time);
                    Some(Animal::prey(age, config.initial_prey_energy))
                } else if value < stocked {
                    Some(Animal::predator(config.initial_predator_energy))
                } else {
                    None
                }
            })
            .collect();

        Self::assemble(&config, torus, rng, cells)
    }

    /// Create a world holding exactly the given animals.
    ///
    /// The initial population counts in `config` are ignored. Placed
    /// animals start the first step unmoved whatever their `moved` flag.
    pub fn with_animals(
        config: WatorConfig,
        placements: impl IntoIterator<Item = (Position, Animal)>,
    ) -> Result<Self, ConfigError> {
        let torus = config.validate_rules()?;
        let mut cells = vec![None; torus.cell_count()];
        for (position, mut animal) in placements {
            let idx = torus
                .checked_index(position)
                .map_err(|_| ConfigError::PlacementOutOfBounds { position })?;
            if cells[idx].is_some() {
                return Err(ConfigError::DuplicatePlacement { position });
            }
            animal.commit();
            cells[idx] = Some(animal);
        }
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self::assemble(&config, torus, rng, cells)
    }

    fn assemble(
        config: &WatorConfig,
        torus: Torus,
        mut rng: ChaCha8Rng,
        cells: Vec<Option<Animal>>,
    ) -> Result<Self, ConfigError> {
        let mut population = Population::default();
        for animal in cells.iter().flatten() {
            population.count(animal);
        }

        let parallelism = config.resolved_parallelism();
        let pool = if parallelism > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(parallelism)
                .thread_name(|i| format!("wator-worker-{i}"))
                .build()
                .map_err(|e| ConfigError::ThreadPool {
                    reason: e.to_string(),
                })?;
            Some(pool)
        } else {
            None
        };

        let cell_count = torus.cell_count();
        info!(
            width = torus.width(),
            height = torus.height(),
            prey = population.prey,
            predators = population.predators,
            parallelism,
            seed = config.seed,
            "wator world created"
        );

        Ok(Self {
            grid: SharedGrid::from_cells(torus, cells),
            schedule: ShuffleSchedule::new(cell_count, &mut rng),
            partitions: partitions(cell_count, parallelism),
            rules: Rules::from(config),
            rng,
            pool,
            parallelism,
            step: StepId(0),
            halted: false,
            record_events: config.record_events,
            population,
            #[cfg(test)]
            fault_at: None,
        })
    }

    /// Advance the world by one step.
    ///
    /// # Errors
    ///
    /// [`StepError::Consistency`] if the update phase detected a broken
    /// invariant, [`StepError::WorkerPanicked`] if a worker panicked, and
    /// [`StepError::Halted`] for every call after either of those.
    pub fn execute_step(&mut self) -> Result<StepReport, StepError> {
        if self.halted {
            return Err(StepError::Halted);
        }
        let step_start = Instant::now();
        let step_seed: u64 = self.rng.gen();

        let shuffle_start = Instant::now();
        self.schedule
            .reshuffle(&mut ChaCha8Rng::seed_from_u64(step_seed));
        let shuffle_us = elapsed_us(shuffle_start);

        let update_start = Instant::now();
        let tally = match self.update(step_seed) {
            Ok(tally) => tally,
            Err(e) => {
                self.halt(&e);
                return Err(e);
            }
        };
        let update_us = elapsed_us(update_start);

        let commit_start = Instant::now();
        let population = match self.commit() {
            Ok(population) => population,
            Err(e) => {
                self.halt(&e);
                return Err(e);
            }
        };
        let commit_us = elapsed_us(commit_start);

        self.step = self.step.next();
        self.population = population;

        let metrics = StepMetrics {
            total_us: elapsed_us(step_start),
            shuffle_us,
            update_us,
            commit_us,
            partitions: self.partitions.len(),
            workers: self.parallelism,
            evaluated: tally.evaluated,
            moves: tally.moves,
            prey_born: tally.prey_born,
            predators_born: tally.predators_born,
            prey_eaten: tally.prey_eaten,
            predators_starved: tally.predators_starved,
            population,
        };
        debug!(
            step = self.step.0,
            prey = population.prey,
            predators = population.predators,
            evaluated = metrics.evaluated,
            total_us = metrics.total_us,
            "step complete"
        );

        Ok(StepReport {
            step: self.step,
            metrics,
            events: tally.into_events(),
        })
    }

    /// Update phase: evaluate every scheduled cell once, partition by
    /// partition, and merge the tallies in partition order.
    fn update(&self, step_seed: u64) -> Result<StepTally, StepError> {
        let grid = &self.grid;
        let rules = &self.rules;
        let order = self.schedule.order();
        let record_events = self.record_events;
        let abort = AtomicBool::new(false);
        #[cfg(test)]
        let fault_at = self.fault_at;

        let run_partition = |part: &Partition| -> Result<StepTally, ConsistencyFault> {
            let mut rng = ChaCha8Rng::seed_from_u64(step_seed);
            rng.set_stream(part.index as u64 + 1);
            let mut tally = StepTally::new(record_events);
            for &index in &order[part.start..part.end] {
                if abort.load(Ordering::Relaxed) {
                    break;
                }
                let pos = grid.torus().position(index as usize);
                let mut cells = grid.lock();
                if !cells.get(pos).is_some_and(|a| !a.moved) {
                    continue;
                }
                #[cfg(test)]
                if fault_at == Some(pos) {
                    abort.store(true, Ordering::Relaxed);
                    return Err(ConsistencyFault::MissingAnimal { at: pos });
                }
                let evaluated = behavior::evaluate(&mut cells, pos, rules, &mut rng, &mut tally);
                if let Err(fault) = evaluated {
                    abort.store(true, Ordering::Relaxed);
                    return Err(fault);
                }
            }
            Ok(tally)
        };

        let results = panic::catch_unwind(AssertUnwindSafe(|| match &self.pool {
            Some(pool) => pool.install(|| {
                self.partitions
                    .par_iter()
                    .map(run_partition)
                    .collect::<Vec<_>>()
            }),
            None => self.partitions.iter().map(run_partition).collect(),
        }))
        .map_err(|_| StepError::WorkerPanicked)?;

        let mut total = StepTally::new(record_events);
        for result in results {
            total.merge(result?);
        }
        Ok(total)
    }

    /// Commit phase: clear `moved` flags row by row and count survivors.
    fn commit(&self) -> Result<Population, StepError> {
        let grid = &self.grid;
        let height = grid.torus().height();
        panic::catch_unwind(AssertUnwindSafe(|| match &self.pool {
            Some(pool) => pool.install(|| {
                (0..height)
                    .into_par_iter()
                    .map(|y| grid.commit_row(y))
                    .reduce(Population::default, |a, b| a + b)
            }),
            None => (0..height)
                .map(|y| grid.commit_row(y))
                .fold(Population::default(), |a, b| a + b),
        }))
        .map_err(|_| StepError::WorkerPanicked)
    }

    fn halt(&mut self, err: &StepError) {
        self.halted = true;
        error!(step = self.step.next().0, error = %err, "step failed, world halted");
    }

    /// Owned copy of the grid, read row by row under the grid lock.
    pub fn snapshot(&self) -> WorldSnapshot {
        let torus = self.grid.torus();
        let mut cells = Vec::with_capacity(torus.cell_count());
        for y in 0..torus.height() {
            cells.extend(
                self.grid
                    .read_row(y)
                    .iter()
                    .map(|cell| CellKind::of(cell.as_ref())),
            );
        }
        WorldSnapshot::new(self.step, torus.width(), torus.height(), cells)
    }

    /// Every living animal with its position, in row-major order.
    pub fn animals(&self) -> Vec<(Position, Animal)> {
        let torus = self.grid.torus();
        let mut out = Vec::with_capacity(self.population.total());
        for y in 0..torus.height() {
            for (x, cell) in self.grid.read_row(y).into_iter().enumerate() {
                if let Some(animal) = cell {
                    out.push((Position::new(x as u32, y), animal));
                }
            }
        }
        out
    }

    /// The animal at `pos`, or `None` if the cell is empty or off the grid.
    pub fn animal_at(&self, pos: Position) -> Option<Animal> {
        if !self.grid.torus().contains(pos) {
            return None;
        }
        self.grid.lock().get(pos).copied()
    }

    /// Grid topology.
    pub fn torus(&self) -> &Torus {
        self.grid.torus()
    }

    /// Number of columns.
    pub fn width(&self) -> u32 {
        self.grid.torus().width()
    }

    /// Number of rows.
    pub fn height(&self) -> u32 {
        self.grid.torus().height()
    }

    /// Last completed step. `StepId(0)` before the first step.
    pub fn step_id(&self) -> StepId {
        self.step
    }

    /// Animal counts after the last completed step.
    pub fn population(&self) -> Population {
        self.population
    }

    /// Whether a failed step has stopped this world.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Worker pool size (1 means no pool).
    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    /// Partitions each step is split into.
    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }
}

fn elapsed_us(start: Instant) -> u64 {
    start.elapsed().as_micros() as u64
}
