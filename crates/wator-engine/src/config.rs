//! World configuration, validation, and error types.
//!
//! [`WatorConfig`] is the builder-input for constructing a
//! [`WatorWorld`](crate::WatorWorld). [`validate()`](WatorConfig::validate)
//! checks every structural invariant up front; a world whose
//! configuration fails validation is never created.

use std::error::Error;
use std::fmt;

use wator_core::Position;
use wator_space::{SpaceError, Torus};

/// Upper bound on the worker pool size.
pub const MAX_PARALLELISM: usize = 256;

/// Upper bound on any configured energy.
///
/// A predator's energy never exceeds twice this after a meal, so the
/// arithmetic in a step stays well inside `i64`.
pub const MAX_ENERGY: i64 = i64::MAX / 4;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while validating a [`WatorConfig`] or seeding a world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Grid dimensions are zero or too large.
    Space(SpaceError),
    /// Initial prey and predators do not fit on the grid.
    PopulationExceedsCapacity {
        /// Requested number of animals.
        requested: usize,
        /// Number of cells on the grid.
        capacity: usize,
    },
    /// `prey_breed_time` is zero.
    InvalidBreedTime,
    /// `predator_breed_energy` is outside `[1, MAX_ENERGY]`.
    InvalidBreedEnergy {
        /// The configured value.
        value: i64,
    },
    /// An initial energy is out of range.
    InvalidEnergy {
        /// Which parameter is wrong.
        name: &'static str,
        /// The configured value.
        value: i64,
    },
    /// `parallelism` is `Some(0)` or above [`MAX_PARALLELISM`].
    InvalidParallelism {
        /// The configured value.
        value: usize,
    },
    /// A hand-placed animal lies outside the grid.
    PlacementOutOfBounds {
        /// The offending position.
        position: Position,
    },
    /// Two hand-placed animals share a cell.
    DuplicatePlacement {
        /// The contested position.
        position: Position,
    },
    /// The worker pool could not be built.
    ThreadPool {
        /// Reason reported by the pool builder.
        reason: String,
    },
    /// A background thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of which thread failed.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Space(e) => write!(f, "space: {e}"),
            Self::PopulationExceedsCapacity {
                requested,
                capacity,
            } => write!(
                f,
                "initial population {requested} exceeds grid capacity {capacity}"
            ),
            Self::InvalidBreedTime => write!(f, "prey_breed_time must be at least 1"),
            Self::InvalidBreedEnergy { value } => {
                write!(
                    f,
                    "predator_breed_energy must be in [1, {MAX_ENERGY}], got {value}"
                )
            }
            Self::InvalidEnergy { name, value } => {
                write!(f, "{name} out of range, got {value}")
            }
            Self::InvalidParallelism { value } => write!(
                f,
                "parallelism must be in [1, {MAX_PARALLELISM}], got {value}"
            ),
            Self::PlacementOutOfBounds { position } => {
                write!(f, "placement {position} lies outside the grid")
            }
            Self::DuplicatePlacement { position } => {
                write!(f, "more than one animal placed at {position}")
            }
            Self::ThreadPool { reason } => write!(f, "worker pool: {reason}"),
            Self::ThreadSpawnFailed { reason } => write!(f, "thread spawn failed: {reason}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Space(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SpaceError> for ConfigError {
    fn from(e: SpaceError) -> Self {
        Self::Space(e)
    }
}

// ── WatorConfig ────────────────────────────────────────────────────

/// Complete configuration for constructing a Wator world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WatorConfig {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    /// Prey scattered at random on construction.
    pub initial_prey_count: usize,
    /// Energy given to every prey, initial or newborn. Predators gain it
    /// when they eat.
    pub initial_prey_energy: i64,
    /// Age at which prey breed; breeding lowers the parent's age by this much.
    pub prey_breed_time: u32,
    /// Predators scattered at random on construction.
    pub initial_predator_count: usize,
    /// Energy of every initial predator.
    pub initial_predator_energy: i64,
    /// Energy at which predators breed, splitting their energy with the child.
    pub predator_breed_energy: i64,
    /// Master RNG seed. Fixed seed plus `parallelism = Some(1)` gives
    /// bit-identical runs.
    pub seed: u64,
    /// Worker pool size. `None` = auto-detect (`available_parallelism`,
    /// clamped to `[1, MAX_PARALLELISM]`). Each step is split into roughly
    /// two partitions per worker.
    pub parallelism: Option<usize>,
    /// Record a [`StepEvent`](crate::StepEvent) log in every step report.
    pub record_events: bool,
}

impl Default for WatorConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            initial_prey_count: 20_000,
            initial_prey_energy: 10,
            prey_breed_time: 10,
            initial_predator_count: 5_000,
            initial_predator_energy: 50,
            predator_breed_energy: 100,
            seed: 0,
            parallelism: None,
            record_events: false,
        }
    }
}

impl WatorConfig {
    /// Validate all structural invariants, returning the grid topology.
    ///
    /// Checks dimensions, breeding thresholds, energies, parallelism, and
    /// that the initial population fits on the grid.
    pub fn validate(&self) -> Result<Torus, ConfigError> {
        let torus = self.validate_rules()?;
        let requested = self
            .initial_prey_count
            .saturating_add(self.initial_predator_count);
        if requested > torus.cell_count() {
            return Err(ConfigError::PopulationExceedsCapacity {
                requested,
                capacity: torus.cell_count(),
            });
        }
        Ok(torus)
    }

    /// Everything [`validate`](Self::validate) checks except the initial
    /// population counts. Used when animals are placed by hand.
    pub(crate) fn validate_rules(&self) -> Result<Torus, ConfigError> {
        let torus = Torus::new(self.width, self.height)?;
        if self.prey_breed_time == 0 {
            return Err(ConfigError::InvalidBreedTime);
        }
        if !(1..=MAX_ENERGY).contains(&self.predator_breed_energy) {
            return Err(ConfigError::InvalidBreedEnergy {
                value: self.predator_breed_energy,
            });
        }
        if !(0..=MAX_ENERGY).contains(&self.initial_prey_energy) {
            return Err(ConfigError::InvalidEnergy {
                name: "initial_prey_energy",
                value: self.initial_prey_energy,
            });
        }
        if !(1..=MAX_ENERGY).contains(&self.initial_predator_energy) {
            return Err(ConfigError::InvalidEnergy {
                name: "initial_predator_energy",
                value: self.initial_predator_energy,
            });
        }
        if let Some(n) = self.parallelism {
            if n == 0 || n > MAX_PARALLELISM {
                return Err(ConfigError::InvalidParallelism { value: n });
            }
        }
        Ok(torus)
    }

    /// Resolve the worker pool size, applying auto-detection if `None`.
    pub fn resolved_parallelism(&self) -> usize {
        match self.parallelism {
            Some(n) => n.clamp(1, MAX_PARALLELISM),
            None => {
                let cpus = std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(4);
                cpus.clamp(1, MAX_PARALLELISM)
            }
        }
    }
}
