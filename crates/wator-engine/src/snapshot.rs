//! Owned, post-commit copies of the grid.
//!
//! A [`WorldSnapshot`] classifies each cell as water, prey, or predator.
//! It does not borrow the world, so it can be sent to another thread
//! (the runner publishes one per step on its channel).

use wator_core::{Animal, Position, Species, StepId};

use crate::metrics::Population;

/// What a single cell holds, as seen by a renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// Empty cell.
    #[default]
    Water,
    /// Cell occupied by prey.
    Prey,
    /// Cell occupied by a predator.
    Predator,
}

impl CellKind {
    /// Classify an optional occupant.
    pub fn of(cell: Option<&Animal>) -> Self {
        match cell.map(|a| a.species) {
            None => Self::Water,
            Some(Species::Prey) => Self::Prey,
            Some(Species::Predator) => Self::Predator,
        }
    }

    /// Display colour: dark blue water, white prey, red predators.
    pub fn rgba(self) -> [u8; 4] {
        match self {
            Self::Water => [0, 0, 139, 255],
            Self::Prey => [255, 255, 255, 255],
            Self::Predator => [255, 0, 0, 255],
        }
    }
}

/// The grid at the end of a step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldSnapshot {
    step: StepId,
    width: u32,
    height: u32,
    cells: Vec<CellKind>,
    population: Population,
}

impl WorldSnapshot {
    pub(crate) fn new(step: StepId, width: u32, height: u32, cells: Vec<CellKind>) -> Self {
        debug_assert_eq!(cells.len(), width as usize * height as usize);
        let mut population = Population::default();
        for cell in &cells {
            match cell {
                CellKind::Water => {}
                CellKind::Prey => population.prey += 1,
                CellKind::Predator => population.predators += 1,
            }
        }
        Self {
            step,
            width,
            height,
            cells,
            population,
        }
    }

    /// Step that produced this state. `StepId(0)` is the initial state.
    pub fn step(&self) -> StepId {
        self.step
    }

    /// Number of columns.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major cell classification, `y * width + x`.
    pub fn cells(&self) -> &[CellKind] {
        &self.cells
    }

    /// Classification of the cell at `pos`, or `None` if out of bounds.
    pub fn get(&self, pos: Position) -> Option<CellKind> {
        if pos.x >= self.width || pos.y >= self.height {
            return None;
        }
        let idx = pos.y as usize * self.width as usize + pos.x as usize;
        self.cells.get(idx).copied()
    }

    /// Animal counts in this snapshot.
    pub fn population(&self) -> Population {
        self.population
    }

    /// Row-major RGBA8 image, four bytes per cell.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.cells.iter().flat_map(|c| c.rgba()).collect()
    }
}
