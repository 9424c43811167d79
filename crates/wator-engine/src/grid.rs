//! The shared cell array and its locking discipline.
//!
//! [`SharedGrid`] is the only owner of cell data. Every read or write
//! goes through a [`GridGuard`] obtained from [`SharedGrid::lock`], so no
//! other module can touch a cell without holding the grid mutex. One
//! animal's whole transition runs under a single guard, which makes
//! "check the neighbour is free, move there, clear the source" atomic with
//! respect to every other worker.

use parking_lot::{Mutex, MutexGuard};
use wator_core::{Animal, ConsistencyFault, Position};
use wator_space::Torus;

use crate::metrics::Population;

/// Coarse-locked `width * height` array of optional animals.
pub(crate) struct SharedGrid {
    torus: Torus,
    cells: Mutex<Vec<Option<Animal>>>,
}

impl SharedGrid {
    /// An empty grid covering `torus`.
    #[cfg(test)]
    pub fn new(torus: Torus) -> Self {
        Self {
            torus,
            cells: Mutex::new(vec![None; torus.cell_count()]),
        }
    }

    /// A grid seeded with row-major `cells`, one entry per cell of `torus`.
    pub fn from_cells(torus: Torus, cells: Vec<Option<Animal>>) -> Self {
        debug_assert_eq!(cells.len(), torus.cell_count());
        Self {
            torus,
            cells: Mutex::new(cells),
        }
    }

    /// Grid topology.
    pub fn torus(&self) -> &Torus {
        &self.torus
    }

    /// Acquire the grid lock.
    pub fn lock(&self) -> GridGuard<'_> {
        GridGuard {
            torus: &self.torus,
            cells: self.cells.lock(),
        }
    }

    /// Commit phase for one row: clear every occupant's `moved` flag and
    /// count the survivors.
    pub fn commit_row(&self, y: u32) -> Population {
        let range = self.torus.row_range(y);
        let mut cells = self.cells.lock();
        let mut population = Population::default();
        for animal in cells[range].iter_mut().flatten() {
            animal.commit();
            population.count(animal);
        }
        population
    }

    /// Copy of one row, taken under the lock.
    pub fn read_row(&self, y: u32) -> Vec<Option<Animal>> {
        let range = self.torus.row_range(y);
        self.cells.lock()[range].to_vec()
    }
}

/// Exclusive access to every cell for as long as the guard lives.
pub(crate) struct GridGuard<'g> {
    torus: &'g Torus,
    cells: MutexGuard<'g, Vec<Option<Animal>>>,
}

impl GridGuard<'_> {
    /// Grid topology.
    pub fn torus(&self) -> &Torus {
        self.torus
    }

    /// Occupant of `pos`, if any.
    pub fn get(&self, pos: Position) -> Option<&Animal> {
        self.cells[self.torus.index(pos)].as_ref()
    }

    /// Whether `pos` is empty.
    #[cfg(test)]
    pub fn is_free(&self, pos: Position) -> bool {
        self.get(pos).is_none()
    }

    /// Put `animal` into an empty cell.
    pub fn place(&mut self, pos: Position, animal: Animal) -> Result<(), ConsistencyFault> {
        let idx = self.torus.index(pos);
        if self.cells[idx].is_some() {
            return Err(ConsistencyFault::OccupiedTarget { from: pos, to: pos });
        }
        self.cells[idx] = Some(animal);
        Ok(())
    }

    /// Overwrite the occupant of `pos` with an updated record of itself.
    pub fn store(&mut self, pos: Position, animal: Animal) -> Result<(), ConsistencyFault> {
        let idx = self.torus.index(pos);
        match &mut self.cells[idx] {
            Some(slot) => {
                *slot = animal;
                Ok(())
            }
            None => Err(ConsistencyFault::MissingAnimal { at: pos }),
        }
    }

    /// Remove and return the occupant of `pos`.
    pub fn take(&mut self, pos: Position) -> Option<Animal> {
        let idx = self.torus.index(pos);
        self.cells[idx].take()
    }

    /// Move the occupant of `from` into the empty cell `to`.
    pub fn relocate(&mut self, from: Position, to: Position) -> Result<(), ConsistencyFault> {
        let src = self.torus.index(from);
        let dst = self.torus.index(to);
        if self.cells[dst].is_some() {
            return Err(ConsistencyFault::OccupiedTarget { from, to });
        }
        let animal = self.cells[src]
            .take()
            .ok_or(ConsistencyFault::MissingAnimal { at: from })?;
        self.cells[dst] = Some(animal);
        Ok(())
    }

    /// Place a newborn from the parent at `parent` into the empty cell `child`.
    pub fn spawn(
        &mut self,
        parent: Position,
        child: Position,
        animal: Animal,
    ) -> Result<(), ConsistencyFault> {
        self.place(child, animal)
            .map_err(|_| ConsistencyFault::OccupiedTarget {
                from: parent,
                to: child,
            })
    }
}
