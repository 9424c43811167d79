//! Randomized cell visitation order.
//!
//! The schedule is a permutation of every linear cell index. It is built
//! once, then reshuffled in place at the start of every step (the previous
//! permutation is the input of the next shuffle). The shuffle finishes
//! before any worker reads the order, after which the order is read-only
//! for the rest of the step.

use rand::seq::SliceRandom;
use rand::Rng;

/// Permutation of `[0, cell_count)` reshuffled every step.
#[derive(Clone, Debug)]
pub struct ShuffleSchedule {
    order: Vec<u32>,
}

impl ShuffleSchedule {
    /// Build the identity permutation over `cell_count` cells and shuffle it.
    ///
    /// `cell_count` must fit in `u32`; the torus guarantees this.
    pub fn new<R: Rng + ?Sized>(cell_count: usize, rng: &mut R) -> Self {
        debug_assert!(cell_count as u64 <= u64::from(u32::MAX));
        let mut schedule = Self {
            order: (0..cell_count as u32).collect(),
        };
        schedule.reshuffle(rng);
        schedule
    }

    /// Fisher–Yates shuffle of the current permutation. O(N) time, in place.
    pub fn reshuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.order.shuffle(rng);
    }

    /// The current visitation order.
    pub fn order(&self) -> &[u32] {
        &self.order
    }

    /// Number of scheduled cells.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Always `false` for a schedule built from a non-empty grid.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
