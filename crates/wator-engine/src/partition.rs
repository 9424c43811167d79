//! Splitting the visitation order into worker-sized chunks.

/// Smallest partition handed to a worker, bounding per-task overhead.
pub const MIN_PARTITION_CELLS: usize = 100;

/// A contiguous range `[start, end)` of the step's visitation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Partition {
    /// Position of this partition in the step; also selects its RNG stream.
    pub index: usize,
    /// First schedule slot (inclusive).
    pub start: usize,
    /// Last schedule slot (exclusive).
    pub end: usize,
}

impl Partition {
    /// Number of schedule slots covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the partition covers no slots.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Cells per partition for `cell_count` cells and `parallelism` workers.
///
/// Aims for two partitions per worker, but never goes below
/// [`MIN_PARTITION_CELLS`].
pub fn partition_size(cell_count: usize, parallelism: usize) -> usize {
    let target = parallelism.max(1) * 2;
    (cell_count / target).max(MIN_PARTITION_CELLS)
}

/// Cover `[0, cell_count)` with order-preserving, non-overlapping partitions.
pub fn partitions(cell_count: usize, parallelism: usize) -> Vec<Partition> {
    let size = partition_size(cell_count, parallelism);
    (0..cell_count)
        .step_by(size)
        .enumerate()
        .map(|(index, start)| Partition {
            index,
            start,
            end: (start + size).min(cell_count),
        })
        .collect()
}
