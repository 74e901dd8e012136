//! Column-partitioned matrix multiplication.
//!
//! The output columns are split into contiguous chunks. All but the last chunk
//! are handed to tasks of an in-place rayon scope; the calling thread computes
//! the last chunk itself (even when it is not a pool thread) and the scope joins
//! every task before the product is returned.

use std::ops::{Mul, Range};

use log::{debug, trace};

use super::DenseMatrix;
use crate::error::{LinalgError, Result};
use crate::utils::Scalar;

/// Fewest output columns worth handing to a separate worker.
pub const DEFAULT_MIN_COLS_PER_WORKER: usize = 50;

/// Partitioning policy for [`DenseMatrix::matmul_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MulConfig {
    min_cols_per_worker: usize,
    max_workers: Option<usize>,
}

impl Default for MulConfig {
    fn default() -> Self {
        MulConfig {
            min_cols_per_worker: DEFAULT_MIN_COLS_PER_WORKER,
            max_workers: None,
        }
    }
}

impl MulConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum number of output columns per worker (at least one).
    pub fn min_cols_per_worker(mut self, cols: usize) -> Self {
        self.min_cols_per_worker = cols.max(1);
        self
    }

    /// Caps the number of workers (at least one). Without a cap the limit is
    /// `max(2, rayon::current_num_threads())`.
    pub fn max_workers(mut self, workers: usize) -> Self {
        self.max_workers = Some(workers.max(1));
        self
    }

    pub fn available_workers(&self) -> usize {
        self.max_workers
            .unwrap_or_else(|| rayon::current_num_threads().max(2))
    }

    /// Number of workers used for a product with `out_cols` columns:
    /// `min(available, ceil(out_cols / min_cols_per_worker))`, never below one.
    pub fn worker_count(&self, out_cols: usize) -> usize {
        let wanted = out_cols.div_ceil(self.min_cols_per_worker);
        self.available_workers().min(wanted).max(1)
    }
}

impl<T: Scalar> DenseMatrix<T> {
    /// Matrix product `self * other` under the default [`MulConfig`].
    ///
    /// # Errors
    /// `DimensionMismatch` if `self.cols() != other.rows()`.
    pub fn matmul(&self, other: &Self) -> Result<Self> {
        self.matmul_with(other, &MulConfig::default())
    }

    /// Matrix product `self * other` partitioned according to `config`.
    ///
    /// The result does not depend on the partitioning: every cell is the same
    /// left-to-right inner product no matter which worker computes it.
    pub fn matmul_with(&self, other: &Self, config: &MulConfig) -> Result<Self> {
        if self.cols != other.rows {
            return Err(LinalgError::DimensionMismatch {
                op: "matmul",
                left: self.shape(),
                right: other.shape(),
            });
        }

        let rows = self.rows;
        let cols = other.cols;
        let workers = config.worker_count(cols);
        let chunk = cols / workers;
        debug!(
            "Multiplying {}x{} by {}x{} with {} workers, {} columns per chunk",
            self.rows, self.cols, other.rows, other.cols, workers, chunk
        );

        // Filled column by column: output column `k` occupies
        // `columns[k * rows..(k + 1) * rows]`, so every chunk is one contiguous slab.
        let mut columns = vec![T::zero(); rows * cols];
        partition_columns(&mut columns, rows, workers, |range, slab| {
            self.fill_columns(other, range, slab)
        });

        Ok(DenseMatrix::from_parts(cols, rows, columns).transpose())
    }

    /// Writes output columns `range` into `out`, one contiguous column at a time.
    fn fill_columns(&self, other: &Self, range: Range<usize>, out: &mut [T]) {
        for (k, column) in range.zip(out.chunks_exact_mut(self.rows)) {
            for (i, cell) in column.iter_mut().enumerate() {
                let lhs = &self.data[i * self.cols..(i + 1) * self.cols];
                *cell = lhs
                    .iter()
                    .enumerate()
                    .fold(T::zero(), |acc, (j, &a)| acc + a * other.data[j * other.cols + k]);
            }
        }
    }
}

/// Splits the column-major buffer `columns` (columns of height `rows`) into
/// `workers` contiguous chunks and runs `fill` on each. The first
/// `workers - 1` chunks go to spawned tasks; the last one, which absorbs the
/// remainder, runs on the calling thread.
fn partition_columns<T, F>(columns: &mut [T], rows: usize, workers: usize, fill: F)
where
    T: Send,
    F: Fn(Range<usize>, &mut [T]) + Sync,
{
    let cols = columns.len() / rows;
    let chunk = cols / workers;
    let tail_start = (workers - 1) * chunk;
    let (head, tail) = columns.split_at_mut(tail_start * rows);
    let fill = &fill;

    rayon::in_place_scope(move |scope| {
        for (w, slab) in head.chunks_exact_mut(chunk * rows).enumerate() {
            let range = w * chunk..(w + 1) * chunk;
            trace!("Dispatching columns {:?}", range);
            scope.spawn(move |_| fill(range, slab));
        }
        fill(tail_start..cols, tail);
    });
}

impl<T: Scalar> Mul for &DenseMatrix<T> {
    type Output = Result<DenseMatrix<T>>;

    fn mul(self, rhs: Self) -> Self::Output {
        self.matmul(rhs)
    }
}
