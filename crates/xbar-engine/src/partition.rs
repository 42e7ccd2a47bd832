//! Explicit row partitioning for data-parallel compute.
//!
//! A [`RowPartition`] is a list of contiguous, non-empty, non-overlapping row
//! ranges that together cover `0..size`. The constructor enforces that
//! invariant, and [`split()`](RowPartition::split) turns the partition into
//! disjoint mutable borrows of the cell grid and the output vector, so two
//! workers can never observe the same cell.

use std::ops::Range;

use thiserror::Error;
use xbar_core::Cell;

/// Violations of the row partition invariant.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PartitionError {
    /// The crossbar has no rows.
    #[error("cannot partition zero rows")]
    NoRows,
    /// Band `index` is empty.
    #[error("band {index} is empty")]
    EmptyBand {
        /// Position of the band in the partition.
        index: usize,
    },
    /// Band `index` does not start where the previous band ended.
    #[error("band {index} starts at row {found}, expected {expected}")]
    NotContiguous {
        /// Position of the band in the partition.
        index: usize,
        /// Row the band should start at.
        expected: usize,
        /// Row the band actually starts at.
        found: usize,
    },
    /// The bands stop short of, or run past, the last row.
    #[error("bands cover {covered} rows of {size}")]
    Coverage {
        /// Rows covered by the bands.
        covered: usize,
        /// Rows in the crossbar.
        size: usize,
    },
}

/// Contiguous row bands tiling a `size x size` crossbar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowPartition {
    size: usize,
    bands: Vec<Range<usize>>,
}

impl RowPartition {
    /// Split `size` rows into `min(workers, size)` bands of near-equal
    /// height. Earlier bands take the remainder rows.
    pub fn even(size: usize, workers: usize) -> Result<Self, PartitionError> {
        if size == 0 {
            return Err(PartitionError::NoRows);
        }
        let n = workers.clamp(1, size);
        let base = size / n;
        let extra = size % n;
        let mut bands = Vec::with_capacity(n);
        let mut start = 0;
        for i in 0..n {
            let height = base + usize::from(i < extra);
            bands.push(start..start + height);
            start += height;
        }
        Self::from_bands(size, bands)
    }

    /// Build a partition from explicit bands, checking the invariant.
    pub fn from_bands(size: usize, bands: Vec<Range<usize>>) -> Result<Self, PartitionError> {
        if size == 0 {
            return Err(PartitionError::NoRows);
        }
        let mut expected = 0;
        for (index, band) in bands.iter().enumerate() {
            if band.start != expected {
                return Err(PartitionError::NotContiguous {
                    index,
                    expected,
                    found: band.start,
                });
            }
            if band.is_empty() {
                return Err(PartitionError::EmptyBand { index });
            }
            expected = band.end;
        }
        if expected != size {
            return Err(PartitionError::Coverage {
                covered: expected,
                size,
            });
        }
        Ok(Self { size, bands })
    }

    /// Rows in the partitioned crossbar.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of bands (parallel work items).
    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    /// The bands in row order.
    pub fn bands(&self) -> &[Range<usize>] {
        &self.bands
    }

    /// Hand each band its own slice of cells and output currents.
    ///
    /// `cells` must hold `size * size` elements and `currents` `size`
    /// elements; the kernel checks both before calling.
    pub fn split<'a>(&self, cells: &'a mut [Cell], currents: &'a mut [f64]) -> Vec<RowBand<'a>> {
        debug_assert_eq!(cells.len(), self.size * self.size);
        debug_assert_eq!(currents.len(), self.size);
        let mut out = Vec::with_capacity(self.bands.len());
        let mut cells_rest = cells;
        let mut currents_rest = currents;
        for band in &self.bands {
            let rows = band.len();
            let (band_cells, tail_cells) =
                std::mem::take(&mut cells_rest).split_at_mut(rows * self.size);
            let (band_currents, tail_currents) =
                std::mem::take(&mut currents_rest).split_at_mut(rows);
            out.push(RowBand {
                first_row: band.start,
                size: self.size,
                cells: band_cells,
                currents: band_currents,
            });
            cells_rest = tail_cells;
            currents_rest = tail_currents;
        }
        out
    }
}

/// One worker's exclusive share of the crossbar.
#[derive(Debug)]
pub struct RowBand<'a> {
    first_row: usize,
    size: usize,
    cells: &'a mut [Cell],
    currents: &'a mut [f64],
}

impl RowBand<'_> {
    /// Global index of the band's first row.
    pub fn first_row(&self) -> usize {
        self.first_row
    }

    /// Rows in this band.
    pub fn rows(&self) -> usize {
        self.currents.len()
    }

    /// Iterate `(global_row, cells, current_slot)` in row order.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = (usize, &mut [Cell], &mut f64)> + '_ {
        let first = self.first_row;
        self.cells
            .chunks_exact_mut(self.size)
            .zip(self.currents.iter_mut())
            .enumerate()
            .map(move |(i, (cells, current))| (first + i, cells, current))
    }
}
