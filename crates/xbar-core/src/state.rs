//! The owned `size x size` grid of cell state.
//!
//! [`CrossbarState`] is a row-major dense array: cell `(row, col)` lives at
//! flat index `row * size + col`. The array is allocated once and never
//! resized; a different size requires a new state.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::cell::Cell;
use crate::constants::{AMBIENT_TEMPERATURE, OFF_STATE_CONDUCTANCE};
use crate::error::StateError;

/// Initial conductance and temperature applied to every cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InitialConditions {
    /// Off-state conductance in Siemens. Must be strictly positive.
    pub conductance: f64,
    /// Starting temperature in Kelvin. Must be strictly positive.
    pub temperature: f64,
}

impl InitialConditions {
    /// Check that both values are finite and strictly positive.
    pub fn validate(&self) -> Result<(), StateError> {
        for (parameter, value) in [
            ("conductance", self.conductance),
            ("temperature", self.temperature),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(StateError::InvalidInitialCondition { parameter, value });
            }
        }
        Ok(())
    }
}

impl Default for InitialConditions {
    fn default() -> Self {
        Self {
            conductance: OFF_STATE_CONDUCTANCE,
            temperature: AMBIENT_TEMPERATURE,
        }
    }
}

/// Row-major grid of [`Cell`]s, exclusively owned by one engine.
#[derive(Clone, Debug)]
pub struct CrossbarState {
    size: usize,
    cells: Vec<Cell>,
    seed: u64,
    initial: InitialConditions,
}

impl CrossbarState {
    /// Allocate and initialize a `size x size` crossbar with default
    /// initial conditions.
    ///
    /// With `seed = None` a fresh seed is drawn from the thread RNG; the
    /// resolved value is available from [`seed()`](Self::seed).
    ///
    /// # Errors
    ///
    /// [`StateError::InvalidDimension`] if `size == 0` or the grid would not
    /// fit in addressable memory.
    pub fn new(size: usize, seed: Option<u64>) -> Result<Self, StateError> {
        Self::with_conditions(size, seed, InitialConditions::default())
    }

    /// Like [`new()`](Self::new) with explicit initial conditions.
    ///
    /// # Errors
    ///
    /// [`StateError::InvalidInitialCondition`] if `initial` fails
    /// [`InitialConditions::validate`], checked before the size.
    pub fn with_conditions(
        size: usize,
        seed: Option<u64>,
        initial: InitialConditions,
    ) -> Result<Self, StateError> {
        initial.validate()?;
        let cell_count = checked_cell_count(size)?;
        let mut state = Self {
            size,
            cells: Vec::with_capacity(cell_count),
            seed: seed.unwrap_or_else(rand::random),
            initial,
        };
        state.initialize();
        Ok(state)
    }

    /// Reset every cell to its initial state.
    ///
    /// Idempotent: the drift field is regenerated from the stored seed, so
    /// repeated calls produce bit-identical state.
    pub fn initialize(&mut self) {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let InitialConditions {
            conductance,
            temperature,
        } = self.initial;
        let cell_count = self.size * self.size;
        self.cells.clear();
        self.cells.extend(
            (0..cell_count).map(|_| Cell::new(conductance, temperature, rng.random::<f64>())),
        );
    }

    /// Replace the seed (or draw a fresh one) and re-run
    /// [`initialize()`](Self::initialize).
    pub fn reinitialize(&mut self, seed: Option<u64>) {
        self.seed = seed.unwrap_or_else(rand::random);
        self.initialize();
    }

    /// Edge length of the crossbar.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells (`size * size`).
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// The seed the drift field was generated from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Initial conditions applied by [`initialize()`](Self::initialize).
    pub fn initial_conditions(&self) -> InitialConditions {
        self.initial
    }

    /// Read a cell, or `None` if out of bounds.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        if row >= self.size || col >= self.size {
            return None;
        }
        self.cells.get(row * self.size + col)
    }

    /// Read one row of cells, or `None` if out of bounds.
    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        if row >= self.size {
            return None;
        }
        let start = row * self.size;
        self.cells.get(start..start + self.size)
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Mutable row-major view for the propagation kernel.
    ///
    /// `Cell` exposes only its temperature for writing, so this cannot be
    /// used to alter conductance or drift.
    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Iterate over all temperatures in row-major order.
    pub fn temperatures(&self) -> impl Iterator<Item = f64> + '_ {
        self.cells.iter().map(Cell::temperature)
    }

    /// Overwrite one cell's temperature.
    ///
    /// # Errors
    ///
    /// [`StateError::CellOutOfBounds`] if `(row, col)` is outside the grid.
    pub fn set_temperature(&mut self, row: usize, col: usize, kelvin: f64) -> Result<(), StateError> {
        if row >= self.size || col >= self.size {
            return Err(StateError::CellOutOfBounds {
                row,
                col,
                size: self.size,
            });
        }
        self.cells[row * self.size + col].set_temperature(kelvin);
        Ok(())
    }
}

/// Validate `size` and return `size * size`.
fn checked_cell_count(size: usize) -> Result<usize, StateError> {
    let invalid = || StateError::InvalidDimension {
        size: i64::try_from(size).unwrap_or(i64::MAX),
    };
    if size == 0 {
        return Err(invalid());
    }
    let cell_count = size.checked_mul(size).ok_or_else(invalid)?;
    let bytes = cell_count
        .checked_mul(std::mem::size_of::<Cell>())
        .ok_or_else(invalid)?;
    if bytes > isize::MAX as usize {
        return Err(invalid());
    }
    Ok(cell_count)
}
