//! The propagation kernel: non-linear conductance law plus self-heating.
//!
//! For every row `r` the kernel accumulates
//!
//! ```text
//! I[r] = Σ_c  G(r,c) · V[c] · exp(-Ea / (k_B · T(r,c)))
//! ```
//!
//! and raises each cell's temperature by `I(r,c) · V[c] · κ`. The update is
//! a side effect: `compute` is **not** a pure function of its inputs, and
//! replaying the same voltages yields different (hotter) state.
//!
//! Rows are processed in parallel over the bands of a [`RowPartition`].
//! Within a row, columns are summed in order, so the result does not depend
//! on how many bands there are. A row's temperature updates are staged and
//! committed only once every contribution in the row is finite.

use rayon::prelude::*;
use xbar_core::constants::BOLTZMANN_K;
use xbar_core::{Cell, CrossbarState, KernelError};

use crate::config::{ConfigError, PhysicsParams};
use crate::partition::{RowBand, RowPartition};

/// Per-call totals reported by the kernel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KernelOutcome {
    /// Cells sitting at the thermal ceiling after the call.
    pub saturated_cells: usize,
}

/// Stateless evaluator of the conductance law for one set of physics.
#[derive(Clone, Debug, PartialEq)]
pub struct PropagationKernel {
    physics: PhysicsParams,
}

impl PropagationKernel {
    /// Create a kernel for `physics`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidPhysics`] if `physics` fails
    /// [`PhysicsParams::validate`]. A negative heating coefficient, for one,
    /// would let the kernel cool cells.
    pub fn new(physics: PhysicsParams) -> Result<Self, ConfigError> {
        physics.validate()?;
        Ok(Self { physics })
    }

    /// The physics this kernel evaluates.
    pub fn physics(&self) -> &PhysicsParams {
        &self.physics
    }

    /// Current through one cell at `voltage`, in Amperes.
    ///
    /// Temperature is clamped to the configured floor before entering the
    /// exponent.
    #[inline]
    pub fn cell_current(&self, conductance: f64, temperature: f64, voltage: f64) -> f64 {
        let t = temperature.max(self.physics.temperature_floor);
        conductance * voltage * (-self.physics.activation_energy / (BOLTZMANN_K * t)).exp()
    }

    /// Propagate `voltages` through `state`, returning one current per row.
    ///
    /// Mutates cell temperatures. Runs on the current rayon pool; use
    /// `ThreadPool::install` to pick a specific one.
    ///
    /// # Errors
    ///
    /// - [`KernelError::DimensionMismatch`] if `voltages.len() != size`
    ///   (state untouched).
    /// - [`KernelError::NumericDegeneracy`] for non-finite voltages (state
    ///   untouched) or a row whose contribution overflows (that row
    ///   untouched).
    pub fn compute(
        &self,
        state: &mut CrossbarState,
        partition: &RowPartition,
        voltages: &[f64],
    ) -> Result<Vec<f64>, KernelError> {
        let mut currents = vec![0.0; state.size()];
        self.compute_into(state, partition, voltages, &mut currents)?;
        Ok(currents)
    }

    /// Like [`compute()`](Self::compute), writing into a caller-owned buffer
    /// of exactly `size` elements.
    pub fn compute_into(
        &self,
        state: &mut CrossbarState,
        partition: &RowPartition,
        voltages: &[f64],
        currents: &mut [f64],
    ) -> Result<KernelOutcome, KernelError> {
        let size = state.size();
        check_len(size, voltages.len())?;
        check_len(size, currents.len())?;
        check_len(size, partition.size())?;
        if let Some(col) = voltages.iter().position(|v| !v.is_finite()) {
            return Err(KernelError::NumericDegeneracy { row: None, col });
        }

        let bands = partition.split(state.cells_mut(), currents);
        let per_band: Vec<KernelOutcome> = bands
            .into_par_iter()
            .map(|band| self.propagate_band(band, voltages))
            .collect::<Result<_, _>>()?;

        Ok(KernelOutcome {
            saturated_cells: per_band.iter().map(|o| o.saturated_cells).sum(),
        })
    }

    fn propagate_band(
        &self,
        mut band: RowBand<'_>,
        voltages: &[f64],
    ) -> Result<KernelOutcome, KernelError> {
        let mut staged = vec![0.0; voltages.len()];
        let mut outcome = KernelOutcome::default();
        for (row, cells, current) in band.rows_mut() {
            *current = self.propagate_row(row, cells, voltages, &mut staged)?;
            if let Some(ceiling) = self.physics.thermal_ceiling {
                outcome.saturated_cells += cells
                    .iter()
                    .filter(|c| c.temperature() >= ceiling)
                    .count();
            }
        }
        Ok(outcome)
    }

    /// Sum one row and commit its heating. Nothing is written back unless
    /// the whole row is finite.
    fn propagate_row(
        &self,
        row: usize,
        cells: &mut [Cell],
        voltages: &[f64],
        staged: &mut [f64],
    ) -> Result<f64, KernelError> {
        let kappa = self.physics.heating_coefficient;
        let ceiling = self.physics.thermal_ceiling;
        let mut sum = 0.0;
        let lanes = cells.iter().zip(voltages).zip(staged.iter_mut());
        for (col, ((cell, &v), next)) in lanes.enumerate() {
            let i = self.cell_current(cell.conductance(), cell.temperature(), v);
            let mut t = cell.temperature() + i * v * kappa;
            sum += i;
            if !i.is_finite() || !t.is_finite() || !sum.is_finite() {
                tracing::warn!(
                    row,
                    col,
                    current = i,
                    temperature = t,
                    "numeric degeneracy in crossbar row"
                );
                return Err(KernelError::NumericDegeneracy {
                    row: Some(row),
                    col,
                });
            }
            if let Some(ceiling) = ceiling {
                t = t.min(ceiling);
            }
            *next = t;
        }
        for (cell, &t) in cells.iter_mut().zip(staged.iter()) {
            cell.set_temperature(t);
        }
        Ok(sum)
    }
}

fn check_len(expected: usize, actual: usize) -> Result<(), KernelError> {
    if expected == actual {
        Ok(())
    } else {
        Err(KernelError::DimensionMismatch { expected, actual })
    }
}
