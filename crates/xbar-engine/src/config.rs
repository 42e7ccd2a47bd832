//! Engine configuration, validation, and error types.
//!
//! [`EngineConfig`] is the builder-input for constructing a
//! [`CrossbarEngine`](crate::CrossbarEngine). [`validate()`](EngineConfig::validate)
//! checks every parameter before any grid memory or worker thread is
//! allocated. The crossbar size itself is checked by
//! [`CrossbarState`](xbar_core::CrossbarState) so that a bad size always
//! surfaces as `InvalidDimension`.

use thiserror::Error;
use xbar_core::constants::{
    AMBIENT_TEMPERATURE, DEFAULT_ACTIVATION_ENERGY, DEFAULT_BENCHMARK_VOLTAGE,
    DEFAULT_HEATING_COEFFICIENT, DEFAULT_TEMPERATURE_FLOOR, OFF_STATE_CONDUCTANCE,
};
use xbar_core::InitialConditions;

use crate::partition::PartitionError;

/// Upper bound applied to explicit worker counts.
pub const MAX_WORKERS: usize = 256;

// ── PhysicsParams ──────────────────────────────────────────────────

/// Device parameters of the conductance law and self-heating feedback.
///
/// At the defaults every cell current underflows to exactly zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicsParams {
    /// Initial conductance of every cell, Siemens. Default: 1e-6.
    pub off_state_conductance: f64,
    /// Initial temperature of every cell, Kelvin. Default: 300.
    pub ambient_temperature: f64,
    /// `Ea` in `exp(-Ea / (k_B * T))`, joules. Default: 0.1.
    pub activation_energy: f64,
    /// Kelvin added per watt dissipated in one call. Default: 1e-9.
    pub heating_coefficient: f64,
    /// Temperature clamp used inside the exponent, Kelvin. Default: 1e-3.
    pub temperature_floor: f64,
    /// Saturation temperature, Kelvin. `None` (default) leaves self-heating
    /// unbounded.
    pub thermal_ceiling: Option<f64>,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            off_state_conductance: OFF_STATE_CONDUCTANCE,
            ambient_temperature: AMBIENT_TEMPERATURE,
            activation_energy: DEFAULT_ACTIVATION_ENERGY,
            heating_coefficient: DEFAULT_HEATING_COEFFICIENT,
            temperature_floor: DEFAULT_TEMPERATURE_FLOOR,
            thermal_ceiling: None,
        }
    }
}

impl PhysicsParams {
    /// Check that every parameter is finite and physically meaningful.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn check(parameter: &'static str, value: f64, ok: bool) -> Result<(), ConfigError> {
            if value.is_finite() && ok {
                Ok(())
            } else {
                Err(ConfigError::InvalidPhysics { parameter, value })
            }
        }
        check(
            "off_state_conductance",
            self.off_state_conductance,
            self.off_state_conductance > 0.0,
        )?;
        check(
            "ambient_temperature",
            self.ambient_temperature,
            self.ambient_temperature > 0.0,
        )?;
        check(
            "activation_energy",
            self.activation_energy,
            self.activation_energy >= 0.0,
        )?;
        // A negative coefficient would let the kernel cool cells.
        check(
            "heating_coefficient",
            self.heating_coefficient,
            self.heating_coefficient >= 0.0,
        )?;
        check(
            "temperature_floor",
            self.temperature_floor,
            self.temperature_floor > 0.0,
        )?;
        if let Some(ceiling) = self.thermal_ceiling {
            check(
                "thermal_ceiling",
                ceiling,
                ceiling >= self.ambient_temperature,
            )?;
        }
        Ok(())
    }

    /// Initial cell state implied by these parameters.
    pub fn initial_conditions(&self) -> InitialConditions {
        InitialConditions {
            conductance: self.off_state_conductance,
            temperature: self.ambient_temperature,
        }
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while validating an [`EngineConfig`] or building its
/// worker pool.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// A physics parameter is NaN, infinite, or out of range.
    #[error("invalid physics parameter {parameter}: {value}")]
    InvalidPhysics {
        /// Name of the offending field.
        parameter: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// The benchmark drive voltage is not finite.
    #[error("benchmark voltage must be finite, got {value}")]
    InvalidBenchmarkVoltage {
        /// The rejected value.
        value: f64,
    },
    /// The row partition does not tile the crossbar.
    #[error("row partition: {0}")]
    Partition(#[from] PartitionError),
    /// The rayon worker pool could not be built.
    #[error("worker pool could not be built: {reason}")]
    ThreadPool {
        /// Error reported by rayon.
        reason: String,
    },
}

// ── EngineConfig ───────────────────────────────────────────────────

/// Complete configuration for constructing a crossbar engine.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Crossbar edge length; the grid holds `size * size` cells.
    pub size: usize,
    /// Drift RNG seed. `None` draws a fresh seed per construction.
    pub seed: Option<u64>,
    /// Worker threads for row-parallel compute. `None` = auto-detect.
    pub workers: Option<usize>,
    /// Device physics.
    pub physics: PhysicsParams,
    /// Constant voltage the benchmark harness drives on every column.
    /// Default: 0.5 V.
    pub benchmark_voltage: f64,
}

impl EngineConfig {
    /// Configuration for a `size x size` crossbar with default physics.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            seed: None,
            workers: None,
            physics: PhysicsParams::default(),
            benchmark_voltage: DEFAULT_BENCHMARK_VOLTAGE,
        }
    }

    /// Fix the drift seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Fix the worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Replace the physics parameters.
    pub fn with_physics(mut self, physics: PhysicsParams) -> Self {
        self.physics = physics;
        self
    }

    /// Replace the benchmark drive voltage.
    pub fn with_benchmark_voltage(mut self, volts: f64) -> Self {
        self.benchmark_voltage = volts;
        self
    }

    /// Validate all parameters except `size`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.physics.validate()?;
        if !self.benchmark_voltage.is_finite() {
            return Err(ConfigError::InvalidBenchmarkVoltage {
                value: self.benchmark_voltage,
            });
        }
        Ok(())
    }

    /// Resolve the worker count, applying auto-detection if `None`.
    ///
    /// Explicit values are clamped to `[1, MAX_WORKERS]`.
    pub fn resolved_workers(&self) -> usize {
        match self.workers {
            Some(n) => n.clamp(1, MAX_WORKERS),
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
                .min(MAX_WORKERS),
        }
    }
}
