//! Physical constants and default device parameters.
//!
//! The defaults describe a copper-oxide crossbar at room temperature.
//! Note that [`DEFAULT_ACTIVATION_ENERGY`] is the bare literal `0.1` used in
//! that model (interpreted in joules), not 0.1 eV; at ambient temperature the
//! Arrhenius factor underflows to `0.0`. Use [`ELECTRON_VOLT`] to express an
//! activation energy in electron-volts.

/// Boltzmann constant, J/K (exact, SI 2019).
pub const BOLTZMANN_K: f64 = 1.380649e-23;

/// Elementary charge, C. One electron-volt in joules.
pub const ELECTRON_VOLT: f64 = 1.602176634e-19;

/// Ambient temperature in Kelvin.
pub const AMBIENT_TEMPERATURE: f64 = 300.0;

/// Off-state (high-resistance) conductance floor, Siemens.
pub const OFF_STATE_CONDUCTANCE: f64 = 1e-6;

/// Activation energy in the conductance law `exp(-Ea / (k_B * T))`.
pub const DEFAULT_ACTIVATION_ENERGY: f64 = 0.1;

/// Self-heating proportionality constant: Kelvin per watt per call.
pub const DEFAULT_HEATING_COEFFICIENT: f64 = 1e-9;

/// Lower clamp applied to temperature inside the exponent.
pub const DEFAULT_TEMPERATURE_FLOOR: f64 = 1e-3;

/// Constant input voltage used by the benchmark harness, Volts.
pub const DEFAULT_BENCHMARK_VOLTAGE: f64 = 0.5;

/// Floating-point operations counted per cell per compute (multiply + add).
pub const FLOPS_PER_CELL: f64 = 2.0;
