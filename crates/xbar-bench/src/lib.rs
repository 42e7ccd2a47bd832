//! Benchmark profiles and energy accounting for the xbar crossbar kernel.
//!
//! Provides pre-built [`EngineConfig`] profiles for benchmarks and examples:
//!
//! - [`small_profile`]: 64x64 crossbar (4K cells)
//! - [`reference_profile`]: 256x256 crossbar (64K cells)
//! - [`stress_profile`]: 1024x1024 crossbar (~1M cells)
//!
//! and an [`EnergyComparison`] that prices a [`BenchmarkReport`] at nominal
//! per-operation energies.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::fmt;

use xbar_engine::{BenchmarkReport, EngineConfig};

/// Nominal energy of one floating-point op on a general-purpose CPU, joules.
pub const SILICON_JOULES_PER_OP: f64 = 10e-12;

/// Theoretical energy of one analog multiply-accumulate in the crossbar,
/// joules.
pub const CROSSBAR_JOULES_PER_OP: f64 = 1e-15;

/// 64x64 crossbar, auto-detected workers.
pub fn small_profile(seed: u64) -> EngineConfig {
    EngineConfig::new(64).with_seed(seed)
}

/// 256x256 crossbar, auto-detected workers.
pub fn reference_profile(seed: u64) -> EngineConfig {
    EngineConfig::new(256).with_seed(seed)
}

/// 1024x1024 crossbar, auto-detected workers.
pub fn stress_profile(seed: u64) -> EngineConfig {
    EngineConfig::new(1024).with_seed(seed)
}

/// Energy of one benchmark run under two cost models.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnergyComparison {
    /// Cost at [`SILICON_JOULES_PER_OP`].
    pub silicon_joules: f64,
    /// Cost at [`CROSSBAR_JOULES_PER_OP`].
    pub crossbar_joules: f64,
}

impl EnergyComparison {
    /// Price `report` under both cost models.
    pub fn from_report(report: &BenchmarkReport) -> Self {
        Self {
            silicon_joules: report.energy_joules(SILICON_JOULES_PER_OP),
            crossbar_joules: report.energy_joules(CROSSBAR_JOULES_PER_OP),
        }
    }

    /// `silicon / crossbar`, or 0 when nothing ran.
    pub fn gain(&self) -> f64 {
        if self.crossbar_joules > 0.0 {
            self.silicon_joules / self.crossbar_joules
        } else {
            0.0
        }
    }
}

impl fmt::Display for EnergyComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "silicon {:.6e} J, crossbar {:.6e} J, gain {:.0}x",
            self.silicon_joules,
            self.crossbar_joules,
            self.gain()
        )
    }
}
