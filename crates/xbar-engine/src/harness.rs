//! Throughput measurement over repeated propagation calls.
//!
//! [`BenchmarkHarness::run()`] drives any [`CrossbarCompute`] with a
//! constant voltage vector, times the loop with [`Instant`], and derives
//! throughput from the nominal cost of two floating-point operations per
//! cell per call. Because `compute` heats the crossbar, each run changes the
//! engine state that the next run starts from.

use std::fmt;
use std::hint::black_box;
use std::time::Instant;

use xbar_core::constants::FLOPS_PER_CELL;

use crate::error::EngineError;

/// Something the harness can drive: a fixed-size crossbar that propagates
/// voltages into a caller-owned buffer.
pub trait CrossbarCompute {
    /// Crossbar edge length.
    fn size(&self) -> usize;

    /// Propagate `voltages` and write one current per row into `currents`.
    fn propagate_into(&mut self, voltages: &[f64], currents: &mut [f64]) -> Result<(), EngineError>;
}

/// Result of one benchmark run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BenchmarkReport {
    /// Crossbar edge length.
    pub size: usize,
    /// Propagation calls made.
    pub iterations: u32,
    /// Wall time of the whole loop, seconds.
    pub elapsed_seconds: f64,
    /// `total_flops / elapsed_seconds / 1e9`, or 0 if nothing was timed.
    pub throughput_gflops: f64,
    /// `2 * size^2 * iterations`.
    pub total_flops: f64,
}

impl BenchmarkReport {
    /// Energy for the run at `joules_per_op` joules per floating-point op.
    pub fn energy_joules(&self, joules_per_op: f64) -> f64 {
        self.total_flops * joules_per_op
    }
}

impl fmt::Display for BenchmarkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{n}x{n} crossbar, {} iterations: {:.6} s, {:.3} GFLOPS",
            self.iterations,
            self.elapsed_seconds,
            self.throughput_gflops,
            n = self.size,
        )
    }
}

/// Repeatedly drives a crossbar with a constant input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BenchmarkHarness {
    voltage: f64,
}

impl BenchmarkHarness {
    /// Harness driving every column at `voltage` volts.
    pub fn new(voltage: f64) -> Self {
        Self { voltage }
    }

    /// The drive voltage.
    pub fn voltage(&self) -> f64 {
        self.voltage
    }

    /// Call `target` exactly `iterations` times and report throughput.
    ///
    /// With `iterations == 0` the target is not called and the report is all
    /// zeros apart from `size`. Stops at the first failing call.
    pub fn run<C: CrossbarCompute + ?Sized>(
        &self,
        target: &mut C,
        iterations: u32,
    ) -> Result<BenchmarkReport, EngineError> {
        let size = target.size();
        if iterations == 0 {
            return Ok(BenchmarkReport {
                size,
                iterations: 0,
                elapsed_seconds: 0.0,
                throughput_gflops: 0.0,
                total_flops: 0.0,
            });
        }

        let voltages = vec![self.voltage; size];
        let mut currents = vec![0.0; size];
        tracing::info!(size, iterations, voltage = self.voltage, "benchmark started");

        let start = Instant::now();
        for _ in 0..iterations {
            target.propagate_into(black_box(&voltages), &mut currents)?;
            black_box(&currents);
        }
        let elapsed_seconds = start.elapsed().as_secs_f64();

        let total_flops = FLOPS_PER_CELL * (size as f64) * (size as f64) * f64::from(iterations);
        let throughput_gflops = if elapsed_seconds > 0.0 {
            total_flops / elapsed_seconds / 1e9
        } else {
            0.0
        };
        let report = BenchmarkReport {
            size,
            iterations,
            elapsed_seconds,
            throughput_gflops,
            total_flops,
        };
        tracing::info!(
            size,
            iterations,
            elapsed_seconds,
            throughput_gflops,
            "benchmark finished"
        );
        Ok(report)
    }
}

impl Default for BenchmarkHarness {
    fn default() -> Self {
        Self::new(xbar_core::constants::DEFAULT_BENCHMARK_VOLTAGE)
    }
}
