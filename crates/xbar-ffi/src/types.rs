//! `#[repr(C)]` mirrors of engine reports.
//!
//! Sizes use fixed-width `u64` rather than `usize` for ABI portability.

use xbar_engine::{BenchmarkReport, ComputeMetrics, ThermalTelemetry};

/// Result of a benchmark run.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct XbarBenchmarkReport {
    /// Crossbar edge length.
    pub size: u64,
    /// Wall time of the whole run, seconds.
    pub elapsed_seconds: f64,
    /// Nominal throughput, GFLOPS. 0 when nothing was timed.
    pub throughput_gflops: f64,
    /// `2 * size^2 * iterations`.
    pub total_flops: f64,
    /// Propagation calls made.
    pub iterations: u32,
}

// u64 + 3×f64 + u32 + 4 bytes tail padding = 40 bytes, align 8.
const _: () = assert!(std::mem::size_of::<XbarBenchmarkReport>() == 40);
const _: () = assert!(std::mem::align_of::<XbarBenchmarkReport>() == 8);

impl From<&BenchmarkReport> for XbarBenchmarkReport {
    fn from(r: &BenchmarkReport) -> Self {
        Self {
            size: r.size as u64,
            elapsed_seconds: r.elapsed_seconds,
            throughput_gflops: r.throughput_gflops,
            total_flops: r.total_flops,
            iterations: r.iterations,
        }
    }
}

/// Temperature summary of one engine.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct XbarThermalTelemetry {
    /// Crossbar edge length.
    pub size: u64,
    /// Successful compute calls since creation or the last reset.
    pub compute_calls: u64,
    /// Coldest cell, Kelvin.
    pub min_temperature: f64,
    /// Hottest cell, Kelvin.
    pub max_temperature: f64,
    /// Mean cell temperature, Kelvin.
    pub mean_temperature: f64,
    /// Cells at the thermal ceiling.
    pub cells_at_ceiling: u64,
}

const _: () = assert!(std::mem::size_of::<XbarThermalTelemetry>() == 48);

impl From<&ThermalTelemetry> for XbarThermalTelemetry {
    fn from(t: &ThermalTelemetry) -> Self {
        Self {
            size: t.size as u64,
            compute_calls: t.compute_calls,
            min_temperature: t.min_temperature,
            max_temperature: t.max_temperature,
            mean_temperature: t.mean_temperature,
            cells_at_ceiling: t.cells_at_ceiling as u64,
        }
    }
}

/// Metrics of the most recent compute call.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct XbarComputeMetrics {
    /// Wall-clock time of the call, microseconds.
    pub total_us: u64,
    /// Rows reduced.
    pub rows: u64,
    /// Cells at the thermal ceiling after the call.
    pub saturated_cells: u64,
    /// Worker threads in the engine's pool.
    pub workers: u32,
    /// Row bands the call was split into.
    pub bands: u32,
}

const _: () = assert!(std::mem::size_of::<XbarComputeMetrics>() == 32);

impl From<&ComputeMetrics> for XbarComputeMetrics {
    fn from(m: &ComputeMetrics) -> Self {
        Self {
            total_us: m.total_us,
            rows: m.rows as u64,
            saturated_cells: m.saturated_cells as u64,
            workers: u32::try_from(m.workers).unwrap_or(u32::MAX),
            bands: u32::try_from(m.bands).unwrap_or(u32::MAX),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn benchmark_report_converts() {
        let r = BenchmarkReport {
            size: 8,
            iterations: 3,
            elapsed_seconds: 0.5,
            throughput_gflops: 1e-6,
            total_flops: 384.0,
        };
        let c = XbarBenchmarkReport::from(&r);
        assert_eq!(c.size, 8);
        assert_eq!(c.iterations, 3);
        assert_eq!(c.total_flops, 384.0);
    }

    #[test]
    fn metrics_convert() {
        let m = ComputeMetrics {
            total_us: 12,
            rows: 4,
            workers: 2,
            bands: 2,
            saturated_cells: 1,
        };
        let c = XbarComputeMetrics::from(&m);
        assert_eq!(c.total_us, 12);
        assert_eq!(c.rows, 4);
        assert_eq!(c.workers, 2);
        assert_eq!(c.saturated_cells, 1);
    }
}
