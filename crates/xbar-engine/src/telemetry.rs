//! Thermal summary of a crossbar, computed on demand.

use xbar_core::CrossbarState;

/// Aggregate temperature statistics for one engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThermalTelemetry {
    /// Crossbar edge length.
    pub size: usize,
    /// Successful `compute` calls since the last reset.
    pub compute_calls: u64,
    /// Coldest cell, Kelvin.
    pub min_temperature: f64,
    /// Hottest cell, Kelvin.
    pub max_temperature: f64,
    /// Mean cell temperature, Kelvin.
    pub mean_temperature: f64,
    /// Cells at or above the thermal ceiling. 0 when no ceiling is set.
    pub cells_at_ceiling: usize,
}

impl ThermalTelemetry {
    /// Summarize `state`.
    pub fn from_state(state: &CrossbarState, compute_calls: u64, ceiling: Option<f64>) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut at_ceiling = 0;
        for t in state.temperatures() {
            min = min.min(t);
            max = max.max(t);
            sum += t;
            if ceiling.is_some_and(|c| t >= c) {
                at_ceiling += 1;
            }
        }
        Self {
            size: state.size(),
            compute_calls,
            min_temperature: min,
            max_temperature: max,
            mean_temperature: sum / state.cell_count() as f64,
            cells_at_ceiling: at_ceiling,
        }
    }
}
