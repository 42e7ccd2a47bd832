//! Per-call performance metrics for the propagation kernel.

/// Timing and partition data for the most recent `compute` call.
///
/// Durations are in microseconds. Populated by the engine after every
/// successful call; a failed call leaves the previous value in place.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ComputeMetrics {
    /// Wall-clock time for the whole call, in microseconds.
    pub total_us: u64,
    /// Rows reduced (the crossbar size).
    pub rows: usize,
    /// Threads in the engine's worker pool.
    pub workers: usize,
    /// Row bands the call was split into.
    pub bands: usize,
    /// Cells at the thermal ceiling after the call. Always 0 without a
    /// ceiling.
    pub saturated_cells: usize,
}
