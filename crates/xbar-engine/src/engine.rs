//! A single crossbar engine instance.
//!
//! [`CrossbarEngine`] owns one [`CrossbarState`], the kernel that evolves
//! it, a row partition, and a dedicated rayon worker pool. All mutating
//! methods take `&mut self`, so calls on one instance are strictly
//! sequential; independent instances share nothing.
//!
//! # Example
//!
//! ```
//! use xbar_engine::{CrossbarEngine, EngineConfig};
//!
//! let mut engine = CrossbarEngine::new(EngineConfig::new(4).with_seed(42))?;
//! let currents = engine.compute(&[1.0; 4])?;
//! assert_eq!(currents.len(), 4);
//! # Ok::<(), xbar_engine::EngineError>(())
//! ```

use std::sync::Arc;
use std::time::Instant;

use rayon::{ThreadPool, ThreadPoolBuilder};
use xbar_core::{Cell, CrossbarState};

use crate::alloc::{BufferAllocator, HeapAllocator};
use crate::config::{ConfigError, EngineConfig, PhysicsParams};
use crate::error::EngineError;
use crate::harness::{BenchmarkHarness, BenchmarkReport, CrossbarCompute};
use crate::kernel::PropagationKernel;
use crate::metrics::ComputeMetrics;
use crate::partition::RowPartition;
use crate::telemetry::ThermalTelemetry;

// Engines are stored behind `Arc<Mutex<_>>` in a static registry.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<CrossbarEngine>();
    }
};

/// One crossbar, its kernel, and its worker pool.
pub struct CrossbarEngine {
    state: CrossbarState,
    kernel: PropagationKernel,
    partition: RowPartition,
    pool: ThreadPool,
    allocator: Arc<dyn BufferAllocator>,
    harness: BenchmarkHarness,
    compute_calls: u64,
    last_metrics: ComputeMetrics,
    ceiling_reported: bool,
}

impl CrossbarEngine {
    /// Build an engine that allocates output buffers on the heap.
    ///
    /// # Errors
    ///
    /// [`EngineError::Config`] for invalid parameters or a pool build
    /// failure, [`EngineError::State`] for an invalid size.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        Self::with_allocator(config, Arc::new(HeapAllocator))
    }

    /// Build an engine that draws output buffers from `allocator`.
    pub fn with_allocator(
        config: EngineConfig,
        allocator: Arc<dyn BufferAllocator>,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let state = CrossbarState::with_conditions(
            config.size,
            config.seed,
            config.physics.initial_conditions(),
        )?;
        let kernel = PropagationKernel::new(config.physics)?;
        let workers = config.resolved_workers();
        let partition = RowPartition::even(config.size, workers).map_err(ConfigError::from)?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("xbar-worker-{i}"))
            .build()
            .map_err(|e| ConfigError::ThreadPool {
                reason: e.to_string(),
            })?;

        tracing::info!(
            size = config.size,
            seed = state.seed(),
            workers,
            bands = partition.band_count(),
            memory_bytes = state.cell_count() * std::mem::size_of::<Cell>(),
            "crossbar engine initialized"
        );

        Ok(Self {
            state,
            kernel,
            partition,
            pool,
            allocator,
            harness: BenchmarkHarness::new(config.benchmark_voltage),
            compute_calls: 0,
            last_metrics: ComputeMetrics::default(),
            ceiling_reported: false,
        })
    }

    /// Reset every cell to its initial state with the current seed.
    ///
    /// Idempotent. Also clears the call counter and metrics.
    pub fn initialize(&mut self) {
        self.state.initialize();
        self.clear_counters();
    }

    /// Re-initialize with a new seed, or a fresh random one for `None`.
    pub fn reset(&mut self, seed: Option<u64>) {
        self.state.reinitialize(seed);
        self.clear_counters();
        tracing::info!(size = self.size(), seed = self.seed(), "crossbar engine reset");
    }

    fn clear_counters(&mut self) {
        self.compute_calls = 0;
        self.last_metrics = ComputeMetrics::default();
        self.ceiling_reported = false;
    }

    /// Propagate `voltages` and return one current per row.
    ///
    /// Heats the crossbar as a side effect. The returned buffer comes from
    /// the engine's allocator; hand it back with
    /// [`release_buffer()`](Self::release_buffer) when done.
    pub fn compute(&mut self, voltages: &[f64]) -> Result<Vec<f64>, EngineError> {
        let mut currents = self.allocator.acquire(self.size())?;
        match self.compute_into(voltages, &mut currents) {
            Ok(()) => Ok(currents),
            Err(e) => {
                self.allocator.release(currents);
                Err(e)
            }
        }
    }

    /// Propagate `voltages` into a caller-owned buffer of `size` elements.
    pub fn compute_into(&mut self, voltages: &[f64], currents: &mut [f64]) -> Result<(), EngineError> {
        let start = Instant::now();
        let Self {
            state,
            kernel,
            partition,
            pool,
            ..
        } = self;
        let outcome = pool.install(|| kernel.compute_into(state, partition, voltages, currents));
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::debug!(error = %e, "compute rejected");
                return Err(e.into());
            }
        };

        self.compute_calls += 1;
        self.last_metrics = ComputeMetrics {
            total_us: u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX),
            rows: self.state.size(),
            workers: self.pool.current_num_threads(),
            bands: self.partition.band_count(),
            saturated_cells: outcome.saturated_cells,
        };
        if outcome.saturated_cells > 0 && !self.ceiling_reported {
            self.ceiling_reported = true;
            tracing::warn!(
                cells = outcome.saturated_cells,
                ceiling = ?self.kernel.physics().thermal_ceiling,
                "cells reached the thermal ceiling"
            );
        }
        tracing::debug!(
            call = self.compute_calls,
            total_us = self.last_metrics.total_us,
            "compute finished"
        );
        Ok(())
    }

    /// Return a buffer obtained from [`compute()`](Self::compute).
    pub fn release_buffer(&self, buffer: Vec<f64>) {
        self.allocator.release(buffer);
    }

    /// Run the benchmark harness at the configured drive voltage.
    pub fn benchmark(&mut self, iterations: u32) -> Result<BenchmarkReport, EngineError> {
        let harness = self.harness;
        harness.run(self, iterations)
    }

    /// Crossbar edge length.
    pub fn size(&self) -> usize {
        self.state.size()
    }

    /// Resolved drift seed.
    pub fn seed(&self) -> u64 {
        self.state.seed()
    }

    /// Threads in the worker pool.
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// The row partition used for parallel compute.
    pub fn partition(&self) -> &RowPartition {
        &self.partition
    }

    /// Read-only view of the crossbar.
    pub fn state(&self) -> &CrossbarState {
        &self.state
    }

    /// Device physics in effect.
    pub fn physics(&self) -> &PhysicsParams {
        self.kernel.physics()
    }

    /// Drive voltage used by [`benchmark()`](Self::benchmark).
    pub fn benchmark_voltage(&self) -> f64 {
        self.harness.voltage()
    }

    /// Successful compute calls since construction or the last reset.
    pub fn compute_calls(&self) -> u64 {
        self.compute_calls
    }

    /// Metrics from the most recent successful compute call.
    pub fn last_metrics(&self) -> ComputeMetrics {
        self.last_metrics
    }

    /// Temperature summary of the current state.
    pub fn telemetry(&self) -> ThermalTelemetry {
        ThermalTelemetry::from_state(
            &self.state,
            self.compute_calls,
            self.kernel.physics().thermal_ceiling,
        )
    }
}

impl CrossbarCompute for CrossbarEngine {
    fn size(&self) -> usize {
        self.state.size()
    }

    fn propagate_into(&mut self, voltages: &[f64], currents: &mut [f64]) -> Result<(), EngineError> {
        self.compute_into(voltages, currents)
    }
}

impl std::fmt::Debug for CrossbarEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrossbarEngine")
            .field("size", &self.size())
            .field("seed", &self.seed())
            .field("workers", &self.workers())
            .field("compute_calls", &self.compute_calls)
            .finish_non_exhaustive()
    }
}
