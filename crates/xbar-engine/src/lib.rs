//! Propagation kernel, engine lifecycle, and benchmark harness for xbar.
//!
//! [`CrossbarEngine`] composes a [`CrossbarState`](xbar_core::CrossbarState)
//! with the [`PropagationKernel`], a validated [`RowPartition`], and a
//! dedicated rayon pool. [`BenchmarkHarness`] measures throughput over
//! repeated calls, and [`EngineRegistry`] addresses engines by handle for
//! callers across an FFI boundary.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod alloc;
pub mod config;
pub mod engine;
pub mod error;
pub mod gate;
pub mod handle;
pub mod harness;
pub mod kernel;
pub mod metrics;
pub mod partition;
pub mod registry;
pub mod telemetry;

pub use alloc::{AllocError, BufferAllocator, HeapAllocator, PooledAllocator};
pub use config::{ConfigError, EngineConfig, PhysicsParams, MAX_WORKERS};
pub use engine::CrossbarEngine;
pub use error::EngineError;
pub use gate::{AllowAll, AuthorizationGate, GateDecision, GatedOperation};
pub use handle::EngineHandle;
pub use harness::{BenchmarkHarness, BenchmarkReport, CrossbarCompute};
pub use kernel::{KernelOutcome, PropagationKernel};
pub use metrics::ComputeMetrics;
pub use partition::{PartitionError, RowBand, RowPartition};
pub use registry::EngineRegistry;
pub use telemetry::ThermalTelemetry;
