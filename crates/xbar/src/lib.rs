//! xbar: a data-parallel memristor crossbar simulation kernel.
//!
//! This is the facade crate re-exporting the public API of the xbar
//! sub-crates. For most users a single `xbar` dependency is enough.
//!
//! # Quick start
//!
//! ```rust
//! use xbar::prelude::*;
//!
//! let mut engine = CrossbarEngine::new(EngineConfig::new(4).with_seed(42)).unwrap();
//!
//! // With the default device physics the activation factor underflows at
//! // room temperature, so every row current is exactly zero.
//! let currents = engine.compute(&[1.0; 4]).unwrap();
//! assert_eq!(currents, vec![0.0; 4]);
//!
//! let report = engine.benchmark(0).unwrap();
//! assert_eq!(report.throughput_gflops, 0.0);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`state`] | `xbar-core` | Cells, crossbar state, physical constants |
//! | [`engine`] | `xbar-engine` | Kernel, engine, harness, registry, collaborators |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Cell state, the crossbar grid, and physical constants (`xbar-core`).
pub use xbar_core as state;

/// Propagation kernel, engine lifecycle, and benchmark harness
/// (`xbar-engine`).
///
/// [`engine::CrossbarEngine`] owns one crossbar;
/// [`engine::EngineRegistry`] addresses many by handle.
pub use xbar_engine as engine;

/// Common imports for typical xbar usage.
///
/// ```rust
/// use xbar::prelude::*;
/// ```
pub mod prelude {
    // State
    pub use xbar_core::{Cell, CrossbarState, InitialConditions};

    // Errors
    pub use xbar_core::{KernelError, StateError};
    pub use xbar_engine::{AllocError, ConfigError, EngineError};

    // Engine
    pub use xbar_engine::{
        BenchmarkHarness, BenchmarkReport, ComputeMetrics, CrossbarEngine, EngineConfig,
        PhysicsParams, PropagationKernel, RowPartition, ThermalTelemetry,
    };

    // Registry and collaborators
    pub use xbar_engine::{
        AllowAll, AuthorizationGate, BufferAllocator, EngineHandle, EngineRegistry,
        GateDecision, GatedOperation, HeapAllocator, PooledAllocator,
    };
}
