//! Top-level error type for engine and registry operations.

use thiserror::Error;
use xbar_core::{KernelError, StateError};

use crate::alloc::AllocError;
use crate::config::ConfigError;
use crate::gate::GatedOperation;

/// Everything that can go wrong between a caller and the kernel.
///
/// Subsystem errors are wrapped unchanged so `source()` reaches the
/// original cause.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum EngineError {
    /// Crossbar construction or cell addressing failed.
    #[error(transparent)]
    State(#[from] StateError),
    /// A propagation call was rejected or degenerated.
    #[error(transparent)]
    Kernel(#[from] KernelError),
    /// The engine configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// The handle is unknown, stale, or already destroyed.
    #[error("invalid or destroyed engine handle")]
    InvalidHandle,
    /// Another call is already executing on this engine.
    #[error("engine is busy with another call")]
    ConcurrentAccessDenied,
    /// The authorization gate refused the operation.
    #[error("authorization denied for {operation}")]
    AuthorizationDenied {
        /// The operation that was refused.
        operation: GatedOperation,
    },
    /// The buffer allocator could not supply an output buffer.
    #[error("buffer allocation failed: {0}")]
    Allocation(#[from] AllocError),
    /// A lock was poisoned by a panic in an earlier call.
    #[error("engine state poisoned by an earlier panic")]
    Poisoned,
}
