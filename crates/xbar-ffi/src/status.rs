//! C-compatible status codes.
//!
//! [`XbarStatus`] is a `repr(i32)` enum covering every failure the engine
//! can report. Conversions from the Rust error types are provided so entry
//! points can write `XbarStatus::from(&e) as i32`.

use xbar_core::{KernelError, StateError};
use xbar_engine::{AllocError, ConfigError, EngineError};

/// Status code returned by all FFI functions.
///
/// `Ok` = 0, all errors are negative. Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum XbarStatus {
    /// Success.
    Ok = 0,
    /// Handle is invalid or was already destroyed.
    InvalidHandle = -1,
    /// Crossbar size is zero, negative, or too large to allocate.
    InvalidDimension = -2,
    /// Voltage vector length differs from the crossbar size.
    DimensionMismatch = -3,
    /// Another call is already executing on this engine.
    ConcurrentAccessDenied = -4,
    /// A voltage, current, or temperature became non-finite.
    NumericDegeneracy = -5,
    /// The authorization gate refused the operation.
    AuthorizationDenied = -6,
    /// Engine configuration is invalid.
    ConfigError = -7,
    /// An argument is null, out of range, or otherwise invalid.
    InvalidArgument = -8,
    /// Caller-provided output buffer is too small.
    BufferTooSmall = -9,
    /// The output buffer allocator is exhausted.
    AllocationFailed = -10,
    /// Internal error (e.g. poisoned lock after a prior panic).
    InternalError = -20,
    /// A Rust panic was caught at the FFI boundary.
    Panicked = -128,
}

impl From<&StateError> for XbarStatus {
    fn from(e: &StateError) -> Self {
        match e {
            StateError::InvalidDimension { .. } => XbarStatus::InvalidDimension,
            StateError::CellOutOfBounds { .. } => XbarStatus::InvalidArgument,
            StateError::InvalidInitialCondition { .. } => XbarStatus::ConfigError,
        }
    }
}

impl From<&KernelError> for XbarStatus {
    fn from(e: &KernelError) -> Self {
        match e {
            KernelError::DimensionMismatch { .. } => XbarStatus::DimensionMismatch,
            KernelError::NumericDegeneracy { .. } => XbarStatus::NumericDegeneracy,
        }
    }
}

impl From<&ConfigError> for XbarStatus {
    fn from(_e: &ConfigError) -> Self {
        XbarStatus::ConfigError
    }
}

impl From<&AllocError> for XbarStatus {
    fn from(e: &AllocError) -> Self {
        match e {
            AllocError::Exhausted { .. } => XbarStatus::AllocationFailed,
            AllocError::Poisoned => XbarStatus::InternalError,
        }
    }
}

impl From<&EngineError> for XbarStatus {
    fn from(e: &EngineError) -> Self {
        match e {
            EngineError::State(e) => e.into(),
            EngineError::Kernel(e) => e.into(),
            EngineError::Config(e) => e.into(),
            EngineError::Allocation(e) => e.into(),
            EngineError::InvalidHandle => XbarStatus::InvalidHandle,
            EngineError::ConcurrentAccessDenied => XbarStatus::ConcurrentAccessDenied,
            EngineError::AuthorizationDenied { .. } => XbarStatus::AuthorizationDenied,
            EngineError::Poisoned => XbarStatus::InternalError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xbar_engine::GatedOperation;

    #[test]
    fn status_code_values_are_stable() {
        assert_eq!(XbarStatus::Ok as i32, 0);
        assert_eq!(XbarStatus::InvalidHandle as i32, -1);
        assert_eq!(XbarStatus::InvalidDimension as i32, -2);
        assert_eq!(XbarStatus::DimensionMismatch as i32, -3);
        assert_eq!(XbarStatus::ConcurrentAccessDenied as i32, -4);
        assert_eq!(XbarStatus::NumericDegeneracy as i32, -5);
        assert_eq!(XbarStatus::AuthorizationDenied as i32, -6);
        assert_eq!(XbarStatus::ConfigError as i32, -7);
        assert_eq!(XbarStatus::InvalidArgument as i32, -8);
        assert_eq!(XbarStatus::BufferTooSmall as i32, -9);
        assert_eq!(XbarStatus::AllocationFailed as i32, -10);
        assert_eq!(XbarStatus::InternalError as i32, -20);
        assert_eq!(XbarStatus::Panicked as i32, -128);
    }

    #[test]
    fn engine_error_to_status() {
        let cases = [
            (
                EngineError::State(StateError::InvalidDimension { size: -1 }),
                XbarStatus::InvalidDimension,
            ),
            (
                EngineError::State(StateError::InvalidInitialCondition {
                    parameter: "conductance",
                    value: -1.0,
                }),
                XbarStatus::ConfigError,
            ),
            (
                EngineError::Kernel(KernelError::DimensionMismatch {
                    expected: 4,
                    actual: 3,
                }),
                XbarStatus::DimensionMismatch,
            ),
            (
                EngineError::Kernel(KernelError::NumericDegeneracy { row: None, col: 0 }),
                XbarStatus::NumericDegeneracy,
            ),
            (
                EngineError::Config(ConfigError::InvalidBenchmarkVoltage { value: f64::NAN }),
                XbarStatus::ConfigError,
            ),
            (EngineError::InvalidHandle, XbarStatus::InvalidHandle),
            (
                EngineError::ConcurrentAccessDenied,
                XbarStatus::ConcurrentAccessDenied,
            ),
            (
                EngineError::AuthorizationDenied {
                    operation: GatedOperation::Compute { size: 1 },
                },
                XbarStatus::AuthorizationDenied,
            ),
            (
                EngineError::Allocation(AllocError::Exhausted {
                    requested: 64,
                    available: 0,
                }),
                XbarStatus::AllocationFailed,
            ),
            (EngineError::Poisoned, XbarStatus::InternalError),
        ];
        for (err, status) in &cases {
            assert_eq!(XbarStatus::from(err), *status, "{err}");
        }
    }
}
