//! Authorization seam consulted before work reaches the kernel.
//!
//! The engine itself performs no authentication. A host that needs a
//! tamper or credential check installs an [`AuthorizationGate`] on the
//! [`EngineRegistry`](crate::EngineRegistry); every gated operation is
//! described to the gate before any state is touched.

use std::fmt;

/// An operation awaiting approval.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GatedOperation {
    /// Allocate a new `size x size` engine.
    Create {
        /// Requested crossbar edge length.
        size: usize,
    },
    /// Run one propagation call.
    Compute {
        /// Edge length of the target engine.
        size: usize,
    },
    /// Run the benchmark harness.
    Benchmark {
        /// Edge length of the target engine.
        size: usize,
        /// Requested iteration count.
        iterations: u32,
    },
}

impl fmt::Display for GatedOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create { size } => write!(f, "create ({size}x{size})"),
            Self::Compute { size } => write!(f, "compute ({size}x{size})"),
            Self::Benchmark { size, iterations } => {
                write!(f, "benchmark ({size}x{size}, {iterations} iterations)")
            }
        }
    }
}

/// Verdict returned by a gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateDecision {
    /// Let the operation proceed.
    Allow,
    /// Refuse the operation; the caller sees `AuthorizationDenied`.
    Deny,
}

/// External approval hook.
///
/// Implementations must be cheap and must not call back into the registry.
pub trait AuthorizationGate: Send + Sync {
    /// Decide whether `operation` may run.
    fn authorize(&self, operation: &GatedOperation) -> GateDecision;
}

/// Gate that approves everything. The registry default.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllowAll;

impl AuthorizationGate for AllowAll {
    fn authorize(&self, _operation: &GatedOperation) -> GateDecision {
        GateDecision::Allow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_all_allows() {
        let ops = [
            GatedOperation::Create { size: 1 },
            GatedOperation::Compute { size: 1 },
            GatedOperation::Benchmark {
                size: 1,
                iterations: 0,
            },
        ];
        for op in &ops {
            assert_eq!(AllowAll.authorize(op), GateDecision::Allow);
        }
    }

    #[test]
    fn display_is_readable() {
        assert_eq!(GatedOperation::Create { size: 4 }.to_string(), "create (4x4)");
        assert_eq!(
            GatedOperation::Benchmark {
                size: 2,
                iterations: 10
            }
            .to_string(),
            "benchmark (2x2, 10 iterations)"
        );
    }
}
