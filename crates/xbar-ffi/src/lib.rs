//! C FFI bindings for the xbar crossbar simulation kernel.
//!
//! Every entry point returns an [`XbarStatus`] code as `i32` and catches
//! panics before they reach the caller. Engines live in a single static
//! [`EngineRegistry`](xbar_engine::EngineRegistry); see [`engine`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

/// Run `$body`, returning `$on_panic` if it panics.
macro_rules! ffi_guard_or {
    ($on_panic:expr, $body:block) => {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| $body)) {
            Ok(value) => value,
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_default();
                tracing::error!(%message, "panic caught at FFI boundary");
                $on_panic
            }
        }
    };
}

/// Run `$body` (which yields an `i32` status), mapping panics to
/// `XbarStatus::Panicked`.
macro_rules! ffi_guard {
    ($body:block) => {
        ffi_guard_or!($crate::status::XbarStatus::Panicked as i32, $body)
    };
}

pub mod engine;
pub mod status;
pub mod types;

pub use status::XbarStatus;
pub use types::{XbarBenchmarkReport, XbarComputeMetrics, XbarThermalTelemetry};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_passes_value_through() {
        let rc: i32 = ffi_guard!({ 7 });
        assert_eq!(rc, 7);
    }

    #[test]
    fn guard_maps_panic() {
        let rc: i32 = ffi_guard!({
            if force_panic() {
                panic!("boom");
            }
            0
        });
        assert_eq!(rc, XbarStatus::Panicked as i32);
    }

    #[test]
    fn guard_or_uses_fallback() {
        let v: u64 = ffi_guard_or!(u64::MAX, {
            if force_panic() {
                panic!("boom");
            }
            1
        });
        assert_eq!(v, u64::MAX);
    }

    fn force_panic() -> bool {
        true
    }
}
