//! An authorization gate installed on the process-wide registry governs the
//! C entry points.
//!
//! Kept in its own test binary: the gate is global state.

use std::ptr;
use std::sync::Arc;

use xbar_engine::{GateDecision, GatedOperation};
use xbar_ffi::engine::{registry, xbar_compute, xbar_create, xbar_destroy, xbar_run_benchmark};
use xbar_ffi::XbarStatus;
use xbar_test_utils::{DenyAllGate, RecordingGate};

#[test]
fn gate_decisions_reach_c_callers() {
    registry().set_gate(Arc::new(DenyAllGate)).unwrap();
    let mut handle = 0u64;
    assert_eq!(
        xbar_create(4, ptr::null(), &mut handle),
        XbarStatus::AuthorizationDenied as i32
    );
    assert_eq!(
        xbar_run_benchmark(4, 1, ptr::null_mut()),
        XbarStatus::AuthorizationDenied as i32
    );
    assert_eq!(registry().is_empty(), Ok(true));

    let gate = Arc::new(RecordingGate::new(GateDecision::Allow));
    registry().set_gate(gate.clone()).unwrap();
    assert_eq!(xbar_create(2, &7u64, &mut handle), XbarStatus::Ok as i32);
    let voltages = [0.5f64; 2];
    let mut out = [0.0f64; 2];
    assert_eq!(
        xbar_compute(handle, voltages.as_ptr(), 2, out.as_mut_ptr(), 2),
        XbarStatus::Ok as i32
    );
    assert_eq!(xbar_destroy(handle), XbarStatus::Ok as i32);
    assert_eq!(
        gate.seen(),
        vec![
            GatedOperation::Create { size: 2 },
            GatedOperation::Compute { size: 2 },
        ]
    );
    registry().clear_gate().unwrap();

    assert_eq!(xbar_run_benchmark(3, 2, ptr::null_mut()), XbarStatus::Ok as i32);
    assert_eq!(registry().is_empty(), Ok(true));
}
