//! Status codes returned by `xbar_compute` across sizes and buffer lengths.

use proptest::prelude::*;
use xbar_ffi::engine::{xbar_compute, xbar_create_with_workers, xbar_destroy, xbar_metrics_get};
use xbar_ffi::{XbarComputeMetrics, XbarStatus};
use xbar_test_utils::fixtures::{ramp_voltages, FIXTURE_SEED};

const SENTINEL: f64 = -7.5;

fn create(size: usize) -> u64 {
    let mut handle = 0u64;
    let rc = xbar_create_with_workers(size as i32, &FIXTURE_SEED, 1, &mut handle);
    assert_eq!(rc, XbarStatus::Ok as i32);
    handle
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn status_follows_lengths(size in 1usize..12, n in 0usize..16, cap in 0usize..16) {
        let handle = create(size);
        let voltages = ramp_voltages(n.max(1));
        let mut out = vec![SENTINEL; cap.max(1)];

        let rc = xbar_compute(handle, voltages.as_ptr(), n, out.as_mut_ptr(), cap);
        let expected = if cap < size {
            XbarStatus::BufferTooSmall
        } else if n != size {
            XbarStatus::DimensionMismatch
        } else {
            XbarStatus::Ok
        };
        prop_assert_eq!(rc, expected as i32);

        let mut metrics = XbarComputeMetrics::default();
        prop_assert_eq!(xbar_metrics_get(handle, &mut metrics), XbarStatus::Ok as i32);
        if expected == XbarStatus::Ok {
            prop_assert!(out[..size].iter().all(|&c| c == 0.0));
            prop_assert!(out[size..].iter().all(|&c| c == SENTINEL));
            prop_assert_eq!(metrics.rows, size as u64);
        } else {
            prop_assert!(out.iter().all(|&c| c == SENTINEL));
            prop_assert_eq!(metrics.rows, 0);
        }
        prop_assert_eq!(xbar_destroy(handle), XbarStatus::Ok as i32);
    }
}
