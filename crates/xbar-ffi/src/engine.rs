//! Engine lifecycle FFI: create, compute, benchmark, reset, destroy.
//!
//! All engines live in one static [`EngineRegistry`]. The registry locks its
//! table only for handle lookup and guards each engine with its own mutex,
//! so calls on different handles run concurrently and a second call on a
//! busy handle returns `XBAR_STATUS_CONCURRENT_ACCESS_DENIED`.

use xbar_engine::{EngineConfig, EngineError, EngineHandle, EngineRegistry};

use crate::status::XbarStatus;
use crate::types::{XbarBenchmarkReport, XbarComputeMetrics, XbarThermalTelemetry};

static REGISTRY: EngineRegistry = EngineRegistry::new();

/// The process-wide registry behind the C API.
///
/// Rust hosts use this to install an
/// [`AuthorizationGate`](xbar_engine::AuthorizationGate) before handing the
/// library to C callers.
pub fn registry() -> &'static EngineRegistry {
    &REGISTRY
}

fn status(e: &EngineError) -> i32 {
    XbarStatus::from(e) as i32
}

/// Read an optional seed pointer.
#[allow(unsafe_code)]
fn read_seed(seed: *const u64) -> Option<u64> {
    if seed.is_null() {
        None
    } else {
        // SAFETY: non-null seed points to a valid u64 per caller contract.
        Some(unsafe { *seed })
    }
}

fn config_for(size: i32, seed: Option<u64>) -> Result<EngineConfig, XbarStatus> {
    let size = usize::try_from(size)
        .ok()
        .filter(|&s| s > 0)
        .ok_or(XbarStatus::InvalidDimension)?;
    let config = EngineConfig::new(size);
    Ok(match seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    })
}

/// Create a `size x size` crossbar engine.
///
/// `seed` may be null for a fresh random seed. On success the handle is
/// written to `handle_out`. Returns `XBAR_STATUS_INVALID_DIMENSION` if
/// `size <= 0`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn xbar_create(size: i32, seed: *const u64, handle_out: *mut u64) -> i32 {
    ffi_guard!({
        if handle_out.is_null() {
            return XbarStatus::InvalidArgument as i32;
        }
        let config = match config_for(size, read_seed(seed)) {
            Ok(c) => c,
            Err(s) => return s as i32,
        };
        match REGISTRY.create(config) {
            Ok(handle) => {
                // SAFETY: handle_out is valid per caller contract.
                unsafe { *handle_out = handle.into_raw() };
                XbarStatus::Ok as i32
            }
            Err(e) => status(&e),
        }
    })
}

/// Create an engine with an explicit worker thread count (0 = auto).
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn xbar_create_with_workers(
    size: i32,
    seed: *const u64,
    workers: u32,
    handle_out: *mut u64,
) -> i32 {
    ffi_guard!({
        if handle_out.is_null() {
            return XbarStatus::InvalidArgument as i32;
        }
        let mut config = match config_for(size, read_seed(seed)) {
            Ok(c) => c,
            Err(s) => return s as i32,
        };
        if workers > 0 {
            config = config.with_workers(workers as usize);
        }
        match REGISTRY.create(config) {
            Ok(handle) => {
                // SAFETY: handle_out is valid per caller contract.
                unsafe { *handle_out = handle.into_raw() };
                XbarStatus::Ok as i32
            }
            Err(e) => status(&e),
        }
    })
}

/// Propagate `n_voltages` voltages and write one current per row.
///
/// `voltages` may be null only when `n_voltages == 0`. `currents_out` must
/// hold at least `size` elements (`XBAR_STATUS_BUFFER_TOO_SMALL`
/// otherwise). A length other than `size` returns
/// `XBAR_STATUS_DIMENSION_MISMATCH` and leaves the engine untouched.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn xbar_compute(
    handle: u64,
    voltages: *const f64,
    n_voltages: usize,
    currents_out: *mut f64,
    currents_cap: usize,
) -> i32 {
    ffi_guard!({
        if currents_out.is_null() || (voltages.is_null() && n_voltages > 0) {
            return XbarStatus::InvalidArgument as i32;
        }
        let handle = EngineHandle::from_raw(handle);
        let size = match REGISTRY.with_engine(handle, |e| e.size()) {
            Ok(s) => s,
            Err(e) => return status(&e),
        };
        if currents_cap < size {
            return XbarStatus::BufferTooSmall as i32;
        }
        let voltages: &[f64] = if n_voltages == 0 {
            &[]
        } else {
            // SAFETY: voltages points to n_voltages valid f64 values.
            unsafe { std::slice::from_raw_parts(voltages, n_voltages) }
        };
        // SAFETY: currents_out points to currents_cap >= size writable f64 values.
        let currents = unsafe { std::slice::from_raw_parts_mut(currents_out, size) };
        match REGISTRY.compute_into(handle, voltages, currents) {
            Ok(()) => XbarStatus::Ok as i32,
            Err(e) => status(&e),
        }
    })
}

/// Run `iterations` compute calls at the configured drive voltage.
///
/// `report_out` may be null to discard the report.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn xbar_benchmark(
    handle: u64,
    iterations: u32,
    report_out: *mut XbarBenchmarkReport,
) -> i32 {
    ffi_guard!({
        match REGISTRY.benchmark(EngineHandle::from_raw(handle), iterations) {
            Ok(report) => {
                if !report_out.is_null() {
                    // SAFETY: report_out is valid per caller contract.
                    unsafe { *report_out = XbarBenchmarkReport::from(&report) };
                }
                XbarStatus::Ok as i32
            }
            Err(e) => status(&e),
        }
    })
}

/// One-shot benchmark: create a fresh engine, benchmark it, destroy it.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn xbar_run_benchmark(
    size: i32,
    iterations: u32,
    report_out: *mut XbarBenchmarkReport,
) -> i32 {
    ffi_guard!({
        let config = match config_for(size, None) {
            Ok(c) => c,
            Err(s) => return s as i32,
        };
        let handle = match REGISTRY.create(config) {
            Ok(h) => h,
            Err(e) => return status(&e),
        };
        let result = REGISTRY.benchmark(handle, iterations);
        // The engine is private to this call, so destroy cannot race.
        if let Err(e) = REGISTRY.destroy(handle) {
            tracing::warn!(error = %e, ?handle, "one-shot benchmark engine not released");
        }
        match result {
            Ok(report) => {
                if !report_out.is_null() {
                    // SAFETY: report_out is valid per caller contract.
                    unsafe { *report_out = XbarBenchmarkReport::from(&report) };
                }
                XbarStatus::Ok as i32
            }
            Err(e) => status(&e),
        }
    })
}

/// Reset every cell; `seed` may be null for a fresh random seed.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn xbar_reset(handle: u64, seed: *const u64) -> i32 {
    ffi_guard!({
        match REGISTRY.reset(EngineHandle::from_raw(handle), read_seed(seed)) {
            Ok(()) => XbarStatus::Ok as i32,
            Err(e) => status(&e),
        }
    })
}

/// Destroy an engine. Idempotent: unknown or already destroyed handles
/// return `XBAR_STATUS_OK`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn xbar_destroy(handle: u64) -> i32 {
    ffi_guard!({
        match REGISTRY.destroy(EngineHandle::from_raw(handle)) {
            Ok(_) => XbarStatus::Ok as i32,
            Err(e) => status(&e),
        }
    })
}

/// Write a value read from the engine behind `handle` into `out`.
#[allow(unsafe_code)]
fn read_into<T>(
    handle: u64,
    out: *mut T,
    read: impl FnOnce(&xbar_engine::CrossbarEngine) -> T,
) -> i32 {
    if out.is_null() {
        return XbarStatus::InvalidArgument as i32;
    }
    match REGISTRY.with_engine(EngineHandle::from_raw(handle), |e| read(e)) {
        Ok(value) => {
            // SAFETY: out is valid and writable per caller contract.
            unsafe { out.write(value) };
            XbarStatus::Ok as i32
        }
        Err(e) => status(&e),
    }
}

/// Crossbar edge length of the engine behind `handle`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn xbar_size_get(handle: u64, out: *mut u64) -> i32 {
    ffi_guard!({ read_into(handle, out, |e| e.size() as u64) })
}

/// Resolved drift seed of the engine behind `handle`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn xbar_seed_get(handle: u64, out: *mut u64) -> i32 {
    ffi_guard!({ read_into(handle, out, |e| e.seed()) })
}

/// Temperature summary of the engine behind `handle`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn xbar_telemetry_get(handle: u64, out: *mut XbarThermalTelemetry) -> i32 {
    ffi_guard!({ read_into(handle, out, |e| XbarThermalTelemetry::from(&e.telemetry())) })
}

/// Metrics of the most recent compute call on the engine behind `handle`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn xbar_metrics_get(handle: u64, out: *mut XbarComputeMetrics) -> i32 {
    ffi_guard!({ read_into(handle, out, |e| XbarComputeMetrics::from(&e.last_metrics())) })
}
