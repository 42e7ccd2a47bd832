//! Process-wide table of engines addressed by [`EngineHandle`].
//!
//! Each engine sits behind its own `Arc<Mutex<_>>`. The table lock is held
//! only long enough to look a handle up, so different engines run
//! concurrently. A second call arriving while an engine is busy is refused
//! with [`EngineError::ConcurrentAccessDenied`] rather than queued.
//!
//! [`EngineRegistry::new()`] is `const`, so a registry can live in a
//! `static`.

use std::sync::{Arc, Mutex, RwLock, TryLockError};

use crate::alloc::BufferAllocator;
use crate::config::EngineConfig;
use crate::engine::CrossbarEngine;
use crate::error::EngineError;
use crate::gate::{AuthorizationGate, GateDecision, GatedOperation};
use crate::handle::{EngineHandle, HandleTable};
use crate::harness::BenchmarkReport;

type EngineArc = Arc<Mutex<CrossbarEngine>>;

/// Handle-addressed collection of [`CrossbarEngine`]s with an optional
/// authorization gate.
pub struct EngineRegistry {
    engines: Mutex<HandleTable<EngineArc>>,
    gate: RwLock<Option<Arc<dyn AuthorizationGate>>>,
}

impl EngineRegistry {
    /// An empty registry that allows every operation.
    pub const fn new() -> Self {
        Self {
            engines: Mutex::new(HandleTable::new()),
            gate: RwLock::new(None),
        }
    }

    /// Install `gate`; it is consulted before every create, compute, and
    /// benchmark.
    pub fn set_gate(&self, gate: Arc<dyn AuthorizationGate>) -> Result<(), EngineError> {
        *self.gate.write().map_err(|_| EngineError::Poisoned)? = Some(gate);
        Ok(())
    }

    /// Remove the gate, allowing everything again.
    pub fn clear_gate(&self) -> Result<(), EngineError> {
        *self.gate.write().map_err(|_| EngineError::Poisoned)? = None;
        Ok(())
    }

    fn authorize(&self, operation: GatedOperation) -> Result<(), EngineError> {
        let gate = self.gate.read().map_err(|_| EngineError::Poisoned)?.clone();
        match gate.map_or(GateDecision::Allow, |g| g.authorize(&operation)) {
            GateDecision::Allow => Ok(()),
            GateDecision::Deny => {
                tracing::warn!(%operation, "operation denied by authorization gate");
                Err(EngineError::AuthorizationDenied { operation })
            }
        }
    }

    /// Build an engine from `config` and register it.
    pub fn create(&self, config: EngineConfig) -> Result<EngineHandle, EngineError> {
        self.authorize(GatedOperation::Create { size: config.size })?;
        self.insert(CrossbarEngine::new(config)?)
    }

    /// Like [`create()`](Self::create), drawing output buffers from
    /// `allocator`.
    pub fn create_with_allocator(
        &self,
        config: EngineConfig,
        allocator: Arc<dyn BufferAllocator>,
    ) -> Result<EngineHandle, EngineError> {
        self.authorize(GatedOperation::Create { size: config.size })?;
        self.insert(CrossbarEngine::with_allocator(config, allocator)?)
    }

    fn insert(&self, engine: CrossbarEngine) -> Result<EngineHandle, EngineError> {
        let mut engines = self.engines.lock().map_err(|_| EngineError::Poisoned)?;
        // Only reachable once every 32-bit slot has been used up.
        engines
            .insert(Arc::new(Mutex::new(engine)))
            .ok_or(EngineError::InvalidHandle)
    }

    /// Run `f` with exclusive access to the engine behind `handle`.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidHandle`] for unknown or destroyed handles,
    /// [`EngineError::ConcurrentAccessDenied`] if the engine is busy.
    pub fn with_engine<R>(
        &self,
        handle: EngineHandle,
        f: impl FnOnce(&mut CrossbarEngine) -> R,
    ) -> Result<R, EngineError> {
        let engine = self
            .engines
            .lock()
            .map_err(|_| EngineError::Poisoned)?
            .get(handle)
            .cloned()
            .ok_or(EngineError::InvalidHandle)?;
        let mut guard = match engine.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) => return Err(EngineError::ConcurrentAccessDenied),
            Err(TryLockError::Poisoned(_)) => return Err(EngineError::Poisoned),
        };
        Ok(f(&mut *guard))
    }

    /// Propagate `voltages` through the engine behind `handle`.
    pub fn compute(&self, handle: EngineHandle, voltages: &[f64]) -> Result<Vec<f64>, EngineError> {
        self.with_engine(handle, |engine| {
            self.authorize(GatedOperation::Compute {
                size: engine.size(),
            })?;
            engine.compute(voltages)
        })?
    }

    /// Hand a buffer obtained from [`compute()`](Self::compute) back to the
    /// allocator of the engine behind `handle`.
    ///
    /// Engines built with a bounded allocator need this to keep serving
    /// calls. If the handle is gone, the buffer is dropped and
    /// [`EngineError::InvalidHandle`] is returned.
    pub fn release_buffer(
        &self,
        handle: EngineHandle,
        buffer: Vec<f64>,
    ) -> Result<(), EngineError> {
        self.with_engine(handle, |engine| engine.release_buffer(buffer))
    }

    /// Propagate into a caller-owned buffer.
    pub fn compute_into(
        &self,
        handle: EngineHandle,
        voltages: &[f64],
        currents: &mut [f64],
    ) -> Result<(), EngineError> {
        self.with_engine(handle, |engine| {
            self.authorize(GatedOperation::Compute {
                size: engine.size(),
            })?;
            engine.compute_into(voltages, currents)
        })?
    }

    /// Benchmark the engine behind `handle`.
    pub fn benchmark(
        &self,
        handle: EngineHandle,
        iterations: u32,
    ) -> Result<BenchmarkReport, EngineError> {
        self.with_engine(handle, |engine| {
            self.authorize(GatedOperation::Benchmark {
                size: engine.size(),
                iterations,
            })?;
            engine.benchmark(iterations)
        })?
    }

    /// Re-initialize the engine behind `handle` with a new seed.
    pub fn reset(&self, handle: EngineHandle, seed: Option<u64>) -> Result<(), EngineError> {
        self.with_engine(handle, |engine| engine.reset(seed))
    }

    /// Release the engine behind `handle`.
    ///
    /// Idempotent: returns `Ok(false)` for handles that are already gone. A
    /// call still running on the engine finishes before it is dropped.
    pub fn destroy(&self, handle: EngineHandle) -> Result<bool, EngineError> {
        let removed = self
            .engines
            .lock()
            .map_err(|_| EngineError::Poisoned)?
            .remove(handle);
        if removed.is_some() {
            tracing::debug!(?handle, "crossbar engine destroyed");
        }
        Ok(removed.is_some())
    }

    /// Live engines.
    ///
    /// # Errors
    ///
    /// [`EngineError::Poisoned`] if a panic poisoned the handle table.
    pub fn len(&self) -> Result<usize, EngineError> {
        Ok(self.engines.lock().map_err(|_| EngineError::Poisoned)?.len())
    }

    /// `true` if no engines are live.
    pub fn is_empty(&self) -> Result<bool, EngineError> {
        Ok(self.len()? == 0)
    }
}

impl Default for EngineRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EngineRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineRegistry")
            .field("engines", &self.len().ok())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xbar_core::StateError;

    struct DenyCompute;

    impl AuthorizationGate for DenyCompute {
        fn authorize(&self, operation: &GatedOperation) -> GateDecision {
            match operation {
                GatedOperation::Compute { .. } => GateDecision::Deny,
                _ => GateDecision::Allow,
            }
        }
    }

    #[test]
    fn lifecycle() {
        let registry = EngineRegistry::new();
        let h = registry.create(EngineConfig::new(4).with_seed(42)).unwrap();
        assert_eq!(registry.len(), Ok(1));
        let out = registry.compute(h, &[1.0; 4]).unwrap();
        assert_eq!(out, vec![0.0; 4]);
        assert!(registry.destroy(h).unwrap());
        assert!(!registry.destroy(h).unwrap());
        assert_eq!(registry.is_empty(), Ok(true));
        assert_eq!(
            registry.compute(h, &[1.0; 4]),
            Err(EngineError::InvalidHandle)
        );
    }

    #[test]
    fn create_rejects_zero_size() {
        let registry = EngineRegistry::new();
        assert_eq!(
            registry.create(EngineConfig::new(0)),
            Err(EngineError::State(StateError::InvalidDimension { size: 0 }))
        );
        assert_eq!(registry.is_empty(), Ok(true));
    }

    #[test]
    fn gate_denies_compute_only() {
        let registry = EngineRegistry::new();
        registry.set_gate(Arc::new(DenyCompute)).unwrap();
        let h = registry.create(EngineConfig::new(2).with_seed(1)).unwrap();
        match registry.compute(h, &[1.0; 2]) {
            Err(EngineError::AuthorizationDenied {
                operation: GatedOperation::Compute { size: 2 },
            }) => {}
            other => panic!("expected AuthorizationDenied, got {other:?}"),
        }
        let calls = registry.with_engine(h, |e| e.compute_calls()).unwrap();
        assert_eq!(calls, 0);
        registry.clear_gate().unwrap();
        assert!(registry.compute(h, &[1.0; 2]).is_ok());
    }

    #[test]
    fn busy_engine_rejects_reentry() {
        let registry = EngineRegistry::new();
        let h = registry.create(EngineConfig::new(2).with_seed(1)).unwrap();
        let inner = registry
            .with_engine(h, |_| registry.compute(h, &[0.0; 2]))
            .unwrap();
        assert_eq!(inner, Err(EngineError::ConcurrentAccessDenied));
    }

    #[test]
    fn poisoned_table_is_reported() {
        let registry = EngineRegistry::new();
        let h = registry.create(EngineConfig::new(2).with_seed(1)).unwrap();
        std::thread::scope(|s| {
            let poisoner = s.spawn(|| {
                let _table = registry.engines.lock().unwrap();
                panic!("poison the handle table");
            });
            assert!(poisoner.join().is_err());
        });
        assert_eq!(registry.len(), Err(EngineError::Poisoned));
        assert_eq!(registry.is_empty(), Err(EngineError::Poisoned));
        assert_eq!(registry.destroy(h), Err(EngineError::Poisoned));
        assert_eq!(
            registry.create(EngineConfig::new(2)),
            Err(EngineError::Poisoned)
        );
    }

    #[test]
    fn release_buffer_on_destroyed_handle() {
        let registry = EngineRegistry::new();
        let h = registry.create(EngineConfig::new(2).with_seed(1)).unwrap();
        let out = registry.compute(h, &[1.0; 2]).unwrap();
        registry.destroy(h).unwrap();
        assert_eq!(
            registry.release_buffer(h, out),
            Err(EngineError::InvalidHandle)
        );
    }

    #[test]
    fn reset_and_benchmark_through_handle() {
        let registry = EngineRegistry::new();
        let h = registry.create(EngineConfig::new(3).with_seed(1)).unwrap();
        registry.reset(h, Some(99)).unwrap();
        assert_eq!(registry.with_engine(h, |e| e.seed()).unwrap(), 99);
        let report = registry.benchmark(h, 2).unwrap();
        assert_eq!(report.iterations, 2);
        assert_eq!(report.size, 3);
    }
}
