//! Test utilities and mock collaborators for xbar development.
//!
//! Provides mock [`AuthorizationGate`]s and [`BufferAllocator`]s that record
//! what the engine asked of them, plus a relative-tolerance assertion. Engine
//! and physics presets live in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use xbar_engine::{AllocError, AuthorizationGate, BufferAllocator, GateDecision, GatedOperation};

/// Gate that refuses everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct DenyAllGate;

impl AuthorizationGate for DenyAllGate {
    fn authorize(&self, _operation: &GatedOperation) -> GateDecision {
        GateDecision::Deny
    }
}

/// Gate that records every request and answers with a fixed decision.
pub struct RecordingGate {
    decision: GateDecision,
    seen: Mutex<Vec<GatedOperation>>,
}

impl RecordingGate {
    pub fn new(decision: GateDecision) -> Self {
        Self {
            decision,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Operations seen so far, in order.
    pub fn seen(&self) -> Vec<GatedOperation> {
        self.seen.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl AuthorizationGate for RecordingGate {
    fn authorize(&self, operation: &GatedOperation) -> GateDecision {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(*operation);
        }
        self.decision
    }
}

/// Heap allocator that counts acquisitions and releases.
#[derive(Debug, Default)]
pub struct CountingAllocator {
    acquired: AtomicUsize,
    released: AtomicUsize,
}

impl CountingAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

impl BufferAllocator for CountingAllocator {
    fn acquire(&self, len: usize) -> Result<Vec<f64>, AllocError> {
        self.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(vec![0.0; len])
    }

    fn release(&self, buffer: Vec<f64>) {
        self.released.fetch_add(1, Ordering::SeqCst);
        drop(buffer);
    }
}

/// Assert `|a - b| <= rel * max(|a|, |b|)` element-wise.
///
/// Two exact zeros compare equal.
#[track_caller]
pub fn assert_rel_close(a: &[f64], b: &[f64], rel: f64) {
    assert_eq!(a.len(), b.len(), "length mismatch");
    for (i, (&x, &y)) in a.iter().zip(b).enumerate() {
        let scale = x.abs().max(y.abs());
        assert!(
            (x - y).abs() <= rel * scale,
            "element {i}: {x} vs {y} exceeds relative tolerance {rel}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_gate_keeps_order() {
        let gate = RecordingGate::new(GateDecision::Allow);
        gate.authorize(&GatedOperation::Create { size: 1 });
        gate.authorize(&GatedOperation::Compute { size: 1 });
        assert_eq!(
            gate.seen(),
            vec![
                GatedOperation::Create { size: 1 },
                GatedOperation::Compute { size: 1 }
            ]
        );
    }

    #[test]
    fn rel_close_accepts_zeros() {
        assert_rel_close(&[0.0, 1.0], &[0.0, 1.0 + 1e-12], 1e-9);
    }

    #[test]
    #[should_panic(expected = "relative tolerance")]
    fn rel_close_rejects_drift() {
        assert_rel_close(&[1.0], &[1.1], 1e-9);
    }
}
