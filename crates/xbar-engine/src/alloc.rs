//! Output buffer allocation seam.
//!
//! [`CrossbarEngine::compute()`](crate::CrossbarEngine::compute) obtains the
//! buffer it returns from a [`BufferAllocator`]. The default
//! [`HeapAllocator`] simply allocates. [`PooledAllocator`] models a fixed
//! capacity transfer pool: every acquisition is charged against a byte
//! budget (rounded up to a cache line), released buffers are kept for reuse,
//! and [`reset()`](PooledAllocator::reset) reclaims the whole budget at once.

use std::sync::Mutex;

use thiserror::Error;

/// Allocation granularity of [`PooledAllocator`], in bytes.
pub const POOL_ALIGNMENT: usize = 64;

/// Errors from a [`BufferAllocator`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AllocError {
    /// The pool's byte budget cannot cover the request.
    #[error("buffer pool exhausted: requested {requested} bytes, {available} available")]
    Exhausted {
        /// Bytes requested after alignment.
        requested: usize,
        /// Bytes left in the budget.
        available: usize,
    },
    /// The pool's lock was poisoned.
    #[error("buffer pool lock poisoned")]
    Poisoned,
}

/// Source of `f64` buffers for propagation output.
pub trait BufferAllocator: Send + Sync {
    /// Return a zeroed buffer of exactly `len` elements.
    fn acquire(&self, len: usize) -> Result<Vec<f64>, AllocError>;

    /// Give a buffer back. The default drops it.
    fn release(&self, buffer: Vec<f64>) {
        drop(buffer);
    }
}

/// Plain heap allocation, never fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeapAllocator;

impl BufferAllocator for HeapAllocator {
    fn acquire(&self, len: usize) -> Result<Vec<f64>, AllocError> {
        Ok(vec![0.0; len])
    }
}

struct PoolState {
    in_use: usize,
    free: Vec<Vec<f64>>,
}

/// Bounded pool of reusable buffers with a byte budget.
pub struct PooledAllocator {
    capacity: usize,
    state: Mutex<PoolState>,
}

impl PooledAllocator {
    /// Create a pool that may hand out at most `capacity_bytes` at once.
    pub fn new(capacity_bytes: usize) -> Self {
        Self {
            capacity: capacity_bytes,
            state: Mutex::new(PoolState {
                in_use: 0,
                free: Vec::new(),
            }),
        }
    }

    /// Total byte budget.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes currently charged against the budget.
    pub fn in_use(&self) -> Result<usize, AllocError> {
        Ok(self.state.lock().map_err(|_| AllocError::Poisoned)?.in_use)
    }

    /// Reclaim the whole budget. Outstanding buffers stay valid but are no
    /// longer accounted for.
    pub fn reset(&self) -> Result<(), AllocError> {
        self.state.lock().map_err(|_| AllocError::Poisoned)?.in_use = 0;
        Ok(())
    }
}

impl std::fmt::Debug for PooledAllocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PooledAllocator")
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

/// Bytes charged for a buffer of `len` elements.
fn charged_bytes(len: usize) -> usize {
    len.saturating_mul(std::mem::size_of::<f64>())
        .saturating_add(POOL_ALIGNMENT - 1)
        / POOL_ALIGNMENT
        * POOL_ALIGNMENT
}

impl BufferAllocator for PooledAllocator {
    fn acquire(&self, len: usize) -> Result<Vec<f64>, AllocError> {
        let requested = charged_bytes(len);
        let mut state = self.state.lock().map_err(|_| AllocError::Poisoned)?;
        let available = self.capacity.saturating_sub(state.in_use);
        if requested > available {
            return Err(AllocError::Exhausted {
                requested,
                available,
            });
        }
        state.in_use += requested;
        let mut buffer = match state.free.iter().position(|b| b.capacity() >= len) {
            Some(i) => state.free.swap_remove(i),
            None => Vec::with_capacity(len),
        };
        buffer.clear();
        buffer.resize(len, 0.0);
        Ok(buffer)
    }

    fn release(&self, buffer: Vec<f64>) {
        if let Ok(mut state) = self.state.lock() {
            state.in_use = state.in_use.saturating_sub(charged_bytes(buffer.len()));
            state.free.push(buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heap_returns_zeroed_buffers() {
        let buf = HeapAllocator.acquire(5).unwrap();
        assert_eq!(buf, vec![0.0; 5]);
    }

    #[test]
    fn charge_rounds_to_cache_line() {
        assert_eq!(charged_bytes(0), 0);
        assert_eq!(charged_bytes(1), 64);
        assert_eq!(charged_bytes(8), 64);
        assert_eq!(charged_bytes(9), 128);
    }

    #[test]
    fn pool_exhausts_then_recovers_on_release() {
        let pool = PooledAllocator::new(128);
        let a = pool.acquire(8).unwrap();
        let b = pool.acquire(8).unwrap();
        assert_eq!(pool.in_use().unwrap(), 128);
        assert_eq!(
            pool.acquire(1),
            Err(AllocError::Exhausted {
                requested: 64,
                available: 0
            })
        );
        pool.release(a);
        let c = pool.acquire(4).unwrap();
        assert_eq!(c.len(), 4);
        drop((b, c));
    }

    #[test]
    fn reused_buffers_are_zeroed() {
        let pool = PooledAllocator::new(1024);
        let mut a = pool.acquire(4).unwrap();
        a.fill(7.0);
        pool.release(a);
        let b = pool.acquire(4).unwrap();
        assert_eq!(b, vec![0.0; 4]);
    }

    #[test]
    fn reset_reclaims_budget() {
        let pool = PooledAllocator::new(64);
        let _held = pool.acquire(8).unwrap();
        assert!(pool.acquire(1).is_err());
        pool.reset().unwrap();
        assert_eq!(pool.in_use().unwrap(), 0);
        assert!(pool.acquire(8).is_ok());
    }
}
