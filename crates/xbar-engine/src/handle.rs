//! Generation-checked handles for engines held by the registry.
//!
//! A handle packs a slot index (upper 32 bits) and a generation (lower 32
//! bits). Removing an entry bumps its slot's generation, so a handle that
//! outlived its engine resolves to nothing instead of to whatever was
//! stored in the slot next. A slot whose generation would wrap is retired
//! for good.

use std::fmt;

/// Opaque reference to an engine in an [`EngineRegistry`](crate::EngineRegistry).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EngineHandle(u64);

impl EngineHandle {
    fn new(slot: u32, generation: u32) -> Self {
        Self((u64::from(slot) << 32) | u64::from(generation))
    }

    /// Rebuild a handle from its wire form.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The wire form passed across the C boundary.
    pub const fn into_raw(self) -> u64 {
        self.0
    }

    fn slot(self) -> usize {
        (self.0 >> 32) as usize
    }

    fn generation(self) -> u32 {
        self.0 as u32
    }
}

impl fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EngineHandle({}v{})", self.slot(), self.generation())
    }
}

enum Entry<T> {
    Occupied { generation: u32, value: T },
    Vacant,
    Retired,
}

/// Slot table with a free list of vacant slots.
pub(crate) struct HandleTable<T> {
    entries: Vec<Entry<T>>,
    vacant: Vec<(u32, u32)>,
    live: usize,
}

impl<T> HandleTable<T> {
    pub(crate) const fn new() -> Self {
        Self {
            entries: Vec::new(),
            vacant: Vec::new(),
            live: 0,
        }
    }

    /// Store `value`, reusing a vacant slot when one exists.
    ///
    /// Returns `None` only when every one of the 2^32 slots is in use or
    /// retired.
    pub(crate) fn insert(&mut self, value: T) -> Option<EngineHandle> {
        let (slot, generation) = match self.vacant.pop() {
            Some(free) => free,
            None => {
                let slot = u32::try_from(self.entries.len()).ok()?;
                self.entries.push(Entry::Vacant);
                (slot, 0)
            }
        };
        self.entries[slot as usize] = Entry::Occupied { generation, value };
        self.live += 1;
        Some(EngineHandle::new(slot, generation))
    }

    pub(crate) fn get(&self, handle: EngineHandle) -> Option<&T> {
        match self.entries.get(handle.slot())? {
            Entry::Occupied { generation, value } if *generation == handle.generation() => {
                Some(value)
            }
            _ => None,
        }
    }

    /// Take the value out. Stale or repeated removal yields `None`.
    pub(crate) fn remove(&mut self, handle: EngineHandle) -> Option<T> {
        let entry = self.entries.get_mut(handle.slot())?;
        match entry {
            Entry::Occupied { generation, .. } if *generation == handle.generation() => {}
            _ => return None,
        }
        let next = handle.generation().checked_add(1);
        let replacement = match next {
            Some(_) => Entry::Vacant,
            None => Entry::Retired,
        };
        let Entry::Occupied { value, .. } = std::mem::replace(entry, replacement) else {
            return None;
        };
        if let Some(generation) = next {
            self.vacant.push((handle.slot() as u32, generation));
        }
        self.live -= 1;
        Some(value)
    }

    pub(crate) fn len(&self) -> usize {
        self.live
    }
}
