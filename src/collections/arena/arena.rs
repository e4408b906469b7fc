use std::mem;
use std::num::NonZero;
use std::sync::atomic::{AtomicU32, Ordering};

use super::Handle;
#[doc(inline)]
pub use crate::util::error::AllocationFailure;

/// Handles store slot indices as `u32`, which bounds the number of slots.
const MAX_SLOTS: usize = u32::MAX as usize;

static NEXT_OWNER: AtomicU32 = AtomicU32::new(0);

/// Returns an id that no other live arena is using, short of 2^32 arenas being created.
fn next_owner() -> u32 {
    NEXT_OWNER.fetch_add(1, Ordering::Relaxed)
}

/// A slab of values addressed by [`Handle`]s.
///
/// Freed slots are recycled (most recently freed first), and each reuse bumps the slot's
/// generation so that handles to the previous occupant stop resolving. A slot whose generation
/// counter is exhausted is retired instead of recycled.
///
/// Every arena has its own owner id, which is stamped into the handles it issues. A handle from a
/// different arena never resolves, even if a slot with the same index and generation exists here.
/// Clones are different arenas too: handles issued by the original are rejected by the clone.
///
/// An optional slot limit makes the arena refuse to grow past a fixed number of slots, which is
/// reported as an [`AllocationFailure`] exactly like a refusal from the global allocator.
///
/// # Time Complexity
/// | Method | Complexity |
/// |-|-|
/// | `len` | `O(1)` |
/// | `insert` | `O(1)`* |
/// | `remove` | `O(1)` |
/// | `get/get_mut` | `O(1)` |
///
/// \* Amortized, growing the backing storage takes `O(n)`.
#[derive(Debug)]
pub struct Arena<T> {
    pub(crate) owner: u32,
    pub(crate) slots: Vec<Slot<T>>,
    pub(crate) free: Option<u32>,
    pub(crate) free_len: usize,
    pub(crate) len: usize,
    pub(crate) limit: usize,
}

#[derive(Debug, Clone)]
pub(crate) enum Slot<T> {
    Occupied {
        generation: NonZero<u32>,
        value: T,
    },
    Vacant {
        generation: NonZero<u32>,
        next_free: Option<u32>,
    },
}

impl<T> Arena<T> {
    /// Creates a new, empty Arena without allocating and without a slot limit.
    pub fn new() -> Arena<T> {
        Arena::with_limit(MAX_SLOTS)
    }

    /// Creates a new, empty Arena with room for `cap` values before reallocating.
    pub fn with_cap(cap: usize) -> Arena<T> {
        Arena {
            slots: Vec::with_capacity(cap.min(MAX_SLOTS)),
            ..Arena::new()
        }
    }

    /// Creates a new, empty Arena that will never hold more than `limit` slots. Inserting beyond
    /// the limit fails with an [`AllocationFailure`].
    pub fn with_limit(limit: usize) -> Arena<T> {
        Arena {
            owner: next_owner(),
            slots: Vec::new(),
            free: None,
            free_len: 0,
            len: 0,
            limit: if limit < MAX_SLOTS { limit } else { MAX_SLOTS },
        }
    }

    /// Returns the id stamped into every handle this Arena issues.
    pub(crate) const fn owner(&self) -> u32 {
        self.owner
    }

    /// Returns the number of values currently stored.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the Arena stores no values.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the maximum number of slots the Arena may grow to.
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Ensures that the next `additional` calls to [`insert`](Arena::insert) won't need to
    /// allocate, and therefore can't fail.
    pub fn reserve(&mut self, additional: usize) -> Result<(), AllocationFailure> {
        let needed = additional.saturating_sub(self.free_len);
        if needed == 0 {
            return Ok(());
        }

        let failure = AllocationFailure {
            requested: needed,
            limit: self.limit,
        };

        let within_limit = self.slots.len()
            .checked_add(needed)
            .is_some_and(|total| total <= self.limit);
        if !within_limit {
            log::debug!(
                "arena limit reached: {} slots in use, {} more requested, limit {}",
                self.slots.len(), needed, self.limit,
            );
            return Err(failure);
        }

        self.slots.try_reserve(needed).map_err(|error| {
            log::debug!("arena allocation of {needed} slots failed: {error}");
            failure
        })
    }

    /// Stores `value`, returning a [`Handle`] to it.
    pub fn insert(&mut self, value: T) -> Result<Handle, AllocationFailure> {
        self.reserve(1)?;

        let handle = match self.free {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                let Slot::Vacant { generation, next_free } = *slot else {
                    unreachable!("free list refers to an occupied slot");
                };
                *slot = Slot::Occupied { generation, value };
                self.free = next_free;
                self.free_len -= 1;
                Handle::new(self.owner, index, generation)
            },
            None => {
                // The limit is never above MAX_SLOTS, so the new index fits.
                let index = self.slots.len() as u32;
                self.slots.push(Slot::Occupied {
                    generation: NonZero::<u32>::MIN,
                    value,
                });
                Handle::new(self.owner, index, NonZero::<u32>::MIN)
            },
        };

        self.len += 1;
        Ok(handle)
    }

    /// Removes and returns the value referred to by `handle`, or None if the handle is stale.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        if handle.owner != self.owner {
            return None;
        }
        let slot = self.slots.get_mut(handle.slot())?;
        match slot {
            Slot::Occupied { generation, .. } if *generation == handle.generation => {},
            _ => return None,
        }

        let next_generation = handle.generation.checked_add(1);
        let old = mem::replace(slot, Slot::Vacant {
            generation: next_generation.unwrap_or(handle.generation),
            next_free: self.free,
        });
        // A slot that has run out of generations is never handed out again.
        if next_generation.is_some() {
            self.free = Some(handle.index);
            self.free_len += 1;
        }
        self.len -= 1;

        match old {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    /// Returns true if `handle` still refers to a stored value.
    pub fn contains(&self, handle: Handle) -> bool {
        self.get(handle).is_some()
    }

    /// Returns a reference to the value referred to by `handle`, or None if the handle is stale.
    pub fn get(&self, handle: Handle) -> Option<&T> {
        if handle.owner != self.owner {
            return None;
        }
        match self.slots.get(handle.slot())? {
            Slot::Occupied { generation, value } if *generation == handle.generation => Some(value),
            _ => None,
        }
    }

    /// Returns a mutable reference to the value referred to by `handle`, or None if the handle is
    /// stale.
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        if handle.owner != self.owner {
            return None;
        }
        match self.slots.get_mut(handle.slot())? {
            Slot::Occupied { generation, value } if *generation == handle.generation => Some(value),
            _ => None,
        }
    }
}

impl<T> Arena<T> {
    /// Visits every stored value mutably, in slot order. Used to restamp the handles a collection
    /// keeps inside its nodes after cloning.
    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut().filter_map(|slot| match slot {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Vacant { .. } => None,
        })
    }
}

impl<T: Clone> Clone for Arena<T> {
    /// Clones every slot into a new arena with its own owner id.
    fn clone(&self) -> Self {
        Arena {
            owner: next_owner(),
            slots: self.slots.clone(),
            free: self.free,
            free_len: self.free_len,
            len: self.len,
            limit: self.limit,
        }
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Arena::new()
    }
}
