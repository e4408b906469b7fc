use std::fmt::{self, Debug, Formatter};

use crate::collections::arena::Handle;
use crate::collections::linked::{self, Iter, ListEnds, NodeArena, Position};
#[doc(inline)]
pub use crate::util::error::{AllocationFailure, OutOfRange};
use crate::util::result::ResultExtension;

/// A list with links in both directions, whose nodes live in an arena and are addressed by
/// generation-checked [`Handle`]s.
///
/// Every push returns the [`Handle`] of the new node, which allows the node to be read, modified
/// or removed later in constant time. A handle outlives the node it refers to safely: once the node
/// is removed, every method taking the handle reports [`OutOfRange`] (or panics, for the
/// non-`try_` variants).
/// Handles issued by a different list, including a clone of this one, are rejected in the same way.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of items in the LinkedList.
///
/// | Method | Complexity |
/// |-|-|
/// | `len` | `O(1)` |
/// | `front/back` | `O(1)` |
/// | `push_front/back` | `O(1)`* |
/// | `pop_front/back` | `O(1)` |
/// | `get` | `O(1)` |
/// | `remove` | `O(1)` |
/// | `clear` | `O(n)` |
/// | `contains` | `O(n)` |
///
/// \* Amortized, as the backing arena occasionally grows.
pub struct LinkedList<T> {
    pub(crate) arena: NodeArena<T>,
    pub(crate) ends: ListEnds,
}

impl<T> LinkedList<T> {
    /// Creates a new LinkedList with no elements.
    pub fn new() -> LinkedList<T> {
        LinkedList {
            arena: NodeArena::new(),
            ends: ListEnds::EMPTY,
        }
    }

    /// Creates a new LinkedList with room for `cap` elements before reallocating.
    pub fn with_cap(cap: usize) -> LinkedList<T> {
        LinkedList {
            arena: NodeArena::with_cap(cap),
            ends: ListEnds::EMPTY,
        }
    }

    /// Returns the length of the LinkedList.
    pub const fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns true if the LinkedList contains no elements.
    pub const fn is_empty(&self) -> bool {
        self.ends.is_empty()
    }

    /// Returns a reference to the first element in the list, if it exists.
    pub fn front(&self) -> Option<&T> {
        self.get(self.ends.head?)
    }

    /// Returns a mutable reference to the first element in the list, if it exists.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.get_mut(self.ends.head?)
    }

    /// Returns a reference to the last element in the list, if it exists.
    pub fn back(&self) -> Option<&T> {
        self.get(self.ends.tail?)
    }

    /// Returns a mutable reference to the last element in the list, if it exists.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.get_mut(self.ends.tail?)
    }

    /// Add the provided element to the front of the LinkedList, returning its handle.
    ///
    /// # Panics
    /// Panics if the node can't be allocated.
    pub fn push_front(&mut self, value: T) -> Handle {
        self.try_push_front(value).throw()
    }

    /// Add the provided element to the front of the LinkedList, returning an [`Err`] rather than
    /// panicking if the node can't be allocated.
    pub fn try_push_front(&mut self, value: T) -> Result<Handle, AllocationFailure> {
        self.ends.push_front(&mut self.arena, value)
    }

    /// Add the provided element to the back of the LinkedList, returning its handle.
    ///
    /// # Panics
    /// Panics if the node can't be allocated.
    pub fn push_back(&mut self, value: T) -> Handle {
        self.try_push_back(value).throw()
    }

    /// Add the provided element to the back of the LinkedList, returning an [`Err`] rather than
    /// panicking if the node can't be allocated.
    pub fn try_push_back(&mut self, value: T) -> Result<Handle, AllocationFailure> {
        self.ends.push_back(&mut self.arena, value)
    }

    /// Removes the first element from the list and returns it, if the list isn't empty.
    pub fn pop_front(&mut self) -> Option<T> {
        let head = self.ends.head?;
        self.ends.unlink(&mut self.arena, head).ok()
    }

    /// Removes the last element from the list and returns it, if the list isn't empty.
    pub fn pop_back(&mut self) -> Option<T> {
        let tail = self.ends.tail?;
        self.ends.unlink(&mut self.arena, tail).ok()
    }

    /// Returns a reference to the element referred to by `handle`, or None if it was removed.
    pub fn get(&self, handle: Handle) -> Option<&T> {
        Some(&self.arena.get(handle)?.value)
    }

    /// Returns a mutable reference to the element referred to by `handle`, or None if it was
    /// removed.
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        Some(&mut self.arena.get_mut(handle)?.value)
    }

    /// Removes the element referred to by `handle` and returns it.
    ///
    /// # Panics
    /// Panics if `handle` doesn't refer to an element of this list.
    pub fn remove(&mut self, handle: Handle) -> T {
        self.try_remove(handle).throw()
    }

    /// Removes the element referred to by `handle` and returns it, returning an [`Err`] rather
    /// than panicking if the handle doesn't refer to an element of this list.
    pub fn try_remove(&mut self, handle: Handle) -> Result<T, OutOfRange> {
        self.ends.unlink(&mut self.arena, handle)
    }

    /// Removes all elements, dropping them front to back.
    pub fn clear(&mut self) {
        self.ends.destruct(&mut self.arena);
    }

    /// Returns a position at the first element, or [`Position::END`] if the list is empty.
    pub const fn begin(&self) -> Position {
        Position {
            node: self.ends.head,
        }
    }

    /// Returns the end sentinel.
    pub const fn end(&self) -> Position {
        Position::END
    }

    /// Returns a reference to the element at `pos`.
    pub fn get_at(&self, pos: Position) -> Result<&T, OutOfRange> {
        Ok(&pos.validate(&self.arena)?.1.value)
    }

    /// Moves `pos` to the following element, or to the end sentinel after the last one.
    pub fn advance(&self, pos: &mut Position) -> Result<(), OutOfRange> {
        pos.advance(&self.arena, true)
    }

    /// Moves `pos` to the preceding element, or to the end sentinel before the first one.
    pub fn retreat(&self, pos: &mut Position) -> Result<(), OutOfRange> {
        pos.advance(&self.arena, false)
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.into_iter()
    }
}

impl<T: PartialEq> LinkedList<T> {
    pub fn contains(&self, item: &T) -> bool {
        self.iter().any(|element| element == item)
    }
}

impl<T> LinkedList<T> {
    #[cfg(test)]
    pub(crate) fn verify_double_links(&self) {
        use crate::collections::linked::linked;

        let mut count = 0;
        let mut prev = None;
        let mut curr = self.ends.head;
        while let Some(handle) = curr {
            let node = linked(&self.arena, handle);
            assert_eq!(node.prev, prev, "Each node should link back to its predecessor.");
            prev = curr;
            curr = node.next;
            count += 1;
        }
        assert_eq!(self.ends.tail, prev, "The tail should be the last node reached.");
        assert_eq!(count, self.len(), "Every stored node should be reachable.");
    }
}

impl<T: Clone> Clone for LinkedList<T> {
    /// Clones every element into a new list. Handles and positions of the original don't refer to
    /// the clone's elements.
    fn clone(&self) -> Self {
        let mut arena = self.arena.clone();
        linked::rehome_nodes(&mut arena);
        let mut ends = self.ends;
        ends.rehome(arena.owner());
        LinkedList { arena, ends }
    }
}

impl<T> Default for LinkedList<T> {
    fn default() -> Self {
        LinkedList::new()
    }
}

impl<T: PartialEq> PartialEq for LinkedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for LinkedList<T> {}

impl<T: Debug> Debug for LinkedList<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> FromIterator<T> for LinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = LinkedList::new();
        list.extend(iter);
        list
    }
}

impl<T> Extend<T> for LinkedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}
