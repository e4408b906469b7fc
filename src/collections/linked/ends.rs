use super::{Iter, Link, ListNode, NodeArena, linked, linked_mut};
use crate::collections::arena::Handle;
use crate::util::error::{AllocationFailure, OutOfRange};

/// The first and last node of one list. The engine never owns the arena: the same arena can hold
/// any number of independent lists, each identified by its own pair of ends.
///
/// Both ends are None exactly when the list is empty.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ListEnds {
    pub head: Link,
    pub tail: Link,
}

impl ListEnds {
    pub const EMPTY: ListEnds = ListEnds {
        head: None,
        tail: None,
    };

    pub const fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Appends `value` after the current tail.
    pub fn push_back<T>(
        &mut self,
        arena: &mut NodeArena<T>,
        value: T,
    ) -> Result<Handle, AllocationFailure> {
        let handle = arena.insert(ListNode {
            prev: self.tail,
            next: None,
            value,
        })?;

        // The node is fully constructed, only now is it made reachable.
        match self.tail {
            Some(tail) => linked_mut(arena, tail).next = Some(handle),
            None => self.head = Some(handle),
        }
        self.tail = Some(handle);
        Ok(handle)
    }

    /// Prepends `value` before the current head.
    pub fn push_front<T>(
        &mut self,
        arena: &mut NodeArena<T>,
        value: T,
    ) -> Result<Handle, AllocationFailure> {
        let handle = arena.insert(ListNode {
            prev: None,
            next: self.head,
            value,
        })?;

        match self.head {
            Some(head) => linked_mut(arena, head).prev = Some(handle),
            None => self.tail = Some(handle),
        }
        self.head = Some(handle);
        Ok(handle)
    }

    /// Unlinks the node referred to by `handle`, frees it and returns its value.
    ///
    /// Fails if the handle is stale, or if the node is the first or last of a list but not of this
    /// one. Interior nodes can't be told apart from those of other lists sharing the arena, but
    /// unlinking one only patches its neighbours, so the structure stays consistent either way.
    pub fn unlink<T>(&mut self, arena: &mut NodeArena<T>, handle: Handle) -> Result<T, OutOfRange> {
        let node = arena.get(handle).ok_or(OutOfRange)?;
        if (node.prev.is_none() && self.head != Some(handle))
            || (node.next.is_none() && self.tail != Some(handle))
        {
            return Err(OutOfRange);
        }

        let ListNode { prev, next, value } = arena.remove(handle).ok_or(OutOfRange)?;
        match prev {
            Some(prev) => linked_mut(arena, prev).next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => linked_mut(arena, next).prev = prev,
            None => self.tail = prev,
        }
        Ok(value)
    }

    /// Frees every node of the list, dropping the values in order, and leaves the list empty.
    /// Returns the number of nodes freed.
    pub fn destruct<T>(&mut self, arena: &mut NodeArena<T>) -> usize {
        let mut count = 0;
        let mut next = self.head;
        while let Some(handle) = next {
            next = linked(arena, handle).next;
            drop(arena.remove(handle));
            count += 1;
        }
        *self = ListEnds::EMPTY;
        count
    }

    /// Restamps both ends as issued by the arena `owner`.
    pub const fn rehome(&mut self, owner: u32) {
        if let Some(head) = self.head {
            self.head = Some(head.rehome(owner));
        }
        if let Some(tail) = self.tail {
            self.tail = Some(tail.rehome(owner));
        }
    }

    pub fn iter<'a, T>(&self, arena: &'a NodeArena<T>) -> Iter<'a, T> {
        Iter {
            arena,
            front: self.head,
            back: self.tail,
        }
    }
}
