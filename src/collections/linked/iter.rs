use std::iter::FusedIterator;

use super::{Link, NodeArena};

/// A borrowing iterator over the values of one list, front to back. Also iterates back to front
/// through [`DoubleEndedIterator`].
pub struct Iter<'a, T> {
    pub(crate) arena: &'a NodeArena<T>,
    // Both ends move inwards; the iterator is exhausted once they have crossed.
    pub(crate) front: Link,
    pub(crate) back: Link,
}

impl<'a, T> Iter<'a, T> {
    fn finish(&mut self) {
        self.front = None;
        self.back = None;
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.front?;
        let node = self.arena.get(handle)?;

        if self.front == self.back {
            self.finish();
        } else {
            self.front = node.next;
        }

        Some(&node.value)
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let handle = self.back?;
        let node = self.arena.get(handle)?;

        if self.front == self.back {
            self.finish();
        } else {
            self.back = node.prev;
        }

        Some(&node.value)
    }
}

impl<'a, T> FusedIterator for Iter<'a, T> {}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Iter { ..*self }
    }
}
