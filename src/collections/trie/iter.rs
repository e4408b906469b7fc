use std::iter::FusedIterator;

use super::{TrieKey, TrieOrderedMultimap};
use crate::collections::linked::{self, Link};

impl<'a, K: TrieKey, V> IntoIterator for &'a TrieOrderedMultimap<K, V> {
    type Item = (K, &'a V);

    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        match self.find_first_key() {
            Some((bits, head)) => Iter {
                map: self,
                bits,
                next: Some(head),
                remaining: self.len,
            },
            None => Iter {
                map: self,
                bits: 0,
                next: None,
                remaining: 0,
            },
        }
    }
}

/// A borrowing iterator over the key-value pairs of a
/// [`TrieOrderedMultimap`](super::TrieOrderedMultimap), in ascending key order and insertion order
/// within each key.
pub struct Iter<'a, K: TrieKey, V> {
    pub(crate) map: &'a TrieOrderedMultimap<K, V>,
    // Encoded key of the list that next belongs to.
    pub(crate) bits: u64,
    pub(crate) next: Link,
    pub(crate) remaining: usize,
}

impl<'a, K: TrieKey, V> Iterator for Iter<'a, K, V> {
    type Item = (K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.next?;
        let node = linked::linked(&self.map.values, handle);
        let key = K::from_bits(self.bits);

        self.next = match node.next {
            Some(next) => Some(next),
            None => self.map.find_next_key(self.bits).map(|(bits, head)| {
                self.bits = bits;
                head
            }),
        };
        self.remaining -= 1;

        Some((key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K: TrieKey, V> FusedIterator for Iter<'a, K, V> {}

impl<'a, K: TrieKey, V> ExactSizeIterator for Iter<'a, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<'a, K: TrieKey, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Iter { ..*self }
    }
}

impl<K: TrieKey, V> IntoIterator for TrieOrderedMultimap<K, V> {
    type Item = (K, V);

    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            map: self,
        }
    }
}

/// An owning iterator over the key-value pairs of a
/// [`TrieOrderedMultimap`](super::TrieOrderedMultimap), in the same order as [`Iter`].
pub struct IntoIter<K: TrieKey, V> {
    // Drained through try_pop_front, which also prunes as it goes.
    pub(crate) map: TrieOrderedMultimap<K, V>,
}

impl<K: TrieKey, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.map.try_pop_front().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len(), Some(self.len()))
    }
}

impl<K: TrieKey, V> FusedIterator for IntoIter<K, V> {}

impl<K: TrieKey, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.map.len()
    }
}
