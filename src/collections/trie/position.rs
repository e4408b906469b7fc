use std::fmt::{self, Debug, Formatter};

use super::TrieKey;
use crate::collections::arena::Handle;
use crate::collections::linked;

/// A position within a [`TrieOrderedMultimap`](super::TrieOrderedMultimap): a value together with
/// the key it's stored under, or the end sentinel.
///
/// Positions are returned by [`add`](super::TrieOrderedMultimap::add),
/// [`find`](super::TrieOrderedMultimap::find) and [`begin`](super::TrieOrderedMultimap::begin),
/// and are moved forward with [`advance`](super::TrieOrderedMultimap::advance). They don't borrow
/// the map; instead every use checks that the referenced value is still stored. Removing a value
/// invalidates only the positions referring to that value.
///
/// Two positions are equal if they refer to the same value, or are both the end sentinel.
#[derive(Clone, Copy)]
pub struct Position<K: TrieKey> {
    pub(crate) key: K,
    pub(crate) node: linked::Position,
}

impl<K: TrieKey> Position<K> {
    pub(crate) const fn at(key: K, handle: Handle) -> Position<K> {
        Position {
            key,
            node: linked::Position::at(handle),
        }
    }

    pub(crate) fn end() -> Position<K> {
        Position {
            key: K::from_bits(0),
            node: linked::Position::END,
        }
    }

    /// Returns the key of the referenced value. Meaningless for the end sentinel.
    pub const fn key(&self) -> K {
        self.key
    }

    /// Returns true if this is the end sentinel.
    pub const fn is_end(&self) -> bool {
        self.node.is_end()
    }
}

impl<K: TrieKey> PartialEq for Position<K> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl<K: TrieKey> Eq for Position<K> {}

impl<K: TrieKey + Debug> Debug for Position<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.node.handle() {
            Some(handle) => f.debug_struct("Position")
                .field("key", &self.key)
                .field("node", &handle)
                .finish(),
            None => write!(f, "Position::End"),
        }
    }
}
