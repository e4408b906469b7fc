use std::fmt::{self, Debug, Formatter};
use std::marker::PhantomData;

use super::node::{BITS_PER_LEVEL, FANOUT, MAX_DEPTH, NodeArena, TrieNode, bucket_at};
use super::{Iter, Position, TrieKey};
use crate::collections::arena::Handle;
use crate::collections::linked::{self, Link, ListEnds};
#[doc(inline)]
pub use crate::util::error::{AllocationFailure, BadAccess, OutOfRange};
use crate::util::option::OptionExtension;
use crate::util::result::ResultExtension;

/// An ordered multimap over scalar keys, built from a fixed-depth radix trie whose last level
/// anchors doubly-linked lists of values.
///
/// Each trie level consumes 4 bits of the key, most significant first, so a key of `b` bits is
/// always found `⌈b / 4⌉` levels down. The last level's nodes hold, for each of their 16 slots,
/// the first and last node of the list of values stored under one key. As a result:
/// - Iteration yields keys in ascending order, and the values of one key in insertion order.
/// - Adding a value appends to its key's list without traversing it.
/// - Removing a value through a [`Position`] unlinks it without traversing its key's list.
///
/// Branches of the trie are allocated lazily by [`add`](TrieOrderedMultimap::add), and pruned as
/// soon as the last value beneath them is removed.
///
/// All nodes live in two arenas owned by the map, and positions refer to values through
/// generation-checked handles. A [`Position`] therefore never dangles: once its value is removed,
/// using it reports [`OutOfRange`], while positions to other values stay valid.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of values in the map.
/// - `d`: The depth of the trie, `⌈K::BITS / 4⌉`.
///
/// | Method | Complexity |
/// |-|-|
/// | `len` | `O(1)` |
/// | `add` | `O(d)` |
/// | `find/get` | `O(d)` |
/// | `front` | `O(d)` |
/// | `pop_front` | `O(d)` |
/// | `remove/pop` | `O(d)` |
/// | `advance` | `O(1)`, `O(d)`* |
/// | `clear` | `O(n)` |
///
/// \* Moving past the last value of a key searches the trie for the next key.
pub struct TrieOrderedMultimap<K: TrieKey, V> {
    pub(crate) nodes: NodeArena,
    pub(crate) values: linked::NodeArena<V>,
    pub(crate) root: Link,
    pub(crate) len: usize,
    pub(crate) _phantom: PhantomData<K>,
}

impl<K: TrieKey, V> TrieOrderedMultimap<K, V> {
    /// Number of levels in the trie. The last one holds the anchors.
    pub(crate) const DEPTH: u32 = {
        assert!(K::BITS > 0 && K::BITS <= u64::BITS, "TrieKey::BITS must be between 1 and 64");
        K::BITS.div_ceil(BITS_PER_LEVEL)
    };

    /// The encoding of the largest key, which has no successor.
    const MAX_BITS: u64 = u64::MAX >> (u64::BITS - K::BITS);

    /// Creates a new, empty TrieOrderedMultimap. Nothing is allocated until the first value is
    /// added.
    pub fn new() -> TrieOrderedMultimap<K, V> {
        TrieOrderedMultimap {
            nodes: NodeArena::new(),
            values: linked::NodeArena::new(),
            root: None,
            len: 0,
            _phantom: PhantomData,
        }
    }

    /// Creates a new, empty TrieOrderedMultimap with room for `cap` values before reallocating.
    pub fn with_cap(cap: usize) -> TrieOrderedMultimap<K, V> {
        TrieOrderedMultimap {
            values: linked::NodeArena::with_cap(cap),
            ..TrieOrderedMultimap::new()
        }
    }

    /// Creates a new, empty TrieOrderedMultimap that will never hold more than `node_limit` trie
    /// nodes or `value_limit` values. Adding beyond either limit fails with an
    /// [`AllocationFailure`].
    ///
    /// A failure while growing a key's path can leave empty trie nodes allocated, so the map may
    /// hold trie nodes while [`is_empty`](TrieOrderedMultimap::is_empty) is true. They're reused by
    /// later adds along the same path and freed by [`clear`](TrieOrderedMultimap::clear).
    pub fn with_limits(node_limit: usize, value_limit: usize) -> TrieOrderedMultimap<K, V> {
        TrieOrderedMultimap {
            nodes: NodeArena::with_limit(node_limit),
            values: linked::NodeArena::with_limit(value_limit),
            root: None,
            len: 0,
            _phantom: PhantomData,
        }
    }

    /// Returns the number of values in the map, which may be higher than the number of keys.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the map contains no values.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Adds `value` under `key`, after any values already stored under the same key, and returns
    /// a position referring to it.
    ///
    /// # Panics
    /// Panics if a node can't be allocated.
    pub fn add(&mut self, key: K, value: V) -> Position<K> {
        self.try_add(key, value).throw()
    }

    /// Adds `value` under `key`, returning an [`Err`] rather than panicking if a node can't be
    /// allocated.
    ///
    /// On failure the map remains valid and `value` is dropped, although some empty trie nodes
    /// along the key's path may remain allocated until they are reused or the map is cleared.
    pub fn try_add(&mut self, key: K, value: V) -> Result<Position<K>, AllocationFailure> {
        let bits = key.to_bits();
        debug_assert!(bits <= Self::MAX_BITS, "TrieKey::to_bits exceeded TrieKey::BITS");

        // Secure the value's node before growing the path, so that once the path exists nothing
        // can fail.
        self.values.reserve(1)?;
        let (anchor, bucket) = self.descend_or_create(bits)?;

        let ends = &mut self.nodes.anchor_mut(anchor)[bucket];
        let handle = ends.push_back(&mut self.values, value)?;
        self.len += 1;

        Ok(Position::at(key, handle))
    }

    /// Returns a position at the first value stored under `key`, or None if there is none.
    pub fn find(&self, key: K) -> Option<Position<K>> {
        let head = self.bucket(key)?.head?;
        Some(Position::at(key, head))
    }

    /// Returns a reference to the first value stored under `key`, or None if there is none.
    pub fn get(&self, key: K) -> Option<&V> {
        let head = self.bucket(key)?.head?;
        Some(&linked::linked(&self.values, head).value)
    }

    /// Returns true if at least one value is stored under `key`.
    pub fn contains_key(&self, key: K) -> bool {
        self.bucket(key).is_some_and(|ends| !ends.is_empty())
    }

    /// Returns an iterator over the values stored under `key`, in insertion order.
    pub fn values_of(&self, key: K) -> linked::Iter<'_, V> {
        self.bucket(key)
            .unwrap_or(ListEnds::EMPTY)
            .iter(&self.values)
    }

    /// Returns the smallest key and its first value.
    ///
    /// # Panics
    /// Panics if the map is empty.
    pub fn front(&self) -> (K, &V) {
        self.try_front().throw()
    }

    /// Returns the smallest key and its first value, returning an [`Err`] rather than panicking
    /// if the map is empty.
    pub fn try_front(&self) -> Result<(K, &V), BadAccess> {
        let (bits, head) = self.find_first_key().ok_or(BadAccess)?;
        Ok((K::from_bits(bits), &linked::linked(&self.values, head).value))
    }

    /// Returns the smallest key and a mutable reference to its first value.
    ///
    /// # Panics
    /// Panics if the map is empty.
    pub fn front_mut(&mut self) -> (K, &mut V) {
        self.try_front_mut().throw()
    }

    /// Returns the smallest key and a mutable reference to its first value, returning an [`Err`]
    /// rather than panicking if the map is empty.
    pub fn try_front_mut(&mut self) -> Result<(K, &mut V), BadAccess> {
        let (bits, head) = self.find_first_key().ok_or(BadAccess)?;
        Ok((K::from_bits(bits), &mut linked::linked_mut(&mut self.values, head).value))
    }

    /// Removes and returns the value that [`front`](TrieOrderedMultimap::front) refers to.
    ///
    /// # Panics
    /// Panics if the map is empty.
    pub fn pop_front(&mut self) -> (K, V) {
        self.try_pop_front().throw()
    }

    /// Removes and returns the value that [`front`](TrieOrderedMultimap::front) refers to,
    /// returning an [`Err`] rather than panicking if the map is empty.
    pub fn try_pop_front(&mut self) -> Result<(K, V), BadAccess> {
        let (bits, head) = self.find_first_key().ok_or(BadAccess)?;
        let key = K::from_bits(bits);
        let value = self.remove_value(key, head)
            .ok()
            .invariant("the first value couldn't be found under its own key");
        Ok((key, value))
    }

    /// Removes and returns the key and value at `pos`.
    ///
    /// # Panics
    /// Panics if `pos` is the end sentinel or its value was already removed.
    pub fn pop(&mut self, pos: Position<K>) -> (K, V) {
        self.try_pop(pos).throw()
    }

    /// Removes and returns the key and value at `pos`, returning an [`Err`] rather than panicking
    /// if `pos` is the end sentinel or its value was already removed.
    pub fn try_pop(&mut self, pos: Position<K>) -> Result<(K, V), OutOfRange> {
        let (handle, _) = pos.node.validate(&self.values)?;
        let value = self.remove_value(pos.key, handle)?;
        Ok((pos.key, value))
    }

    /// Removes the value at `pos`, dropping it.
    ///
    /// # Panics
    /// Panics if `pos` is the end sentinel or its value was already removed.
    pub fn remove(&mut self, pos: Position<K>) {
        self.try_remove(pos).throw()
    }

    /// Removes the value at `pos`, dropping it, returning an [`Err`] rather than panicking if `pos`
    /// is the end sentinel or its value was already removed.
    pub fn try_remove(&mut self, pos: Position<K>) -> Result<(), OutOfRange> {
        self.try_pop(pos).map(drop)
    }

    /// Removes every value, dropping them in ascending key order, and frees the whole trie,
    /// including any empty nodes left behind by a failed [`try_add`](TrieOrderedMultimap::try_add).
    pub fn clear(&mut self) {
        let Some(root) = self.root.take() else {
            return;
        };

        log::trace!("clearing trie multimap of {} values", self.len);
        self.destruct_node(root);
        self.len = 0;
        debug_assert!(self.values.is_empty() && self.nodes.is_empty());
    }

    /// Returns a position at the first value in iteration order, which is
    /// [`end`](TrieOrderedMultimap::end) if the map is empty.
    pub fn begin(&self) -> Position<K> {
        match self.find_first_key() {
            Some((bits, head)) => Position::at(K::from_bits(bits), head),
            None => self.end(),
        }
    }

    /// Returns the end sentinel.
    pub fn end(&self) -> Position<K> {
        Position::end()
    }

    /// Returns the key and value at `pos`.
    pub fn get_at(&self, pos: Position<K>) -> Result<(K, &V), OutOfRange> {
        let (_, node) = pos.node.validate(&self.values)?;
        Ok((pos.key, &node.value))
    }

    /// Returns the key and a mutable reference to the value at `pos`.
    pub fn get_mut_at(&mut self, pos: Position<K>) -> Result<(K, &mut V), OutOfRange> {
        let (handle, _) = pos.node.validate(&self.values)?;
        Ok((pos.key, &mut linked::linked_mut(&mut self.values, handle).value))
    }

    /// Moves `pos` to the following value in iteration order: the next value of the same key, or
    /// else the first value of the next larger key, or else the end sentinel.
    pub fn advance(&self, pos: &mut Position<K>) -> Result<(), OutOfRange> {
        pos.node.advance(&self.values, true)?;
        if pos.node.is_end() {
            *pos = match self.find_next_key(pos.key.to_bits()) {
                Some((bits, head)) => Position::at(K::from_bits(bits), head),
                None => Position::end(),
            };
        }
        Ok(())
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        self.into_iter()
    }
}

impl<K: TrieKey, V> TrieOrderedMultimap<K, V> {
    /// Walks down to the anchor for `bits`, allocating every missing level on the way, and returns
    /// it along with the slot of the key's list.
    ///
    /// If an allocation fails, the levels created so far stay in place. They are empty but
    /// correctly linked, so the map remains valid.
    pub(crate) fn descend_or_create(
        &mut self,
        bits: u64,
    ) -> Result<(Handle, usize), AllocationFailure> {
        let depth = Self::DEPTH;
        // The node being visited, along with the slot in its parent (None for the root).
        let mut parent: Option<(Handle, usize)> = None;

        for level in 0..depth {
            let existing = match parent {
                None => self.root,
                Some((node, index)) => self.nodes.children(node)[index],
            };

            let node = match existing {
                Some(node) => node,
                None => {
                    let fresh = if level + 1 == depth {
                        TrieNode::anchor()
                    } else {
                        TrieNode::branch()
                    };
                    let node = self.nodes.insert(fresh)?;
                    log::trace!("allocated trie level {level} on the path of {bits:#x}");

                    match parent {
                        None => self.root = Some(node),
                        Some((parent, index)) => self.nodes.children_mut(parent)[index] = Some(node),
                    }
                    node
                },
            };

            parent = Some((node, bucket_at(bits, level, depth)));
        }

        Ok(parent.invariant("a trie always has at least one level"))
    }

    /// Walks down to the anchor for `bits` without allocating, returning None as soon as a level
    /// is missing. The returned slot's list may still be empty.
    pub(crate) fn descend_existing(&self, bits: u64) -> Option<(Handle, usize)> {
        debug_assert!(bits <= Self::MAX_BITS, "TrieKey::to_bits exceeded TrieKey::BITS");
        let depth = Self::DEPTH;
        let mut node = self.root?;

        for level in 0..depth - 1 {
            node = self.nodes.children(node)[bucket_at(bits, level, depth)]?;
        }

        Some((node, bucket_at(bits, depth - 1, depth)))
    }

    /// Returns the smallest stored key and the first node of its list.
    pub(crate) fn find_first_key(&self) -> Option<(u64, Handle)> {
        self.seek(self.root?, 0, 0, None)
    }

    /// Returns the smallest stored key strictly greater than `prev_bits` and the first node of its
    /// list.
    pub(crate) fn find_next_key(&self, prev_bits: u64) -> Option<(u64, Handle)> {
        if prev_bits >= Self::MAX_BITS {
            return None;
        }
        self.seek(self.root?, 0, 0, Some(prev_bits + 1))
    }

    /// Depth-first search below `node` for the smallest key whose list isn't empty.
    ///
    /// `prefix` holds the bits of the path to `node`. While `bound` is Some, the path so far
    /// matches the bound exactly, so only slots from the bound's own permutation onwards are
    /// eligible; once a larger slot is taken, every key below it exceeds the bound.
    fn seek(&self, node: Handle, level: u32, prefix: u64, bound: Option<u64>) -> Option<(u64, Handle)> {
        let depth = Self::DEPTH;
        let start = bound.map_or(0, |bound| bucket_at(bound, level, depth));
        let node = self.nodes.get(node).invariant("trie link refers to a freed node");

        match node {
            TrieNode::Anchor(buckets) => (start..FANOUT).find_map(|index| {
                let head = buckets[index].head?;
                Some(((prefix << BITS_PER_LEVEL) | index as u64, head))
            }),
            TrieNode::Branch(children) => (start..FANOUT).find_map(|index| {
                let child = children[index]?;
                let bound = bound.filter(|_| index == start);
                self.seek(child, level + 1, (prefix << BITS_PER_LEVEL) | index as u64, bound)
            }),
        }
    }

    /// Unlinks and returns the value in `handle`, which must be stored under `key`. The key's
    /// anchor is found again from the root, since list nodes don't link back to it.
    pub(crate) fn remove_value(&mut self, key: K, handle: Handle) -> Result<V, OutOfRange> {
        let bits = key.to_bits();
        let (anchor, bucket) = self.descend_existing(bits).ok_or(OutOfRange)?;

        let ends = &mut self.nodes.anchor_mut(anchor)[bucket];
        let value = ends.unlink(&mut self.values, handle)?;
        let emptied = ends.is_empty();
        self.len -= 1;

        if emptied {
            self.prune_branch(bits);
        }
        Ok(value)
    }

    /// Frees every node on the path of `bits` that no longer leads to any value, from the anchor
    /// upwards, and detaches the pruned branch from the deepest surviving node.
    fn prune_branch(&mut self, bits: u64) {
        let depth = Self::DEPTH;
        let mut path: [Option<(Handle, usize)>; MAX_DEPTH] = [None; MAX_DEPTH];

        let mut next = self.root;
        for level in 0..depth {
            let Some(node) = next else {
                return;
            };
            let index = bucket_at(bits, level, depth);
            path[level as usize] = Some((node, index));
            next = self.nodes.get(node)
                .and_then(TrieNode::children)
                .and_then(|children| children[index]);
        }

        for level in (0..depth as usize).rev() {
            let (node, _) = path[level].invariant("pruned path shorter than the trie");
            if !self.nodes.get(node).is_some_and(TrieNode::is_vacant) {
                return;
            }

            self.nodes.remove(node);
            log::trace!("pruned trie level {level} on the path of {bits:#x}");

            match level.checked_sub(1) {
                None => self.root = None,
                Some(parent_level) => {
                    let (parent, index) = path[parent_level].invariant("pruned path has a gap");
                    self.nodes.children_mut(parent)[index] = None;
                },
            }
        }
    }

    /// Frees `node` and everything below it, dropping the values of every list on the way.
    fn destruct_node(&mut self, node: Handle) {
        let Some(&contents) = self.nodes.get(node) else {
            return;
        };

        match contents {
            TrieNode::Branch(children) => {
                for child in children.into_iter().flatten() {
                    self.destruct_node(child);
                }
            },
            TrieNode::Anchor(buckets) => {
                for mut ends in buckets {
                    ends.destruct(&mut self.values);
                }
            },
        }

        self.nodes.remove(node);
    }

    /// Returns the list of `key`, if its anchor exists.
    fn bucket(&self, key: K) -> Option<ListEnds> {
        let (anchor, bucket) = self.descend_existing(key.to_bits())?;
        Some(self.nodes.anchor(anchor)[bucket])
    }
}

impl<K: TrieKey, V> TrieOrderedMultimap<K, V> {
    /// Checks every structural invariant of the trie and returns the number of keys.
    #[cfg(test)]
    pub(crate) fn verify_structure(&self) -> usize {
        fn walk<K: TrieKey, V>(
            map: &TrieOrderedMultimap<K, V>,
            node: Handle,
            level: u32,
            counts: &mut (usize, usize, usize),
        ) {
            let depth = TrieOrderedMultimap::<K, V>::DEPTH;
            let contents = map.nodes.get(node).expect("Trie links should be live.");
            counts.2 += 1;
            assert!(!contents.is_vacant(), "Empty branches should have been pruned.");

            match contents {
                TrieNode::Branch(children) => {
                    assert!(level + 1 < depth, "Branches shouldn't occur on the last level.");
                    for child in children.iter().flatten() {
                        walk(map, *child, level + 1, counts);
                    }
                },
                TrieNode::Anchor(buckets) => {
                    assert_eq!(level + 1, depth, "Anchors should only occur on the last level.");
                    for ends in buckets.iter().filter(|ends| !ends.is_empty()) {
                        assert!(ends.tail.is_some(), "A list with a head should have a tail.");
                        counts.0 += 1;
                        counts.1 += ends.iter(&map.values).count();
                    }
                },
            }
        }

        // (keys, values, trie nodes)
        let mut counts = (0, 0, 0);
        if let Some(root) = self.root {
            walk(self, root, 0, &mut counts);
        }
        assert_eq!(counts.1, self.len, "The length should equal the sum of all list lengths.");
        assert_eq!(counts.1, self.values.len(), "Every stored value should be reachable.");
        assert_eq!(counts.2, self.nodes.len(), "Every trie node should be reachable.");
        // Holds only while no add has failed part way, as that can leave an empty path behind.
        assert_eq!(self.root.is_none(), self.len == 0, "Only an empty map has no root.");
        counts.0
    }
}

impl<K: TrieKey, V> Default for TrieOrderedMultimap<K, V> {
    fn default() -> Self {
        TrieOrderedMultimap::new()
    }
}

impl<K: TrieKey, V: Clone> Clone for TrieOrderedMultimap<K, V> {
    /// Clones every value and trie node into a new map. Positions into the original don't refer to
    /// the clone's values.
    fn clone(&self) -> Self {
        let mut nodes = self.nodes.clone();
        let mut values = self.values.clone();
        linked::rehome_nodes(&mut values);

        let (node_owner, value_owner) = (nodes.owner(), values.owner());
        for node in nodes.values_mut() {
            node.rehome(node_owner, value_owner);
        }

        TrieOrderedMultimap {
            nodes,
            values,
            root: self.root.map(|root| root.rehome(node_owner)),
            len: self.len,
            _phantom: PhantomData,
        }
    }
}

impl<K: TrieKey + PartialEq, V: PartialEq> PartialEq for TrieOrderedMultimap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<K: TrieKey + Eq, V: Eq> Eq for TrieOrderedMultimap<K, V> {}

impl<K: TrieKey + Debug, V: Debug> Debug for TrieOrderedMultimap<K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: TrieKey, V> FromIterator<(K, V)> for TrieOrderedMultimap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = TrieOrderedMultimap::new();
        map.extend(iter);
        map
    }
}

impl<K: TrieKey, V> Extend<(K, V)> for TrieOrderedMultimap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.add(key, value);
        }
    }
}
