use crate::collections::arena::{Arena, Handle};
use crate::collections::linked::{Link, ListEnds};
use crate::util::option::OptionExtension;

/// Key bits consumed by each level of the trie.
pub(crate) const BITS_PER_LEVEL: u32 = 4;

/// Children per node, one for each permutation of a level's bits.
pub(crate) const FANOUT: usize = 1 << BITS_PER_LEVEL;

/// The deepest trie any [`TrieKey`](super::TrieKey) can need.
pub(crate) const MAX_DEPTH: usize = (u64::BITS / BITS_PER_LEVEL) as usize;

pub(crate) type NodeArena = Arena<TrieNode>;

#[derive(Debug, Clone, Copy)]
pub(crate) enum TrieNode {
    /// An interior node, with one child per bit permutation.
    Branch([Link; FANOUT]),
    /// A node on the last level. Each slot anchors the list of values stored under one key.
    Anchor([ListEnds; FANOUT]),
}

impl TrieNode {
    pub const fn branch() -> TrieNode {
        TrieNode::Branch([None; FANOUT])
    }

    pub const fn anchor() -> TrieNode {
        TrieNode::Anchor([ListEnds::EMPTY; FANOUT])
    }

    pub const fn children(&self) -> Option<&[Link; FANOUT]> {
        match self {
            TrieNode::Branch(children) => Some(children),
            TrieNode::Anchor(_) => None,
        }
    }

    pub const fn children_mut(&mut self) -> Option<&mut [Link; FANOUT]> {
        match self {
            TrieNode::Branch(children) => Some(children),
            TrieNode::Anchor(_) => None,
        }
    }

    pub const fn buckets(&self) -> Option<&[ListEnds; FANOUT]> {
        match self {
            TrieNode::Anchor(buckets) => Some(buckets),
            TrieNode::Branch(_) => None,
        }
    }

    pub const fn buckets_mut(&mut self) -> Option<&mut [ListEnds; FANOUT]> {
        match self {
            TrieNode::Anchor(buckets) => Some(buckets),
            TrieNode::Branch(_) => None,
        }
    }

    /// Restamps the links of this node after its arena was cloned: children as issued by the node
    /// arena `nodes`, list ends as issued by the value arena `values`.
    pub fn rehome(&mut self, nodes: u32, values: u32) {
        match self {
            TrieNode::Branch(children) => {
                for child in children.iter_mut() {
                    *child = child.map(|child| child.rehome(nodes));
                }
            },
            TrieNode::Anchor(buckets) => {
                for ends in buckets.iter_mut() {
                    ends.rehome(values);
                }
            },
        }
    }

    /// Returns true if nothing is reachable through this node any more.
    pub fn is_vacant(&self) -> bool {
        match self {
            TrieNode::Branch(children) => children.iter().all(Option::is_none),
            TrieNode::Anchor(buckets) => buckets.iter().all(ListEnds::is_empty),
        }
    }
}

/// Extracts the bit permutation that selects a child at `level` of a trie with `depth` levels.
pub(crate) const fn bucket_at(bits: u64, level: u32, depth: u32) -> usize {
    let shift = (depth - 1 - level) * BITS_PER_LEVEL;
    ((bits >> shift) & (FANOUT as u64 - 1)) as usize
}

impl NodeArena {
    /// Returns the child slots of a node above the last level.
    pub(crate) fn children(&self, node: Handle) -> &[Link; FANOUT] {
        self.get(node)
            .and_then(TrieNode::children)
            .invariant("expected a branch above the last trie level")
    }

    pub(crate) fn children_mut(&mut self, node: Handle) -> &mut [Link; FANOUT] {
        self.get_mut(node)
            .and_then(TrieNode::children_mut)
            .invariant("expected a branch above the last trie level")
    }

    /// Returns the list slots of a node on the last level.
    pub(crate) fn anchor(&self, node: Handle) -> &[ListEnds; FANOUT] {
        self.get(node)
            .and_then(TrieNode::buckets)
            .invariant("expected an anchor on the last trie level")
    }

    pub(crate) fn anchor_mut(&mut self, node: Handle) -> &mut [ListEnds; FANOUT] {
        self.get_mut(node)
            .and_then(TrieNode::buckets_mut)
            .invariant("expected an anchor on the last trie level")
    }
}
