use crate::collections::arena::{Arena, Handle};
use crate::util::option::OptionExtension;

pub(crate) type Link = Option<Handle>;

pub(crate) type NodeArena<T> = Arena<ListNode<T>>;

/// A list node: both links plus the value itself, stored inline.
#[derive(Debug, Clone)]
pub(crate) struct ListNode<T> {
    pub prev: Link,
    pub next: Link,
    pub value: T,
}

/// Follows a link that the list structure guarantees to be live.
pub(crate) fn linked<T>(arena: &NodeArena<T>, handle: Handle) -> &ListNode<T> {
    arena.get(handle).invariant("list link refers to a freed node")
}

pub(crate) fn linked_mut<T>(arena: &mut NodeArena<T>, handle: Handle) -> &mut ListNode<T> {
    arena.get_mut(handle).invariant("list link refers to a freed node")
}

impl<T> ListNode<T> {
    pub(crate) fn rehome(&mut self, owner: u32) {
        self.prev = self.prev.map(|prev| prev.rehome(owner));
        self.next = self.next.map(|next| next.rehome(owner));
    }
}

/// Restamps every link between the nodes of `arena` with its own owner id, after the arena was
/// cloned from another.
pub(crate) fn rehome_nodes<T>(arena: &mut NodeArena<T>) {
    let owner = arena.owner();
    for node in arena.values_mut() {
        node.rehome(owner);
    }
}
