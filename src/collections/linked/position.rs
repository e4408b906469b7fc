use super::{Link, ListNode, NodeArena};
use crate::collections::arena::Handle;
use crate::util::error::OutOfRange;

/// A position within a list: either a node or the end sentinel.
///
/// Positions don't borrow their collection. They are validated on every use, so a position to a
/// removed node reports [`OutOfRange`] instead of dangling, while positions to other nodes stay
/// usable.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub(crate) node: Link,
}

impl Position {
    /// The position past the last element.
    pub const END: Position = Position { node: None };

    pub(crate) const fn at(handle: Handle) -> Position {
        Position { node: Some(handle) }
    }

    /// Returns true if this is the end sentinel.
    pub const fn is_end(self) -> bool {
        self.node.is_none()
    }

    /// Returns the handle of the node at this position, if any.
    pub const fn handle(self) -> Option<Handle> {
        self.node
    }

    /// Resolves the position to its node, failing for the end sentinel or a removed node.
    pub(crate) fn validate<T>(
        self,
        arena: &NodeArena<T>,
    ) -> Result<(Handle, &ListNode<T>), OutOfRange> {
        let handle = self.node.ok_or(OutOfRange)?;
        let node = arena.get(handle).ok_or(OutOfRange)?;
        Ok((handle, node))
    }

    /// Moves to the next (or previous) node, validating the current one first. Stepping off
    /// either end of the list lands on the end sentinel.
    pub(crate) fn advance<T>(&mut self, arena: &NodeArena<T>, forward: bool) -> Result<(), OutOfRange> {
        let (_, node) = self.validate(arena)?;
        self.node = if forward { node.next } else { node.prev };
        Ok(())
    }
}
