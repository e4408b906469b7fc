use std::num::NonZero;

/// A reference to a value stored in an [`Arena`](super::Arena).
///
/// Handles are plain data: copying one is free and holding one doesn't borrow the arena. A handle
/// resolves only while the value it was issued for is still stored; once that value is removed the
/// slot's generation moves on and the handle is rejected by every accessor. A handle is also
/// rejected by every arena other than the one that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    pub(crate) owner: u32,
    pub(crate) index: u32,
    pub(crate) generation: NonZero<u32>,
}

impl Handle {
    pub(crate) const fn new(owner: u32, index: u32, generation: NonZero<u32>) -> Handle {
        Handle { owner, index, generation }
    }

    /// Returns the same slot and generation as issued by the arena `owner`.
    pub(crate) const fn rehome(self, owner: u32) -> Handle {
        Handle { owner, ..self }
    }

    pub(crate) const fn slot(self) -> usize {
        self.index as usize
    }
}
