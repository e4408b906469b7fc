//! Slab storage addressed by generation-checked [`Handle`]s.
//!
//! Every node of the linked and trie collections lives in an [`Arena`]. Links between nodes are
//! handles rather than pointers, so removing a node invalidates the handles that referred to it
//! instead of leaving them dangling: a handle only resolves while the slot it names still holds
//! the value it was issued for.

mod arena;
mod handle;
mod tests;

pub use arena::*;
pub use handle::*;
