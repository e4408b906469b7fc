//! Collection types built on a shared arena allocator.
//!
//! # Purpose
//! I wrote these types to learn about linked structures without reaching for raw pointers: every
//! node lives in an [`Arena`](arena::Arena) and nodes refer to each other through
//! generation-checked [`Handle`](arena::Handle)s. A handle to a removed node can't dangle, it just
//! stops resolving.
//!
//! # Method
//! [`linked`] provides an intrusive doubly-linked list engine, which is exposed directly as
//! [`LinkedList`](linked::LinkedList) and reused by [`trie`] to chain the values of each key in
//! [`TrieOrderedMultimap`](trie::TrieOrderedMultimap).

pub mod arena;
#[cfg(feature = "linked")]
pub mod linked;
#[cfg(feature = "trie")]
pub mod trie;

#[doc(inline)]
pub use crate::util::error::{AllocationFailure, BadAccess, CollectionError, OutOfRange};
