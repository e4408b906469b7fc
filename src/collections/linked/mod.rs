//! Linked collection types. The building block is an intrusive doubly-linked list engine whose
//! nodes live in an [`Arena`](crate::collections::arena::Arena) and link to each other through
//! [`Handle`](crate::collections::arena::Handle)s. The engine backs both [`LinkedList`] and the
//! per-key value chains of [`TrieOrderedMultimap`](crate::collections::trie::TrieOrderedMultimap).

mod ends;
mod iter;
pub mod list;
mod node;
mod position;

pub(crate) use ends::*;
pub use iter::*;
#[doc(inline)]
pub use list::LinkedList;
pub(crate) use node::*;
pub use position::*;
