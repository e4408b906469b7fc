//! A module containing [`TrieOrderedMultimap`] and its associated types.
//!
//! The map is keyed by scalars implementing [`TrieKey`], and stores any number of values per key.
//! Values are reached through [`Position`]s, which stay valid until the value they refer to is
//! removed, and through the borrowing [`Iter`] and owning [`IntoIter`] iterators.

mod iter;
mod key;
mod multimap;
mod node;
mod position;
mod proptests;
mod tests;

pub use iter::*;
pub use key::*;
pub use multimap::*;
pub use position::*;
