use std::error::Error;
use std::fmt::{self, Display, Formatter};

use derive_more::{Display, Error, From, IsVariant, TryInto};

/// A position or handle was used after the node it referred to was removed, or the position was
/// the end sentinel, or it belongs to a different collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfRange;

impl Display for OutOfRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Position doesn't refer to an element in the collection!")
    }
}

impl Error for OutOfRange {}

/// An element was requested from an empty collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadAccess;

impl Display for BadAccess {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Attempted to access an element of an empty collection!")
    }
}

impl Error for BadAccess {}

/// The backing storage couldn't provide space for another node, either because the allocator
/// refused or because the configured slot limit was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationFailure {
    /// Number of slots that were requested beyond those already free.
    pub requested: usize,
    /// The slot limit of the storage that refused the request.
    pub limit: usize,
}

impl Display for AllocationFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unable to allocate {} node(s) in storage limited to {} nodes!",
            self.requested, self.limit
        )
    }
}

impl Error for AllocationFailure {}

/// Any of the errors produced by this crate's collections, for callers that mix operations and
/// propagate with `?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error, From, TryInto, IsVariant)]
pub enum CollectionError {
    /// See [`OutOfRange`].
    OutOfRange(OutOfRange),
    /// See [`BadAccess`].
    BadAccess(BadAccess),
    /// See [`AllocationFailure`].
    AllocationFailure(AllocationFailure),
}
