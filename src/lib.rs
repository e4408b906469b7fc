//! This crate is my attempt at writing an ordered multimap for scalar keys, as a radix trie whose
//! leaves anchor linked lists of values.
//!
//! # Purpose
//! This repo / crate is a project that I'm working on as a learning experience. Tries are usually
//! shown off with string keys, but a fixed-width integer key makes for a trie of constant depth:
//! every key lives the same number of levels down, and walking the leftmost path always finds the
//! smallest key. Hanging a linked list off each leaf turns that into a multimap that keeps values in
//! insertion order, which is exactly what a timer queue or a scheduler needs.
//!
//! # Method
//! None of the linked structures here use raw pointers. Instead, nodes are stored in an
//! [`Arena`](collections::arena::Arena) and refer to each other through
//! [`Handle`](collections::arena::Handle)s, which carry a generation so that a handle to a removed
//! node simply stops resolving. That's also what makes positions into the collections safe to hold
//! on to while the collection changes.
//!
//! # Error Handling
//! Specifically for collections, it is more ergonomic for functions to panic in some cases, because
//! users don't want to be forced to handle an error every time they invoke a method. Because of
//! this, every fallible method has a panicking form and a `try_` form returning a [`Result`].
//!
//! When this crate employs errors via [`Result`]s, it does so in a method that is strongly typed,
//! with structs (mostly ZSTs) that implement [`Error`](std::error::Error), and an enum,
//! [`CollectionError`](collections::CollectionError), that any of them convert into for use with
//! `?`.
//!
//! # Dependencies
//! This crate uses `std`, and [`Vec`] as the backing storage of its arenas. It depends on some
//! derive macros because they remove the need for some very repetitive programming, and on `log`
//! to trace structural changes to the trie.
#![warn(clippy::missing_safety_doc)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::missing_const_for_fn)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::module_inception)]

pub mod collections;

pub(crate) mod util;
