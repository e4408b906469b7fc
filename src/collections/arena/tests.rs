#![cfg(test)]

use std::num::NonZero;

use super::*;
use crate::util::drop::DropCounter;

#[test]
fn test_insert_get_remove() {
    let mut arena = Arena::new();
    let a = arena.insert("a").unwrap();
    let b = arena.insert("b").unwrap();

    assert_eq!(arena.len(), 2);
    assert_eq!(arena.get(a), Some(&"a"));
    assert_eq!(arena.get(b), Some(&"b"));

    *arena.get_mut(b).unwrap() = "B";
    assert_eq!(arena.remove(b), Some("B"), "Removal should return the mutated value.");
    assert_eq!(arena.len(), 1);
    assert!(!arena.contains(b), "A removed handle shouldn't resolve.");
    assert!(arena.contains(a), "Removing one value shouldn't affect another.");
}

#[test]
fn test_stale_handle_after_reuse() {
    let mut arena = Arena::new();
    let first = arena.insert(1).unwrap();
    arena.remove(first);

    let second = arena.insert(2).unwrap();
    assert_eq!(
        first.index, second.index,
        "The freed slot should be recycled for the next insertion."
    );
    assert_ne!(first, second, "A recycled slot should carry a new generation.");
    assert_eq!(arena.get(first), None, "The stale handle shouldn't see the new occupant.");
    assert_eq!(arena.remove(first), None);
    assert_eq!(arena.get(second), Some(&2));
}

#[test]
fn test_exhausted_generation_retires_slot() {
    let mut arena = Arena::new();
    let handle = arena.insert(()).unwrap();
    if let Slot::Occupied { generation, .. } = &mut arena.slots[handle.slot()] {
        *generation = NonZero::<u32>::MAX;
    }
    let handle = Handle {
        generation: NonZero::<u32>::MAX,
        ..handle
    };

    assert_eq!(arena.remove(handle), Some(()));
    let next = arena.insert(()).unwrap();
    assert_ne!(
        next.index, handle.index,
        "A slot without generations left should never be handed out again."
    );
}

#[test]
fn test_limit() {
    let mut arena = Arena::with_limit(2);
    let a = arena.insert('a').unwrap();
    arena.insert('b').unwrap();

    assert_eq!(
        arena.insert('c'),
        Err(AllocationFailure { requested: 1, limit: 2 }),
        "Inserting past the limit should fail."
    );
    assert_eq!(arena.len(), 2, "A failed insertion shouldn't change the length.");

    arena.remove(a);
    assert!(arena.insert('c').is_ok(), "Freed slots should count towards the limit.");
}

#[test]
fn test_reserve() {
    let mut arena = Arena::<u8>::with_limit(3);
    assert!(arena.reserve(3).is_ok());
    assert_eq!(
        arena.reserve(4),
        Err(AllocationFailure { requested: 4, limit: 3 })
    );

    let handles = [0, 1, 2].map(|i| arena.insert(i).unwrap());
    arena.remove(handles[1]);
    assert!(arena.reserve(1).is_ok(), "A vacant slot satisfies a reservation of one.");
    assert!(arena.reserve(2).is_err());
}

#[test]
fn test_drop() {
    let counter = DropCounter::new();
    let mut arena = Arena::with_cap(4);
    let handles = [1, 2, 3].map(|i| arena.insert(counter.track(i)).unwrap());

    drop(arena.remove(handles[0]));
    assert_eq!(counter.dropped(), 1);
    assert_eq!(arena.remove(handles[0]), None, "Removing twice shouldn't drop twice.");
    assert_eq!(counter.dropped(), 1);

    drop(arena);
    assert_eq!(counter.dropped(), 3, "Dropping the arena should drop the remaining values.");
}

#[test]
fn test_foreign_handle() {
    let mut first = Arena::new();
    let mut second = Arena::new();
    let ours = first.insert('a').unwrap();
    let theirs = second.insert('b').unwrap();
    assert_eq!((ours.index, ours.generation), (theirs.index, theirs.generation));

    assert_eq!(first.get(theirs), None, "A handle from another arena shouldn't resolve.");
    assert_eq!(first.get_mut(theirs), None);
    assert_eq!(first.remove(theirs), None);
    assert_eq!(first.get(ours), Some(&'a'), "A rejected removal shouldn't touch the arena.");
    assert_eq!(first.len(), 1);
}

#[test]
fn test_clone_is_a_separate_arena() {
    let mut arena = Arena::new();
    let handle = arena.insert(1).unwrap();
    let mut copy = arena.clone();

    assert_eq!(copy.len(), 1);
    assert_eq!(copy.get(handle), None, "The original's handles shouldn't resolve in a clone.");
    let restamped = handle.rehome(copy.owner());
    assert_eq!(copy.get(restamped), Some(&1));

    *copy.get_mut(restamped).unwrap() = 2;
    assert_eq!(arena.get(handle), Some(&1), "Clones shouldn't share values.");
    assert_eq!(arena.get(restamped), None);
}
