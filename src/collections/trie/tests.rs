#![cfg(test)]

use super::*;
use crate::util::drop::DropCounter;
use crate::util::error::CollectionError;
use crate::util::panic::assert_panics;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn pairs<K: TrieKey, V: Copy>(map: &TrieOrderedMultimap<K, V>) -> Vec<(K, V)> {
    map.iter().map(|(k, v)| (k, *v)).collect()
}

#[test]
fn test_empty_map() {
    let mut map = TrieOrderedMultimap::<i32, i32>::new();
    assert_eq!(map.len(), 0);
    assert!(map.is_empty());
    assert_eq!(map.begin(), map.end(), "An empty map should begin at its end.");

    assert_eq!(map.advance(&mut map.end()), Err(OutOfRange));
    assert_eq!(map.get_at(map.begin()), Err(OutOfRange));
    assert_eq!(map.get_at(map.end()), Err(OutOfRange));
    assert_eq!(map.try_front(), Err(BadAccess));
    assert_eq!(map.try_pop(map.begin()), Err(OutOfRange));
    assert_eq!(map.try_remove(map.begin()), Err(OutOfRange));
    assert_eq!(map.try_pop_front(), Err(BadAccess));
    assert_eq!(map.find(10), None);

    assert_panics!({ map.front() });
    assert_panics!({ map.pop_front() });
    let begin = map.begin();
    assert_panics!({ map.pop(begin) });
    assert_panics!({ map.remove(begin) });

    map.clear();
    assert_eq!(map.verify_structure(), 0, "Clearing an empty map should leave nothing behind.");
}

#[test]
fn test_basic_operations() {
    init_logging();
    let mut map = TrieOrderedMultimap::<i32, i32>::new();

    let pos400 = map.add(40, 400);
    assert_eq!(map.get_at(pos400), Ok((40, &400)));
    assert_eq!(map.len(), 1);
    assert_eq!(map.front(), (40, &400));

    map.add(20, 200);
    assert_eq!(map.front(), (20, &200), "A smaller key should become the front.");
    map.add(50, 500);
    let pos300 = map.add(30, 300);
    let pos201 = map.add(20, 201);
    assert_eq!(map.front(), (20, &200), "Adding to an existing key shouldn't change the front.");
    assert_eq!(map.get_at(pos201), Ok((20, &201)));
    let pos301 = map.add(30, 301);
    assert_eq!(map.len(), 6);
    assert_eq!(map.verify_structure(), 4);

    assert_eq!(
        pairs(&map),
        [(20, 200), (20, 201), (30, 300), (30, 301), (40, 400), (50, 500)],
        "Keys should be ascending, with the values of each key in insertion order."
    );
    assert_eq!(map.find(30), Some(pos300), "Find should refer to the first value of the key.");

    assert_eq!(map.pop_front(), (20, 200));
    assert_eq!(map.len(), 5);
    assert_eq!(map.front(), (20, &201));

    map.remove(pos301);
    assert_eq!(map.len(), 4);
    assert_eq!(map.front(), (20, &201));
    map.verify_structure();

    assert_eq!(map.pop_front(), (20, 201));
    assert_eq!(map.len(), 3);
    assert_eq!(map.front(), (30, &300));
    assert_eq!(map.find(20), None, "A key should disappear with its last value.");
    assert_eq!(map.verify_structure(), 3);

    map.add(10, 101);
    assert_eq!(map.len(), 4);
    assert_eq!(map.front(), (10, &101));

    assert_eq!(map.pop(pos300), (30, 300));
    assert_eq!(map.len(), 3);
    assert_eq!(map.front(), (10, &101));

    map.add(30, 302);
    assert_eq!(map.len(), 4);
    assert_eq!(map.front(), (10, &101));
    assert_eq!(map.verify_structure(), 4);

    map.clear();
    assert_eq!(map.len(), 0);
    assert_eq!(map.get_at(pos400), Err(OutOfRange), "Clearing should invalidate every position.");

    let pos102 = map.add(10, 102);
    assert_eq!(map.front(), (10, &102));
    let pos401 = map.add(40, 401);
    assert_eq!(map.len(), 2);
    assert_eq!(map.front(), (10, &102));

    map.remove(pos102);
    assert_eq!(map.len(), 1);
    assert_eq!(map.front(), (40, &401));

    assert_eq!(map.pop(pos401), (40, 401));
    assert_eq!(map.len(), 0);
    assert_eq!(map.try_front(), Err(BadAccess));
    assert_eq!(map.verify_structure(), 0, "Removing every value should prune the whole trie.");

    map.clear();
    assert_eq!(map.len(), 0);
}

#[test]
fn test_position_invalidation() {
    let mut map = TrieOrderedMultimap::<u16, char>::new();
    let a = map.add(7, 'a');
    let b = map.add(7, 'b');
    let c = map.add(7, 'c');
    let d = map.add(9, 'd');

    map.remove(b);
    assert_eq!(map.get_at(b), Err(OutOfRange), "The removed position should be invalid.");
    assert_eq!(map.try_pop(b), Err(OutOfRange), "A value shouldn't be removable twice.");
    assert_eq!(map.get_at(a), Ok((7, &'a')));
    assert_eq!(map.get_at(c), Ok((7, &'c')));
    assert_eq!(map.get_at(d), Ok((9, &'d')));

    let mut pos = a;
    map.advance(&mut pos).unwrap();
    assert_eq!(pos, c, "Advancing should skip the removed value.");
    map.advance(&mut pos).unwrap();
    assert_eq!(pos, d, "Advancing past a key's last value should move to the next key.");
    map.advance(&mut pos).unwrap();
    assert!(pos.is_end());
    assert_eq!(map.advance(&mut pos), Err(OutOfRange), "The end can't be advanced.");

    let mut stale = b;
    assert_eq!(map.advance(&mut stale), Err(OutOfRange));

    // A recycled node must not be reachable through the position of its old value.
    let e = map.add(7, 'e');
    assert_ne!(e, b);
    assert_eq!(map.get_at(b), Err(OutOfRange));
    assert_eq!(map.values_of(7).copied().collect::<Vec<_>>(), ['a', 'c', 'e']);
}

#[test]
fn test_mutation_through_positions() {
    let mut map = TrieOrderedMultimap::<u32, String>::new();
    let pos = map.add(3, String::from("three"));
    map.add(1, String::from("one"));

    map.get_mut_at(pos).unwrap().1.push('!');
    map.front_mut().1.make_ascii_uppercase();
    assert_eq!(map.get(3).map(String::as_str), Some("three!"));
    assert_eq!(map.get(1).map(String::as_str), Some("ONE"));
    assert!(map.contains_key(1));
    assert!(!map.contains_key(2));
    assert_eq!(map.get(2), None);
}

#[test]
fn test_signed_key_order() {
    let keys = [-5, 3, i64::MIN, i64::MAX, 0, -1, 16, -16];
    let map: TrieOrderedMultimap<i64, usize> = keys.into_iter().zip(0..).collect();
    assert_eq!(map.verify_structure(), keys.len());

    let mut sorted = keys;
    sorted.sort();
    assert_eq!(
        map.iter().map(|(k, _)| k).collect::<Vec<_>>(),
        sorted,
        "Negative keys should precede positive ones."
    );
    assert_eq!(map.front(), (i64::MIN, &2));
}

#[test]
fn test_key_extremes() {
    let mut bytes = TrieOrderedMultimap::<u8, u8>::new();
    bytes.add(u8::MAX, 1);
    bytes.add(0, 0);
    bytes.add(u8::MAX, 2);
    assert_eq!(TrieOrderedMultimap::<u8, u8>::DEPTH, 2);
    assert_eq!(pairs(&bytes), [(0, 0), (255, 1), (255, 2)]);
    assert_eq!(bytes.find_next_key(u8::MAX as u64), None, "The largest key has no successor.");

    let mut wide = TrieOrderedMultimap::<u64, ()>::new();
    wide.add(u64::MAX, ());
    wide.add(1 << 63, ());
    wide.add(1, ());
    assert_eq!(TrieOrderedMultimap::<u64, ()>::DEPTH, 16);
    assert_eq!(wide.iter().map(|(k, _)| k).collect::<Vec<_>>(), [1, 1 << 63, u64::MAX]);
    assert_eq!(wide.verify_structure(), 3);

    let mut pos = wide.find(1 << 63).unwrap();
    wide.advance(&mut pos).unwrap();
    assert_eq!(pos.key(), u64::MAX);
    wide.advance(&mut pos).unwrap();
    assert_eq!(pos, wide.end());
}

#[test]
fn test_drain() {
    let counter = DropCounter::new();
    let mut map = TrieOrderedMultimap::new();
    for key in [3u32, 1, 2, 1] {
        map.add(key, counter.track(key));
    }

    let mut keys = Vec::new();
    while let Ok((key, value)) = map.try_pop_front() {
        assert_eq!(key, value.value);
        keys.push(key);
    }
    assert_eq!(keys, [1, 1, 2, 3]);
    assert_eq!(counter.dropped(), 4);
    assert_eq!(map.try_pop_front().map(|(k, _)| k), Err(BadAccess));
    assert_eq!(map.try_front().map(|(k, _)| k), Err(BadAccess));
    assert_eq!(map.verify_structure(), 0);

    map.clear();
    assert!(map.is_empty(), "Clearing a drained map should be a no-op.");
}

#[test]
fn test_clear_and_drop() {
    let counter = DropCounter::new();
    let mut map = TrieOrderedMultimap::with_cap(8);
    for key in 0..20i8 {
        map.add(key % 5 - 2, counter.track(key));
    }

    map.clear();
    assert_eq!(counter.dropped(), 20, "Clearing should drop every value once.");
    assert_eq!(map.verify_structure(), 0);
    assert!(map.nodes.is_empty() && map.values.is_empty());

    for key in 0..6i8 {
        map.add(key, counter.track(key));
    }
    drop(map);
    assert_eq!(counter.dropped(), 26, "Dropping the map should drop its values.");
}

#[test]
fn test_value_limit() {
    let counter = DropCounter::new();
    let mut map = TrieOrderedMultimap::with_limits(64, 1);
    map.add(1u16, counter.track('a'));

    assert_eq!(
        map.try_add(2, counter.track('b')).map(|pos| pos.key()),
        Err(AllocationFailure { requested: 1, limit: 1 })
    );
    assert_eq!(counter.dropped(), 1, "The rejected value should be dropped.");
    assert_eq!(map.len(), 1);
    assert_eq!(map.verify_structure(), 1, "Nothing should be built for a rejected value.");
    assert_panics!({ map.add(3, counter.track('c')) });
}

#[test]
fn test_node_limit() {
    init_logging();
    let mut map = TrieOrderedMultimap::<u32, u32>::with_limits(9, 16);
    // Eight levels for a 32-bit key.
    let zero = map.add(0, 0);
    assert_eq!(map.nodes.len(), 8);

    // Needs a new branch and a new anchor, but there's only room for the branch.
    assert_eq!(map.try_add(0x100, 1).map(|pos| pos.key()), Err(AllocationFailure {
        requested: 1,
        limit: 9,
    }));
    assert_eq!(map.len(), 1);
    assert_eq!(pairs(&map), [(0, 0)], "A failed add shouldn't link anything.");

    map.remove(zero);
    assert!(map.is_empty());
    assert_eq!(map.try_front(), Err(BadAccess), "Leftover empty branches hold no values.");
    assert_eq!(map.begin(), map.end());

    // The leftover branch is reused, so this fits.
    let pos = map.add(0x100, 1);
    assert_eq!(map.get_at(pos), Ok((0x100, &1)));
    assert_eq!(map.verify_structure(), 1);

    map.clear();
    assert!(map.nodes.is_empty());
}

#[test]
fn test_mixed_errors() {
    fn add_pop_twice(map: &mut TrieOrderedMultimap<u8, u8>) -> Result<u8, CollectionError> {
        let pos = map.try_add(1, 10)?;
        let (_, value) = map.try_pop(pos)?;
        map.try_pop(pos)?;
        Ok(value)
    }

    let mut map = TrieOrderedMultimap::new();
    let error = add_pop_twice(&mut map).unwrap_err();
    assert!(error.is_out_of_range());
    assert_eq!(OutOfRange::try_from(error).ok(), Some(OutOfRange));
    assert_eq!(error.to_string(), OutOfRange.to_string());

    let mut full = TrieOrderedMultimap::with_limits(0, 0);
    assert!(add_pop_twice(&mut full).unwrap_err().is_allocation_failure());
}

#[test]
fn test_traits() {
    let mut map: TrieOrderedMultimap<i32, char> = [(2, 'c'), (1, 'a'), (1, 'b')]
        .into_iter()
        .collect();
    assert_eq!(format!("{map:?}"), "{1: 'a', 1: 'b', 2: 'c'}");

    let pos = map.find(2).unwrap();
    let copy = map.clone();
    assert_eq!(copy, map);
    assert_eq!(copy.get_at(pos), Err(OutOfRange), "Positions shouldn't carry over to a clone.");
    assert_eq!(copy.find(2).map(|pos| copy.get_at(pos)), Some(Ok((2, &'c'))));

    map.extend([(0, 'z')]);
    assert_ne!(copy, map);
    assert_eq!(map.iter().len(), 4);

    let taken = std::mem::take(&mut map);
    assert!(map.is_empty());
    assert_eq!(map, TrieOrderedMultimap::default());

    let owned = taken.into_iter();
    assert_eq!(owned.len(), 4);
    assert_eq!(
        owned.collect::<Vec<_>>(),
        [(0, 'z'), (1, 'a'), (1, 'b'), (2, 'c')]
    );
    assert_eq!(copy.values_of(1).rev().copied().collect::<String>(), "ba");
}

#[test]
fn test_key_encoding() {
    assert_eq!(i8::MIN.to_bits(), 0);
    assert_eq!((-1i8).to_bits(), 0x7f);
    assert_eq!(0i8.to_bits(), 0x80);
    assert_eq!(i8::MAX.to_bits(), 0xff);
    for key in [i32::MIN, -1, 0, 1, i32::MAX] {
        assert_eq!(i32::from_bits(key.to_bits()), key);
    }
    assert_eq!(usize::from_bits(usize::MAX.to_bits()), usize::MAX);
}

#[test]
fn test_foreign_positions() {
    let mut ours = TrieOrderedMultimap::<u32, &str>::new();
    let mut theirs = TrieOrderedMultimap::<u32, &str>::new();
    for (a, b) in [("a0", "b0"), ("a1", "b1"), ("a2", "b2")] {
        ours.add(1, a);
        theirs.add(1, b);
    }
    // Same arena slot and generation as our "a1", issued by the other map.
    let mut middle = theirs.begin();
    theirs.advance(&mut middle).unwrap();
    assert_eq!(theirs.get_at(middle), Ok((1, &"b1")));

    assert_eq!(ours.get_at(middle), Err(OutOfRange));
    assert_eq!(ours.get_mut_at(middle).map(|(k, _)| k), Err(OutOfRange));
    let mut stepped = middle;
    assert_eq!(ours.advance(&mut stepped), Err(OutOfRange));
    assert_eq!(ours.try_pop(middle), Err(OutOfRange));
    assert_eq!(ours.try_remove(middle), Err(OutOfRange));
    assert_panics!({ ours.remove(middle) });

    assert_eq!(pairs(&ours), [(1, "a0"), (1, "a1"), (1, "a2")], "Nothing should be removed.");
    assert_eq!(ours.verify_structure(), 1);
    assert_eq!(theirs.pop(middle), (1, "b1"), "The position should still work where it belongs.");

    let copy = ours.clone();
    assert_eq!(copy.verify_structure(), 1);
    let mut walk = copy.begin();
    copy.advance(&mut walk).unwrap();
    assert_eq!(ours.try_pop(walk), Err(OutOfRange), "A clone's positions shouldn't work here.");
    assert_eq!(copy.get_at(walk), Ok((1, &"a1")));
}

#[derive(Clone, Copy)]
struct WideKey(u8);

impl TrieKey for WideKey {
    const BITS: u32 = 4;

    fn to_bits(self) -> u64 {
        self.0 as u64
    }

    fn from_bits(bits: u64) -> Self {
        WideKey(bits as u8)
    }
}

#[test]
#[cfg(debug_assertions)]
fn test_key_encoding_out_of_range() {
    let mut map = TrieOrderedMultimap::<WideKey, ()>::new();
    map.add(WideKey(0xf), ());
    assert_panics!({ map.add(WideKey(0x1f), ()) }, "an encoding wider than BITS should be caught");
    assert_panics!({ map.contains_key(WideKey(0x10)) });
    assert_eq!(map.len(), 1);
}
