#![cfg(test)]

use std::collections::BTreeMap;

use proptest::prelude::*;

use super::*;
use crate::util::error::{BadAccess, OutOfRange};

#[derive(Clone, Debug)]
enum Op<K> {
    Add(K),
    Find(K),
    PopFront,
    // Index into every position handed out so far, including stale ones.
    Pop(usize),
    Clear,
}

fn ops_strategy<K: Strategy>(key: K) -> impl Strategy<Value = Vec<Op<K::Value>>>
where
    K: Clone,
    K::Value: Clone + std::fmt::Debug,
{
    let op = prop_oneof![
        50 => key.clone().prop_map(Op::Add),
        15 => key.prop_map(Op::Find),
        15 => Just(Op::<K::Value>::PopFront),
        19 => any::<usize>().prop_map(Op::<K::Value>::Pop),
        1 => Just(Op::<K::Value>::Clear),
    ];
    prop::collection::vec(op, 0..=500)
}

/// Replays `ops` against both the map and a model, where every value is unique so that the model
/// can tell which position refers to what.
fn check_against_model<K>(ops: Vec<Op<K>>) -> Result<(), TestCaseError>
where
    K: TrieKey + Ord + std::fmt::Debug,
{
    let mut map = TrieOrderedMultimap::<K, u32>::new();
    let mut model = BTreeMap::<K, Vec<u32>>::new();
    let mut positions = Vec::<(Position<K>, u32)>::new();
    let mut next_value = 0;

    for op in ops {
        match op {
            Op::Add(key) => {
                let pos = map.add(key, next_value);
                prop_assert_eq!(pos.key(), key);
                model.entry(key).or_default().push(next_value);
                positions.push((pos, next_value));
                next_value += 1;
            },
            Op::Find(key) => {
                let found = map.find(key).map(|pos| map.get_at(pos).map(|(k, v)| (k, *v)));
                let expected = model.get(&key).map(|values| Ok::<_, OutOfRange>((key, values[0])));
                prop_assert_eq!(found, expected);
                prop_assert_eq!(map.contains_key(key), model.contains_key(&key));
            },
            Op::PopFront => {
                let popped = map.try_pop_front();
                let expected = match model.first_entry() {
                    Some(mut entry) => {
                        let key = *entry.key();
                        let value = entry.get_mut().remove(0);
                        if entry.get().is_empty() {
                            entry.remove();
                        }
                        Ok((key, value))
                    },
                    None => Err(BadAccess),
                };
                prop_assert_eq!(popped, expected);
            },
            Op::Pop(index) => {
                if positions.is_empty() {
                    continue;
                }
                let (pos, value) = positions[index % positions.len()];
                let key = pos.key();

                let expected = match model.get_mut(&key) {
                    Some(values) if values.contains(&value) => {
                        values.retain(|v| *v != value);
                        if values.is_empty() {
                            model.remove(&key);
                        }
                        Ok((key, value))
                    },
                    _ => Err(OutOfRange),
                };
                prop_assert_eq!(map.try_pop(pos), expected);
            },
            Op::Clear => {
                map.clear();
                model.clear();
            },
        }

        prop_assert_eq!(map.len(), model.values().map(Vec::len).sum::<usize>());
    }

    prop_assert_eq!(map.verify_structure(), model.len());
    let got: Vec<(K, u32)> = map.iter().map(|(k, v)| (k, *v)).collect();
    let expected: Vec<(K, u32)> = model
        .iter()
        .flat_map(|(k, values)| values.iter().map(move |v| (*k, *v)))
        .collect();
    prop_assert_eq!(got, expected);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_narrow_signed(ops in ops_strategy(-40i16..40)) {
        check_against_model(ops)?;
    }

    #[test]
    fn prop_equivalence_wide_unsigned(ops in ops_strategy(prop_oneof![
        any::<u64>(),
        Just(0u64),
        Just(u64::MAX),
        0u64..64,
    ])) {
        check_against_model(ops)?;
    }

    #[test]
    fn prop_equivalence_byte_keys(ops in ops_strategy(any::<u8>())) {
        check_against_model(ops)?;
    }

    #[test]
    fn prop_positions_walk_in_order(keys in prop::collection::vec(any::<i32>(), 0..=200)) {
        let map: TrieOrderedMultimap<i32, usize> =
            keys.iter().copied().zip(0..).collect();

        let mut walked = Vec::new();
        let mut pos = map.begin();
        while pos != map.end() {
            let (key, value) = map.get_at(pos)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            walked.push((key, *value));
            map.advance(&mut pos)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
        }

        let mut expected: Vec<(i32, usize)> = keys.into_iter().zip(0..).collect();
        // Stable, so values of equal keys keep their insertion order.
        expected.sort_by_key(|(key, _)| *key);
        prop_assert_eq!(walked, expected);
    }
}
