use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use crate::reference::ReferenceTrie;
use std::ops::Bound;

fn key_strategy() -> BoxedStrategy<Vec<u8>> {
    // Mostly a few boundary bytes, so keys share prefixes and collide often.
    let byte = prop_oneof![
        4 => prop::sample::select(vec![0x00u8, 0x01, 0x7F, 0x80, 0xFE, 0xFF]),
        1 => any::<u8>(),
    ];
    prop::collection::vec(byte, 0..=4).boxed()
}

fn edge_strategy() -> impl Strategy<Value = Bound<Vec<u8>>> {
    prop_oneof![
        1 => Just(Bound::Unbounded),
        3 => key_strategy().prop_map(Bound::Included),
        3 => key_strategy().prop_map(Bound::Excluded),
    ]
}

fn bounds_strategy() -> impl Strategy<Value = Bounds> {
    (any::<bool>(), edge_strategy(), edge_strategy()).prop_filter_map(
        "edges must not cross",
        |(reverse, low, high)| {
            let direction = if reverse {
                Direction::Reverse
            } else {
                Direction::Forward
            };
            Bounds::new(direction, low, high).ok()
        },
    )
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 4)]
    Put(#[proptest(strategy = "key_strategy()")] Vec<u8>, u8),
    #[proptest(weight = 2)]
    Delete(#[proptest(strategy = "key_strategy()")] Vec<u8>),
    #[proptest(weight = 2)]
    Get(#[proptest(strategy = "key_strategy()")] Vec<u8>),
    Range(
        #[proptest(strategy = "key_strategy()")] Vec<u8>,
        #[proptest(strategy = "key_strategy()")] Vec<u8>,
    ),
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(any::<Op>(), 0..=300)
}

fn collect<T: BTrie<u8>>(trie: &T, bounds: &Bounds) -> Vec<(Vec<u8>, u8)> {
    trie.range(bounds).map(|(k, v)| (k, *v)).collect()
}

fn build(ops: &[Op]) -> (ByteTrie<u8>, ReferenceTrie<u8>) {
    let mut trie = ByteTrie::new();
    let mut reference = ReferenceTrie::new();
    for op in ops {
        match op {
            Op::Put(key, value) => {
                trie.put(key, *value);
                reference.put(key, *value);
            }
            Op::Delete(key) => {
                trie.delete(key);
                reference.delete(key);
            }
            Op::Get(_) | Op::Range(..) => {}
        }
    }
    (trie, reference)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(ops in ops_strategy()) {
        let mut trie: ByteTrie<u8> = ByteTrie::new();
        let mut reference: ReferenceTrie<u8> = ReferenceTrie::new();

        for op in ops {
            match op {
                Op::Put(key, value) => {
                    prop_assert_eq!(trie.put(&key, value), reference.put(&key, value));
                    prop_assert_eq!(trie.get(&key), Some(&value));
                }
                Op::Delete(key) => {
                    prop_assert_eq!(trie.delete(&key), reference.delete(&key));
                    prop_assert_eq!(trie.get(&key), None);
                }
                Op::Get(key) => {
                    prop_assert_eq!(trie.get(&key), reference.get(&key));
                }
                Op::Range(begin, end) => {
                    let forward = Bounds::from_key(begin.clone()).to(end.clone());
                    let reverse = Bounds::from_key(end).down_to(begin);
                    prop_assert_eq!(
                        collect(&trie, &forward),
                        collect(&reference, &forward),
                        "{}", forward
                    );
                    prop_assert_eq!(
                        collect(&trie, &reverse),
                        collect(&reference, &reverse),
                        "{}", reverse
                    );
                }
            }

            prop_assert_eq!(trie.len(), reference.len());
        }

        trie.assert_invariants();
        prop_assert_eq!(
            collect(&trie, &Bounds::FORWARD_ALL),
            collect(&reference, &Bounds::FORWARD_ALL)
        );
        prop_assert_eq!(
            collect(&trie, &Bounds::REVERSE_ALL),
            collect(&reference, &Bounds::REVERSE_ALL)
        );
    }

    #[test]
    fn prop_range_matches_reference(ops in ops_strategy(), bounds in bounds_strategy()) {
        let (trie, reference) = build(&ops);
        let got = collect(&trie, &bounds);
        prop_assert_eq!(&got, &collect(&reference, &bounds), "{}", bounds);

        for pair in got.windows(2) {
            if bounds.is_reverse() {
                prop_assert!(pair[0].0 > pair[1].0);
            } else {
                prop_assert!(pair[0].0 < pair[1].0);
            }
        }
        for (key, _) in &got {
            prop_assert!(bounds.contains(key));
        }
    }

    #[test]
    fn prop_range_prefix_is_lazy_prefix(ops in ops_strategy(), bounds in bounds_strategy(), take in 0usize..8) {
        // Stopping early yields exactly the head of the full scan.
        let (trie, _) = build(&ops);
        let full = collect(&trie, &bounds);
        let head: Vec<(Vec<u8>, u8)> = trie.range(&bounds).take(take).map(|(k, v)| (k, *v)).collect();
        prop_assert_eq!(&head[..], &full[..take.min(full.len())]);
    }

    #[test]
    fn prop_clone_independence(before in ops_strategy(), after in ops_strategy()) {
        let (original, _) = build(&before);
        let snapshot = collect(&original, &Bounds::FORWARD_ALL);

        let mut copy = original.clone();
        let mut reference = ReferenceTrie::new();
        for (key, value) in &snapshot {
            reference.put(key, *value);
        }
        for op in after {
            match op {
                Op::Put(key, value) => {
                    copy.put(&key, value);
                    reference.put(&key, value);
                }
                Op::Delete(key) => {
                    copy.delete(&key);
                    reference.delete(&key);
                }
                Op::Get(_) | Op::Range(..) => {}
            }
        }

        prop_assert_eq!(collect(&original, &Bounds::FORWARD_ALL), snapshot);
        prop_assert_eq!(
            collect(&copy, &Bounds::FORWARD_ALL),
            collect(&reference, &Bounds::FORWARD_ALL)
        );
        original.assert_invariants();
        copy.assert_invariants();
    }

    #[test]
    fn prop_delete_everything_prunes_to_root(ops in ops_strategy()) {
        let (mut trie, _) = build(&ops);
        let keys: Vec<Vec<u8>> = trie.iter().map(|(k, _)| k).collect();
        for key in keys {
            prop_assert!(trie.delete(&key).is_some());
            trie.assert_invariants();
        }
        prop_assert!(trie.is_empty());
        prop_assert_eq!(trie.node_count(), 1);
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

fn small_set() -> Vec<Vec<u8>> {
    vec![
        vec![],
        b"a".to_vec(),
        b"b".to_vec(),
        b"aa".to_vec(),
        b"ab".to_vec(),
        b"aab".to_vec(),
    ]
}

#[test]
fn exhaustive_put_order_small_set() {
    let keys = small_set();

    for_each_permutation(&keys, |perm| {
        let mut t: ByteTrie<u8> = ByteTrie::new();
        let mut r: ReferenceTrie<u8> = ReferenceTrie::new();

        for (i, k) in perm.into_iter().enumerate() {
            let v = i as u8;
            assert_eq!(t.put(&k, v), r.put(&k, v));
        }

        t.assert_invariants();
        assert_eq!(
            collect(&t, &Bounds::FORWARD_ALL),
            collect(&r, &Bounds::FORWARD_ALL)
        );
        assert_eq!(
            collect(&t, &Bounds::REVERSE_ALL),
            collect(&r, &Bounds::REVERSE_ALL)
        );
    });
}

#[test]
fn exhaustive_delete_order_small_set() {
    let keys = small_set();

    // Put in a fixed order, then delete in all permutations.
    let mut base_trie: ByteTrie<u8> = ByteTrie::new();
    let mut base_ref: ReferenceTrie<u8> = ReferenceTrie::new();
    for (i, k) in keys.iter().enumerate() {
        let v = i as u8;
        assert_eq!(base_trie.put(k, v), base_ref.put(k, v));
    }

    for_each_permutation(&keys, |perm| {
        let mut t = base_trie.clone();
        let mut r = base_ref.clone();

        for k in perm {
            assert_eq!(t.delete(&k), r.delete(&k));
            assert_eq!(t.len(), r.len());
            t.assert_invariants();
        }
        assert_eq!(t.len(), 0);
        assert_eq!(t.node_count(), 1);
    });
}

#[test]
fn exhaustive_bounds_small_set() {
    let keys = small_set();
    let mut t: ByteTrie<u8> = ByteTrie::new();
    let mut r: ReferenceTrie<u8> = ReferenceTrie::new();
    for (i, k) in keys.iter().enumerate() {
        t.put(k, i as u8);
        r.put(k, i as u8);
    }

    // Anchors include absent keys on both sides of every stored one.
    let mut anchors = keys.clone();
    anchors.extend([b"\x00".to_vec(), b"a\x00".to_vec(), b"ac".to_vec(), b"c".to_vec()]);
    for begin in &anchors {
        for end in &anchors {
            for bounds in [
                Bounds::from_key(begin.clone()).to(end.clone()),
                Bounds::from_key(begin.clone()).down_to(end.clone()),
            ] {
                assert_eq!(collect(&t, &bounds), collect(&r, &bounds), "{}", bounds);
            }
        }
    }
}
