//! `BTreeMap`-based implementation as a correctness baseline.
//!
//! This is not a trie at all, but its behavior is easy to trust, which makes
//! it the oracle that [`ByteTrie`](crate::ByteTrie) is checked against in
//! differential tests and the baseline it is measured against in benchmarks.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::iter::FusedIterator;

use crate::bounds::Bounds;
use crate::BTrie;

/// A sorted map with the same contract as [`ByteTrie`](crate::ByteTrie).
#[derive(Clone, Debug, Default)]
pub struct ReferenceTrie<V> {
    map: BTreeMap<Vec<u8>, V>,
}

impl<V> ReferenceTrie<V> {
    pub fn new() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn put(&mut self, key: &[u8], value: V) -> Option<V> {
        self.map.insert(key.to_vec(), value)
    }

    pub fn get(&self, key: &[u8]) -> Option<&V> {
        self.map.get(key)
    }

    pub fn delete(&mut self, key: &[u8]) -> Option<V> {
        self.map.remove(key)
    }

    pub fn range(&self, bounds: &Bounds) -> ReferenceRange<'_, V> {
        ReferenceRange {
            inner: self.map.range::<[u8], _>((bounds.low(), bounds.high())),
            reverse: bounds.is_reverse(),
        }
    }
}

/// Iterator returned by [`ReferenceTrie::range`].
pub struct ReferenceRange<'a, V> {
    inner: btree_map::Range<'a, Vec<u8>, V>,
    reverse: bool,
}

impl<'a, V> Iterator for ReferenceRange<'a, V> {
    type Item = (Vec<u8>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, value) = if self.reverse {
            self.inner.next_back()?
        } else {
            self.inner.next()?
        };
        Some((key.clone(), value))
    }
}

impl<V> FusedIterator for ReferenceRange<'_, V> {}

impl<V> BTrie<V> for ReferenceTrie<V> {
    type Iter<'a> = ReferenceRange<'a, V> where V: 'a;

    fn len(&self) -> usize {
        ReferenceTrie::len(self)
    }

    fn put(&mut self, key: &[u8], value: V) -> Option<V> {
        ReferenceTrie::put(self, key, value)
    }

    fn get(&self, key: &[u8]) -> Option<&V> {
        ReferenceTrie::get(self, key)
    }

    fn delete(&mut self, key: &[u8]) -> Option<V> {
        ReferenceTrie::delete(self, key)
    }

    fn range(&self, bounds: &Bounds) -> Self::Iter<'_> {
        ReferenceTrie::range(self, bounds)
    }
}
