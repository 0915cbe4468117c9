//! # btrie
//!
//! An ordered map keyed by byte strings, stored as a trie with one level per
//! key byte, with lazy range scans in either direction.
//!
//! A range is described by a [`Bounds`]. While walking the trie, each node
//! narrows the bytes its children may start with to those that can still
//! reach a key inside the bounds, so a scan only visits subtrees that can
//! contribute, and stops as soon as it passes the far edge.
//!
//! ## Example
//!
//! ```rust
//! use btrie::{Bounds, ByteTrie};
//!
//! let mut trie: ByteTrie<u64> = ByteTrie::new();
//! trie.put(&[0x10], 1);
//! trie.put(&[0x10, 0x20], 2);
//! trie.put(&[0x11], 3);
//!
//! assert_eq!(trie.get(&[0x10, 0x20]), Some(&2));
//!
//! let forward: Vec<_> = trie.range(&Bounds::from_key([0x10]).to([0x11])).collect();
//! assert_eq!(forward, vec![(vec![0x10], &1), (vec![0x10, 0x20], &2)]);
//!
//! let reverse: Vec<_> = trie.range(&Bounds::from_key([0x11]).down_to([0x10])).collect();
//! assert_eq!(reverse, vec![(vec![0x11], &3), (vec![0x10, 0x20], &2)]);
//! ```

#![forbid(unsafe_code)]

pub mod bounds;
mod range;
pub mod reference;
pub mod traverse;
mod trie;

pub use bounds::{Bounds, BoundsBuilder, BoundsError, Direction};
pub use range::Range;
pub use trie::ByteTrie;

/// The operations shared by [`ByteTrie`] and
/// [`ReferenceTrie`](reference::ReferenceTrie), so one can be checked against
/// the other.
///
/// Absent keys are reported as `None`; that is the only "not found" signal.
pub trait BTrie<V> {
    type Iter<'a>: Iterator<Item = (Vec<u8>, &'a V)>
    where
        Self: 'a,
        V: 'a;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the replaced value, if the key was present.
    fn put(&mut self, key: &[u8], value: V) -> Option<V>;

    fn get(&self, key: &[u8]) -> Option<&V>;

    /// Returns the removed value, if the key was present.
    fn delete(&mut self, key: &[u8]) -> Option<V>;

    /// Entries within `bounds`, ascending or descending per its direction.
    fn range(&self, bounds: &Bounds) -> Self::Iter<'_>;
}

impl<V> BTrie<V> for ByteTrie<V> {
    type Iter<'a> = Range<'a, V> where V: 'a;

    fn len(&self) -> usize {
        ByteTrie::len(self)
    }

    fn put(&mut self, key: &[u8], value: V) -> Option<V> {
        ByteTrie::put(self, key, value)
    }

    fn get(&self, key: &[u8]) -> Option<&V> {
        ByteTrie::get(self, key)
    }

    fn delete(&mut self, key: &[u8]) -> Option<V> {
        ByteTrie::delete(self, key)
    }

    fn range(&self, bounds: &Bounds) -> Self::Iter<'_> {
        ByteTrie::range(self, bounds)
    }
}

#[cfg(test)]
mod proptests;
