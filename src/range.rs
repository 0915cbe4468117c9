//! Bounded iteration over a [`ByteTrie`](crate::ByteTrie).
//!
//! Ascending ranges walk the trie in pre-order with children ascending, since
//! a node's key sorts before every key below it. Descending ranges walk in
//! post-order with children descending. At each node only the children
//! allowed by [`Bounds::child_bounds`] are walked, and the whole walk stops at
//! the first visited key past the far edge of the range.

use std::cmp::Ordering;
use std::iter::{FusedIterator, Rev};
use std::marker::PhantomData;
use std::slice;

use crate::bounds::{Bounds, Direction};
use crate::traverse::{Adjacency, PostOrder, PreOrder};
use crate::trie::Node;

/// Iterator returned by [`ByteTrie::range`](crate::ByteTrie::range).
///
/// Yields `(key, value)` pairs in the bounds' direction. Each key is a fresh
/// copy.
pub struct Range<'a, V> {
    walk: Walk<'a, V>,
    bounds: Bounds,
    key: PathKey,
    done: bool,
    /// Every key the walk surfaced, in order.
    #[cfg(test)]
    visited: Vec<Vec<u8>>,
}

enum Walk<'a, V> {
    Forward(PreOrder<Ascending<'a, V>>),
    Reverse(PostOrder<Descending<'a, V>>),
}

impl<'a, V> Range<'a, V> {
    pub(crate) fn new(root: &'a Node<V>, bounds: &Bounds) -> Self {
        let bounds = bounds.clone();
        tracing::trace!(%bounds, "starting range scan");
        let children = AdmissibleChildren::new(bounds.clone());
        let walk = match bounds.direction() {
            Direction::Forward => {
                Walk::Forward(PreOrder::new(root, Ascending(children, PhantomData)))
            }
            Direction::Reverse => {
                Walk::Reverse(PostOrder::new(root, Descending(children, PhantomData)))
            }
        };
        Self {
            walk,
            bounds,
            key: PathKey::default(),
            done: false,
            #[cfg(test)]
            visited: Vec::new(),
        }
    }
}

impl<'a, V> Iterator for Range<'a, V> {
    type Item = (Vec<u8>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let path = match &mut self.walk {
                Walk::Forward(walk) => walk.advance(),
                Walk::Reverse(walk) => walk.advance(),
            };
            let Some(path) = path else {
                self.done = true;
                break;
            };
            let node: &'a Node<V> = path[path.len() - 1];
            let key = self.key.sync(path);
            #[cfg(test)]
            self.visited.push(key.to_vec());

            match (self.bounds.compare(key), self.bounds.direction()) {
                (Ordering::Equal, _) => {
                    if let Some(value) = &node.value {
                        return Some((key.to_vec(), value));
                    }
                }
                // Every key visited after this one is further out of range.
                (Ordering::Greater, Direction::Forward) | (Ordering::Less, Direction::Reverse) => {
                    self.done = true;
                }
                _ => {}
            }
        }
        None
    }
}

impl<V> FusedIterator for Range<'_, V> {}

/// The key spelled by a walk's path, kept in step with it.
///
/// Only the tail that differs from the previously synced path is rewritten,
/// so following a walk costs time proportional to how far it moves.
#[derive(Default)]
struct PathKey {
    key: Vec<u8>,
    /// Length of the path last synced.
    depth: usize,
}

impl PathKey {
    fn sync<V>(&mut self, path: &[&Node<V>]) -> &[u8] {
        // All but the last element of the shorter path is unchanged. The root
        // contributes no byte, so `path[i]` spells `key[i - 1]`.
        let fresh = (self.depth.min(path.len()).saturating_sub(1)).max(1);
        self.key.truncate(fresh - 1);
        self.key.extend(path[fresh..].iter().map(|node| node.key_byte));
        self.depth = path.len();
        &self.key
    }
}

struct AdmissibleChildren {
    bounds: Bounds,
    prefix: PathKey,
    /// Every prefix whose children were asked for, in order.
    #[cfg(test)]
    expanded: Vec<Vec<u8>>,
}

impl AdmissibleChildren {
    fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            prefix: PathKey::default(),
            #[cfg(test)]
            expanded: Vec::new(),
        }
    }

    /// The children of the path's last node that can lead to keys within the
    /// bounds, ascending.
    fn of<'a, V>(&mut self, path: &[&'a Node<V>]) -> &'a [Node<V>] {
        let node: &'a Node<V> = path[path.len() - 1];
        let prefix = self.prefix.sync(path);
        #[cfg(test)]
        self.expanded.push(prefix.to_vec());
        let children = node.children.as_slice();
        match self.bounds.child_bounds(prefix) {
            Some((min, max)) => {
                let start = children.partition_point(|child| child.key_byte < min);
                let end = children.partition_point(|child| child.key_byte <= max);
                &children[start..end]
            }
            None => &children[..0],
        }
    }
}

struct Ascending<'a, V>(AdmissibleChildren, PhantomData<&'a V>);

struct Descending<'a, V>(AdmissibleChildren, PhantomData<&'a V>);

impl<'a, V> Adjacency for Ascending<'a, V> {
    type Step = &'a Node<V>;
    type Steps = slice::Iter<'a, Node<V>>;

    fn next_steps(&mut self, path: &[&'a Node<V>]) -> Self::Steps {
        self.0.of(path).iter()
    }
}

impl<'a, V> Adjacency for Descending<'a, V> {
    type Step = &'a Node<V>;
    type Steps = Rev<slice::Iter<'a, Node<V>>>;

    fn next_steps(&mut self, path: &[&'a Node<V>]) -> Self::Steps {
        self.0.of(path).iter().rev()
    }
}

#[cfg(test)]
impl<V> Range<'_, V> {
    fn expanded(&self) -> &[Vec<u8>] {
        match &self.walk {
            Walk::Forward(walk) => &walk.adjacency().0.expanded,
            Walk::Reverse(walk) => &walk.adjacency().0.expanded,
        }
    }
}
