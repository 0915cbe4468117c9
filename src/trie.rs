use std::fmt;

use crate::bounds::Bounds;
use crate::range::Range;

// =============================================================================
// Node
// =============================================================================

/// One byte position on the path of some stored key.
///
/// Invariants, restored by every mutation before it returns:
/// - `children` is strictly ascending by `key_byte`.
/// - Every node other than the root has a value or at least one child.
///
/// Keys may be arbitrarily long, so nothing here recurses per key byte.
pub(crate) struct Node<V> {
    pub(crate) value: Option<V>,
    pub(crate) children: Vec<Node<V>>,
    /// Unused on the root.
    pub(crate) key_byte: u8,
}

impl<V> Node<V> {
    fn root() -> Self {
        Self {
            value: None,
            children: Vec::new(),
            key_byte: 0,
        }
    }

    /// A single-child chain spelling `suffix`, ending in a node holding `value`.
    fn chain(suffix: &[u8], value: V) -> Self {
        let (&last, init) = suffix.split_last().expect("chain suffix is never empty");
        let mut node = Self {
            value: Some(value),
            children: Vec::new(),
            key_byte: last,
        };
        for &key_byte in init.iter().rev() {
            node = Self {
                value: None,
                children: vec![node],
                key_byte,
            };
        }
        node
    }

    /// `Ok(index)` of the child for `byte`, or `Err(index)` where it would go.
    #[inline]
    fn search(&self, byte: u8) -> Result<usize, usize> {
        self.children
            .binary_search_by_key(&byte, |child| child.key_byte)
    }

    fn descend(&self, key: &[u8]) -> Option<&Self> {
        let mut node = self;
        for &byte in key {
            let index = node.search(byte).ok()?;
            node = &node.children[index];
        }
        Some(node)
    }

    fn descend_mut(&mut self, key: &[u8]) -> Option<&mut Self> {
        let mut node = self;
        for &byte in key {
            let index = node.search(byte).ok()?;
            node = &mut node.children[index];
        }
        Some(node)
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    where
        V: fmt::Debug,
    {
        let mut stack = vec![(self, 0)];
        while let Some((node, depth)) = stack.pop() {
            if depth == 0 {
                f.write_str("[]")?;
            } else {
                write!(f, "{:indent$}{:X}", "", node.key_byte, indent = 2 * depth)?;
            }
            match &node.value {
                Some(value) => writeln!(f, ": {value:?}")?,
                None => writeln!(f)?,
            }
            stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
        }
        Ok(())
    }

    fn shallow_clone(&self) -> Self
    where
        V: Clone,
    {
        Self {
            value: self.value.clone(),
            children: Vec::with_capacity(self.children.len()),
            key_byte: self.key_byte,
        }
    }
}

impl<V: Clone> Clone for Node<V> {
    fn clone(&self) -> Self {
        // Each frame is a source node and its copy so far. A copy moves into
        // its parent once it has all of its children.
        let mut stack = vec![(self, self.shallow_clone())];
        loop {
            let (source, copied) = {
                let (source, copy) = stack.last().expect("clone stack holds the root frame");
                (*source, copy.children.len())
            };
            if let Some(child) = source.children.get(copied) {
                stack.push((child, child.shallow_clone()));
                continue;
            }
            let (_, done) = stack.pop().expect("clone stack holds the root frame");
            match stack.last_mut() {
                Some((_, parent)) => parent.children.push(done),
                None => return done,
            }
        }
    }
}

impl<V> Drop for Node<V> {
    fn drop(&mut self) {
        // Detach descendants onto a flat stack so each node drops childless.
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

// =============================================================================
// ByteTrie
// =============================================================================

/// An ordered map from byte strings to values, one trie level per key byte.
///
/// Keys are ordered lexicographically; the empty key is the smallest key and
/// may be stored like any other. Cloning makes a deep copy that shares
/// nothing with the original.
///
/// A trie is not synchronized. To share one between threads, clone it and
/// hand each thread its own copy.
#[derive(Clone)]
pub struct ByteTrie<V> {
    root: Node<V>,
    count: usize,
}

impl<V> ByteTrie<V> {
    pub fn new() -> Self {
        Self {
            root: Node::root(),
            count: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn clear(&mut self) {
        self.root = Node::root();
        self.count = 0;
    }

    pub fn get(&self, key: &[u8]) -> Option<&V> {
        self.root.descend(key)?.value.as_ref()
    }

    pub fn get_mut(&mut self, key: &[u8]) -> Option<&mut V> {
        self.root.descend_mut(key)?.value.as_mut()
    }

    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    /// Stores `value` under `key`, returning the value it replaced.
    pub fn put(&mut self, key: &[u8], value: V) -> Option<V> {
        let mut node = &mut self.root;
        for (depth, &byte) in key.iter().enumerate() {
            match node.search(byte) {
                Ok(index) => node = &mut node.children[index],
                Err(index) => {
                    node.children.insert(index, Node::chain(&key[depth..], value));
                    self.count += 1;
                    return None;
                }
            }
        }
        let prev = node.value.replace(value);
        if prev.is_none() {
            self.count += 1;
        }
        prev
    }

    /// Removes `key`, returning its value.
    ///
    /// Nodes left without a value or children are unlinked in the same call.
    pub fn delete(&mut self, key: &[u8]) -> Option<V> {
        if key.is_empty() {
            // The root is never pruned.
            let prev = self.root.value.take()?;
            self.count -= 1;
            return Some(prev);
        }

        // The deepest node on the path that must survive (it holds a value
        // or another branch), and the index of its child toward `key`. If
        // the deleted node turns out to be a leaf, that child's whole
        // subtree is the dead chain.
        let mut anchor = (0, 0);
        let mut node = &mut self.root;
        for (depth, &byte) in key.iter().enumerate() {
            let index = node.search(byte).ok()?;
            if node.value.is_some() || node.children.len() > 1 {
                anchor = (depth, index);
            }
            node = &mut node.children[index];
        }
        let prev = node.value.take()?;
        self.count -= 1;

        if node.children.is_empty() {
            let (depth, index) = anchor;
            // `node` borrows the whole path mutably, so the anchor is reached
            // again from the root.
            let parent = self
                .root
                .descend_mut(&key[..depth])
                .expect("prune anchor lies on the deleted key's path");
            parent.children.remove(index);
            tracing::trace!(depth, chain = key.len() - depth, "pruned dead chain");
        }
        Some(prev)
    }

    /// Iterates over the keys within `bounds`, in the bounds' direction.
    ///
    /// The iterator is lazy: no node is visited until it is advanced, and
    /// dropping it stops the walk.
    pub fn range(&self, bounds: &Bounds) -> Range<'_, V> {
        Range::new(&self.root, bounds)
    }

    /// Iterates over every entry in ascending key order.
    pub fn iter(&self) -> Range<'_, V> {
        self.range(&Bounds::FORWARD_ALL)
    }
}

impl<V> Default for ByteTrie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: AsRef<[u8]>, V> FromIterator<(K, V)> for ByteTrie<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut trie = Self::new();
        trie.extend(iter);
        trie
    }
}

impl<K: AsRef<[u8]>, V> Extend<(K, V)> for ByteTrie<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key.as_ref(), value);
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for ByteTrie<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// One line per node, indented by depth, e.g.
///
/// ```text
/// []
///   10: 1
///     20: 2
///   11: 3
/// ```
impl<V: fmt::Debug> fmt::Display for ByteTrie<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.write_tree(f)
    }
}

#[cfg(test)]
impl<V> ByteTrie<V> {
    /// Panics if any structural invariant is broken.
    pub(crate) fn assert_invariants(&self) {
        let mut live = 0;
        let mut stack = vec![(&self.root, true)];
        while let Some((node, is_root)) = stack.pop() {
            assert!(
                is_root || node.value.is_some() || !node.children.is_empty(),
                "dead leaf {:02X} reachable",
                node.key_byte
            );
            for pair in node.children.windows(2) {
                assert!(
                    pair[0].key_byte < pair[1].key_byte,
                    "children out of order: {:02X} before {:02X}",
                    pair[0].key_byte,
                    pair[1].key_byte
                );
            }
            live += usize::from(node.value.is_some());
            stack.extend(node.children.iter().map(|child| (child, false)));
        }

        assert_eq!(live, self.count, "live key count");
    }

    pub(crate) fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(&node.children);
        }
        count
    }
}
