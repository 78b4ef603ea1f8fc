//! Binomial Forest implementation
//!
//! A binomial forest is a mergeable min-heap made of binomial trees with:
//! - O(log n) insert, find-minimum and extract-minimum
//! - O(log n) union of two forests
//!
//! # Algorithm Overview
//!
//! The forest keeps its tree roots in a singly-linked **root list**, where:
//! - Each tree satisfies the heap property
//! - Roots appear in strictly increasing degree order
//! - At most one tree of each degree exists (like the bits of n in binary)
//!
//! **Binomial Tree Bₖ**: Recursively defined:
//! - B₀ is a single node
//! - Bₖ is formed by linking two B_{k-1} trees
//! - Bₖ has exactly 2ᵏ nodes and height k
//!
//! A node's children are chained through the same `sibling` link as the
//! roots, in strictly *decreasing* degree order starting from `child`.
//!
//! **Key Operations**:
//! - **Insert**: union the forest with a single B₀ tree
//! - **Find-minimum**: scan the O(log n) roots
//! - **Extract-minimum**: unlink the minimum root, reverse its child chain
//!   (which makes it an ascending root list) and union it back in
//! - **Union**: merge two root lists by degree, then link equal-degree
//!   neighbours with binary-counter carry propagation
//!
//! # Storage
//!
//! Nodes live in an arena and are linked by generation-checked keys, so
//! detaching and reattaching subtrees is a matter of rewriting `Copy` links.

use crate::arena::{remap_key, Arena, NodeKey};
use compare::{Compare, Natural};
use crate::traits::{Heap, HeapError};
use std::fmt::{self, Write};

/// Internal node structure for the binomial forest
///
/// - `parent`: owning tree node (None if root)
/// - `child`: first child, the highest-degree one (None if leaf)
/// - `sibling`: next root in the root list, or next lower-degree child in
///   the parent's child chain
/// - `degree`: number of children
#[derive(Clone)]
struct Node<K> {
    key: K,
    degree: usize,
    parent: Option<NodeKey>,
    child: Option<NodeKey>,
    sibling: Option<NodeKey>,
}

/// Binomial Forest
///
/// # Example
///
/// ```rust
/// use mergeable_heaps::binomial::BinomialForest;
///
/// let mut heap = BinomialForest::new();
/// for key in [10, 5, 20, 3, 8] {
///     heap.insert(key);
/// }
/// assert_eq!(heap.find_minimum(), Ok(&3));
/// assert_eq!(heap.extract_minimum(), Ok(3));
/// assert_eq!(heap.find_minimum(), Ok(&5));
/// ```
#[derive(Clone)]
pub struct BinomialForest<K, C = Natural<K>> {
    nodes: Arena<Node<K>>,
    /// Head of the root list (lowest degree first)
    head: Option<NodeKey>,
    len: usize,
    cmp: C,
}

impl<K: Ord> BinomialForest<K> {
    /// Creates an empty forest ordered by `K: Ord`
    pub fn new() -> Self {
        Self::with_comparator(compare::natural())
    }

    /// Creates an empty forest with room for `capacity` keys
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, compare::natural())
    }
}

impl<K, C: Compare<K> + Default> Default for BinomialForest<K, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K, C: Compare<K>> BinomialForest<K, C> {
    /// Creates an empty forest ordered by `cmp`
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            nodes: Arena::new(),
            head: None,
            len: 0,
            cmp,
        }
    }

    /// Creates an empty forest ordered by `cmp` with room for `capacity` keys
    pub fn with_capacity_and_comparator(capacity: usize, cmp: C) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            head: None,
            len: 0,
            cmp,
        }
    }

    /// Returns true if the root list is empty
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Returns the number of keys
    pub fn len(&self) -> usize {
        self.len
    }

    /// Inserts a key
    ///
    /// **Time Complexity**: O(log n) worst-case
    ///
    /// Wraps the key in a B₀ tree and unions it into the forest, which is
    /// the same as adding 1 to a binary counter.
    pub fn insert(&mut self, key: K) {
        let node = self.nodes.insert(Node {
            key,
            degree: 0,
            parent: None,
            child: None,
            sibling: None,
        });
        self.head = self.union(self.head, Some(node));
        self.len += 1;
    }

    /// Returns the minimum key
    ///
    /// **Time Complexity**: O(log n), a scan of the root list
    ///
    /// # Errors
    /// Returns [`HeapError::EmptyHeap`] if the forest has no keys.
    pub fn find_minimum(&self) -> Result<&K, HeapError> {
        let (_, min) = self.min_root().ok_or(HeapError::EmptyHeap)?;
        Ok(&self.nodes[min].key)
    }

    /// Removes and returns the minimum key
    ///
    /// **Time Complexity**: O(log n) worst-case
    ///
    /// **Algorithm**:
    /// 1. Scan the root list for the minimum root (first one wins on ties)
    /// 2. Unlink it from the root list
    /// 3. Reverse its child chain, clearing parent links. The children of a
    ///    Bₖ root are B_{k-1}, ..., B₀, so the reversed chain is a valid
    ///    ascending root list
    /// 4. Union that list with the remaining forest
    ///
    /// # Errors
    /// Returns [`HeapError::EmptyHeap`] if the forest has no keys.
    pub fn extract_minimum(&mut self) -> Result<K, HeapError> {
        let (prev, min) = self.min_root().ok_or(HeapError::EmptyHeap)?;

        let after = self.nodes[min].sibling;
        match prev {
            Some(prev) => self.nodes[prev].sibling = after,
            None => self.head = after,
        }

        let mut reversed = None;
        let mut child = self.nodes[min].child;
        while let Some(current) = child {
            let node = &mut self.nodes[current];
            child = node.sibling;
            node.sibling = reversed;
            node.parent = None;
            reversed = Some(current);
        }

        self.head = self.union(self.head, reversed);
        self.len -= 1;

        let node = self
            .nodes
            .remove(min)
            .expect("minimum root must still be in the arena");
        Ok(node.key)
    }

    /// Merges another forest into this one, consuming it
    ///
    /// **Time Complexity**: O(m) to move the other forest's m nodes into this
    /// arena, then O(log n) for the union of the root lists.
    ///
    /// The other forest's comparator is dropped; this forest's ordering rule
    /// decides every link.
    pub fn merge(&mut self, other: Self) {
        let BinomialForest {
            nodes, head, len, ..
        } = other;

        if head.is_none() {
            return;
        }

        if self.is_empty() {
            self.nodes = nodes;
            self.head = head;
            self.len = len;
            return;
        }

        let remap = self.nodes.absorb(nodes, |node, remap| {
            node.parent = node.parent.map(|k| remap_key(k, remap));
            node.child = node.child.map(|k| remap_key(k, remap));
            node.sibling = node.sibling.map(|k| remap_key(k, remap));
        });

        let moved = head.map(|k| remap_key(k, &remap));
        self.head = self.union(self.head, moved);
        self.len += len;
    }

    /// Removes every key
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.len = 0;
    }

    /// Returns the degrees of the roots, in root-list order
    ///
    /// For a well-formed forest these are the set bits of `len()`, ascending.
    pub fn root_degrees(&self) -> Vec<usize> {
        let mut degrees = Vec::new();
        let mut current = self.head;
        while let Some(root) = current {
            degrees.push(self.nodes[root].degree);
            current = self.nodes[root].sibling;
        }
        degrees
    }

    /// Checks every structural invariant of the forest
    ///
    /// - roots have no parent and strictly increasing degrees
    /// - a degree-d node has children of degrees d-1, ..., 0 in chain order,
    ///   each pointing back at it
    /// - no child orders before its parent
    /// - `len()` equals the number of reachable nodes and of stored nodes
    ///
    /// The first violation found is logged at debug level.
    pub fn verify_structure(&self) -> bool {
        let mut counted = 0;
        let mut last_degree: Option<usize> = None;
        let mut current = self.head;

        while let Some(root) = current {
            let node = &self.nodes[root];
            if node.parent.is_some() {
                log::debug!("root {:?} has a parent link", root);
                return false;
            }
            if last_degree.is_some_and(|d| d >= node.degree) {
                log::debug!(
                    "root list degrees not strictly increasing at degree {}",
                    node.degree
                );
                return false;
            }
            last_degree = Some(node.degree);

            match self.verify_tree(root) {
                Some(size) => counted += size,
                None => return false,
            }
            current = node.sibling;
        }

        if counted != self.len || counted != self.nodes.len() {
            log::debug!(
                "size mismatch: {} reachable, len {}, {} stored",
                counted,
                self.len,
                self.nodes.len()
            );
            return false;
        }
        true
    }

    /// Validates the subtree at `root`, returning its node count
    fn verify_tree(&self, root: NodeKey) -> Option<usize> {
        let node = &self.nodes[root];
        let mut size = 1;
        let mut expected = node.degree;
        let mut child = node.child;

        while let Some(current) = child {
            let child_node = &self.nodes[current];
            if expected == 0 {
                log::debug!("{:?} has more children than its degree", root);
                return None;
            }
            expected -= 1;
            if child_node.degree != expected {
                log::debug!(
                    "child of {:?} has degree {}, expected {}",
                    root,
                    child_node.degree,
                    expected
                );
                return None;
            }
            if child_node.parent != Some(root) {
                log::debug!("{:?} does not point back at its parent", current);
                return None;
            }
            if self.cmp.compares_lt(&child_node.key, &node.key) {
                log::debug!("heap order violated below {:?}", root);
                return None;
            }
            size += self.verify_tree(current)?;
            child = child_node.sibling;
        }

        if expected != 0 {
            log::debug!("{:?} is missing {} children", root, expected);
            return None;
        }
        Some(size)
    }

    /// Finds the minimum root and its predecessor in the root list
    fn min_root(&self) -> Option<(Option<NodeKey>, NodeKey)> {
        let mut min = self.head?;
        let mut prev_min = None;
        let mut prev = min;
        let mut current = self.nodes[min].sibling;

        while let Some(node) = current {
            if self.cmp.compares_lt(&self.nodes[node].key, &self.nodes[min].key) {
                min = node;
                prev_min = Some(prev);
            }
            prev = node;
            current = self.nodes[node].sibling;
        }

        Some((prev_min, min))
    }

    /// Interleaves two ascending-degree root lists into one
    ///
    /// Equal degrees end up adjacent (left list first); linking them is the
    /// caller's job.
    fn merge_root_lists(
        &mut self,
        mut a: Option<NodeKey>,
        mut b: Option<NodeKey>,
    ) -> Option<NodeKey> {
        let (x, y) = match (a, b) {
            (None, _) => return b,
            (_, None) => return a,
            (Some(x), Some(y)) => (x, y),
        };

        let head = if self.nodes[x].degree <= self.nodes[y].degree {
            a = self.nodes[x].sibling;
            x
        } else {
            b = self.nodes[y].sibling;
            y
        };

        let mut tail = head;
        while let (Some(x), Some(y)) = (a, b) {
            let next = if self.nodes[x].degree <= self.nodes[y].degree {
                a = self.nodes[x].sibling;
                x
            } else {
                b = self.nodes[y].sibling;
                y
            };
            self.nodes[tail].sibling = Some(next);
            tail = next;
        }
        self.nodes[tail].sibling = a.or(b);

        Some(head)
    }

    /// Unions two root lists, restoring at most one root per degree
    ///
    /// **Algorithm**: merge the lists by degree, then sweep with
    /// (prev, curr, next):
    /// - different degrees: advance
    /// - three equal degrees in a row: advance, so the last two pair up
    ///   (the first one is the "digit" that stays, the carry comes later)
    /// - two equal degrees: link the larger key under the smaller one
    fn union(&mut self, a: Option<NodeKey>, b: Option<NodeKey>) -> Option<NodeKey> {
        let mut head = self.merge_root_lists(a, b)?;
        let mut prev: Option<NodeKey> = None;
        let mut curr = head;
        let mut next = self.nodes[curr].sibling;

        while let Some(nx) = next {
            let degree = self.nodes[curr].degree;
            let deferred = self.nodes[nx]
                .sibling
                .is_some_and(|after| self.nodes[after].degree == degree);

            if self.nodes[nx].degree != degree || deferred {
                prev = Some(curr);
                curr = nx;
            } else if self.cmp.compares_lt(&self.nodes[curr].key, &self.nodes[nx].key) {
                self.nodes[curr].sibling = self.nodes[nx].sibling;
                self.link(nx, curr);
            } else {
                match prev {
                    Some(p) => self.nodes[p].sibling = Some(nx),
                    None => head = nx,
                }
                self.link(curr, nx);
                curr = nx;
            }
            next = self.nodes[curr].sibling;
        }

        Some(head)
    }

    /// Makes `child` the first child of `parent`
    ///
    /// Both must be roots of equal degree; the parent's degree grows by one.
    fn link(&mut self, child: NodeKey, parent: NodeKey) {
        let first = self.nodes[parent].child;

        let node = &mut self.nodes[child];
        node.parent = Some(parent);
        node.sibling = first;

        let node = &mut self.nodes[parent];
        node.child = Some(child);
        node.degree += 1;

        log::trace!("linked {:?} under {:?} (degree {})", child, parent, node.degree);
    }
}

impl<K: fmt::Debug, C: Compare<K>> BinomialForest<K, C> {
    /// Renders the forest as indented text, one node per line
    ///
    /// ```text
    /// Key: 8, Degree: 0
    /// Key: 3, Degree: 2
    ///   Key: 5, Degree: 1
    ///     Key: 10, Degree: 0
    ///   Key: 20, Degree: 0
    /// ```
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.write_level(&mut out, self.head, 0);
        out
    }

    fn write_level(&self, out: &mut String, mut current: Option<NodeKey>, level: usize) {
        while let Some(key) = current {
            let node = &self.nodes[key];
            let _ = writeln!(
                out,
                "{}Key: {:?}, Degree: {}",
                "  ".repeat(level),
                node.key,
                node.degree
            );
            self.write_level(out, node.child, level + 1);
            current = node.sibling;
        }
    }
}

impl<K, C: Compare<K>> fmt::Debug for BinomialForest<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinomialForest")
            .field("len", &self.len)
            .field("root_degrees", &self.root_degrees())
            .finish()
    }
}

impl<K, C: Compare<K> + Default> Heap<K> for BinomialForest<K, C> {
    fn new() -> Self {
        Self::with_comparator(C::default())
    }

    fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    fn len(&self) -> usize {
        self.len
    }

    fn push(&mut self, key: K) {
        self.insert(key);
    }

    fn peek(&self) -> Option<&K> {
        self.find_minimum().ok()
    }

    fn pop(&mut self) -> Option<K> {
        self.extract_minimum().ok()
    }

    fn merge(&mut self, other: Self) {
        BinomialForest::merge(self, other);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let mut heap = BinomialForest::new();
        assert!(heap.is_empty());
        assert_eq!(heap.len(), 0);

        for key in [10, 5, 20, 3, 8] {
            heap.insert(key);
        }

        assert_eq!(heap.len(), 5);
        assert_eq!(heap.find_minimum(), Ok(&3));
        assert_eq!(heap.extract_minimum(), Ok(3));
        assert_eq!(heap.find_minimum(), Ok(&5));
        assert_eq!(heap.len(), 4);
        assert!(heap.verify_structure());
    }

    #[test]
    fn test_empty_forest_errors() {
        let mut heap: BinomialForest<i32> = BinomialForest::new();
        assert_eq!(heap.find_minimum(), Err(HeapError::EmptyHeap));
        assert_eq!(heap.extract_minimum(), Err(HeapError::EmptyHeap));

        heap.insert(1);
        assert_eq!(heap.extract_minimum(), Ok(1));
        assert!(heap.is_empty());
        assert_eq!(heap.extract_minimum(), Err(HeapError::EmptyHeap));
        assert!(heap.verify_structure());
    }

    #[test]
    fn test_root_degrees_follow_binary_count() {
        let mut heap = BinomialForest::new();
        for key in 0..13 {
            heap.insert(key);
        }
        // 13 = 0b1101
        assert_eq!(heap.root_degrees(), vec![0, 2, 3]);

        heap.extract_minimum().unwrap();
        // 12 = 0b1100
        assert_eq!(heap.root_degrees(), vec![2, 3]);
        assert!(heap.verify_structure());
    }

    #[test]
    fn test_dump() {
        let mut heap = BinomialForest::new();
        for key in [10, 5, 20, 3, 8] {
            heap.insert(key);
        }

        let expected = "\
Key: 8, Degree: 0
Key: 3, Degree: 2
  Key: 5, Degree: 1
    Key: 10, Degree: 0
  Key: 20, Degree: 0
";
        assert_eq!(heap.dump(), expected);
    }

    #[test]
    fn test_merge() {
        let mut h1 = BinomialForest::new();
        for key in [1, 4, 9] {
            h1.insert(key);
        }
        let mut h2 = BinomialForest::new();
        for key in [2, 3, 7] {
            h2.insert(key);
        }

        h1.merge(h2);
        assert_eq!(h1.len(), 6);
        assert!(h1.verify_structure());
        // 6 = 0b110
        assert_eq!(h1.root_degrees(), vec![1, 2]);

        let drained: Vec<_> = std::iter::from_fn(|| h1.extract_minimum().ok()).collect();
        assert_eq!(drained, vec![1, 2, 3, 4, 7, 9]);
    }

    #[test]
    fn test_merge_with_empty() {
        let mut h1: BinomialForest<i32> = BinomialForest::new();
        h1.merge(BinomialForest::new());
        assert!(h1.is_empty());

        let mut h2 = BinomialForest::new();
        h2.insert(4);
        h2.insert(2);
        h1.merge(h2);
        assert_eq!(h1.len(), 2);
        assert_eq!(h1.find_minimum(), Ok(&2));

        h1.merge(BinomialForest::new());
        assert_eq!(h1.len(), 2);
        assert!(h1.verify_structure());
    }

    #[test]
    fn test_three_equal_degrees_defer() {
        // Two B₁ trees plus the B₁ carry produced from the B₀ pair gives
        // three degree-1 roots in a row during the union.
        let mut h1 = BinomialForest::new();
        for key in [5, 6, 7] {
            h1.insert(key);
        }
        let mut h2 = BinomialForest::new();
        for key in [1, 2, 3] {
            h2.insert(key);
        }

        h1.merge(h2);
        assert!(h1.verify_structure());
        assert_eq!(h1.root_degrees(), vec![1, 2]);
        assert_eq!(h1.find_minimum(), Ok(&1));
    }

    #[test]
    fn test_duplicate_keys() {
        let mut heap = BinomialForest::new();
        for _ in 0..9 {
            heap.insert(4);
        }
        heap.insert(1);
        assert!(heap.verify_structure());

        assert_eq!(heap.extract_minimum(), Ok(1));
        for _ in 0..9 {
            assert_eq!(heap.extract_minimum(), Ok(4));
        }
        assert!(heap.is_empty());
    }

    #[test]
    fn test_reversed_comparator() {
        let mut heap = BinomialForest::with_comparator(compare::natural::<i32>().rev());
        for key in [3, 9, 1, 7] {
            heap.insert(key);
        }
        assert_eq!(heap.extract_minimum(), Ok(9));
        assert_eq!(heap.extract_minimum(), Ok(7));
        assert!(heap.verify_structure());
    }

    #[test]
    fn test_closure_comparator() {
        let mut heap =
            BinomialForest::with_comparator(|a: &&str, b: &&str| a.len().cmp(&b.len()));
        heap.insert("three");
        heap.insert("a");
        heap.insert("xyz");

        assert_eq!(heap.extract_minimum(), Ok("a"));
        assert_eq!(heap.extract_minimum(), Ok("xyz"));
        assert_eq!(heap.extract_minimum(), Ok("three"));
    }

    #[test]
    fn test_clear() {
        let mut heap = BinomialForest::with_capacity(8);
        for key in 0..8 {
            heap.insert(key);
        }
        heap.clear();
        assert!(heap.is_empty());
        assert_eq!(heap.len(), 0);
        assert!(heap.verify_structure());

        heap.insert(2);
        assert_eq!(heap.find_minimum(), Ok(&2));
    }
}
