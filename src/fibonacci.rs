//! Fibonacci-style circular-root heap
//!
//! A collection of heap-ordered trees whose roots form a circular doubly
//! linked list (the **root ring**), with:
//! - O(1) insert, find-minimum and merge
//! - O(log n) amortized extract-minimum
//!
//! Insertion only splices a singleton tree into the root ring. All the tree
//! building is deferred to **consolidation**, which runs after every
//! extraction and links roots of equal degree until each degree appears at
//! most once.
//!
//! There is no decrease-key, so no node is ever cut from its parent and the
//! trees are always binomial trees; the structure behaves like a lazily
//! consolidated binomial heap.
//!
//! Every level (root ring and each child ring) is a closed ring through
//! `left`/`right`; a node alone in its ring points at itself.

use crate::arena::{remap_key, Arena, NodeKey};
use compare::{Compare, Natural};
use crate::traits::{Heap, HeapError};
use smallvec::SmallVec;
use std::fmt::{self, Write};

/// Roots and degree-table slots held inline before spilling to the heap
const INLINE_ROOTS: usize = 32;

type Scratch = SmallVec<[NodeKey; INLINE_ROOTS]>;

#[derive(Clone)]
struct Node<K> {
    key: K,
    degree: usize,
    parent: Option<NodeKey>,
    /// Any one member of the child ring
    child: Option<NodeKey>,
    left: NodeKey,
    right: NodeKey,
}

/// Circular-root heap
///
/// # Example
///
/// ```rust
/// use mergeable_heaps::fibonacci::CircularRootHeap;
///
/// let mut heap = CircularRootHeap::new();
/// for key in [5, 3, 8, 1, 10] {
///     heap.insert(key);
/// }
/// let drained: Vec<_> = std::iter::from_fn(|| heap.extract_minimum().ok()).collect();
/// assert_eq!(drained, vec![1, 3, 5, 8, 10]);
/// assert!(heap.is_empty());
/// ```
#[derive(Clone)]
pub struct CircularRootHeap<K, C = Natural<K>> {
    nodes: Arena<Node<K>>,
    min: Option<NodeKey>,
    len: usize,
    cmp: C,
}

impl<K: Ord> CircularRootHeap<K> {
    /// Creates an empty heap ordered by `K: Ord`
    pub fn new() -> Self {
        Self::with_comparator(compare::natural())
    }

    /// Creates an empty heap with room for `capacity` keys
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, compare::natural())
    }
}

impl<K, C: Compare<K> + Default> Default for CircularRootHeap<K, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K, C: Compare<K>> CircularRootHeap<K, C> {
    /// Creates an empty heap ordered by `cmp`
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            nodes: Arena::new(),
            min: None,
            len: 0,
            cmp,
        }
    }

    /// Creates an empty heap ordered by `cmp` with room for `capacity` keys
    pub fn with_capacity_and_comparator(capacity: usize, cmp: C) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            min: None,
            len: 0,
            cmp,
        }
    }

    /// Returns true if the root ring is empty
    pub fn is_empty(&self) -> bool {
        self.min.is_none()
    }

    /// Returns the number of keys
    pub fn len(&self) -> usize {
        self.len
    }

    /// Inserts a key
    ///
    /// **Time Complexity**: O(1)
    ///
    /// The new singleton tree goes into the root ring right after the
    /// current minimum, and becomes the minimum if its key is smaller.
    pub fn insert(&mut self, key: K) {
        let node = self.nodes.insert_with_key(|me| Node {
            key,
            degree: 0,
            parent: None,
            child: None,
            left: me,
            right: me,
        });

        match self.min {
            None => self.min = Some(node),
            Some(min) => {
                self.splice_after(min, node);
                if self.cmp.compares_lt(&self.nodes[node].key, &self.nodes[min].key) {
                    self.min = Some(node);
                }
            }
        }
        self.len += 1;
    }

    /// Returns the minimum key
    ///
    /// **Time Complexity**: O(1)
    ///
    /// # Errors
    /// Returns [`HeapError::EmptyHeap`] if the heap has no keys.
    pub fn find_minimum(&self) -> Result<&K, HeapError> {
        let min = self.min.ok_or(HeapError::EmptyHeap)?;
        Ok(&self.nodes[min].key)
    }

    /// Removes and returns the minimum key
    ///
    /// **Time Complexity**: O(log n) amortized
    ///
    /// **Algorithm**:
    /// 1. Splice every child of the minimum into the root ring, clearing
    ///    their parent links
    /// 2. Unlink the minimum from the root ring
    /// 3. If roots remain, consolidate them (which also finds the new min)
    ///
    /// # Errors
    /// Returns [`HeapError::EmptyHeap`] if the heap has no keys.
    pub fn extract_minimum(&mut self) -> Result<K, HeapError> {
        let min = self.min.ok_or(HeapError::EmptyHeap)?;

        if let Some(first) = self.nodes[min].child.take() {
            for child in self.ring(first) {
                self.nodes[child].parent = None;
                self.splice_after(min, child);
            }
        }

        self.len -= 1;
        let (left, right) = (self.nodes[min].left, self.nodes[min].right);
        if right == min {
            self.min = None;
        } else {
            self.nodes[left].right = right;
            self.nodes[right].left = left;
            self.min = Some(right);
            self.consolidate(right);
        }

        let node = self
            .nodes
            .remove(min)
            .expect("minimum root must still be in the arena");
        Ok(node.key)
    }

    /// Merges another heap into this one, consuming it
    ///
    /// **Time Complexity**: O(m) to move the other heap's m nodes into this
    /// arena, then O(1) to join the two root rings.
    pub fn merge(&mut self, other: Self) {
        let CircularRootHeap { nodes, min, len, .. } = other;

        let Some(other_min) = min else {
            return;
        };

        let Some(self_min) = self.min else {
            self.nodes = nodes;
            self.min = min;
            self.len = len;
            return;
        };

        let remap = self.nodes.absorb(nodes, |node, remap| {
            node.parent = node.parent.map(|k| remap_key(k, remap));
            node.child = node.child.map(|k| remap_key(k, remap));
            node.left = remap_key(node.left, remap);
            node.right = remap_key(node.right, remap);
        });
        let other_min = remap_key(other_min, &remap);

        // Join the rings: self_min -> other_min ... other_last -> self_next
        let self_next = self.nodes[self_min].right;
        let other_last = self.nodes[other_min].left;
        self.nodes[self_min].right = other_min;
        self.nodes[other_min].left = self_min;
        self.nodes[self_next].left = other_last;
        self.nodes[other_last].right = self_next;

        if self.cmp.compares_lt(&self.nodes[other_min].key, &self.nodes[self_min].key) {
            self.min = Some(other_min);
        }
        self.len += len;
    }

    /// Removes every key
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.min = None;
        self.len = 0;
    }

    /// Returns the number of trees in the root ring
    pub fn root_count(&self) -> usize {
        self.min.map_or(0, |min| self.ring(min).len())
    }

    /// Checks every structural invariant of the heap
    ///
    /// - every ring (roots and each child list) is closed in both directions
    /// - roots have no parent, children point at their parent
    /// - each node's degree equals the size of its child ring
    /// - no child orders before its parent, and no root before the min
    /// - `len()` equals the number of reachable nodes and of stored nodes
    ///
    /// The first violation found is logged at debug level.
    pub fn verify_structure(&self) -> bool {
        let Some(min) = self.min else {
            if self.len != 0 || self.nodes.len() != 0 {
                log::debug!("no min but {} keys recorded", self.len);
                return false;
            }
            return true;
        };

        let Some(roots) = self.verify_ring(min, None) else {
            return false;
        };

        let mut counted = 0;
        for root in roots {
            if self.cmp.compares_lt(&self.nodes[root].key, &self.nodes[min].key) {
                log::debug!("root {:?} orders before the min pointer", root);
                return false;
            }
            match self.verify_tree(root) {
                Some(size) => counted += size,
                None => return false,
            }
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
        let Some(first) = node.child else {
            if node.degree != 0 {
                log::debug!("{:?} has degree {} but no children", root, node.degree);
                return None;
            }
            return Some(1);
        };

        let children = self.verify_ring(first, Some(root))?;
        if children.len() != node.degree {
            log::debug!(
                "{:?} has degree {} but {} children",
                root,
                node.degree,
                children.len()
            );
            return None;
        }

        let mut size = 1;
        for child in children {
            if self.cmp.compares_lt(&self.nodes[child].key, &node.key) {
                log::debug!("heap order violated below {:?}", root);
                return None;
            }
            size += self.verify_tree(child)?;
        }
        Some(size)
    }

    /// Walks a ring checking closure and parent links, returning its members
    fn verify_ring(&self, start: NodeKey, parent: Option<NodeKey>) -> Option<Scratch> {
        let mut members = Scratch::new();
        let mut current = start;
        loop {
            let node = &self.nodes[current];
            if node.parent != parent {
                log::debug!("{:?} has the wrong parent link", current);
                return None;
            }
            if self.nodes[node.right].left != current {
                log::debug!("ring broken after {:?}", current);
                return None;
            }
            members.push(current);
            if members.len() > self.nodes.len() {
                log::debug!("ring through {:?} never closes", start);
                return None;
            }
            current = node.right;
            if current == start {
                return Some(members);
            }
        }
    }

    /// Collects the members of the ring containing `start`, in `right` order
    fn ring(&self, start: NodeKey) -> Scratch {
        let mut members = Scratch::new();
        let mut current = start;
        loop {
            members.push(current);
            current = self.nodes[current].right;
            if current == start {
                return members;
            }
        }
    }

    /// Inserts `node` into `anchor`'s ring, immediately to its right
    ///
    /// `node`'s own links are overwritten; it must not be in another ring
    /// that is still in use.
    fn splice_after(&mut self, anchor: NodeKey, node: NodeKey) {
        let next = self.nodes[anchor].right;
        self.nodes[node].left = anchor;
        self.nodes[node].right = next;
        self.nodes[next].left = node;
        self.nodes[anchor].right = node;
    }

    /// Links roots of equal degree until every degree is unique
    ///
    /// **Algorithm**:
    /// 1. Snapshot the root ring starting at `start`
    /// 2. For each root, while the degree table holds another root of the
    ///    same degree, link the one with the larger key under the other and
    ///    move up one degree
    /// 3. Rebuild the root ring from the table and pick the new minimum
    ///
    /// The degree table grows on demand, so there is no fixed cap on the
    /// number of keys.
    fn consolidate(&mut self, start: NodeKey) {
        let roots = self.ring(start);
        let root_count = roots.len();
        let mut table: SmallVec<[Option<NodeKey>; INLINE_ROOTS]> = SmallVec::new();

        for root in roots {
            let mut x = root;
            let mut d = self.nodes[x].degree;

            loop {
                if d >= table.len() {
                    table.resize(d + 1, None);
                }
                let Some(mut y) = table[d].take() else {
                    break;
                };
                if self.cmp.compares_lt(&self.nodes[y].key, &self.nodes[x].key) {
                    std::mem::swap(&mut x, &mut y);
                }
                self.link(y, x);
                d += 1;
            }

            table[d] = Some(x);
        }

        self.min = None;
        for root in table.into_iter().flatten() {
            match self.min {
                None => {
                    self.nodes[root].left = root;
                    self.nodes[root].right = root;
                    self.min = Some(root);
                }
                Some(min) => {
                    self.splice_after(min, root);
                    if self.cmp.compares_lt(&self.nodes[root].key, &self.nodes[min].key) {
                        self.min = Some(root);
                    }
                }
            }
        }

        log::debug!(
            "consolidated {} roots into {} ({} keys)",
            root_count,
            self.root_count(),
            self.len
        );
    }

    /// Moves root `child` out of its ring and into `parent`'s child ring
    fn link(&mut self, child: NodeKey, parent: NodeKey) {
        let (left, right) = (self.nodes[child].left, self.nodes[child].right);
        self.nodes[left].right = right;
        self.nodes[right].left = left;

        self.nodes[child].parent = Some(parent);
        match self.nodes[parent].child {
            None => {
                self.nodes[child].left = child;
                self.nodes[child].right = child;
                self.nodes[parent].child = Some(child);
            }
            Some(first) => self.splice_after(first, child),
        }
        self.nodes[parent].degree += 1;

        log::trace!(
            "linked {:?} under {:?} (degree {})",
            child,
            parent,
            self.nodes[parent].degree
        );
    }
}

impl<K: fmt::Debug, C: Compare<K>> CircularRootHeap<K, C> {
    /// Renders the heap as indented text, one node per line
    ///
    /// Each ring is printed starting from the min (for the roots) or from
    /// the parent's `child` entry, following `right` links.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        if let Some(min) = self.min {
            self.write_ring(&mut out, min, 0);
        }
        out
    }

    fn write_ring(&self, out: &mut String, start: NodeKey, level: usize) {
        for key in self.ring(start) {
            let node = &self.nodes[key];
            let _ = writeln!(
                out,
                "{}Key: {:?}, Degree: {}",
                "  ".repeat(level),
                node.key,
                node.degree
            );
            if let Some(child) = node.child {
                self.write_ring(out, child, level + 1);
            }
        }
    }
}

impl<K, C: Compare<K>> fmt::Debug for CircularRootHeap<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircularRootHeap")
            .field("len", &self.len)
            .field("roots", &self.root_count())
            .finish()
    }
}

impl<K, C: Compare<K> + Default> Heap<K> for CircularRootHeap<K, C> {
    fn new() -> Self {
        Self::with_comparator(C::default())
    }

    fn is_empty(&self) -> bool {
        self.min.is_none()
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
        CircularRootHeap::merge(self, other);
    }
}
