//! Arena storage for heap nodes
//!
//! Both mergeable heaps keep their nodes in a [`SlotMap`] and link them with
//! [`NodeKey`]s instead of pointers. Keys are generational, so a key that
//! outlives its node is detected on lookup rather than dereferenced.
//!
//! # Characteristics
//! - Contiguous memory allocation (better cache locality than boxed nodes)
//! - Parent, child and ring links are plain `Copy` keys, so cyclic rings
//!   need no reference counting or `unsafe`
//! - Dropping the arena drops every node; there is no manual teardown
//! - Moving nodes between heaps (see [`Arena::absorb`]) remaps their keys

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use std::ops::{Index, IndexMut};

new_key_type! {
    /// Generation-checked handle to a node slot
    pub struct NodeKey;
}

/// Old key to new key, produced when one arena absorbs another
pub(crate) type Remap = FxHashMap<NodeKey, NodeKey>;

/// Node arena backed by a slotmap
#[derive(Debug, Clone)]
pub(crate) struct Arena<N> {
    nodes: SlotMap<NodeKey, N>,
}

impl<N> Default for Arena<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Arena<N> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: SlotMap::with_capacity_and_key(capacity),
        }
    }

    /// Insert a node, returning a key to reference it
    pub(crate) fn insert(&mut self, node: N) -> NodeKey {
        self.nodes.insert(node)
    }

    /// Insert a node that needs to know its own key (self-linked ring nodes)
    pub(crate) fn insert_with_key(&mut self, f: impl FnOnce(NodeKey) -> N) -> NodeKey {
        self.nodes.insert_with_key(f)
    }

    /// Remove a node by key, returning the node if it existed
    pub(crate) fn remove(&mut self, key: NodeKey) -> Option<N> {
        self.nodes.remove(key)
    }

    #[cfg(test)]
    pub(crate) fn get(&self, key: NodeKey) -> Option<&N> {
        self.nodes.get(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Moves every node of `other` into this arena
    ///
    /// Keys change on the way in, so `relink` is called once per moved node,
    /// after all nodes have been inserted, to rewrite the links it holds.
    /// The returned map translates any key of `other` (roots, min pointers)
    /// into its new key here.
    pub(crate) fn absorb(
        &mut self,
        other: Arena<N>,
        mut relink: impl FnMut(&mut N, &Remap),
    ) -> Remap {
        let mut remap = Remap::default();
        remap.reserve(other.len());
        self.nodes.reserve(other.len());

        for (old, node) in other.nodes {
            let new = self.nodes.insert(node);
            remap.insert(old, new);
        }

        for &new in remap.values() {
            relink(&mut self.nodes[new], &remap);
        }

        log::trace!("arena absorbed {} nodes", remap.len());
        remap
    }
}

impl<N> Index<NodeKey> for Arena<N> {
    type Output = N;

    #[inline]
    fn index(&self, key: NodeKey) -> &N {
        &self.nodes[key]
    }
}

impl<N> IndexMut<NodeKey> for Arena<N> {
    #[inline]
    fn index_mut(&mut self, key: NodeKey) -> &mut N {
        &mut self.nodes[key]
    }
}

/// Translates a key through a remap table
///
/// Panics if the key was not part of the absorbed arena, which would mean a
/// link pointed outside its own heap.
#[inline]
pub(crate) fn remap_key(key: NodeKey, remap: &Remap) -> NodeKey {
    remap[&key]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Linked {
        value: i32,
        next: Option<NodeKey>,
    }

    #[test]
    fn test_arena_basic() {
        let mut arena: Arena<i32> = Arena::new();

        let key = arena.insert(42);
        assert_eq!(arena.get(key), Some(&42));

        arena[key] = 100;
        assert_eq!(arena[key], 100);
        assert_eq!(arena.len(), 1);

        assert_eq!(arena.remove(key), Some(100));
        assert_eq!(arena.get(key), None);
        assert_eq!(arena.len(), 0);
    }

    #[test]
    fn test_stale_key_is_detected() {
        let mut arena: Arena<i32> = Arena::with_capacity(4);

        let key = arena.insert(1);
        arena.remove(key);
        let reused = arena.insert(2);

        // The slot may be reused, but the generation differs
        assert_ne!(key, reused);
        assert_eq!(arena.get(key), None);
        assert_eq!(arena.get(reused), Some(&2));
    }

    #[test]
    fn test_insert_with_key_self_link() {
        let mut arena: Arena<Linked> = Arena::new();
        let key = arena.insert_with_key(|k| Linked {
            value: 7,
            next: Some(k),
        });
        assert_eq!(arena[key].next, Some(key));
    }

    #[test]
    fn test_absorb_rewrites_links() {
        let mut left: Arena<Linked> = Arena::new();
        left.insert(Linked {
            value: 0,
            next: None,
        });

        let mut right: Arena<Linked> = Arena::new();
        let tail = right.insert(Linked {
            value: 2,
            next: None,
        });
        let head = right.insert(Linked {
            value: 1,
            next: Some(tail),
        });

        let remap = left.absorb(right, |node, remap| {
            node.next = node.next.map(|k| remap_key(k, remap));
        });

        assert_eq!(left.len(), 3);
        let new_head = remap_key(head, &remap);
        let new_tail = remap_key(tail, &remap);
        assert_eq!(left[new_head].value, 1);
        assert_eq!(left[new_head].next, Some(new_tail));
        assert_eq!(left[new_tail].value, 2);
        assert_eq!(left[new_tail].next, None);
    }
}
