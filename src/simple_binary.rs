//! Simple Binary Heap implementation
//!
//! A straightforward array-backed binary min-heap. It is the naive baseline
//! the mergeable heaps are measured against: cheap per operation, but
//! merging two of them means re-inserting every key of one into the other.
//!
//! # Time Complexity
//!
//! | Operation         | Complexity |
//! |-------------------|------------|
//! | `insert`          | O(log n)   |
//! | `extract_minimum` | O(log n)   |
//! | `find_minimum`    | O(1)       |
//! | `merge`           | O(m log n) |
//!
//! # Example
//!
//! ```rust
//! use mergeable_heaps::simple_binary::SimpleBinaryHeap;
//!
//! let mut heap = SimpleBinaryHeap::new();
//! heap.insert(3);
//! heap.insert(1);
//! heap.insert(2);
//!
//! assert_eq!(heap.find_minimum(), Ok(&1));
//! assert_eq!(heap.extract_minimum(), Ok(1));
//! assert_eq!(heap.extract_minimum(), Ok(2));
//! assert_eq!(heap.extract_minimum(), Ok(3));
//! assert!(heap.extract_minimum().is_err());
//! ```

use compare::{Compare, Natural};
use crate::traits::{Heap, HeapError};

/// A simple binary min-heap
#[derive(Debug, Clone)]
pub struct SimpleBinaryHeap<K, C = Natural<K>> {
    /// Keys in level order; the children of `i` are `2i + 1` and `2i + 2`
    data: Vec<K>,
    cmp: C,
}

impl<K: Ord> SimpleBinaryHeap<K> {
    /// Creates an empty heap ordered by `K: Ord`
    pub fn new() -> Self {
        Self::with_comparator(compare::natural())
    }
}

impl<K, C: Compare<K> + Default> Default for SimpleBinaryHeap<K, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K, C: Compare<K>> SimpleBinaryHeap<K, C> {
    /// Creates an empty heap ordered by `cmp`
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            data: Vec::new(),
            cmp,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn insert(&mut self, key: K) {
        self.data.push(key);
        self.sift_up(self.data.len() - 1);
    }

    /// # Errors
    /// Returns [`HeapError::EmptyHeap`] if the heap has no keys.
    pub fn find_minimum(&self) -> Result<&K, HeapError> {
        self.data.first().ok_or(HeapError::EmptyHeap)
    }

    /// # Errors
    /// Returns [`HeapError::EmptyHeap`] if the heap has no keys.
    pub fn extract_minimum(&mut self) -> Result<K, HeapError> {
        if self.data.is_empty() {
            return Err(HeapError::EmptyHeap);
        }

        let min = self.data.swap_remove(0);
        if !self.data.is_empty() {
            self.sift_down(0);
        }
        Ok(min)
    }

    /// Re-inserts every key of `other`
    pub fn merge(&mut self, other: Self) {
        self.data.reserve(other.data.len());
        for key in other.data {
            self.insert(key);
        }
    }

    /// Move element at index up to maintain heap property
    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.cmp.compares_lt(&self.data[index], &self.data[parent]) {
                self.data.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    /// Move element at index down to maintain heap property
    fn sift_down(&mut self, mut index: usize) {
        let len = self.data.len();
        loop {
            let left = 2 * index + 1;
            let right = 2 * index + 2;
            let mut smallest = index;

            if left < len && self.cmp.compares_lt(&self.data[left], &self.data[smallest]) {
                smallest = left;
            }
            if right < len && self.cmp.compares_lt(&self.data[right], &self.data[smallest]) {
                smallest = right;
            }

            if smallest != index {
                self.data.swap(index, smallest);
                index = smallest;
            } else {
                break;
            }
        }
    }
}

impl<K, C: Compare<K> + Default> Heap<K> for SimpleBinaryHeap<K, C> {
    fn new() -> Self {
        Self::with_comparator(C::default())
    }

    fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn push(&mut self, key: K) {
        self.insert(key);
    }

    fn peek(&self) -> Option<&K> {
        self.data.first()
    }

    fn pop(&mut self) -> Option<K> {
        self.extract_minimum().ok()
    }

    fn merge(&mut self, other: Self) {
        SimpleBinaryHeap::merge(self, other);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let mut heap = SimpleBinaryHeap::new();

        assert!(heap.is_empty());
        assert_eq!(heap.len(), 0);

        heap.insert(3);
        heap.insert(1);
        heap.insert(2);

        assert!(!heap.is_empty());
        assert_eq!(heap.len(), 3);
        assert_eq!(heap.find_minimum(), Ok(&1));

        assert_eq!(heap.extract_minimum(), Ok(1));
        assert_eq!(heap.extract_minimum(), Ok(2));
        assert_eq!(heap.extract_minimum(), Ok(3));
        assert_eq!(heap.extract_minimum(), Err(HeapError::EmptyHeap));
    }

    #[test]
    fn test_merge() {
        let mut heap1 = SimpleBinaryHeap::new();
        let mut heap2 = SimpleBinaryHeap::new();

        heap1.insert(3);
        heap1.insert(1);
        heap2.insert(4);
        heap2.insert(2);

        heap1.merge(heap2);

        assert_eq!(heap1.len(), 4);
        for expected in 1..=4 {
            assert_eq!(heap1.extract_minimum(), Ok(expected));
        }
    }

    #[test]
    fn test_descending_insertion() {
        let mut heap = SimpleBinaryHeap::new();

        for i in (0..100).rev() {
            heap.insert(i);
        }

        for i in 0..100 {
            assert_eq!(heap.extract_minimum(), Ok(i));
        }
    }

    #[test]
    fn test_max_heap_via_rev() {
        let mut heap = SimpleBinaryHeap::with_comparator(compare::natural::<i32>().rev());
        for i in [4, 9, 1, 7] {
            heap.insert(i);
        }
        assert_eq!(heap.extract_minimum(), Ok(9));
        assert_eq!(heap.extract_minimum(), Ok(7));
    }
}
