//! Common trait and error type for the mergeable heaps
//!
//! Every heap in this crate has an inherent, `Result`-returning API
//! (`find_minimum`, `extract_minimum`) that fails with [`HeapError::EmptyHeap`],
//! and implements the [`Heap`] trait, which exposes the same operations as
//! `Option`-returning `peek`/`pop` in the style of Rust's `BinaryHeap`.

use std::fmt;

/// Error type for heap operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// A read or remove was attempted on a heap with no elements
    EmptyHeap,
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::EmptyHeap => write!(f, "heap is empty"),
        }
    }
}

impl std::error::Error for HeapError {}

/// Base trait for mergeable min-priority queues
///
/// This trait provides a simple API similar to Rust's `BinaryHeap`:
/// - `push` inserts a key
/// - `pop` removes and returns the minimum
/// - `peek` returns the minimum without removing it
/// - `merge` absorbs another heap of the same type
///
/// The ordering is decided by the heap's comparator (a [`compare::Compare`] value),
/// so the trait is only implemented for comparators that can be built with
/// `Default`. Heaps with an injected closure comparator use the inherent API.
///
/// # Example
///
/// ```rust
/// use mergeable_heaps::Heap;
/// use mergeable_heaps::binomial::BinomialForest;
///
/// let mut heap: BinomialForest<i32> = Heap::new();
/// heap.push(3);
/// heap.push(1);
/// heap.push(2);
///
/// assert_eq!(heap.peek(), Some(&1));
/// assert_eq!(heap.pop(), Some(1));
/// ```
pub trait Heap<K> {
    /// Creates a new empty heap
    fn new() -> Self;

    /// Returns true if the heap is empty
    fn is_empty(&self) -> bool;

    /// Returns the number of keys in the heap
    fn len(&self) -> usize;

    /// Inserts a key
    ///
    /// # Time Complexity
    /// O(1) for the circular-root heap, O(log n) for the binomial forest
    /// and the binary heap.
    fn push(&mut self, key: K);

    /// Returns the minimum key without removing it
    ///
    /// Note that `BinaryHeap` is a max-heap, while these heaps are min-heaps.
    fn peek(&self) -> Option<&K>;

    /// Removes and returns the minimum key
    ///
    /// # Time Complexity
    /// O(log n), amortized for the circular-root heap.
    fn pop(&mut self) -> Option<K>;

    /// Merges another heap into this one, consuming the other heap
    fn merge(&mut self, other: Self);
}
