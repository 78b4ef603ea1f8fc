//! Mergeable priority queues for Rust
//!
//! This crate provides two classic mergeable min-heaps, both storing their
//! nodes in an arena and linking them by generation-checked keys:
//!
//! - **Binomial Forest**: O(log n) insert, find-minimum, extract-minimum and
//!   union; roots kept in an ascending-degree list, unions done by
//!   binary-counter carry propagation
//! - **Circular-Root Heap** (Fibonacci-style): O(1) insert, find-minimum and
//!   root-ring join; O(log n) amortized extract-minimum via consolidation
//!
//! plus a **Simple Binary Heap** as the array-backed baseline.
//!
//! Each heap owns its arena, so `merge` first moves the other heap's m nodes
//! across (O(m), with a key remap). Only the union or ring join that follows
//! has the O(log n) / O(1) bound; merging into an empty heap adopts the other
//! arena in O(1).
//!
//! Every heap takes its ordering rule at construction time as a
//! [`Compare`] value from the `compare` crate ([`Natural`] by default, a
//! closure, or [`Rev`] for a max-heap), reports emptiness through
//! [`HeapError::EmptyHeap`] on its inherent API, and implements the [`Heap`]
//! trait for generic use.
//!
//! None of the heaps synchronize internally; share one across threads only
//! behind a lock.
//!
//! # Example
//!
//! ```rust
//! use mergeable_heaps::fibonacci::CircularRootHeap;
//! use mergeable_heaps::Heap;
//!
//! let mut a: CircularRootHeap<u32> = Heap::new();
//! a.push(4);
//! a.push(1);
//!
//! let mut b: CircularRootHeap<u32> = CircularRootHeap::new();
//! b.push(2);
//!
//! a.merge(b);
//! assert_eq!(a.pop(), Some(1));
//! assert_eq!(a.pop(), Some(2));
//! assert_eq!(a.peek(), Some(&4));
//! ```

mod arena;
pub mod binomial;
pub mod fibonacci;
pub mod simple_binary;
pub mod traits;

pub use binomial::BinomialForest;
pub use compare::{natural, Compare, Natural, Rev};
pub use fibonacci::CircularRootHeap;
pub use simple_binary::SimpleBinaryHeap;
// Re-export the main trait for convenience
pub use traits::{Heap, HeapError};
