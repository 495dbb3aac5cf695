//! Reusable data structures for graph search.
//!
//! - [`BinaryHeap`]: an array-backed priority queue whose elements can be
//!   located, mutated in place and re-heapified, ordered by a pluggable
//!   [`Comparer`].
//! - [`ObjectPool`]: a slot arena with a free list that recycles
//!   [`Poolable`] records across runs instead of reallocating them.
//!
//! Both keep their allocations across `clear`/`release` so that repeated
//! searches incur no allocations after warm-up.

mod heap;
mod pool;

pub use heap::{BinaryHeap, Comparer, Natural, Reverse};
pub use pool::{ObjectPool, Poolable};
