use std::cmp::Ordering;

use lodestar_core::{ObjectPool, Poolable};

/// Index of a [`Vertex`] inside the resolver's pool.
pub(crate) type VertexId = usize;

// ---------------------------------------------------------------------------
// Bookkeeping record attached to every discovered node
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub(crate) struct Vertex<N> {
    pub(crate) node: Option<N>,
    /// Record this one was reached from. Following the chain from the
    /// terminal record leads back to the seed.
    pub(crate) next: Option<VertexId>,
    pub(crate) g: f32,
    pub(crate) h: f32,
    pub(crate) f: f32,
}

impl<N> Default for Vertex<N> {
    fn default() -> Self {
        Self {
            node: None,
            next: None,
            g: 0.0,
            h: 0.0,
            f: 0.0,
        }
    }
}

impl<N> Poolable for Vertex<N> {
    fn reset(&mut self) {
        self.node = None;
        self.next = None;
        self.g = 0.0;
        self.h = 0.0;
        self.f = 0.0;
    }
}

// ---------------------------------------------------------------------------
// Pool
// ---------------------------------------------------------------------------

/// Recycled storage for the per-node records of a search.
///
/// Every [`AStarPathResolver`](crate::AStarPathResolver) owns one. A pool
/// that has grown to fit a large search keeps its slots, and can be moved to
/// another resolver with [`into_pool`](crate::AStarPathResolver::into_pool) /
/// [`with_pool`](crate::AStarPathResolver::with_pool).
#[derive(Debug, Clone)]
pub struct VertexPool<N> {
    pub(crate) inner: ObjectPool<Vertex<N>>,
}

impl<N> Default for VertexPool<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> VertexPool<N> {
    pub fn new() -> Self {
        Self {
            inner: ObjectPool::new(),
        }
    }

    /// Pre-build `capacity` free records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: ObjectPool::with_capacity(capacity),
        }
    }

    /// Records currently checked out by a search.
    pub fn live(&self) -> usize {
        self.inner.live()
    }

    /// Released records ready for reuse.
    pub fn free(&self) -> usize {
        self.inner.free()
    }

    /// Total records retained.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Drop trailing free records.
    pub fn shrink(&mut self) {
        self.inner.shrink();
    }
}

// ---------------------------------------------------------------------------
// Open-set entry
// ---------------------------------------------------------------------------

/// Heap payload: a pool index plus a copy of its `f`, kept in sync whenever
/// the record is relaxed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct OpenEntry {
    pub(crate) id: VertexId,
    pub(crate) f: f32,
}

/// Lower `f` ranks higher, so the heap pops the cheapest entry first.
pub(crate) fn cheapest_first(a: &OpenEntry, b: &OpenEntry) -> Ordering {
    b.f.total_cmp(&a.f)
}

pub(crate) type OpenComparer = fn(&OpenEntry, &OpenEntry) -> Ordering;
