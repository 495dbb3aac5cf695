/// A record that can be recycled by an [`ObjectPool`].
pub trait Poolable: Default {
    /// Return the record to its freshly constructed state.
    fn reset(&mut self);
}

/// Slot arena handing out reusable records by index.
///
/// Released slots go on a free list and are handed out again by the next
/// [`acquire`](Self::acquire), so a pool that has warmed up to the size of
/// the largest workload stops allocating. Indices stay valid until released.
#[derive(Debug, Clone)]
pub struct ObjectPool<T> {
    slots: Vec<T>,
    in_use: Vec<bool>,
    free: Vec<usize>,
}

impl<T: Poolable> Default for ObjectPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Poolable> ObjectPool<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            in_use: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Create a pool with `capacity` records already constructed and free.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut pool = Self {
            slots: Vec::with_capacity(capacity),
            in_use: Vec::with_capacity(capacity),
            free: Vec::with_capacity(capacity),
        };
        pool.slots.resize_with(capacity, T::default);
        pool.in_use.resize(capacity, false);
        // Reverse so the lowest index is handed out first.
        pool.free.extend((0..capacity).rev());
        pool
    }

    /// Check out a reset record, returning its index.
    pub fn acquire(&mut self) -> usize {
        if let Some(idx) = self.free.pop() {
            self.in_use[idx] = true;
            return idx;
        }
        self.slots.push(T::default());
        self.in_use.push(true);
        self.slots.len() - 1
    }

    /// Reset the record at `idx` and return it to the free list.
    ///
    /// Releasing a slot that is not checked out is a logic error: it panics
    /// in debug builds and is otherwise ignored.
    pub fn release(&mut self, idx: usize) {
        let live = self.in_use.get(idx).copied().unwrap_or(false);
        debug_assert!(live, "releasing pool slot {idx} which is not in use");
        if !live {
            return;
        }
        self.slots[idx].reset();
        self.in_use[idx] = false;
        self.free.push(idx);
    }

    /// Live record at `idx`, or `None` if the slot is free or out of range.
    #[inline]
    pub fn get(&self, idx: usize) -> Option<&T> {
        if self.is_live(idx) {
            self.slots.get(idx)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, idx: usize) -> Option<&mut T> {
        if self.is_live(idx) {
            self.slots.get_mut(idx)
        } else {
            None
        }
    }

    #[inline]
    pub fn is_live(&self, idx: usize) -> bool {
        self.in_use.get(idx).copied().unwrap_or(false)
    }

    /// Number of records currently checked out.
    #[inline]
    pub fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Number of released records waiting for reuse.
    #[inline]
    pub fn free(&self) -> usize {
        self.free.len()
    }

    /// Total number of slots ever constructed and still retained.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Drop free slots at the tail of the arena.
    pub fn shrink(&mut self) {
        while self.in_use.last() == Some(&false) {
            self.slots.pop();
            self.in_use.pop();
        }
        let len = self.slots.len();
        self.free.retain(|&idx| idx < len);
    }
}
