use std::cmp::Ordering;

/// Ordering strategy for [`BinaryHeap`].
///
/// The element that compares [`Ordering::Greater`] than every other sits at
/// the root and is returned first by [`BinaryHeap::pop`].
pub trait Comparer<T> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T, F> Comparer<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// Natural ordering of `T`: a max-heap.
#[derive(Debug, Clone, Copy, Default)]
pub struct Natural;

impl<T: Ord> Comparer<T> for Natural {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Inverts the wrapped comparer, turning a max-heap into a min-heap.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reverse<C>(pub C);

impl<T, C: Comparer<T>> Comparer<T> for Reverse<C> {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0.compare(b, a)
    }
}

/// Array-backed binary heap whose elements may be mutated in place.
///
/// Unlike [`std::collections::BinaryHeap`], elements can be looked up by
/// position, changed through [`get_mut`](Self::get_mut) and restored with
/// [`update`](Self::update). Clearing keeps the backing allocation so a heap
/// can be reused across searches without reallocating.
#[derive(Debug, Clone)]
pub struct BinaryHeap<T, C> {
    items: Vec<T>,
    comparer: C,
}

impl<T: Ord> Default for BinaryHeap<T, Natural> {
    fn default() -> Self {
        Self::new(Natural)
    }
}

impl<T, C: Comparer<T>> BinaryHeap<T, C> {
    /// Create an empty heap ordered by `comparer`.
    pub fn new(comparer: C) -> Self {
        Self {
            items: Vec::new(),
            comparer,
        }
    }

    /// Create an empty heap with room for `capacity` elements.
    pub fn with_capacity(capacity: usize, comparer: C) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            comparer,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Reserve room for at least `additional` more elements.
    pub fn reserve(&mut self, additional: usize) {
        self.items.reserve(additional);
    }

    pub fn comparer(&self) -> &C {
        &self.comparer
    }

    /// Element at heap position `index`. Position 0 is the root.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Mutable access to the element at `index`.
    ///
    /// Changing its key breaks the heap property until
    /// [`update`](Self::update) is called with the same index.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// Iterate the elements in heap (not sorted) order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Insert `item`. O(log n).
    pub fn push(&mut self, item: T) {
        self.items.push(item);
        let last = self.items.len() - 1;
        self.sift_up(last);
    }

    /// The root element without removing it. O(1).
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    /// Remove and return the root element. O(log n).
    pub fn pop(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let item = self.items.swap_remove(0);
        if !self.items.is_empty() {
            self.sift_down(0);
        }
        Some(item)
    }

    /// Restore the heap property for the element at `index` after its key
    /// changed in either direction. Out-of-range indices are ignored.
    pub fn update(&mut self, index: usize) {
        if index >= self.items.len() {
            return;
        }
        let index = self.sift_up(index);
        self.sift_down(index);
    }

    /// Position of the first element matching `pred`. O(n).
    pub fn position(&self, pred: impl FnMut(&T) -> bool) -> Option<usize> {
        self.items.iter().position(pred)
    }

    /// Remove and return the element at `index`. O(log n).
    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        if index >= self.items.len() {
            return None;
        }
        let item = self.items.swap_remove(index);
        if index < self.items.len() {
            self.update(index);
        }
        Some(item)
    }

    /// Drop every element, keeping the allocation.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Move `index` toward the root while it outranks its parent.
    /// Returns its final position.
    fn sift_up(&mut self, mut index: usize) -> usize {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self
                .comparer
                .compare(&self.items[index], &self.items[parent])
                != Ordering::Greater
            {
                break;
            }
            self.items.swap(index, parent);
            index = parent;
        }
        index
    }

    /// Move `index` toward the leaves while a child outranks it.
    fn sift_down(&mut self, mut index: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * index + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let mut best = left;
            if right < len
                && self
                    .comparer
                    .compare(&self.items[right], &self.items[left])
                    == Ordering::Greater
            {
                best = right;
            }
            if self.comparer.compare(&self.items[best], &self.items[index]) != Ordering::Greater {
                break;
            }
            self.items.swap(index, best);
            index = best;
        }
    }
}

impl<T: PartialEq, C: Comparer<T>> BinaryHeap<T, C> {
    /// Whether an element equal to `item` is present. O(n).
    pub fn contains(&self, item: &T) -> bool {
        self.items.iter().any(|x| x == item)
    }

    /// Remove the first element equal to `item`. O(n) search plus O(log n).
    pub fn remove(&mut self, item: &T) -> Option<T> {
        let index = self.position(|x| x == item)?;
        self.remove_at(index)
    }
}

impl<'a, T, C> IntoIterator for &'a BinaryHeap<T, C> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
