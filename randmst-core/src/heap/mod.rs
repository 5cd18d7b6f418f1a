//! Array-backed binary min-heap keyed by a mutable per-vertex distance.
//!
//! The heap stores plain [`HeapEntry`] values in a flat vector and orders
//! them by [`HeapEntry::distance`]. Positions `0..len` form the logical heap;
//! slots past `len` keep entries that have already been extracted and are no
//! longer part of the structure. The backing vector never grows or shrinks
//! after [`IndexedMinHeap::build`].
//!
//! Keys are decreased in place through [`IndexedMinHeap::decrease_key`],
//! which deliberately leaves the ordering untouched so a caller can relax a
//! whole batch of entries and restore the invariant once with
//! [`IndexedMinHeap::heapify`]. [`IndexedMinHeap::decrease_key_and_sift`]
//! restores ordering immediately instead.

use thiserror::Error;

use crate::error::define_error_codes;

/// A vertex awaiting admission to the spanning tree.
///
/// # Examples
/// ```
/// use randmst_core::HeapEntry;
///
/// let entry = HeapEntry::new(3, 0.25);
/// assert_eq!(entry.vertex(), 3);
/// assert_eq!(entry.distance(), 0.25);
/// assert_eq!(entry.parent(), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeapEntry {
    vertex: usize,
    distance: f64,
    parent: Option<usize>,
}

impl HeapEntry {
    /// Creates an entry for `vertex` with the given key and no parent.
    #[must_use]
    pub const fn new(vertex: usize, distance: f64) -> Self {
        Self {
            vertex,
            distance,
            parent: None,
        }
    }

    /// Returns the vertex index carried by the entry.
    #[must_use]
    #[rustfmt::skip]
    pub const fn vertex(&self) -> usize { self.vertex }

    /// Returns the best known connecting distance (the heap key).
    #[must_use]
    #[rustfmt::skip]
    pub const fn distance(&self) -> f64 { self.distance }

    /// Returns the tree vertex that offers [`Self::distance`], if any.
    #[must_use]
    #[rustfmt::skip]
    pub const fn parent(&self) -> Option<usize> { self.parent }
}

/// Errors raised when the heap's calling contract is broken.
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum HeapError {
    /// Extraction was attempted on an empty heap.
    #[error("cannot extract from an empty heap")]
    Empty,
    /// A position outside the logical heap was addressed.
    #[error("position {position} is outside the heap (len {len})")]
    PositionOutOfBounds {
        /// The requested heap position.
        position: usize,
        /// The logical heap size at the time of the call.
        len: usize,
    },
    /// A key update would have increased the entry's distance.
    #[error("key at position {position} cannot increase from {current} to {requested}")]
    KeyIncrease {
        /// The heap position whose key was being updated.
        position: usize,
        /// The entry's current key.
        current: f64,
        /// The rejected replacement key.
        requested: f64,
    },
}

define_error_codes! {
    /// Stable codes describing [`HeapError`] variants.
    enum HeapErrorCode for HeapError {
        /// Extraction was attempted on an empty heap.
        Empty => Empty => "HEAP_EMPTY",
        /// A position outside the logical heap was addressed.
        PositionOutOfBounds => PositionOutOfBounds { .. } => "HEAP_POSITION_OUT_OF_BOUNDS",
        /// A key update would have increased the entry's distance.
        KeyIncrease => KeyIncrease { .. } => "HEAP_KEY_INCREASE",
    }
}

#[inline]
const fn parent_of(index: usize) -> usize {
    (index + 1) / 2 - 1
}

#[inline]
const fn left_of(index: usize) -> usize {
    2 * index + 1
}

#[inline]
const fn right_of(index: usize) -> usize {
    2 * index + 2
}

/// Binary min-heap over [`HeapEntry`] values ordered by distance.
///
/// # Examples
/// ```
/// use randmst_core::{HeapEntry, IndexedMinHeap};
///
/// let mut heap = IndexedMinHeap::build(vec![
///     HeapEntry::new(0, 0.9),
///     HeapEntry::new(1, 0.1),
///     HeapEntry::new(2, 0.5),
/// ]);
/// assert_eq!(heap.entries()[0].vertex(), 1);
/// assert_eq!(heap.entries()[1].vertex(), 0);
/// heap.decrease_key(1, 0.05, Some(7))?;
/// heap.heapify();
///
/// let first = heap.extract_min()?;
/// assert_eq!(first.vertex(), 0);
/// assert_eq!(first.parent(), Some(7));
/// assert_eq!(heap.extract_min()?.vertex(), 1);
/// assert_eq!(heap.extract_min()?.vertex(), 2);
/// assert!(heap.is_empty());
/// # Ok::<(), randmst_core::HeapError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct IndexedMinHeap {
    entries: Vec<HeapEntry>,
    len: usize,
}

impl IndexedMinHeap {
    /// Builds a heap from entries supplied in arbitrary order in `O(n)`.
    #[must_use]
    pub fn build(entries: Vec<HeapEntry>) -> Self {
        let len = entries.len();
        let mut heap = Self { entries, len };
        heap.heapify();
        heap
    }

    /// Returns the number of entries still in the heap.
    #[must_use]
    #[rustfmt::skip]
    pub const fn len(&self) -> usize { self.len }

    /// Returns `true` once every entry has been extracted.
    #[must_use]
    #[rustfmt::skip]
    pub const fn is_empty(&self) -> bool { self.len == 0 }

    /// Returns the size of the backing storage fixed at build time.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Returns the entries of the logical heap in position order.
    #[must_use]
    pub fn entries(&self) -> &[HeapEntry] {
        &self.entries[..self.len]
    }

    /// Removes and returns the entry with the smallest distance.
    ///
    /// Ties are resolved arbitrarily.
    ///
    /// # Errors
    /// Returns [`HeapError::Empty`] when no entries remain.
    pub fn extract_min(&mut self) -> Result<HeapEntry, HeapError> {
        if self.len == 0 {
            return Err(HeapError::Empty);
        }
        let last = self.len - 1;
        self.entries.swap(0, last);
        self.len = last;
        self.min_heapify(0);
        Ok(self.entries[last])
    }

    /// Lowers the key at `position` and records the offering parent.
    ///
    /// Ordering is not restored; call [`Self::heapify`] once the batch of
    /// updates is complete.
    ///
    /// # Errors
    /// Returns [`HeapError::PositionOutOfBounds`] when `position >= len` and
    /// [`HeapError::KeyIncrease`] when `distance` exceeds the current key.
    pub fn decrease_key(
        &mut self,
        position: usize,
        distance: f64,
        parent: Option<usize>,
    ) -> Result<(), HeapError> {
        let len = self.len;
        let entry = self
            .entries
            .get_mut(..len)
            .and_then(|live| live.get_mut(position))
            .ok_or(HeapError::PositionOutOfBounds { position, len })?;
        if distance > entry.distance {
            return Err(HeapError::KeyIncrease {
                position,
                current: entry.distance,
                requested: distance,
            });
        }
        entry.distance = distance;
        entry.parent = parent;
        Ok(())
    }

    /// Lowers the key at `position` and sifts the entry towards the root.
    ///
    /// Returns the position the entry settles at. Entries that move during
    /// the sift all come from positions at or before `position`.
    ///
    /// # Errors
    /// Same as [`Self::decrease_key`].
    pub fn decrease_key_and_sift(
        &mut self,
        position: usize,
        distance: f64,
        parent: Option<usize>,
    ) -> Result<usize, HeapError> {
        self.decrease_key(position, distance, parent)?;
        Ok(self.sift_up(position))
    }

    /// Restores the heap property at `index`, assuming both child subtrees
    /// already satisfy it.
    pub fn min_heapify(&mut self, mut index: usize) {
        loop {
            let left = left_of(index);
            let right = right_of(index);
            let mut smallest = index;
            if left < self.len && self.entries[left].distance < self.entries[smallest].distance {
                smallest = left;
            }
            if right < self.len && self.entries[right].distance < self.entries[smallest].distance {
                smallest = right;
            }
            if smallest == index {
                return;
            }
            self.entries.swap(index, smallest);
            index = smallest;
        }
    }

    /// Re-establishes the heap property over the whole logical heap.
    pub fn heapify(&mut self) {
        for index in (0..self.len / 2).rev() {
            self.min_heapify(index);
        }
    }

    /// Checks that every non-root entry is no smaller than its parent.
    #[must_use]
    pub fn satisfies_heap_property(&self) -> bool {
        (1..self.len).all(|index| {
            self.entries[parent_of(index)].distance <= self.entries[index].distance
        })
    }

    fn sift_up(&mut self, mut index: usize) -> usize {
        while index > 0 {
            let parent = parent_of(index);
            if self.entries[parent].distance <= self.entries[index].distance {
                break;
            }
            self.entries.swap(index, parent);
            index = parent;
        }
        index
    }
}
