//! Ring-buffer storage for window samples
//!
//! The arena owns every sample value together with the heap position of its
//! slot. The live window is the range `[head, tail)` over the ring; one slot
//! is always left free so that `head == tail` unambiguously means empty.

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::traits::WindowError;

/// Where the sample held in a slot lives in the heap index
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Position {
    /// Slot is outside the live window
    Vacant,
    /// Null sample, kept out of both heaps
    Null,
    /// Index into the lower-partition heap
    Lower(usize),
    /// Index into the upper-partition heap
    Upper(usize),
}

/// Allocate a vector of `len` copies of `value` without aborting on failure
fn try_filled<V: Copy>(len: usize, value: V) -> Result<Vec<V>, WindowError> {
    let mut storage = Vec::new();
    storage
        .try_reserve_exact(len)
        .map_err(|_| WindowError::ResourceExhausted { requested: len })?;
    storage.resize(len, value);
    Ok(storage)
}

/// Circular sample storage with per-slot heap positions
#[derive(Clone, Debug)]
pub(crate) struct SampleArena<T> {
    values: Vec<T>,
    positions: Vec<Position>,
    /// Oldest live slot (trailing cursor)
    head: usize,
    /// Next slot to write (leading cursor)
    tail: usize,
    /// Placeholder written into slots outside the window
    fill: T,
}

impl<T: Copy> SampleArena<T> {
    /// Create an arena with `capacity` slots, every slot holding `fill`
    pub(crate) fn with_capacity(capacity: usize, fill: T) -> Result<Self, WindowError> {
        Ok(Self {
            values: try_filled(capacity, fill)?,
            positions: try_filled(capacity, Position::Vacant)?,
            head: 0,
            tail: 0,
            fill,
        })
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        (self.tail + self.capacity() - self.head) % self.capacity()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Whether the next append would make the cursors collide
    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        (self.tail + 1) % self.capacity() == self.head
    }

    #[inline]
    pub(crate) fn value(&self, slot: usize) -> T {
        self.values[slot]
    }

    #[inline]
    pub(crate) fn position(&self, slot: usize) -> Position {
        self.positions[slot]
    }

    #[inline]
    pub(crate) fn set_position(&mut self, slot: usize, position: Position) {
        self.positions[slot] = position;
    }

    /// Slot holding the oldest live sample
    #[inline]
    pub(crate) fn oldest(&self) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(self.head)
        }
    }

    /// Write a sample at the leading edge and return its slot
    ///
    /// The caller must have grown the arena if it was full. The new slot's
    /// position is left for the caller to assign.
    pub(crate) fn append(&mut self, value: T) -> usize {
        debug_assert!(!self.is_full(), "append into a full arena");
        let slot = self.tail;
        self.values[slot] = value;
        self.tail = (self.tail + 1) % self.capacity();
        slot
    }

    /// Release the oldest slot and return it
    pub(crate) fn evict(&mut self) -> Option<usize> {
        let slot = self.oldest()?;
        self.values[slot] = self.fill;
        self.positions[slot] = Position::Vacant;
        self.head = (self.head + 1) % self.capacity();
        Some(slot)
    }

    /// Map a slot of the current layout to its slot after [`relocate`](Self::relocate)
    #[inline]
    pub(crate) fn rebased(&self, slot: usize) -> usize {
        (slot + self.capacity() - self.head) % self.capacity()
    }

    /// Copy the live window into a new arena of `capacity` slots, starting at slot zero
    ///
    /// `self` is untouched; on allocation failure nothing has changed.
    pub(crate) fn relocate(&self, capacity: usize) -> Result<Self, WindowError> {
        debug_assert!(capacity > self.len());
        let mut grown = Self::with_capacity(capacity, self.fill)?;
        for (offset, slot) in self.slots().enumerate() {
            grown.values[offset] = self.values[slot];
            grown.positions[offset] = self.positions[slot];
        }
        grown.tail = self.len();
        Ok(grown)
    }

    /// Live slots from oldest to newest
    pub(crate) fn slots(&self) -> impl Iterator<Item = usize> + '_ {
        let capacity = self.capacity();
        (0..self.len()).map(move |offset| (self.head + offset) % capacity)
    }

    /// Drop every sample, keeping the capacity
    pub(crate) fn clear(&mut self) {
        for slot in 0..self.capacity() {
            self.values[slot] = self.fill;
            self.positions[slot] = Position::Vacant;
        }
        self.head = 0;
        self.tail = 0;
    }

    pub(crate) fn size_bytes(&self) -> usize {
        self.values.capacity() * core::mem::size_of::<T>()
            + self.positions.capacity() * core::mem::size_of::<Position>()
    }
}
