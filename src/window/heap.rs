//! Two binary heaps of arena slots splitting the window at the percentile cutoff
//!
//! The lower heap is a max-heap over the samples at or below the cutoff; the
//! upper heap is a min-heap over the samples above it. Both store slot ids
//! into a [`SampleArena`], and every move inside a heap is mirrored into the
//! slot's [`Position`] so that a sample can be found again when it is evicted.

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use super::arena::{Position, SampleArena};
use super::sample::Sample;
use crate::traits::WindowError;

/// One of the two partitions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    /// Samples at or below the cutoff, root is the maximum
    Lower,
    /// Samples above the cutoff, root is the minimum
    Upper,
}

impl Side {
    #[inline]
    fn other(self) -> Side {
        match self {
            Side::Lower => Side::Upper,
            Side::Upper => Side::Lower,
        }
    }

    #[inline]
    fn position(self, index: usize) -> Position {
        match self {
            Side::Lower => Position::Lower(index),
            Side::Upper => Position::Upper(index),
        }
    }

    /// Whether `a` belongs strictly closer to the root than `b`
    #[inline]
    fn outranks<T: Sample>(self, a: T, b: T) -> bool {
        match self {
            Side::Lower => a > b,
            Side::Upper => a < b,
        }
    }
}

/// Lower and upper partition heaps
#[derive(Debug, Default)]
pub(crate) struct DualHeap {
    lower: Vec<usize>,
    upper: Vec<usize>,
}

/// Clones keep the reserved capacity so that `push` never reallocates
impl Clone for DualHeap {
    fn clone(&self) -> Self {
        fn with_reservation(heap: &Vec<usize>) -> Vec<usize> {
            let mut cloned = Vec::with_capacity(heap.capacity());
            cloned.extend_from_slice(heap);
            cloned
        }
        Self {
            lower: with_reservation(&self.lower),
            upper: with_reservation(&self.upper),
        }
    }
}

impl DualHeap {
    /// Create empty heaps able to index `capacity` slots without reallocating
    pub(crate) fn with_capacity(capacity: usize) -> Result<Self, WindowError> {
        let mut heaps = Self::default();
        heaps.reserve(capacity)?;
        Ok(heaps)
    }

    /// Make room for `capacity` entries in each heap
    ///
    /// Contents are untouched whether or not allocation succeeds.
    pub(crate) fn reserve(&mut self, capacity: usize) -> Result<(), WindowError> {
        for heap in [&mut self.lower, &mut self.upper] {
            let additional = capacity.saturating_sub(heap.len());
            heap.try_reserve_exact(additional)
                .map_err(|_| WindowError::ResourceExhausted {
                    requested: capacity,
                })?;
        }
        Ok(())
    }

    #[inline]
    fn heap(&self, side: Side) -> &Vec<usize> {
        match side {
            Side::Lower => &self.lower,
            Side::Upper => &self.upper,
        }
    }

    #[inline]
    fn heap_mut(&mut self, side: Side) -> &mut Vec<usize> {
        match side {
            Side::Lower => &mut self.lower,
            Side::Upper => &mut self.upper,
        }
    }

    #[inline]
    pub(crate) fn len(&self, side: Side) -> usize {
        self.heap(side).len()
    }

    /// Slot at the root of a heap
    #[inline]
    pub(crate) fn top(&self, side: Side) -> Option<usize> {
        self.heap(side).first().copied()
    }

    /// Value at the root of a heap
    #[inline]
    pub(crate) fn top_value<T: Sample>(&self, arena: &SampleArena<T>, side: Side) -> Option<T> {
        self.top(side).map(|slot| arena.value(slot))
    }

    /// Entries each heap can hold without reallocating
    #[cfg(test)]
    pub(crate) fn reserved(&self) -> usize {
        self.lower.capacity().min(self.upper.capacity())
    }

    /// Slots held by a heap, in heap order
    #[cfg(test)]
    pub(crate) fn entries(&self, side: Side) -> &[usize] {
        self.heap(side)
    }

    pub(crate) fn clear(&mut self) {
        self.lower.clear();
        self.upper.clear();
    }

    /// Rewrite every slot id through `rebase` after the arena was relocated
    pub(crate) fn rebase(&mut self, rebase: impl Fn(usize) -> usize) {
        for slot in self.lower.iter_mut().chain(self.upper.iter_mut()) {
            *slot = rebase(*slot);
        }
    }

    pub(crate) fn size_bytes(&self) -> usize {
        (self.lower.capacity() + self.upper.capacity()) * core::mem::size_of::<usize>()
    }

    /// Store `slot` at `index` and record the position in the arena
    #[inline]
    fn place<T: Sample>(&mut self, arena: &mut SampleArena<T>, side: Side, index: usize, slot: usize) {
        self.heap_mut(side)[index] = slot;
        arena.set_position(slot, side.position(index));
    }

    /// Swap two heap entries, keeping positions in sync
    fn swap<T: Sample>(&mut self, arena: &mut SampleArena<T>, side: Side, i: usize, j: usize) {
        let heap = self.heap_mut(side);
        heap.swap(i, j);
        let (a, b) = (heap[i], heap[j]);
        arena.set_position(a, side.position(i));
        arena.set_position(b, side.position(j));
    }

    /// Move the entry at `index` toward the root while it outranks its parent
    ///
    /// Returns the entry's final index.
    fn sift_up<T: Sample>(&mut self, arena: &mut SampleArena<T>, side: Side, mut index: usize) -> usize {
        while index > 0 {
            let parent = (index - 1) / 2;
            let heap = self.heap(side);
            if !side.outranks(arena.value(heap[index]), arena.value(heap[parent])) {
                break;
            }
            self.swap(arena, side, index, parent);
            index = parent;
        }
        index
    }

    /// Move the entry at `index` toward the leaves while a child outranks it
    fn sift_down<T: Sample>(&mut self, arena: &mut SampleArena<T>, side: Side, mut index: usize) {
        let len = self.len(side);
        loop {
            let left = 2 * index + 1;
            if left >= len {
                break;
            }
            let heap = self.heap(side);
            let right = left + 1;
            let mut child = left;
            if right < len && side.outranks(arena.value(heap[right]), arena.value(heap[left])) {
                child = right;
            }
            if !side.outranks(arena.value(heap[child]), arena.value(heap[index])) {
                break;
            }
            self.swap(arena, side, index, child);
            index = child;
        }
    }

    /// Restore heap order around an entry whose value changed
    fn resift<T: Sample>(&mut self, arena: &mut SampleArena<T>, side: Side, index: usize) {
        if self.sift_up(arena, side, index) == index {
            self.sift_down(arena, side, index);
        }
    }

    /// Add a slot to a heap
    pub(crate) fn push<T: Sample>(&mut self, arena: &mut SampleArena<T>, side: Side, slot: usize) {
        let index = self.len(side);
        self.heap_mut(side).push(slot);
        arena.set_position(slot, side.position(index));
        self.sift_up(arena, side, index);
    }

    /// Remove the entry at `index` from a heap and return its slot
    ///
    /// The tail entry takes its place and is sifted in whichever direction
    /// restores order. The removed slot's position is left for the caller to
    /// reassign.
    pub(crate) fn remove_at<T: Sample>(
        &mut self,
        arena: &mut SampleArena<T>,
        side: Side,
        index: usize,
    ) -> usize {
        let heap = self.heap_mut(side);
        let slot = heap.swap_remove(index);
        if index < heap.len() {
            let moved = heap[index];
            arena.set_position(moved, side.position(index));
            self.resift(arena, side, index);
        }
        slot
    }

    /// Move the root of `from` into the other heap
    ///
    /// Returns `false` if `from` was empty.
    pub(crate) fn migrate<T: Sample>(&mut self, arena: &mut SampleArena<T>, from: Side) -> bool {
        if self.len(from) == 0 {
            return false;
        }
        let slot = self.remove_at(arena, from, 0);
        self.push(arena, from.other(), slot);
        true
    }

    /// Place a new sample when the partition on `grow` must gain one entry
    ///
    /// If the sample belongs to the other partition, that partition's root
    /// crosses over first and the sample takes its place. Ties stay on the
    /// side being grown.
    pub(crate) fn insert<T: Sample>(&mut self, arena: &mut SampleArena<T>, grow: Side, slot: usize) {
        let value = arena.value(slot);
        let belongs = match self.top_value(arena, grow.other()) {
            Some(boundary) => !grow.other().outranks(boundary, value),
            None => true,
        };
        if belongs {
            self.push(arena, grow, slot);
        } else {
            self.migrate(arena, grow.other());
            self.push(arena, grow.other(), slot);
        }
    }

    /// Replace the entry at `index` on `side` with a new slot in one pass
    ///
    /// The partition sizes are unchanged. When the new sample belongs to the
    /// other partition, that partition's root takes over `index` and the new
    /// sample replaces the root. Ties stay on `side`.
    pub(crate) fn replace<T: Sample>(
        &mut self,
        arena: &mut SampleArena<T>,
        side: Side,
        index: usize,
        slot: usize,
    ) {
        let value = arena.value(slot);
        let other = side.other();
        let crosses = match self.top_value(arena, other) {
            Some(boundary) => side.outranks(value, boundary),
            None => false,
        };
        if !crosses {
            self.place(arena, side, index, slot);
            self.resift(arena, side, index);
            return;
        }
        // `crosses` implies the other heap has a root
        let root = self.heap(other)[0];
        self.place(arena, side, index, root);
        self.sift_up(arena, side, index);
        self.place(arena, other, 0, slot);
        self.sift_down(arena, other, 0);
    }
}
