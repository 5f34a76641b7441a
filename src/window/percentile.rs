//! Moving percentile over a sliding window
//!
//! Maintains one configured percentile (or the median) over the most recent
//! samples of a stream. Samples are kept in a ring-buffer arena; two heaps of
//! slot ids split the window at the percentile cutoff:
//!
//! - the lower heap (max at the root) holds the `n - floor(n * (100 - p) / 100)`
//!   smallest non-null samples
//! - the upper heap (min at the root) holds the rest
//!
//! Insert and evict are `O(log n)`, the query reads a heap root in `O(1)`.
//!
//! # Thread Safety
//!
//! `MovingPercentile` has no interior synchronization. For concurrent use,
//! wrap it in `Arc<Mutex<_>>`; queries must not overlap with mutations.

use super::arena::{Position, SampleArena};
use super::config::{Mode, WindowConfig};
use super::heap::{DualHeap, Side};
use super::sample::Sample;
use crate::math;
use crate::traits::{SlidingWindow, WindowError, WindowQuantile};

/// Sliding-window median / percentile tracker
///
/// A designated null sentinel marks "no data". Null samples (and NaN) take a
/// place in the window but are left out of the percentile; when the window
/// holds only nulls the query returns the sentinel.
///
/// # Example
///
/// ```
/// use windowstats::window::MovingPercentile;
/// use windowstats::traits::{SlidingWindow, WindowQuantile};
///
/// let mut median = MovingPercentile::median(f64::NAN).unwrap();
/// median.insert_slice(&[5.0, 1.0, 4.0, 2.0, 3.0]).unwrap();
/// assert_eq!(median.current_value(), 3.0);
///
/// // Keep the window at five samples
/// median.insert_and_remove(10.0).unwrap();
/// assert_eq!(median.len(), 5);
/// assert_eq!(median.current_value(), 3.0);
/// ```
#[derive(Clone, Debug)]
pub struct MovingPercentile<T: Sample> {
    /// Sample values and their heap positions
    arena: SampleArena<T>,
    /// Lower and upper partitions
    heaps: DualHeap,
    /// Sentinel marking missing samples
    null: T,
    /// Reported statistic
    mode: Mode,
    /// Null samples currently in the window
    null_count: usize,
}

impl<T: Sample> MovingPercentile<T> {
    /// Create a moving percentile
    ///
    /// # Arguments
    ///
    /// * `null` - Sentinel meaning "no data", returned when nothing can be reported
    /// * `mode` - Median or a percentile strictly between 0 and 100
    /// * `initial_capacity` - Arena slots allocated up front, at least 1
    ///
    /// # Errors
    ///
    /// [`WindowError::Config`] for a zero capacity or an out-of-range
    /// percentile, [`WindowError::ResourceExhausted`] if the initial
    /// allocation fails.
    pub fn new(null: T, mode: Mode, initial_capacity: usize) -> Result<Self, WindowError> {
        Self::with_config(
            null,
            WindowConfig {
                mode,
                initial_capacity,
            },
        )
    }

    /// Create a moving median with the default capacity
    pub fn median(null: T) -> Result<Self, WindowError> {
        Self::with_config(null, WindowConfig::median())
    }

    /// Create a moving percentile with the default capacity
    pub fn with_percentile(null: T, percentile: f64) -> Result<Self, WindowError> {
        Self::with_config(null, WindowConfig::percentile(percentile))
    }

    /// Create a moving percentile from a configuration
    pub fn with_config(null: T, config: WindowConfig) -> Result<Self, WindowError> {
        config.validate()?;
        let arena = SampleArena::with_capacity(config.initial_capacity, null)?;
        let heaps = DualHeap::with_capacity(config.initial_capacity)?;
        tracing::trace!(
            capacity = config.initial_capacity,
            percentile = config.mode.percentile(),
            median = config.mode.is_median(),
            "created moving percentile"
        );
        Ok(Self {
            arena,
            heaps,
            null,
            mode: config.mode,
            null_count: 0,
        })
    }

    /// Reported statistic
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Tracked percentile (50 in median mode)
    pub fn percentile(&self) -> f64 {
        self.mode.percentile()
    }

    /// The null sentinel
    pub fn null_value(&self) -> T {
        self.null
    }

    /// Arena slots currently allocated
    ///
    /// Always greater than [`len`](SlidingWindow::len); doubles when the
    /// window outgrows it.
    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    /// Null samples in the window
    pub fn null_count(&self) -> usize {
        self.null_count
    }

    /// Samples in the lower partition (at or below the cutoff)
    pub fn lower_partition_size(&self) -> usize {
        self.heaps.len(Side::Lower)
    }

    /// Samples in the upper partition (above the cutoff)
    pub fn upper_partition_size(&self) -> usize {
        self.heaps.len(Side::Upper)
    }

    /// Largest sample of the lower partition, or the null sentinel
    pub fn lower_partition_top(&self) -> T {
        self.heaps
            .top_value(&self.arena, Side::Lower)
            .unwrap_or(self.null)
    }

    /// Smallest sample of the upper partition, or the null sentinel
    pub fn upper_partition_top(&self) -> T {
        self.heaps
            .top_value(&self.arena, Side::Upper)
            .unwrap_or(self.null)
    }

    /// Samples in the window from oldest to newest, nulls included
    pub fn window(&self) -> impl Iterator<Item = T> + '_ {
        self.arena.slots().map(move |slot| self.arena.value(slot))
    }

    /// Move one sample across the partitions if their sizes drifted from the
    /// target split
    ///
    /// Every public operation already leaves the partitions balanced, so this
    /// only reports `true` right after an external size change; calling it
    /// again is a no-op.
    pub fn rebalance(&mut self) -> bool {
        let target = self.target_lower_size(self.non_null_len());
        let lower = self.heaps.len(Side::Lower);
        if lower > target {
            self.heaps.migrate(&mut self.arena, Side::Lower)
        } else if lower < target {
            self.heaps.migrate(&mut self.arena, Side::Upper)
        } else {
            false
        }
    }

    #[inline]
    fn is_null(&self, value: T) -> bool {
        value == self.null || value.is_unordered()
    }

    /// Required size of the lower partition for `n` non-null samples
    ///
    /// The upper partition takes `floor(n * (100 - p) / 100)` samples and the
    /// lower partition the rest. For any `p > 0` that share is below one, but
    /// `100.0 - p` rounds to `100.0` when `p` is tiny, so the lower partition
    /// is clamped to keep at least one sample whenever `n > 0`.
    fn target_lower_size(&self, n: usize) -> usize {
        let share = 100.0 - self.mode.percentile();
        let upper = math::floor(n as f64 * share / 100.0) as usize;
        n - upper.min(n.saturating_sub(1))
    }

    /// Double the arena if the next append would fill it
    fn ensure_room(&mut self) -> Result<(), WindowError> {
        if !self.arena.is_full() {
            return Ok(());
        }
        let grown_capacity = doubled(self.arena.capacity())?;
        self.grow_to(grown_capacity)
    }

    /// Move the window into an arena of `grown_capacity` slots
    ///
    /// New storage is allocated before anything is modified, so a failure
    /// leaves the window untouched.
    fn grow_to(&mut self, grown_capacity: usize) -> Result<(), WindowError> {
        let capacity = self.arena.capacity();
        let grown = match self.arena.relocate(grown_capacity) {
            Ok(grown) => grown,
            Err(err) => {
                tracing::warn!(capacity, grown_capacity, "failed to grow sample arena");
                return Err(err);
            }
        };
        if let Err(err) = self.heaps.reserve(grown_capacity) {
            tracing::warn!(capacity, grown_capacity, "failed to grow heap index");
            return Err(err);
        }

        let arena = &self.arena;
        self.heaps.rebase(|slot| arena.rebased(slot));
        self.arena = grown;
        tracing::debug!(
            capacity,
            grown_capacity,
            len = self.arena.len(),
            "grew sample arena"
        );
        Ok(())
    }

    /// Check every structural invariant
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        for side in [Side::Lower, Side::Upper] {
            for (index, &slot) in self.heaps.entries(side).iter().enumerate() {
                let expected = match side {
                    Side::Lower => Position::Lower(index),
                    Side::Upper => Position::Upper(index),
                };
                assert_eq!(self.arena.position(slot), expected, "position of slot {}", slot);
                if index > 0 {
                    let parent = self.arena.value(self.heaps.entries(side)[(index - 1) / 2]);
                    let value = self.arena.value(slot);
                    match side {
                        Side::Lower => assert!(parent >= value, "lower heap order"),
                        Side::Upper => assert!(parent <= value, "upper heap order"),
                    }
                }
            }
        }
        let nulls = self
            .arena
            .slots()
            .filter(|&slot| self.arena.position(slot) == Position::Null)
            .count();
        assert_eq!(nulls, self.null_count);
        assert_eq!(
            self.heaps.len(Side::Lower) + self.heaps.len(Side::Upper) + nulls,
            self.len()
        );
        if let (Some(lower), Some(upper)) = (
            self.heaps.top_value(&self.arena, Side::Lower),
            self.heaps.top_value(&self.arena, Side::Upper),
        ) {
            assert!(lower <= upper, "partition order: {:?} > {:?}", lower, upper);
        }
        assert_eq!(
            self.heaps.len(Side::Lower),
            self.target_lower_size(self.non_null_len())
        );
        assert!(self.capacity() > self.len());
    }
}

impl<T: Sample> SlidingWindow for MovingPercentile<T> {
    type Value = T;

    fn insert(&mut self, value: T) -> Result<(), WindowError> {
        self.ensure_room()?;
        let slot = self.arena.append(value);
        if self.is_null(value) {
            self.arena.set_position(slot, Position::Null);
            self.null_count += 1;
            return Ok(());
        }

        // Target accounts for the sample being inserted
        let target = self.target_lower_size(self.non_null_len());
        let grow = if target > self.heaps.len(Side::Lower) {
            Side::Lower
        } else {
            Side::Upper
        };
        self.heaps.insert(&mut self.arena, grow, slot);
        Ok(())
    }

    fn remove(&mut self) {
        let Some(slot) = self.arena.oldest() else {
            return;
        };
        match self.arena.position(slot) {
            Position::Null => self.null_count -= 1,
            Position::Lower(index) => {
                self.heaps.remove_at(&mut self.arena, Side::Lower, index);
            }
            Position::Upper(index) => {
                self.heaps.remove_at(&mut self.arena, Side::Upper, index);
            }
            Position::Vacant => debug_assert!(false, "live slot {} is vacant", slot),
        }
        self.arena.evict();
        self.rebalance();
    }

    /// Append a sample and evict the oldest one
    ///
    /// When neither sample is null the new sample takes over the evicted
    /// sample's heap entry in a single pass; otherwise this is `insert`
    /// followed by `remove`. A no-op on an empty window.
    fn insert_and_remove(&mut self, value: T) -> Result<(), WindowError> {
        let Some(oldest) = self.arena.oldest() else {
            return Ok(());
        };
        let entry = match self.arena.position(oldest) {
            Position::Lower(index) if !self.is_null(value) => Some((Side::Lower, index)),
            Position::Upper(index) if !self.is_null(value) => Some((Side::Upper, index)),
            _ => None,
        };
        let Some((side, index)) = entry else {
            self.insert(value)?;
            self.remove();
            return Ok(());
        };

        // Evicting first frees a slot, so the append never needs to grow
        self.arena.evict();
        let slot = self.arena.append(value);
        self.heaps.replace(&mut self.arena, side, index, slot);
        Ok(())
    }

    fn clear(&mut self) {
        self.arena.clear();
        self.heaps.clear();
        self.null_count = 0;
    }

    fn len(&self) -> usize {
        self.arena.len()
    }

    fn size_bytes(&self) -> usize {
        core::mem::size_of::<Self>() + self.arena.size_bytes() + self.heaps.size_bytes()
    }
}

impl<T: Sample> WindowQuantile for MovingPercentile<T> {
    fn current_value(&self) -> T {
        self.value().unwrap_or(self.null)
    }

    fn value(&self) -> Option<T> {
        let lower = self.heaps.top_value(&self.arena, Side::Lower)?;
        if self.mode.is_median() && self.non_null_len() % 2 == 0 {
            let upper = self.heaps.top_value(&self.arena, Side::Upper);
            return Some(upper.map_or(lower, |upper| T::average(lower, upper)));
        }
        Some(lower)
    }

    fn non_null_len(&self) -> usize {
        self.arena.len() - self.null_count
    }
}

// ============================================================================
// Tests
// ============================================================================

fn doubled(capacity: usize) -> Result<usize, WindowError> {
    capacity
        .checked_mul(2)
        .ok_or(WindowError::ResourceExhausted {
            requested: usize::MAX,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ConfigError;

    fn median(capacity: usize) -> MovingPercentile<f64> {
        MovingPercentile::new(-1.0, Mode::Median, capacity).unwrap()
    }

    // ---- Construction ----

    #[test]
    fn test_new_empty() {
        let window = median(16);
        assert_eq!(window.len(), 0);
        assert!(window.is_empty());
        assert_eq!(window.capacity(), 16);
        assert_eq!(window.current_value(), -1.0);
        assert_eq!(window.value(), None);
        assert_eq!(window.lower_partition_top(), -1.0);
        assert_eq!(window.upper_partition_top(), -1.0);
        window.assert_invariants();
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let err = MovingPercentile::new(0i32, Mode::Median, 0).unwrap_err();
        assert_eq!(
            err,
            WindowError::Config(ConfigError::InvalidCapacity { found: 0 })
        );
    }

    #[test]
    fn test_rejects_bad_percentile() {
        for p in [0.0, 100.0, -1.0, 101.0, f64::NAN] {
            let result = MovingPercentile::new(0i32, Mode::Percentile(p), 8);
            assert!(
                matches!(
                    result,
                    Err(WindowError::Config(ConfigError::InvalidPercentile { .. }))
                ),
                "p={}",
                p
            );
        }
    }

    #[test]
    fn test_median_mode_reports_fifty() {
        let window = MovingPercentile::median(0u32).unwrap();
        assert_eq!(window.percentile(), 50.0);
        assert_eq!(window.mode(), Mode::Median);
        assert_eq!(window.null_value(), 0);
    }

    // ---- Median ----

    #[test]
    fn test_median_odd() {
        let mut window = median(16);
        window.insert_slice(&[5.0, 1.0, 4.0, 2.0, 3.0]).unwrap();
        assert_eq!(window.current_value(), 3.0);
        assert_eq!(window.lower_partition_size(), 3);
        assert_eq!(window.upper_partition_size(), 2);
        window.assert_invariants();
    }

    #[test]
    fn test_median_even_averages() {
        let mut window = median(16);
        window.insert_slice(&[5.0, 1.0, 4.0, 2.0]).unwrap();
        assert_eq!(window.current_value(), 3.0);
        assert_eq!(window.lower_partition_top(), 2.0);
        assert_eq!(window.upper_partition_top(), 4.0);
        window.assert_invariants();
    }

    #[test]
    fn test_median_single() {
        let mut window = median(4);
        window.insert(7.0).unwrap();
        assert_eq!(window.current_value(), 7.0);
        assert_eq!(window.lower_partition_size(), 1);
        assert_eq!(window.upper_partition_size(), 0);
    }

    #[test]
    fn test_integer_median_truncates() {
        let mut window = MovingPercentile::new(i64::MIN, Mode::Median, 8).unwrap();
        window.insert_slice(&[1, 2]).unwrap();
        assert_eq!(window.current_value(), 1);
        window.insert_slice(&[-7, -2]).unwrap();
        // middle pair is (-2, 1)
        assert_eq!(window.current_value(), 0);
    }

    // ---- Percentile ----

    #[test]
    fn test_percentile_90() {
        let mut window = MovingPercentile::new(0i32, Mode::Percentile(90.0), 100).unwrap();
        for i in 1..=100 {
            window.insert(i).unwrap();
            window.assert_invariants();
        }
        assert_eq!(window.current_value(), 90);
        assert_eq!(window.lower_partition_size(), 90);
        assert_eq!(window.upper_partition_size(), 10);
        assert_eq!(window.upper_partition_top(), 91);

        window.remove_n(10);
        window.assert_invariants();
        // window is 11..=100: 9 above the cutoff
        assert_eq!(window.current_value(), 91);
        assert_eq!(window.upper_partition_size(), 9);
    }

    #[test]
    fn test_percentile_is_not_averaged() {
        let mut window = MovingPercentile::new(0.0, Mode::Percentile(50.0), 8).unwrap();
        window.insert_slice(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(window.current_value(), 2.0);
    }

    #[test]
    fn test_low_percentile() {
        let mut window = MovingPercentile::new(0i32, Mode::Percentile(10.0), 8).unwrap();
        window.insert_slice(&[50, 10, 40, 20, 30]).unwrap();
        // 4 of 5 samples sit above the cutoff
        assert_eq!(window.upper_partition_size(), 4);
        assert_eq!(window.current_value(), 10);
        window.assert_invariants();
    }

    // ---- Remove ----

    #[test]
    fn test_remove_empty_is_noop() {
        let mut window = median(4);
        window.remove();
        window.remove_n(5);
        assert!(window.is_empty());
        window.assert_invariants();
    }

    #[test]
    fn test_remove_oldest_first() {
        let mut window = median(8);
        window.insert_slice(&[100.0, 1.0, 2.0, 3.0]).unwrap();
        window.remove();
        assert_eq!(window.window().collect::<Vec<_>>(), vec![1.0, 2.0, 3.0]);
        assert_eq!(window.current_value(), 2.0);
        window.assert_invariants();
    }

    #[test]
    fn test_round_trip() {
        let mut window = median(4);
        let values: Vec<f64> = (0..50).map(|i| ((i * 37) % 11) as f64).collect();
        window.insert_slice(&values).unwrap();
        window.insert(-1.0).unwrap();
        window.remove_n(51);
        assert_eq!(window.len(), 0);
        assert_eq!(window.null_count(), 0);
        assert_eq!(window.lower_partition_size(), 0);
        assert_eq!(window.upper_partition_size(), 0);
        window.assert_invariants();
    }

    // ---- Sliding window ----

    #[test]
    fn test_sliding_median() {
        let mut window = median(3);
        let stream = [1.0, 2.0, 3.0, 4.0, 5.0];
        window.insert_slice(&stream[..3]).unwrap();
        let mut medians = vec![window.current_value()];
        for &value in &stream[3..] {
            window.insert_and_remove(value).unwrap();
            window.assert_invariants();
            medians.push(window.current_value());
        }
        assert_eq!(medians, vec![2.0, 3.0, 4.0]);
        assert_eq!(window.len(), 3);
    }

    #[test]
    fn test_insert_and_remove_empty_is_noop() {
        let mut window = median(4);
        window.insert_and_remove(1.0).unwrap();
        assert!(window.is_empty());
    }

    #[test]
    fn test_insert_and_remove_crosses_partitions() {
        let mut window = median(8);
        window.insert_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        // evict 1 from the lower heap, 9 belongs in the upper heap
        window.insert_and_remove(9.0).unwrap();
        window.assert_invariants();
        assert_eq!(window.current_value(), 4.0);
        // evict 2 from the lower heap, 0 stays below
        window.insert_and_remove(0.0).unwrap();
        window.assert_invariants();
        assert_eq!(window.current_value(), 4.0);
        // evict 3 and insert a tie with the lower root
        window.insert_and_remove(4.0).unwrap();
        window.assert_invariants();
        assert_eq!(window.window().collect::<Vec<_>>(), vec![4.0, 5.0, 9.0, 0.0, 4.0]);
        assert_eq!(window.current_value(), 4.0);
    }

    #[test]
    fn test_fused_matches_sequential() {
        let mut fused = MovingPercentile::new(-1i32, Mode::Percentile(75.0), 4).unwrap();
        let mut sequential = fused.clone();
        let seed: Vec<i32> = (0..20).map(|i| (i * 7919) % 101).collect();
        fused.insert_slice(&seed).unwrap();
        sequential.insert_slice(&seed).unwrap();

        for i in 0..200 {
            let value = (i * 104_729 + 13) % 97;
            fused.insert_and_remove(value).unwrap();
            sequential.insert(value).unwrap();
            sequential.remove();
            fused.assert_invariants();
            assert_eq!(fused.current_value(), sequential.current_value(), "step {}", i);
            assert_eq!(fused.lower_partition_size(), sequential.lower_partition_size());
        }
    }

    #[test]
    fn test_clone_keeps_heap_reservation() {
        let mut window = median(64);
        window.insert_slice(&[3.0, 1.0, 2.0]).unwrap();
        let cloned = window.clone();
        assert!(
            cloned.heaps.reserved() >= cloned.capacity(),
            "reserved {} capacity {}",
            cloned.heaps.reserved(),
            cloned.capacity()
        );
        cloned.assert_invariants();
        assert!(cloned.window().eq(window.window()));
    }

    // ---- Growth failure ----

    fn snapshot(window: &MovingPercentile<f64>) -> (usize, usize, usize, usize, Vec<f64>, f64) {
        (
            window.len(),
            window.capacity(),
            window.lower_partition_size(),
            window.upper_partition_size(),
            window.window().collect(),
            window.current_value(),
        )
    }

    #[test]
    fn test_failed_growth_leaves_window_intact() {
        let mut window = median(4);
        window.insert_slice(&[-1.0, 7.0, 3.0]).unwrap();
        window.remove();
        window.insert(5.0).unwrap();
        let before = snapshot(&window);

        let err = window.grow_to(usize::MAX).unwrap_err();
        assert_eq!(
            err,
            WindowError::ResourceExhausted {
                requested: usize::MAX
            }
        );
        window.assert_invariants();
        assert_eq!(snapshot(&window), before);

        // Still usable afterwards
        window.insert(9.0).unwrap();
        window.assert_invariants();
        assert_eq!(window.window().collect::<Vec<_>>(), vec![7.0, 3.0, 5.0, 9.0]);
        assert_eq!(window.current_value(), 6.0);
    }

    #[test]
    fn test_failed_heap_reserve_leaves_window_intact() {
        let mut window = median(8);
        window.insert_slice(&[4.0, 8.0, 1.0]).unwrap();
        let before = snapshot(&window);

        assert!(window.heaps.reserve(usize::MAX).is_err());
        window.assert_invariants();
        assert_eq!(snapshot(&window), before);
    }

    #[test]
    fn test_doubling_overflow() {
        assert_eq!(doubled(8).unwrap(), 16);
        assert_eq!(
            doubled(usize::MAX / 2 + 1).unwrap_err(),
            WindowError::ResourceExhausted {
                requested: usize::MAX
            }
        );
    }

    #[test]
    fn test_tiny_percentile_keeps_one_lower() {
        let mut window = MovingPercentile::new(0i32, Mode::Percentile(1e-20), 8).unwrap();
        window.insert_slice(&[50, 10, 40, 20, 30]).unwrap();
        window.assert_invariants();
        assert_eq!(window.lower_partition_size(), 1);
        assert_eq!(window.upper_partition_size(), 4);
        assert_eq!(window.current_value(), 10);
    }

    // ---- Nulls ----

    #[test]
    fn test_nulls_take_a_slot() {
        let mut window = median(8);
        window.insert_slice(&[-1.0, 4.0, -1.0, 2.0]).unwrap();
        assert_eq!(window.len(), 4);
        assert_eq!(window.null_count(), 2);
        assert_eq!(window.non_null_len(), 2);
        assert_eq!(window.current_value(), 3.0);
        assert_eq!(window.lower_partition_size() + window.upper_partition_size(), 2);
        window.assert_invariants();

        window.remove();
        assert_eq!(window.null_count(), 1);
        assert_eq!(window.current_value(), 3.0);
        window.assert_invariants();
    }

    #[test]
    fn test_all_null_returns_sentinel() {
        let mut window = median(4);
        window.insert_slice(&[-1.0, -1.0, -1.0]).unwrap();
        assert_eq!(window.len(), 3);
        assert_eq!(window.current_value(), -1.0);
        assert_eq!(window.value(), None);
    }

    #[test]
    fn test_nan_is_null() {
        let mut window = MovingPercentile::median(f64::NAN).unwrap();
        assert!(window.current_value().is_nan());
        window.insert_slice(&[f64::NAN, 3.0, f64::NAN]).unwrap();
        assert_eq!(window.null_count(), 2);
        assert_eq!(window.current_value(), 3.0);
        window.assert_invariants();
    }

    #[test]
    fn test_insert_and_remove_with_nulls() {
        let mut window = median(4);
        window.insert_slice(&[-1.0, 5.0, 6.0]).unwrap();
        // evicted sample is null: falls back to insert + remove
        window.insert_and_remove(7.0).unwrap();
        assert_eq!(window.null_count(), 0);
        assert_eq!(window.current_value(), 6.0);
        // new sample is null
        window.insert_and_remove(-1.0).unwrap();
        assert_eq!(window.null_count(), 1);
        assert_eq!(window.current_value(), 6.5);
        window.assert_invariants();
    }

    // ---- Capacity ----

    #[test]
    fn test_growth_keeps_window() {
        let mut window = median(1);
        let values: Vec<f64> = (0..100).map(|i| ((i * 31) % 17) as f64).collect();
        for (i, &value) in values.iter().enumerate() {
            window.insert(value).unwrap();
            window.assert_invariants();
            assert!(window.capacity() > i + 1);
        }
        assert_eq!(window.capacity(), 128);
        assert_eq!(window.window().collect::<Vec<_>>(), values);
    }

    #[test]
    fn test_growth_after_wraparound() {
        let mut window = median(4);
        window.insert_slice(&[1.0, 2.0, 3.0]).unwrap();
        window.remove_n(2);
        // cursors now wrap around the ring before the arena fills
        window.insert_slice(&[4.0, 5.0, 6.0, 7.0]).unwrap();
        window.assert_invariants();
        assert_eq!(
            window.window().collect::<Vec<_>>(),
            vec![3.0, 4.0, 5.0, 6.0, 7.0]
        );
        assert_eq!(window.current_value(), 5.0);
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut window = median(2);
        window.insert_slice(&[1.0, 2.0, 3.0, -1.0]).unwrap();
        let capacity = window.capacity();
        window.clear();
        assert!(window.is_empty());
        assert_eq!(window.null_count(), 0);
        assert_eq!(window.capacity(), capacity);
        assert_eq!(window.current_value(), -1.0);
        window.insert(8.0).unwrap();
        assert_eq!(window.current_value(), 8.0);
        window.assert_invariants();
    }

    // ---- Rebalance ----

    #[test]
    fn test_rebalance_is_idempotent() {
        let mut window = MovingPercentile::new(0i32, Mode::Percentile(30.0), 4).unwrap();
        for i in 1..=25 {
            window.insert(i * 3 % 11).unwrap();
            assert!(!window.rebalance());
            assert!(!window.rebalance());
        }
        window.remove_n(7);
        assert!(!window.rebalance());
    }

    #[test]
    fn test_rebalance_restores_split() {
        let mut window = median(8);
        window.insert_slice(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        // push the split out of shape by hand
        window.heaps.migrate(&mut window.arena, Side::Upper);
        assert_eq!(window.lower_partition_size(), 3);
        assert!(window.rebalance());
        assert!(!window.rebalance());
        window.assert_invariants();
        assert_eq!(window.current_value(), 2.5);
    }

    #[test]
    fn test_size_bytes_grows() {
        let mut window = median(2);
        let before = window.size_bytes();
        window.insert_slice(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!(window.size_bytes() > before);
    }
}
