//! Core traits for sliding-window algorithms
//!
//! Every windowed structure implements the base [`SlidingWindow`] trait, with
//! specialized traits for what can be asked of the window (currently the
//! configured quantile through [`WindowQuantile`]).

/// Error in a user-supplied configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Initial capacity must hold at least one sample
    #[error("initial capacity must be positive, got {found}")]
    InvalidCapacity { found: usize },
    /// Percentile outside the open interval (0, 100)
    #[error("percentile must lie strictly between 0 and 100, got {found}")]
    InvalidPercentile { found: f64 },
    /// Compression precision must be finite and non-negative
    #[error("precision must be finite and non-negative, got {found}")]
    InvalidPrecision { found: f64 },
}

/// Error raised by window operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WindowError {
    /// The window was constructed with an invalid configuration
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// Backing storage could not be allocated
    ///
    /// The window is left exactly as it was before the failing call.
    #[error("unable to allocate storage for {requested} samples")]
    ResourceExhausted { requested: usize },
}

/// Core trait for windows over the most recent samples of a stream
///
/// Samples enter at the leading edge with [`insert`](SlidingWindow::insert)
/// and leave from the trailing edge with [`remove`](SlidingWindow::remove).
pub trait SlidingWindow {
    /// The sample type held by the window
    type Value: Copy;

    /// Append a sample at the leading edge
    ///
    /// Fails only if the window had to grow and allocation failed.
    fn insert(&mut self, value: Self::Value) -> Result<(), WindowError>;

    /// Evict the oldest sample. A no-op on an empty window.
    fn remove(&mut self);

    /// Append a sample and evict the oldest one, keeping the window length fixed
    fn insert_and_remove(&mut self, value: Self::Value) -> Result<(), WindowError>;

    /// Reset to an empty window, keeping the current capacity
    fn clear(&mut self);

    /// Number of samples in the window, null samples included
    fn len(&self) -> usize;

    /// Memory usage in bytes
    fn size_bytes(&self) -> usize;

    /// Check if the window holds no samples
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert every value of a slice in order
    ///
    /// Stops at the first error; samples inserted before it stay in the window.
    fn insert_slice(&mut self, values: &[Self::Value]) -> Result<(), WindowError> {
        for &value in values {
            self.insert(value)?;
        }
        Ok(())
    }

    /// Evict up to `count` of the oldest samples
    fn remove_n(&mut self, count: usize) {
        for _ in 0..count {
            if self.is_empty() {
                break;
            }
            self.remove();
        }
    }

    /// Slide the window over every value of a slice
    fn insert_and_remove_slice(&mut self, values: &[Self::Value]) -> Result<(), WindowError> {
        for &value in values {
            self.insert_and_remove(value)?;
        }
        Ok(())
    }
}

/// Windows that answer one configured quantile in constant time
pub trait WindowQuantile: SlidingWindow {
    /// Current median or percentile, or the null sentinel when the window
    /// holds no non-null sample
    fn current_value(&self) -> Self::Value;

    /// Current median or percentile, `None` when the window holds no
    /// non-null sample
    fn value(&self) -> Option<Self::Value>;

    /// Number of non-null samples in the window
    fn non_null_len(&self) -> usize;
}
