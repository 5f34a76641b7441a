//! Construction parameters for the moving percentile

use crate::traits::ConfigError;

/// Initial number of arena slots when none is given
pub const DEFAULT_INITIAL_CAPACITY: usize = 1024;

/// Which statistic the window reports
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Mode {
    /// Median, averaging the two middle samples of an even-sized window
    Median,
    /// The given percentile, strictly between 0 and 100
    Percentile(f64),
}

impl Mode {
    /// The percentile tracked by this mode (50 for the median)
    pub fn percentile(&self) -> f64 {
        match *self {
            Mode::Median => 50.0,
            Mode::Percentile(p) => p,
        }
    }

    /// Whether this mode reports the median
    pub fn is_median(&self) -> bool {
        matches!(self, Mode::Median)
    }
}

/// Configuration of a [`MovingPercentile`](super::MovingPercentile)
///
/// # Example
///
/// ```
/// use windowstats::window::{Mode, WindowConfig};
///
/// let config = WindowConfig::percentile(95.0).with_initial_capacity(256);
/// assert_eq!(config.mode, Mode::Percentile(95.0));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowConfig {
    /// Statistic to report
    pub mode: Mode,
    /// Arena slots allocated up front; the arena doubles when it fills
    pub initial_capacity: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::median()
    }
}

impl WindowConfig {
    /// Median mode with the default initial capacity
    pub fn median() -> Self {
        Self {
            mode: Mode::Median,
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
        }
    }

    /// Percentile mode with the default initial capacity
    pub fn percentile(percentile: f64) -> Self {
        Self {
            mode: Mode::Percentile(percentile),
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
        }
    }

    /// Set the initial capacity
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Check the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_capacity == 0 {
            return Err(ConfigError::InvalidCapacity {
                found: self.initial_capacity,
            });
        }
        let percentile = self.mode.percentile();
        if percentile.is_nan() || percentile <= 0.0 || percentile >= 100.0 {
            return Err(ConfigError::InvalidPercentile { found: percentile });
        }
        Ok(())
    }
}
