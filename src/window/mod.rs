//! Sliding-window percentile estimation
//!
//! This module provides exact running quantiles over the most recent samples
//! of a stream.
//!
//! # Algorithms
//!
//! - [`MovingPercentile`]: median or any single percentile over a sliding
//!   window, `O(log n)` insert and evict, `O(1)` query
//!
//! # Example
//!
//! ```
//! use windowstats::window::{Mode, MovingPercentile};
//! use windowstats::traits::{SlidingWindow, WindowQuantile};
//!
//! // p90 of request latencies, null-free stream
//! let mut p90 = MovingPercentile::new(0u64, Mode::Percentile(90.0), 128).unwrap();
//!
//! for latency in 1..=100u64 {
//!     p90.insert(latency).unwrap();
//! }
//! assert_eq!(p90.current_value(), 90);
//!
//! // Slide: drop the oldest latency for every new one
//! p90.insert_and_remove(500).unwrap();
//! assert_eq!(p90.len(), 100);
//! ```

mod arena;
mod config;
mod heap;
mod percentile;
mod sample;

pub use config::{Mode, WindowConfig, DEFAULT_INITIAL_CAPACITY};
pub use percentile::MovingPercentile;
pub use sample::Sample;
