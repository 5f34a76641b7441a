//! # Windowstats
//!
//! Exact streaming statistics over sliding windows for Rust.
//!
//! Windowstats keeps a running median or percentile over the most recent
//! samples of a stream, with logarithmic insert and eviction and a
//! constant-time query, and ships companion single-pass filters for
//! time-series pipelines.
//!
//! ## Features
//!
//! - **Moving Percentile**: Median or any percentile over a sliding window
//! - **Null Samples**: A sentinel value marks gaps that occupy the window but
//!   never skew the result
//! - **Transparent Growth**: The window grows on demand; allocation failures
//!   are reported, never half-applied
//! - **Trend Compression**: Spinning-door simplification of `(x, y)` series
//!
//! ## Quick Start
//!
//! ```rust
//! use windowstats::prelude::*;
//!
//! // Median of the last three readings
//! let mut median = MovingPercentile::new(f64::NAN, Mode::Median, 4).unwrap();
//! median.insert_slice(&[1.0, 2.0, 3.0]).unwrap();
//! assert_eq!(median.current_value(), 2.0);
//!
//! median.insert_and_remove(4.0).unwrap();
//! assert_eq!(median.current_value(), 3.0);
//! ```
//!
//! ## Feature Flags
//!
//! Algorithm families (pick what you need):
//! - `window` (default): moving median and percentile
//! - `compression`: spinning-door trend compression
//! - `full`: Enable all algorithm families
//!
//! Platform features:
//! - `std` (default): Standard library support
//! - `serde`: Enable serialization of configuration types

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Core traits always available
pub mod traits;

#[cfg(feature = "window")]
mod math;

#[cfg(feature = "window")]
#[cfg_attr(docsrs, doc(cfg(feature = "window")))]
pub mod window;

#[cfg(feature = "compression")]
#[cfg_attr(docsrs, doc(cfg(feature = "compression")))]
pub mod compression;

pub mod prelude {
    pub use crate::traits::*;

    #[cfg(feature = "window")]
    pub use crate::window::{Mode, MovingPercentile, Sample, WindowConfig};

    #[cfg(feature = "compression")]
    pub use crate::compression::{Point, SpinningDoor};
}

#[cfg(feature = "window")]
pub use window::MovingPercentile;

#[cfg(feature = "compression")]
pub use compression::SpinningDoor;
