//! Lossy compression of time series
//!
//! This module provides single-pass filters that drop samples a consumer can
//! reconstruct within a tolerance.
//!
//! # Algorithms
//!
//! - [`SpinningDoor`]: Swinging-door trending, keeps the turning points of a
//!   series so that linear interpolation stays close to the input
//!
//! # Example
//!
//! ```
//! use windowstats::compression::{interpolate, Point, SpinningDoor};
//!
//! let mut door = SpinningDoor::new(0.5).unwrap();
//! for i in 0..100 {
//!     door.compress(Point::new(i as f64, 3.0 * i as f64));
//! }
//!
//! // A straight line only needs its end points
//! let points = door.finish();
//! assert_eq!(points.len(), 2);
//! let y = interpolate(&points, 10.0).unwrap();
//! assert!((y - 30.0).abs() < 1e-9);
//! ```

mod spinning_door;

pub use spinning_door::{interpolate, Point, SpinningDoor};
