//! Spinning-door trend compression
//!
//! The compressor keeps a "door" hinged at the last archived point. Every new
//! point narrows the range of slopes a line from the door may take while
//! passing within `precision` of all points seen since. Once the range is
//! empty the previous point is archived and becomes the new hinge.

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::traits::ConfigError;

/// A sample of a series
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Spinning-door (swinging-door) trend compressor
///
/// Points must arrive in strictly increasing `x`; points that do not, or
/// that have a non-finite coordinate, are skipped.
///
/// # Example
///
/// ```
/// use windowstats::compression::{Point, SpinningDoor};
///
/// let mut door = SpinningDoor::new(0.5).unwrap();
/// let series = [(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 10.0), (4.0, 10.0)];
/// for &(x, y) in &series {
///     door.compress(Point::new(x, y));
/// }
///
/// let kept: Vec<(f64, f64)> = door.finish().iter().map(|p| (p.x, p.y)).collect();
/// assert_eq!(kept, vec![(0.0, 0.0), (2.0, 0.0), (3.0, 10.0), (4.0, 10.0)]);
/// ```
#[derive(Clone, Debug)]
pub struct SpinningDoor {
    /// Largest vertical distance tolerated between a point and the trend line
    precision: f64,
    /// Steepest lower-bound slope seen since the door opened
    slope_up: f64,
    /// Shallowest upper-bound slope seen since the door opened
    slope_down: f64,
    /// Hinge of the door: the last archived point
    door: Option<Point>,
    /// Last accepted point
    previous: Option<Point>,
    /// Points kept so far
    archived: Vec<Point>,
    /// Number of points accepted
    accepted: u64,
}

impl SpinningDoor {
    /// Create a compressor
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPrecision`] unless `precision` is finite
    /// and non-negative.
    pub fn new(precision: f64) -> Result<Self, ConfigError> {
        if !precision.is_finite() || precision < 0.0 {
            return Err(ConfigError::InvalidPrecision { found: precision });
        }
        Ok(Self {
            precision,
            slope_up: f64::NEG_INFINITY,
            slope_down: f64::INFINITY,
            door: None,
            previous: None,
            archived: Vec::new(),
            accepted: 0,
        })
    }

    /// Tolerance the compressor was built with
    pub fn precision(&self) -> f64 {
        self.precision
    }

    /// Feed one point
    ///
    /// Returns the point archived by this call, if any. The first accepted
    /// point is always archived.
    pub fn compress(&mut self, point: Point) -> Option<Point> {
        if !point.is_finite() {
            return None;
        }
        let (Some(door), Some(previous)) = (self.door, self.previous) else {
            self.accepted = 1;
            self.door = Some(point);
            self.previous = Some(point);
            self.archived.push(point);
            return Some(point);
        };
        if point.x <= previous.x {
            return None;
        }
        self.accepted += 1;

        let (up, down) = self.slopes(door, point);
        self.slope_up = self.slope_up.max(up);
        self.slope_down = self.slope_down.min(down);

        let mut archived = None;
        if self.slope_up > self.slope_down {
            tracing::trace!(x = previous.x, y = previous.y, "door closed, archiving point");
            self.archived.push(previous);
            self.door = Some(previous);
            let (up, down) = self.slopes(previous, point);
            self.slope_up = up;
            self.slope_down = down;
            archived = Some(previous);
        }
        self.previous = Some(point);
        archived
    }

    /// Feed a slice of points in order
    pub fn compress_all(&mut self, points: &[Point]) {
        for &point in points {
            self.compress(point);
        }
    }

    /// Feed parallel coordinate slices; extra values in the longer slice are ignored
    pub fn compress_xy(&mut self, xs: &[f64], ys: &[f64]) {
        for (&x, &y) in xs.iter().zip(ys) {
            self.compress(Point::new(x, y));
        }
    }

    /// Points archived so far
    pub fn archived(&self) -> &[Point] {
        &self.archived
    }

    /// Archived points followed by the last accepted point, the complete
    /// compressed series
    pub fn finish(&self) -> Vec<Point> {
        let mut points = self.archived.clone();
        if let Some(last) = self.previous {
            if points.last() != Some(&last) {
                points.push(last);
            }
        }
        points
    }

    /// Number of points accepted
    pub fn len(&self) -> u64 {
        self.accepted
    }

    /// Check if no point was accepted
    pub fn is_empty(&self) -> bool {
        self.accepted == 0
    }

    /// Forget every point, keeping the precision
    pub fn clear(&mut self) {
        self.slope_up = f64::NEG_INFINITY;
        self.slope_down = f64::INFINITY;
        self.door = None;
        self.previous = None;
        self.archived.clear();
        self.accepted = 0;
    }

    /// Slopes of the lines from `door` through the bottom and top of the
    /// tolerance band around `point`
    #[inline]
    fn slopes(&self, door: Point, point: Point) -> (f64, f64) {
        let dx = point.x - door.x;
        let dy = point.y - door.y;
        ((dy - self.precision) / dx, (dy + self.precision) / dx)
    }
}

/// Reconstruct `y` at `x` by linear interpolation between compressed points
///
/// `points` must be sorted by `x`, as produced by [`SpinningDoor::finish`].
/// Returns `None` for empty input or an `x` outside the covered range.
pub fn interpolate(points: &[Point], x: f64) -> Option<f64> {
    let first = points.first()?;
    let last = points.last()?;
    if x.is_nan() || x < first.x || x > last.x {
        return None;
    }
    let index = points.partition_point(|p| p.x < x);
    let right = points[index];
    if right.x == x || index == 0 {
        return Some(right.y);
    }
    let left = points[index - 1];
    let t = (x - left.x) / (right.x - left.x);
    Some(left.y + t * (right.y - left.y))
}

// ============================================================================
// Tests
// ============================================================================
