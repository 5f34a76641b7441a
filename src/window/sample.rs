//! Numeric sample types accepted by the moving percentile

use core::fmt::Debug;

/// An ordered numeric value that can be held in a window
///
/// Implemented for every primitive integer and float type.
pub trait Sample: Copy + PartialOrd + Debug {
    /// Value halfway between `a` and `b`, used for even-sized medians
    ///
    /// Integer types truncate toward zero.
    fn average(a: Self, b: Self) -> Self;

    /// Whether the value has no place in the ordering (NaN)
    ///
    /// Unordered samples are treated as null.
    #[inline]
    fn is_unordered(&self) -> bool {
        false
    }
}

macro_rules! impl_sample_int {
    ($($t:ty),*) => {
        $(
            impl Sample for $t {
                #[inline]
                fn average(a: Self, b: Self) -> Self {
                    ((a as i128 + b as i128) / 2) as $t
                }
            }
        )*
    };
}

macro_rules! impl_sample_float {
    ($($t:ty),*) => {
        $(
            impl Sample for $t {
                #[inline]
                fn average(a: Self, b: Self) -> Self {
                    (a + b) / 2.0
                }

                #[inline]
                fn is_unordered(&self) -> bool {
                    self.is_nan()
                }
            }
        )*
    };
}

impl_sample_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
impl_sample_float!(f32, f64);
