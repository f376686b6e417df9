//! The ordering-key contract for heap entries.

use std::fmt::Debug;

use num_traits::{Bounded, Float};

/// Ordering key for heap entries.
///
/// Priorities must be totally ordered among *valid* values. The heap validates
/// every priority it accepts with [`Priority::is_valid`], so values for which
/// comparison is not total (NaN for floats) never enter the structure.
///
/// [`Priority::lowest`] is the sentinel used by `delete`: it must compare
/// at-or-below every valid priority so that decreasing a node to it makes the
/// node extractable as the minimum.
pub trait Priority: PartialOrd + Copy + Debug {
    /// Whether the value can serve as an ordering key.
    fn is_valid(&self) -> bool;

    /// A value that sorts at or below every valid priority.
    fn lowest() -> Self;
}

macro_rules! impl_int_priority {
    ($($t:ty),*) => {$(
        impl Priority for $t {
            #[inline]
            fn is_valid(&self) -> bool {
                true
            }

            #[inline]
            fn lowest() -> Self {
                <$t as Bounded>::min_value()
            }
        }
    )*};
}

impl_int_priority!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! impl_float_priority {
    ($($t:ty),*) => {$(
        impl Priority for $t {
            #[inline]
            fn is_valid(&self) -> bool {
                !Float::is_nan(*self)
            }

            #[inline]
            fn lowest() -> Self {
                Float::neg_infinity()
            }
        }
    )*};
}

impl_float_priority!(f32, f64);
