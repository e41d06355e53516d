//! Normalization utility
//!
//! Counts the redundant leading sign bits of a fixed-point value, i.e. how
//! far it can be shifted left before the sign bit is disturbed. Every block
//! floating-point stage in the crate derives its scale shift from these.

use super::basic_ops::{Word16, Word32};

/// Redundant sign bits of a 16-bit value; `0` yields 15.
#[inline]
pub fn norm_s(var1: Word16) -> Word16 {
    if var1 == 0 {
        return 15;
    }
    let magnitude = if var1 < 0 { !var1 } else { var1 };
    (magnitude.leading_zeros() as Word16) - 1
}

/// Redundant sign bits of a 32-bit value; `0` yields 31.
#[inline]
pub fn norm_l(l_var1: Word32) -> Word16 {
    if l_var1 == 0 {
        return 31;
    }
    let magnitude = if l_var1 < 0 { !l_var1 } else { l_var1 };
    (magnitude.leading_zeros() as Word16) - 1
}

/// Shift that brings a peak accumulator to 31 significant bits.
///
/// Peak accumulators are ORs of ones'-complement magnitudes, so they are
/// never negative; this is `norm_l` widened to the `i32` exponent domain
/// the transform uses.
#[inline]
pub fn normalize(peak: Word32) -> i32 {
    norm_l(peak) as i32
}
