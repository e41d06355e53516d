//! Saturating 16/32-bit fixed-point primitives
//!
//! These follow the ITU/3GPP basic-operator conventions used by the AMR
//! speech kernels: Q15×Q15 products are doubled into Q31 (`l_mult`), every
//! 32-bit add/subtract saturates to `[MIN_32, MAX_32]`, and right shifts
//! with rounding add half an LSB before shifting.
//!
//! Overflow is reported explicitly through the `*_overflowing` variants,
//! mirroring `i32::overflowing_add`; there is no global overflow flag.

/// 16-bit sample or coefficient
pub type Word16 = i16;
/// 32-bit accumulator
pub type Word32 = i32;

/// Largest `Word16`
pub const MAX_16: Word16 = i16::MAX;
/// Smallest `Word16`
pub const MIN_16: Word16 = i16::MIN;
/// Largest `Word32`
pub const MAX_32: Word32 = i32::MAX;
/// Smallest `Word32`
pub const MIN_32: Word32 = i32::MIN;

/// Clamp a 32-bit value into the 16-bit range.
#[inline]
pub fn saturate(l_var1: Word32) -> Word16 {
    if l_var1 > MAX_16 as Word32 {
        MAX_16
    } else if l_var1 < MIN_16 as Word32 {
        MIN_16
    } else {
        l_var1 as Word16
    }
}

#[inline]
fn saturate_64(value: i64) -> (Word32, bool) {
    if value > MAX_32 as i64 {
        (MAX_32, true)
    } else if value < MIN_32 as i64 {
        (MIN_32, true)
    } else {
        (value as Word32, false)
    }
}

/// Saturating 16-bit add.
#[inline]
pub fn add(var1: Word16, var2: Word16) -> Word16 {
    saturate(var1 as Word32 + var2 as Word32)
}

/// Saturating 16-bit subtract.
#[inline]
pub fn sub(var1: Word16, var2: Word16) -> Word16 {
    saturate(var1 as Word32 - var2 as Word32)
}

/// Negation; `MIN_16` maps to `MAX_16`.
#[inline]
pub fn negate(var1: Word16) -> Word16 {
    if var1 == MIN_16 { MAX_16 } else { -var1 }
}

/// Absolute value; `MIN_16` maps to `MAX_16`.
#[inline]
pub fn abs_s(var1: Word16) -> Word16 {
    if var1 == MIN_16 { MAX_16 } else { var1.abs() }
}

/// Arithmetic shift left with saturation; negative counts shift right.
pub fn shl(var1: Word16, var2: Word16) -> Word16 {
    if var2 < 0 {
        return shr(var1, var2.saturating_neg());
    }
    if var1 == 0 {
        return 0;
    }
    if var2 > 15 {
        return if var1 > 0 { MAX_16 } else { MIN_16 };
    }
    saturate((var1 as Word32) << var2)
}

/// Arithmetic shift right; negative counts shift left with saturation.
pub fn shr(var1: Word16, var2: Word16) -> Word16 {
    if var2 < 0 {
        return shl(var1, var2.saturating_neg());
    }
    if var2 >= 15 {
        if var1 < 0 { -1 } else { 0 }
    } else {
        var1 >> var2
    }
}

/// Shift right with round-to-nearest.
pub fn shr_r(var1: Word16, var2: Word16) -> Word16 {
    if var2 > 15 {
        return 0;
    }
    let shifted = shr(var1, var2);
    if var2 > 0 && (var1 & (1 << (var2 - 1))) != 0 {
        shifted + 1
    } else {
        shifted
    }
}

/// Q15 multiply: `(var1 * var2) >> 15`, saturated.
#[inline]
pub fn mult(var1: Word16, var2: Word16) -> Word16 {
    saturate((var1 as Word32 * var2 as Word32) >> 15)
}

/// Q15 multiply with rounding.
#[inline]
pub fn mult_r(var1: Word16, var2: Word16) -> Word16 {
    saturate((var1 as Word32 * var2 as Word32 + 0x4000) >> 15)
}

/// Q15×Q15 → Q31 product (`2·var1·var2`), saturating `-1 × -1`.
#[inline]
pub fn l_mult(var1: Word16, var2: Word16) -> Word32 {
    let product = var1 as Word32 * var2 as Word32;
    if product == 0x4000_0000 {
        MAX_32
    } else {
        product << 1
    }
}

/// Upper 16 bits.
#[inline]
pub fn extract_h(l_var1: Word32) -> Word16 {
    (l_var1 >> 16) as Word16
}

/// Lower 16 bits.
#[inline]
pub fn extract_l(l_var1: Word32) -> Word16 {
    l_var1 as Word16
}

/// `var1` in the upper 16 bits, zero below.
#[inline]
pub fn l_deposit_h(var1: Word16) -> Word32 {
    (var1 as Word32) << 16
}

/// Round the high word: add `0x8000` and take the upper 16 bits.
#[inline]
pub fn round(l_var1: Word32) -> Word16 {
    extract_h(l_add(l_var1, 0x0000_8000))
}

/// Saturating 32-bit add, flagging saturation.
#[inline]
pub fn l_add_overflowing(l_var1: Word32, l_var2: Word32) -> (Word32, bool) {
    saturate_64(l_var1 as i64 + l_var2 as i64)
}

/// Saturating 32-bit subtract, flagging saturation.
#[inline]
pub fn l_sub_overflowing(l_var1: Word32, l_var2: Word32) -> (Word32, bool) {
    saturate_64(l_var1 as i64 - l_var2 as i64)
}

/// `l_var3 + l_mult(var1, var2)`, flagging saturation.
#[inline]
pub fn l_mac_overflowing(l_var3: Word32, var1: Word16, var2: Word16) -> (Word32, bool) {
    l_add_overflowing(l_var3, l_mult(var1, var2))
}

/// Saturating 32-bit add.
#[inline]
pub fn l_add(l_var1: Word32, l_var2: Word32) -> Word32 {
    l_add_overflowing(l_var1, l_var2).0
}

/// Saturating 32-bit subtract.
#[inline]
pub fn l_sub(l_var1: Word32, l_var2: Word32) -> Word32 {
    l_sub_overflowing(l_var1, l_var2).0
}

/// Multiply-accumulate: `l_var3 + l_mult(var1, var2)`, saturated.
#[inline]
pub fn l_mac(l_var3: Word32, var1: Word16, var2: Word16) -> Word32 {
    l_add(l_var3, l_mult(var1, var2))
}

/// Multiply-subtract: `l_var3 - l_mult(var1, var2)`, saturated.
#[inline]
pub fn l_msu(l_var3: Word32, var1: Word16, var2: Word16) -> Word32 {
    l_sub(l_var3, l_mult(var1, var2))
}

/// 32-bit negation; `MIN_32` maps to `MAX_32`.
#[inline]
pub fn l_negate(l_var1: Word32) -> Word32 {
    if l_var1 == MIN_32 { MAX_32 } else { -l_var1 }
}

/// Arithmetic shift left with saturation; negative counts shift right.
pub fn l_shl(l_var1: Word32, var2: Word16) -> Word32 {
    if var2 <= 0 {
        return l_shr(l_var1, var2.saturating_neg());
    }
    if l_var1 == 0 {
        return 0;
    }
    if var2 >= 32 {
        return if l_var1 > 0 { MAX_32 } else { MIN_32 };
    }
    saturate_64((l_var1 as i64) << var2).0
}

/// Arithmetic shift right; negative counts shift left with saturation.
pub fn l_shr(l_var1: Word32, var2: Word16) -> Word32 {
    if var2 < 0 {
        return l_shl(l_var1, var2.saturating_neg());
    }
    if var2 >= 31 {
        if l_var1 < 0 { -1 } else { 0 }
    } else {
        l_var1 >> var2
    }
}

/// 32-bit shift right with round-to-nearest.
pub fn l_shr_r(l_var1: Word32, var2: Word16) -> Word32 {
    if var2 > 31 {
        return 0;
    }
    let shifted = l_shr(l_var1, var2);
    if var2 > 0 && (l_var1 & (1 << (var2 - 1))) != 0 {
        l_add(shifted, 1)
    } else {
        shifted
    }
}
