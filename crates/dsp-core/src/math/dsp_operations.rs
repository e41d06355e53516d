//! Energy normalization helpers
//!
//! Normalized dot products and the table-driven inverse square root used
//! to bring correlation vectors to a common scale before a search.

use super::basic_ops::{
    extract_h, l_add, l_deposit_h, l_mac, l_msu, l_shl, negate, sub, Word16, Word32,
};
use super::normalize::norm_l;

/// `1/sqrt(x)` in Q15 for `x` in `[0.25, 1.0]`, 49 points.
pub const TABLE_ISQRT: [Word16; 49] = [
    32767, 31790, 30894, 30070, 29309, 28602, 27945, 27330, 26755, 26214, 25705, 25225, 24770,
    24339, 23930, 23541, 23170, 22817, 22479, 22155, 21845, 21548, 21263, 20988, 20724, 20470,
    20225, 19988, 19760, 19539, 19326, 19119, 18919, 18725, 18536, 18354, 18176, 18004, 17837,
    17674, 17515, 17361, 17211, 17064, 16921, 16782, 16646, 16514, 16384,
];

/// A 32-bit mantissa normalized into `[0x4000_0000, 0x7FFF_FFFF]` with its exponent.
///
/// The represented value is `mantissa / 2^31 * 2^exponent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalized {
    /// Q31 mantissa
    pub mantissa: Word32,
    /// Power-of-two exponent
    pub exponent: Word16,
}

/// Dot product of two equal-length vectors, normalized.
///
/// Accumulates `2·x[i]·y[i]` with saturation, adds 1 so the result is never
/// zero, and normalizes with exponent `30 - shift`. For an exact sum `S`
/// the represented value is `S + 1/2`.
pub fn dot_product12(x: &[Word16], y: &[Word16]) -> Normalized {
    debug_assert_eq!(x.len(), y.len());
    let mut l_sum: Word32 = 0;
    for (&a, &b) in x.iter().zip(y) {
        l_sum = l_mac(l_sum, a, b);
    }
    l_sum = l_add(l_sum, 1);

    let sft = norm_l(l_sum);
    Normalized {
        mantissa: l_shl(l_sum, sft),
        exponent: 30 - sft,
    }
}

/// Inverse square root of a normalized value.
///
/// Input and output both use the `mantissa / 2^31 * 2^exponent` form. Non
/// positive mantissas return the largest representable value with a zero
/// exponent.
pub fn isqrt_n(value: Normalized) -> Normalized {
    let mut frac = value.mantissa;
    let mut exp = value.exponent;

    if frac <= 0 {
        return Normalized {
            mantissa: 0x7FFF_FFFF,
            exponent: 0,
        };
    }

    // Odd exponent: halve the mantissa so the square root splits evenly.
    if exp & 1 == 1 {
        frac >>= 1;
    }
    exp = negate((exp - 1) >> 1);

    frac >>= 9;
    let i = extract_h(frac);
    frac >>= 1;
    let a = (frac as Word16) & 0x7FFF;
    // b25-b31 select the table slot, b10-b24 interpolate
    let idx = (i - 16).clamp(0, 47) as usize;

    let tmp = sub(TABLE_ISQRT[idx], TABLE_ISQRT[idx + 1]);
    let mantissa = l_msu(l_deposit_h(TABLE_ISQRT[idx]), tmp, a);

    Normalized {
        mantissa,
        exponent: exp,
    }
}

impl Normalized {
    /// Floating-point view, for diagnostics and tests.
    pub fn to_f64(self) -> f64 {
        self.mantissa as f64 / 2f64.powi(31) * 2f64.powi(self.exponent as i32)
    }
}
