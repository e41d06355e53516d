//! IMDCT pre-rotation and post-rotation/reorder
//!
//! An `N`-sample IMDCT of `M = N/2` coefficients runs through an
//! `L = N/4` point complex FFT:
//!
//! 1. pre-rotation packs `z[p] = (X[2p] + j·X[M-1-2p]) · e^{-j2π(p+1/8)/N}`,
//! 2. the FFT transforms `z` (done by the caller),
//! 3. post-rotation multiplies by the same factors again, unfolds the `L`
//!    complex values into `M` real ones and writes the `2M` output samples
//!    with the mirror and sign symmetries of the IMDCT.
//!
//! Both rotations halve magnitudes through the Q15 multiply; the exponents
//! they return already account for it.

use num_complex::Complex;

use super::tables::{ROTATION_256, ROTATION_2048, Twiddle};
use super::{
    BlockScale, IMDCT_LONG, as_complex, as_complex_mut, peak_bits, scale_i64, twiddle_mul,
};
use crate::config::BlockLength;
use crate::error::{DspError, Result};
use crate::math::{Word16, normalize};

/// Significant bits the pre-rotation normalizes its input to.
const PRE_ROTATION_BITS: i32 = 24;
/// Significant bits of the post-rotation output.
const OUTPUT_BITS: i32 = 16;

pub(crate) fn rotation_table(length: BlockLength) -> &'static [Twiddle] {
    match length {
        BlockLength::Long => &ROTATION_2048,
        BlockLength::Short => &ROTATION_256,
    }
}

#[inline]
fn saturate_16(v: i64) -> Word16 {
    v.clamp(i16::MIN as i64, i16::MAX as i64) as Word16
}

/// Pack and rotate `M` real coefficients into `M/2` complex points.
pub(crate) fn pre_rotate(coef: &[i32], out: &mut [Complex<i32>], table: &[Twiddle]) -> BlockScale {
    let m = coef.len();
    debug_assert_eq!(out.len(), m / 2);
    debug_assert_eq!(table.len(), m / 2);

    let input_peak = coef.iter().fold(0, |acc, &v| acc | peak_bits(v));
    let shift = normalize(input_peak) - (32 - PRE_ROTATION_BITS - 1);

    let mut peak = 0;
    for (p, (z, &w)) in out.iter_mut().zip(table).enumerate() {
        let even = scale_i64(coef[2 * p] as i64, -shift);
        let odd = scale_i64(coef[m - 1 - 2 * p] as i64, -shift);
        *z = Complex::new(twiddle_mul(even, odd, w), twiddle_mul(odd, -even, w));
        peak |= peak_bits(z.re) | peak_bits(z.im);
    }

    BlockScale {
        exponent: 1 - shift,
        peak,
    }
}

/// Rotate `M/2` natural-order FFT outputs and write the `2M` time samples.
///
/// Returns the exponent of the written samples relative to the input.
pub(crate) fn post_rotate(
    spectrum: &[Complex<i32>],
    peak: i32,
    table: &[Twiddle],
    output: &mut [Word16],
) -> i32 {
    let l = spectrum.len();
    let m = 2 * l;
    debug_assert_eq!(table.len(), l);
    debug_assert_eq!(output.len(), 2 * m);

    let exp = OUTPUT_BITS - normalize(peak);
    let shift = exp - 1;

    let mut scratch = [0 as Word16; IMDCT_LONG / 2];
    let unfolded = &mut scratch[..m];
    for (q, (z, &w)) in spectrum.iter().zip(table).enumerate() {
        let re = z.re as i64;
        let im = z.im as i64;
        let cr = saturate_16(scale_i64(twiddle_mul(re, im, w) as i64, shift));
        let ci = saturate_16(scale_i64(twiddle_mul(im, -re, w) as i64, shift));
        unfolded[2 * q] = cr;
        unfolded[m - 1 - 2 * q] = saturate_16(-(ci as i64));
    }

    // Second quarter of the output is the mirrored, negated first half of
    // the unfolded block; the outer quarters carry the second half.
    let h = m / 2;
    for (k, &u) in unfolded.iter().enumerate() {
        let negated = saturate_16(-(u as i64));
        output[3 * h - 1 - k] = negated;
        if k >= h {
            output[k - h] = u;
        } else {
            output[k + 3 * h] = negated;
        }
    }

    exp
}

/// Pre-rotation over interleaved buffers.
///
/// `coef` holds the `M` spectral coefficients of the block; `out` receives
/// `M/2` interleaved complex points ready for the FFT.
pub fn pre_rotation(coef: &[i32], out: &mut [i32], length: BlockLength) -> Result<BlockScale> {
    let m = length.coefficients();
    if coef.len() != m {
        return Err(DspError::InvalidFrameSize {
            expected: m,
            actual: coef.len(),
        });
    }
    let z = as_complex_mut(out, m / 2)?;
    Ok(pre_rotate(coef, z, rotation_table(length)))
}

/// Post-rotation and reorder over an interleaved natural-order spectrum.
///
/// `peak` is the accumulator returned by the FFT stage. Writes
/// `length.samples()` values into `output` and returns their exponent.
pub fn post_rotation(
    spectrum: &[i32],
    peak: i32,
    output: &mut [Word16],
    length: BlockLength,
) -> Result<i32> {
    let n = length.samples();
    if output.len() != n {
        return Err(DspError::BufferTooSmall {
            needed: n,
            actual: output.len(),
        });
    }
    let z = as_complex(spectrum, n / 4)?;
    Ok(post_rotate(z, peak, rotation_table(length), output))
}
