//! Mixed-radix composition
//!
//! 512 is not a power of four, so the 512-point FFT is split into one
//! radix-2 decimation-in-frequency pass followed by two independent
//! 256-point radix-4 FFTs. The even and odd output bins come from the low
//! and high halves respectively; a final digit-reversal swap interleaves
//! them back into natural order.

use num_complex::Complex;

use super::fft_rx4::radix4_long;
use super::tables::{DIGIT_REVERSE_256, W_512_RX2};
use super::{
    BlockScale, FFT_RX4_LONG, MIX_RADIX_LEN, as_complex_mut, saturate_i64, scale_i64, twiddle_mul,
};
use crate::error::{DspError, Result};
use crate::math::normalize;

/// Headroom floor of the radix-2 pass.
const MIN_EXPONENT: i32 = 4;
/// Extra precision the differences keep through the twiddle multiply.
const TWIDDLE_GUARD_BITS: i32 = 4;

/// In-place 512-point FFT in natural output order.
///
/// The block is first scaled down by `max(8 - normalize(peak), 4)` bits,
/// which is also the returned exponent. The returned peak is the OR of the
/// peaks of both half transforms.
pub fn mix_radix_fft(data: &mut [Complex<i32>; MIX_RADIX_LEN], peak: i32) -> BlockScale {
    let exp = (8 - normalize(peak)).max(MIN_EXPONENT);
    let half = MIX_RADIX_LEN / 2;
    let quarter = MIX_RADIX_LEN / 4;

    for n in 0..half {
        let a = data[n];
        let b = data[n + half];
        let sum_re = a.re as i64 + b.re as i64;
        let sum_im = a.im as i64 + b.im as i64;
        let dif_re = a.re as i64 - b.re as i64;
        let dif_im = a.im as i64 - b.im as i64;

        data[n] = Complex::new(
            saturate_i64(scale_i64(sum_re, exp)),
            saturate_i64(scale_i64(sum_im, exp)),
        );

        data[n + half] = if n == 0 {
            Complex::new(
                saturate_i64(scale_i64(dif_re, exp)),
                saturate_i64(scale_i64(dif_im, exp)),
            )
        } else if n == quarter {
            // e^{-jπ/2}
            Complex::new(
                saturate_i64(scale_i64(dif_im, exp)),
                saturate_i64(-scale_i64(dif_re, exp)),
            )
        } else {
            let d1 = scale_i64(dif_re, exp - TWIDDLE_GUARD_BITS);
            let d2 = scale_i64(dif_im, exp - TWIDDLE_GUARD_BITS);
            let guard = (TWIDDLE_GUARD_BITS - 1) as u32;
            if n < quarter {
                let w = W_512_RX2[n];
                Complex::new(
                    twiddle_mul(d1, d2, w) >> guard,
                    twiddle_mul(d2, -d1, w) >> guard,
                )
            } else {
                // Second quarter: the same factors rotated by -j.
                let w = W_512_RX2[n - quarter];
                Complex::new(
                    twiddle_mul(d2, -d1, w) >> guard,
                    saturate_i64(-(twiddle_mul(d1, d2, w) as i64) >> guard),
                )
            }
        };
    }

    let (low, high) = data.split_at_mut(half);
    let peak = radix4_long(low) | radix4_long(high);

    let spectrum = *data;
    for k in 0..FFT_RX4_LONG {
        let src = DIGIT_REVERSE_256[k] as usize;
        data[2 * k] = spectrum[src];
        data[2 * k + 1] = spectrum[half + src];
    }

    BlockScale {
        exponent: exp,
        peak,
    }
}

/// Mixed-radix FFT over an interleaved `(re, im)` buffer of 512 points.
pub fn mixed_radix_transform(buffer: &mut [i32], peak: i32) -> Result<BlockScale> {
    let data: &mut [Complex<i32>; MIX_RADIX_LEN] = as_complex_mut(buffer, MIX_RADIX_LEN)?
        .try_into()
        .map_err(|_| DspError::internal_error("mixed-radix view"))?;
    Ok(mix_radix_fft(data, peak))
}
