//! Inverse MDCT drivers
//!
//! Chains pre-rotation, FFT and post-rotation for the two AAC block sizes
//! and sums the stage exponents:
//!
//! | block | coefficients | samples | FFT                 |
//! |-------|--------------|---------|---------------------|
//! | long  | 1024         | 2048    | 512-point mixed radix |
//! | short | 128          | 256     | 64-point radix 4    |
//!
//! The returned exponent `E` gives the reconstructed sample as
//! `output[n] · 2^E = Σ_k X[k]·cos(2π/N·(n + n0)·(k + 1/2))`,
//! `n0 = (N/2 + 1)/2`. Windowing and overlap-add belong to the caller.

use num_complex::Complex;
use tracing::trace;

use super::fft_rx4::fft_rx4_short;
use super::mix_radix::mix_radix_fft;
use super::rotation::{post_rotate, pre_rotate, rotation_table};
use super::tables::DIGIT_REVERSE_64;
use super::{FFT_RX4_SHORT, IMDCT_LONG, IMDCT_SHORT, MIX_RADIX_LEN};
use crate::config::BlockLength;
use crate::error::{DspError, Result};
use crate::math::Word16;

/// Long-block IMDCT: 1024 coefficients to 2048 samples.
pub fn imdct_long(coef: &[i32; IMDCT_LONG / 2], output: &mut [Word16; IMDCT_LONG]) -> i32 {
    let table = rotation_table(BlockLength::Long);
    let mut z = [Complex::new(0i32, 0i32); MIX_RADIX_LEN];

    let pre = pre_rotate(coef, &mut z, table);
    let fft = mix_radix_fft(&mut z, pre.peak);
    let post = post_rotate(&z, fft.peak, table, output);

    let exponent = pre.exponent + fft.exponent + post;
    trace!(
        pre = pre.exponent,
        fft = fft.exponent,
        post,
        exponent,
        "long IMDCT"
    );
    exponent
}

/// Short-block IMDCT: 128 coefficients to 256 samples.
pub fn imdct_short(coef: &[i32; IMDCT_SHORT / 2], output: &mut [Word16; IMDCT_SHORT]) -> i32 {
    let table = rotation_table(BlockLength::Short);
    let mut z = [Complex::new(0i32, 0i32); FFT_RX4_SHORT];

    let pre = pre_rotate(coef, &mut z, table);
    let fft = fft_rx4_short(&mut z, pre.peak);

    let mut natural = [Complex::new(0i32, 0i32); FFT_RX4_SHORT];
    for (k, slot) in natural.iter_mut().enumerate() {
        *slot = z[DIGIT_REVERSE_64[k] as usize];
    }
    let post = post_rotate(&natural, fft.peak, table, output);

    let exponent = pre.exponent + fft.exponent + post;
    trace!(
        pre = pre.exponent,
        fft = fft.exponent,
        post,
        exponent,
        "short IMDCT"
    );
    exponent
}

/// IMDCT over slices for either block length.
///
/// `coef` must hold `length.coefficients()` values and `output` exactly
/// `length.samples()`. Returns the block exponent.
pub fn imdct(coef: &[i32], output: &mut [Word16], length: BlockLength) -> Result<i32> {
    if coef.len() != length.coefficients() {
        return Err(DspError::InvalidFrameSize {
            expected: length.coefficients(),
            actual: coef.len(),
        });
    }
    if output.len() != length.samples() {
        return Err(DspError::BufferTooSmall {
            needed: length.samples(),
            actual: output.len(),
        });
    }

    let view_error = |_| DspError::internal_error("IMDCT buffer view");
    match length {
        BlockLength::Long => Ok(imdct_long(
            coef.try_into().map_err(view_error)?,
            output.try_into().map_err(view_error)?,
        )),
        BlockLength::Short => Ok(imdct_short(
            coef.try_into().map_err(view_error)?,
            output.try_into().map_err(view_error)?,
        )),
    }
}
