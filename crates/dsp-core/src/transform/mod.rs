//! Block floating-point inverse transform
//!
//! The inverse MDCT is computed through an N/4-point complex FFT wrapped in
//! a pre-rotation and a post-rotation. Every stage tracks how far the data
//! has been scaled and hands a running peak accumulator to the next stage,
//! so the caller gets one final exponent `E` with `time = y · 2^E`.
//!
//! # Architecture
//!
//! - `tables`: twiddle, rotation and digit-reversal tables
//! - `fft_rx4`: radix-4 decimation-in-frequency FFTs (256 and 64 points)
//! - `mix_radix`: 512-point FFT from one radix-2 pass and two radix-4 FFTs
//! - `rotation`: IMDCT pre-rotation and post-rotation/reorder
//! - `imdct`: long and short inverse MDCT drivers
//!
//! Buffers are `num_complex::Complex<i32>`. The slice-taking entry points
//! accept interleaved `(re, im)` `i32` data and view it as complex samples
//! without copying.

pub mod fft_rx4;
pub mod imdct;
pub mod mix_radix;
pub mod rotation;
pub mod tables;

#[cfg(test)]
mod tests;

use num_complex::Complex;

use crate::error::{DspError, Result};
use tables::Twiddle;

pub use crate::config::BlockLength;
pub use fft_rx4::{fft_rx4_long, fft_rx4_short, radix4_transform};
pub use imdct::{imdct, imdct_long, imdct_short};
pub use mix_radix::{mix_radix_fft, mixed_radix_transform};
pub use rotation::{post_rotation, pre_rotation};

/// Complex points in the long radix-4 FFT.
pub const FFT_RX4_LONG: usize = 256;
/// Complex points in the short radix-4 FFT.
pub const FFT_RX4_SHORT: usize = 64;
/// Complex points in the mixed-radix FFT.
pub const MIX_RADIX_LEN: usize = 512;
/// Output samples of the long IMDCT.
pub const IMDCT_LONG: usize = 2048;
/// Output samples of the short IMDCT.
pub const IMDCT_SHORT: usize = 256;

/// Scale bookkeeping handed from one transform stage to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockScale {
    /// Stored value times `2^exponent` is the true value.
    pub exponent: i32,
    /// OR of the ones'-complement magnitudes of the stage output.
    pub peak: i32,
}

/// Ones'-complement magnitude folded into the peak accumulator.
#[inline]
pub(crate) fn peak_bits(v: i32) -> i32 {
    (v >> 31) ^ v
}

#[inline]
pub(crate) fn saturate_i64(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Block shift: right by `exp`, or left with saturation when `exp < 0`.
#[inline]
pub(crate) fn scale_i64(v: i64, exp: i32) -> i64 {
    if exp >= 0 {
        v >> exp.min(31)
    } else {
        (v << (-exp).min(24)).clamp(i32::MIN as i64, i32::MAX as i64)
    }
}

/// `(x·cos)>>16 + (y·sin)>>16`, saturated. One component of a rotation by
/// `e^{-jθ}` with the magnitude halved.
#[inline]
pub(crate) fn twiddle_mul(x: i64, y: i64, w: Twiddle) -> i32 {
    saturate_i64(((x * w.cos as i64) >> 16) + ((y * w.sin as i64) >> 16))
}

/// As [`twiddle_mul`] without the halving.
#[inline]
pub(crate) fn twiddle_mul_q15(x: i64, y: i64, w: Twiddle) -> i32 {
    saturate_i64(((x * w.cos as i64) >> 15) + ((y * w.sin as i64) >> 15))
}

/// Read-only view of an interleaved `(re, im)` buffer of exactly `points`
/// complex samples.
pub fn as_complex(buffer: &[i32], points: usize) -> Result<&[Complex<i32>]> {
    if buffer.len() != 2 * points {
        return Err(DspError::InvalidFrameSize {
            expected: 2 * points,
            actual: buffer.len(),
        });
    }
    bytemuck::try_cast_slice(buffer)
        .map_err(|e| DspError::internal_error(format!("complex view: {e}")))
}

/// View an interleaved `(re, im)` buffer of exactly `points` complex samples.
pub fn as_complex_mut(buffer: &mut [i32], points: usize) -> Result<&mut [Complex<i32>]> {
    if buffer.len() != 2 * points {
        return Err(DspError::InvalidFrameSize {
            expected: 2 * points,
            actual: buffer.len(),
        });
    }
    bytemuck::try_cast_slice_mut(buffer)
        .map_err(|e| DspError::internal_error(format!("complex view: {e}")))
}

#[cfg(test)]
mod helper_tests {
    use super::*;

    #[test]
    fn test_peak_bits_is_ones_complement() {
        assert_eq!(peak_bits(5), 5);
        assert_eq!(peak_bits(-5), 4);
        assert_eq!(peak_bits(i32::MIN), i32::MAX);
    }

    #[test]
    fn test_complex_view_length() {
        let mut buf = vec![0i32; 2 * FFT_RX4_SHORT];
        buf[2] = 7;
        buf[3] = -3;
        let view = as_complex_mut(&mut buf, FFT_RX4_SHORT).expect("view");
        assert_eq!(view.len(), FFT_RX4_SHORT);
        assert_eq!(view[1], Complex::new(7, -3));

        let shared = as_complex(&buf, FFT_RX4_SHORT).expect("read-only view");
        assert_eq!(shared[1], Complex::new(7, -3));
        assert!(as_complex(&buf[1..], FFT_RX4_SHORT).is_err());

        let mut odd = vec![0i32; 2 * FFT_RX4_SHORT - 1];
        assert_eq!(
            as_complex_mut(&mut odd, FFT_RX4_SHORT),
            Err(DspError::InvalidFrameSize {
                expected: 128,
                actual: 127
            })
        );
    }

    #[test]
    fn test_twiddle_mul_halves() {
        let w = Twiddle {
            cos: 32767,
            sin: 0,
        };
        assert_eq!(twiddle_mul(1 << 20, 5, w), (((1i64 << 20) * 32767) >> 16) as i32);
        assert_eq!(twiddle_mul_q15(1 << 20, 5, w), (((1i64 << 20) * 32767) >> 15) as i32);
        assert_eq!(scale_i64(-1 << 30, -4), i32::MIN as i64);
        assert_eq!(scale_i64(-17, 2), -5);
    }
}
