//! Radix-4 decimation-in-frequency FFT
//!
//! Two fixed sizes are supported: 256 complex points for long blocks and
//! 64 for short blocks. Both run in place and leave the spectrum in base-4
//! digit-reversed order (see [`DIGIT_REVERSE_256`](super::tables::DIGIT_REVERSE_256)).
//!
//! The long FFT carries no per-stage scaling; the caller provides headroom.
//! The short FFT scales its first stage from the incoming peak so that
//! small blocks keep their precision and large blocks cannot overflow.
//! The last stage of both folds every output into a peak accumulator for
//! the next stage of the pipeline.

use num_complex::Complex;

use super::tables::{Twiddle, W_256_RX4, W_64_RX4};
use super::{
    BlockScale, FFT_RX4_LONG, FFT_RX4_SHORT, as_complex_mut, peak_bits, saturate_i64, scale_i64,
    twiddle_mul, twiddle_mul_q15,
};
use crate::config::BlockLength;
use crate::error::{DspError, Result};
use crate::math::normalize;

type Wide = (i64, i64);

#[inline]
fn gather(data: &[Complex<i32>], i: usize, q: usize) -> [Complex<i32>; 4] {
    [data[i], data[i + q], data[i + 2 * q], data[i + 3 * q]]
}

/// One radix-4 DIF butterfly, in 64-bit so the sums cannot wrap.
#[inline]
fn butterfly(x: [Complex<i32>; 4], pre_shift: u32) -> [Wide; 4] {
    let [a, b, c, d] = x.map(|v| ((v.re >> pre_shift) as i64, (v.im >> pre_shift) as i64));

    let sum_ac = (a.0 + c.0, a.1 + c.1);
    let dif_ac = (a.0 - c.0, a.1 - c.1);
    let sum_bd = (b.0 + d.0, b.1 + d.1);
    let dif_bd = (b.0 - d.0, b.1 - d.1);

    [
        (sum_ac.0 + sum_bd.0, sum_ac.1 + sum_bd.1),
        (dif_ac.0 + dif_bd.1, dif_ac.1 - dif_bd.0),
        (sum_ac.0 - sum_bd.0, sum_ac.1 - sum_bd.1),
        (dif_ac.0 - dif_bd.1, dif_ac.1 + dif_bd.0),
    ]
}

#[inline]
fn narrow(y: Wide) -> Complex<i32> {
    Complex::new(saturate_i64(y.0), saturate_i64(y.1))
}

/// Closing stage of length 4: no twiddles, accumulates the output peak.
fn last_stage(data: &mut [Complex<i32>]) -> i32 {
    let mut peak = 0;
    for i in (0..data.len()).step_by(4) {
        let y = butterfly(gather(data, i, 1), 0);
        for (m, v) in y.into_iter().enumerate() {
            let out = narrow(v);
            peak |= peak_bits(out.re) | peak_bits(out.im);
            data[i + m] = out;
        }
    }
    peak
}

/// Long FFT over a slice of exactly [`FFT_RX4_LONG`] points.
pub(crate) fn radix4_long(data: &mut [Complex<i32>]) -> i32 {
    debug_assert_eq!(data.len(), FFT_RX4_LONG);
    let n = FFT_RX4_LONG;
    let twiddles: &[[Twiddle; 3]] = &W_256_RX4;
    let mut tw = 0;

    let mut n2 = n;
    while n2 > 4 {
        let n1 = n2;
        n2 >>= 2;
        let q = n2;

        for i in (0..n).step_by(n1) {
            let y = butterfly(gather(data, i, q), 0);
            for (m, v) in y.into_iter().enumerate() {
                data[i + m * q] = narrow(v);
            }
        }

        for j in 1..q {
            let w = twiddles[tw];
            tw += 1;
            for i in (j..n).step_by(n1) {
                let y = butterfly(gather(data, i, q), 0);
                data[i] = narrow(y[0]);
                for m in 1..4 {
                    let (re, im) = y[m];
                    data[i + m * q] = Complex::new(
                        twiddle_mul_q15(re, im, w[m - 1]),
                        twiddle_mul_q15(im, -re, w[m - 1]),
                    );
                }
            }
        }
    }

    last_stage(data)
}

/// 256-point radix-4 FFT, unscaled. Returns the output peak.
pub fn fft_rx4_long(data: &mut [Complex<i32>; FFT_RX4_LONG]) -> i32 {
    radix4_long(data)
}

/// 64-point radix-4 FFT with first-stage block scaling.
///
/// `peak` is the accumulator of the input block. The returned exponent
/// states how far the output was scaled down: true spectrum equals output
/// times `2^exponent`.
pub fn fft_rx4_short(data: &mut [Complex<i32>; FFT_RX4_SHORT], peak: i32) -> BlockScale {
    let n = FFT_RX4_SHORT;
    let twiddles: &[[Twiddle; 3]] = &W_64_RX4;
    let mut tw = 0;

    let mut exp = 0;
    let mut exponent = 0;
    if peak > 0x8000 {
        exp = 8 - normalize(peak);
        exponent = exp;
    }

    // Stage one divides inputs by 4 before the butterfly and rescales the
    // outputs by `exp - 2`; later stages run unscaled.
    let mut pre_shift = 2;
    let mut n2 = n;
    while n2 > 4 {
        let n1 = n2;
        n2 >>= 2;
        let q = n2;
        exp -= 2;

        for i in (0..n).step_by(n1) {
            let y = butterfly(gather(data, i, q), pre_shift);
            for (m, v) in y.into_iter().enumerate() {
                data[i + m * q] = narrow((scale_i64(v.0, exp), scale_i64(v.1, exp)));
            }
        }

        for j in 1..q {
            let w = twiddles[tw];
            tw += 1;
            for i in (j..n).step_by(n1) {
                let y = butterfly(gather(data, i, q), pre_shift);
                data[i] = narrow((scale_i64(y[0].0, exp), scale_i64(y[0].1, exp)));
                for m in 1..4 {
                    let re = scale_i64(y[m].0, exp);
                    let im = scale_i64(y[m].1, exp);
                    data[i + m * q] = Complex::new(
                        saturate_i64(2 * twiddle_mul(re, im, w[m - 1]) as i64),
                        saturate_i64(2 * twiddle_mul(im, -re, w[m - 1]) as i64),
                    );
                }
            }
        }

        exp = 2;
        pre_shift = 0;
    }

    BlockScale {
        exponent,
        peak: last_stage(data),
    }
}

/// Radix-4 FFT over an interleaved `(re, im)` buffer.
///
/// `Long` expects 256 complex points and ignores `peak`; `Short` expects
/// 64 and uses `peak` to pick its first-stage scaling. The exponent of a
/// long transform is always 0.
pub fn radix4_transform(buffer: &mut [i32], length: BlockLength, peak: i32) -> Result<BlockScale> {
    match length {
        BlockLength::Long => {
            let data = as_complex_mut(buffer, FFT_RX4_LONG)?;
            Ok(BlockScale {
                exponent: 0,
                peak: radix4_long(data),
            })
        }
        BlockLength::Short => {
            let data = as_complex_mut(buffer, FFT_RX4_SHORT)?;
            let data: &mut [Complex<i32>; FFT_RX4_SHORT] = data
                .try_into()
                .map_err(|_| DspError::internal_error("short FFT view"))?;
            Ok(fft_rx4_short(data, peak))
        }
    }
}
