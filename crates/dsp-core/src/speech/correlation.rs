//! Lag correlation and backward-filtered target
//!
//! [`correlate`] evaluates `Σ s[n]·s[n-t]` for a range of lags over one
//! analysis frame. [`cor_h_x`] correlates a target vector with an impulse
//! response and scales the result so the codebook search has 4 bits of
//! headroom.

use super::L_SUBFR;
use crate::error::{DspError, Result};
use crate::math::basic_ops::{Word16, Word32, l_add, l_mac, l_shl, round};
use crate::math::normalize::norm_l;

/// Autocorrelation of one frame against its own past.
///
/// `signal` holds `lag_max` history samples followed by the
/// `frame_length`-sample frame. `corr[t - lag_min]` receives the doubled
/// MAC sum for lag `t`, for every `t` in `lag_min..=lag_max`.
pub fn correlate(
    signal: &[Word16],
    frame_length: usize,
    lag_min: usize,
    lag_max: usize,
    corr: &mut [Word32],
) -> Result<()> {
    if lag_min > lag_max {
        return Err(DspError::invalid_config(format!(
            "lag range {lag_min}..={lag_max} is empty"
        )));
    }
    let needed = lag_max + frame_length;
    if signal.len() < needed {
        return Err(DspError::BufferTooSmall {
            needed,
            actual: signal.len(),
        });
    }
    let lags = lag_max - lag_min + 1;
    if corr.len() != lags {
        return Err(DspError::InvalidFrameSize {
            expected: lags,
            actual: corr.len(),
        });
    }

    let frame = &signal[lag_max..lag_max + frame_length];
    for (slot, t) in corr.iter_mut().zip(lag_min..=lag_max) {
        let delayed = &signal[lag_max - t..lag_max - t + frame_length];
        *slot = frame
            .iter()
            .zip(delayed)
            .fold(0, |s, (&x, &y)| l_mac(s, x, y));
    }
    Ok(())
}

/// Correlation between the target `x` and the impulse response `h`.
///
/// `dn[i] = Σ_{j>=i} x[j]·h[j-i]`, normalized on the mean of the four
/// interleaved per-track maxima so that the sum of a few pulses stays
/// below 12 bits.
pub fn cor_h_x(h: &[Word16; L_SUBFR], x: &[Word16; L_SUBFR]) -> [Word16; L_SUBFR] {
    let mut y32 = [0 as Word32; L_SUBFR];
    let mut track_max = [0 as Word32; 4];

    for i in 0..L_SUBFR {
        let mut s: Word32 = 0;
        for j in i..L_SUBFR {
            s = l_mac(s, x[j], h[j - i]);
        }
        y32[i] = s;
        let magnitude = s.saturating_abs();
        if magnitude > track_max[i % 4] {
            track_max[i % 4] = magnitude;
        }
    }

    let mean_max = (track_max.iter().map(|&m| m as i64).sum::<i64>() >> 2) as Word32;
    let total = l_add(l_add(1, mean_max), mean_max >> 1);
    let shift = norm_l(total) - 4;

    let mut dn = [0; L_SUBFR];
    for (d, &s) in dn.iter_mut().zip(&y32) {
        *d = round(l_shl(s, shift));
    }
    dn
}
