//! Causal convolution
//!
//! `y[n] = Σ_{i=0..n} x[i]·h[n-i]` with `x` in Q0 and `h` in Q12. The
//! doubled MAC sum is shifted left by 3 and rounded, which removes the Q12
//! scale and leaves `y` in Q0.

use crate::error::{DspError, Result};
use crate::math::basic_ops::{Word16, Word32, l_mac, l_shl, round};

/// Convolve two equal-length vectors, truncated to their length.
pub fn convolve(x: &[Word16], h: &[Word16], y: &mut [Word16]) -> Result<()> {
    let len = x.len();
    if h.len() != len {
        return Err(DspError::InvalidFrameSize {
            expected: len,
            actual: h.len(),
        });
    }
    if y.len() != len {
        return Err(DspError::InvalidFrameSize {
            expected: len,
            actual: y.len(),
        });
    }

    for n in 0..len {
        let mut s: Word32 = 0;
        for i in 0..=n {
            s = l_mac(s, x[i], h[n - i]);
        }
        y[n] = round(l_shl(s, 3));
    }
    Ok(())
}
