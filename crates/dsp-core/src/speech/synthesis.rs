//! LPC synthesis filter
//!
//! All-pole filter `1/A(z)`, the inverse of the residual filter, with `a`
//! in Q12 and `a[0] = 1.0`:
//!
//! ```text
//! y[n] = round( (a[0]·x[n] - Σ_{i=1..16} a[i]·y[n-i]) << 4 ) >> 16
//! ```
//!
//! Fed with an impulse of 4096 it yields the Q12 impulse response used by
//! the codebook search.

use super::LPC_ORDER;
use super::state::EncoderState;
use crate::error::{DspError, Result};
use crate::math::basic_ops::{Word16, Word32, l_msu, l_mult, l_shl, round};

const SYNTHESIS_SHIFT: Word16 = 3;

/// Synthesis-filter `x` into `y` through `1/A(z)`.
///
/// `mem` holds the last 16 outputs of the previous call, oldest first.
/// It is overwritten with the last 16 outputs of this call when `update`
/// is set.
pub fn syn_filt(
    a: &[Word16; LPC_ORDER + 1],
    x: &[Word16],
    y: &mut [Word16],
    mem: &mut [Word16; LPC_ORDER],
    update: bool,
) -> Result<()> {
    if y.len() != x.len() {
        return Err(DspError::InvalidFrameSize {
            expected: x.len(),
            actual: y.len(),
        });
    }

    for n in 0..x.len() {
        let mut s: Word32 = l_mult(x[n], a[0]);
        for i in 1..=LPC_ORDER {
            let past = if i <= n { y[n - i] } else { mem[LPC_ORDER + n - i] };
            s = l_msu(s, a[i], past);
        }
        y[n] = round(l_shl(s, SYNTHESIS_SHIFT));
    }

    if update {
        let len = y.len();
        if len >= LPC_ORDER {
            mem.copy_from_slice(&y[len - LPC_ORDER..]);
        } else {
            mem.copy_within(len.., 0);
            mem[LPC_ORDER - len..].copy_from_slice(y);
        }
    }
    Ok(())
}

/// Streaming [`syn_filt`] with its memory kept in `state`.
pub fn synthesis_filter(
    state: &mut EncoderState,
    a: &[Word16; LPC_ORDER + 1],
    x: &[Word16],
    y: &mut [Word16],
) -> Result<()> {
    syn_filt(a, x, y, &mut state.syn_memory, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::L_SUBFR;
    use crate::speech::residual::compute_residual;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn coefficients(taps: &[(usize, Word16)]) -> [Word16; LPC_ORDER + 1] {
        let mut a = [0; LPC_ORDER + 1];
        a[0] = 4096;
        for &(i, v) in taps {
            a[i] = v;
        }
        a
    }

    fn history(signal: &[Word16]) -> [Word16; LPC_ORDER] {
        let mut mem = [0; LPC_ORDER];
        mem.copy_from_slice(&signal[..LPC_ORDER]);
        mem
    }

    #[test]
    fn test_inverts_integer_residual_exactly() {
        // Whole-unit taps keep every product exact, so 1/A(z) undoes A(z).
        let a = coefficients(&[(1, -4096), (16, 4096)]);
        let mut rng = StdRng::seed_from_u64(11);
        let signal: Vec<Word16> = (0..LPC_ORDER + 2 * L_SUBFR)
            .map(|_| rng.gen_range(-500..500))
            .collect();
        let mut residual = vec![0; 2 * L_SUBFR];
        compute_residual(&a, &signal, &mut residual).unwrap();

        let mut mem = history(&signal);
        let mut rebuilt = vec![0; 2 * L_SUBFR];
        syn_filt(&a, &residual, &mut rebuilt, &mut mem, true).unwrap();
        assert_eq!(&rebuilt[..], &signal[LPC_ORDER..]);
        assert_eq!(&mem[..], &signal[signal.len() - LPC_ORDER..]);
    }

    #[test]
    fn test_inverts_fractional_residual_within_rounding() {
        let a = coefficients(&[(1, -1229), (2, 410), (5, -205), (16, 41)]);
        let mut rng = StdRng::seed_from_u64(12);
        let signal: Vec<Word16> = (0..LPC_ORDER + 4 * L_SUBFR)
            .map(|_| rng.gen_range(-8000..8000))
            .collect();
        let mut residual = vec![0; 4 * L_SUBFR];
        compute_residual(&a, &signal, &mut residual).unwrap();

        let mut mem = history(&signal);
        let mut rebuilt = vec![0; 4 * L_SUBFR];
        syn_filt(&a, &residual, &mut rebuilt, &mut mem, false).unwrap();
        for (n, (&got, &want)) in rebuilt.iter().zip(&signal[LPC_ORDER..]).enumerate() {
            assert!((got as i32 - want as i32).abs() <= 2, "sample {n}: {got} vs {want}");
        }
        assert_eq!(mem, history(&signal));
    }

    #[test]
    fn test_impulse_response_of_one_pole() {
        let a = coefficients(&[(1, -2048)]);
        let mut x = [0; L_SUBFR];
        x[0] = 4096;
        let mut h = [0; L_SUBFR];
        syn_filt(&a, &x, &mut h, &mut [0; LPC_ORDER], false).unwrap();
        for n in 0..=12 {
            assert_eq!(h[n], 4096 >> n, "tap {n}");
        }
        // Round-half-up holds the tail at one unit.
        assert!(h[13..].iter().all(|&v| v == 1));
    }

    #[test]
    fn test_unstable_filter_saturates() {
        let a = coefficients(&[(1, -8192)]);
        let x = [1000; 32];
        let mut y = [0; 32];
        syn_filt(&a, &x, &mut y, &mut [0; LPC_ORDER], false).unwrap();
        assert_eq!(y[31], 32767);
    }

    #[test]
    fn test_streaming_matches_single_call() {
        let a = coefficients(&[(1, -3000), (2, 1200), (16, 77)]);
        let x: Vec<Word16> = (0..3 * L_SUBFR).map(|i| ((i * 53) % 900) as Word16 - 450).collect();

        let mut expected = vec![0; x.len()];
        syn_filt(&a, &x, &mut expected, &mut [0; LPC_ORDER], true).unwrap();

        let mut state = EncoderState::new();
        let mut streamed = vec![0; x.len()];
        let mut start = 0;
        // Includes a chunk shorter than the filter order.
        for len in [L_SUBFR, 7, 2 * L_SUBFR - 7] {
            synthesis_filter(&mut state, &a, &x[start..start + len], &mut streamed[start..start + len])
                .unwrap();
            start += len;
        }
        assert_eq!(streamed, expected);
        assert_eq!(&state.syn_memory[..], &expected[expected.len() - LPC_ORDER..]);
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let a = coefficients(&[]);
        let mut y = [0; 4];
        assert_eq!(
            syn_filt(&a, &[1; 5], &mut y, &mut [0; LPC_ORDER], true),
            Err(DspError::InvalidFrameSize {
                expected: 5,
                actual: 4
            })
        );
    }
}
