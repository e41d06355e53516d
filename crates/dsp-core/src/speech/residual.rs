//! LPC residual filter
//!
//! Inverse filters a signal through `A(z) = Σ a[i]·z^-i`, `a` in Q12 with
//! `a[0] = 1.0` (4096):
//!
//! ```text
//! y[n] = round( (Σ_{i=0..16} a[i]·x[n-i]) << 4 ) >> 16
//! ```
//!
//! [`compute_residual`] takes the history explicitly as the first 16
//! samples of its input slice. [`residual_filter`] carries it between
//! calls in an [`EncoderState`].

use super::LPC_ORDER;
use super::state::EncoderState;
use crate::error::{DspError, Result};
use crate::math::basic_ops::{Word16, Word32, l_mac, l_mult, l_shl, round};

/// Q12 headroom restored before rounding.
const RESIDUAL_SHIFT: Word16 = 3;

#[inline]
fn filter_sample(a: &[Word16; LPC_ORDER + 1], sample: impl Fn(usize) -> Word16) -> Word16 {
    let mut s: Word32 = l_mult(sample(0), a[0]);
    for i in 1..=LPC_ORDER {
        s = l_mac(s, a[i], sample(i));
    }
    round(l_shl(s, RESIDUAL_SHIFT))
}

/// Residual of `signal[16..]` given `signal[..16]` as filter history.
///
/// `output` receives `signal.len() - 16` samples; a shorter `signal`
/// is rejected.
pub fn compute_residual(
    a: &[Word16; LPC_ORDER + 1],
    signal: &[Word16],
    output: &mut [Word16],
) -> Result<()> {
    let needed = output.len() + LPC_ORDER;
    if signal.len() < needed {
        return Err(DspError::BufferTooSmall {
            needed,
            actual: signal.len(),
        });
    }

    for (n, y) in output.iter_mut().enumerate() {
        let cur = n + LPC_ORDER;
        *y = filter_sample(a, |i| signal[cur - i]);
    }
    Ok(())
}

/// Streaming residual filter: filter `input` into `output`, reading and
/// updating the filter memory held in `state`.
pub fn residual_filter(
    state: &mut EncoderState,
    a: &[Word16; LPC_ORDER + 1],
    input: &[Word16],
    output: &mut [Word16],
) -> Result<()> {
    if output.len() != input.len() {
        return Err(DspError::InvalidFrameSize {
            expected: input.len(),
            actual: output.len(),
        });
    }

    let memory = state.lpc_memory;
    for (n, y) in output.iter_mut().enumerate() {
        *y = filter_sample(a, |i| {
            if i <= n {
                input[n - i]
            } else {
                memory[LPC_ORDER + n - i]
            }
        });
    }

    // Keep the last 16 samples seen, spanning old memory if input is short.
    let len = input.len();
    if len >= LPC_ORDER {
        state.lpc_memory.copy_from_slice(&input[len - LPC_ORDER..]);
    } else {
        state.lpc_memory.copy_within(len.., 0);
        state.lpc_memory[LPC_ORDER - len..].copy_from_slice(input);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::L_SUBFR;

    fn identity() -> [Word16; LPC_ORDER + 1] {
        let mut a = [0; LPC_ORDER + 1];
        a[0] = 4096;
        a
    }

    fn ramp(len: usize) -> Vec<Word16> {
        (0..len).map(|i| (i as Word16 * 37) % 1000 - 500).collect()
    }

    #[test]
    fn test_identity_filter_passes_signal() {
        let signal = ramp(LPC_ORDER + L_SUBFR);
        let mut out = [0; L_SUBFR];
        compute_residual(&identity(), &signal, &mut out).unwrap();
        assert_eq!(&out[..], &signal[LPC_ORDER..]);
    }

    #[test]
    fn test_first_difference_uses_history() {
        let mut a = identity();
        a[1] = -4096;
        let signal = ramp(LPC_ORDER + 8);
        let mut out = [0; 8];
        compute_residual(&a, &signal, &mut out).unwrap();
        for n in 0..8 {
            let cur = n + LPC_ORDER;
            assert_eq!(out[n], signal[cur] - signal[cur - 1]);
        }
    }

    #[test]
    fn test_output_saturates() {
        let mut a = identity();
        a[1] = 4096;
        let signal = vec![32767; LPC_ORDER + 4];
        let mut out = [0; 4];
        compute_residual(&a, &signal, &mut out).unwrap();
        assert!(out.iter().all(|&v| v == 32767));

        let signal = vec![-32768; LPC_ORDER + 4];
        compute_residual(&a, &signal, &mut out).unwrap();
        assert!(out.iter().all(|&v| v == -32768));
    }

    #[test]
    fn test_short_history_is_rejected() {
        let signal = ramp(L_SUBFR);
        let mut out = [0; L_SUBFR];
        assert_eq!(
            compute_residual(&identity(), &signal, &mut out),
            Err(DspError::BufferTooSmall {
                needed: L_SUBFR + LPC_ORDER,
                actual: L_SUBFR
            })
        );
    }

    #[test]
    fn test_streaming_matches_block_filter() {
        let mut a = identity();
        a[1] = -3000;
        a[2] = 1200;
        a[16] = 77;
        let signal = ramp(LPC_ORDER + 4 * L_SUBFR);
        let mut expected = vec![0; 4 * L_SUBFR];
        compute_residual(&a, &signal, &mut expected).unwrap();

        let mut state = EncoderState::new();
        state.lpc_memory.copy_from_slice(&signal[..LPC_ORDER]);
        let mut streamed = vec![0; 4 * L_SUBFR];
        // Uneven chunks, including one shorter than the filter order.
        let mut start = 0;
        for len in [L_SUBFR, 5, L_SUBFR - 5, 2 * L_SUBFR] {
            let input = &signal[LPC_ORDER + start..LPC_ORDER + start + len];
            residual_filter(&mut state, &a, input, &mut streamed[start..start + len]).unwrap();
            start += len;
        }
        assert_eq!(streamed, expected);
    }
}
