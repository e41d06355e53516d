//! Open-loop pitch estimation
//!
//! Picks the lag that maximizes the raw correlation of the weighted speech
//! with its own past, then reports the normalized correlation
//! `R0 / sqrt(R1·R2)` at that lag as a Q15 voicing gain.

use tracing::debug;

use super::correlation::correlate;
use super::state::EncoderState;
use crate::config::{AnalysisConfig, MAX_PITCH_FRAME, MAX_PITCH_LAG};
use crate::error::{DspError, Result};
use crate::math::basic_ops::{MIN_32, Word16, Word32, l_add, l_mac, l_mult, l_shl, round};
use crate::math::dsp_operations::{Normalized, isqrt_n};
use crate::math::normalize::norm_l;

/// Decision of one open-loop pitch analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenLoopPitch {
    /// Lag in samples
    pub lag: usize,
    /// Normalized correlation at `lag`, Q15
    pub gain: Word16,
}

/// Estimate the open-loop pitch lag of one frame of weighted speech.
///
/// `wsp` must hold exactly `config.pitch_frame_length` samples. The frame
/// is correlated against the history kept in `state`, which is then
/// advanced by the frame along with the lag and gain.
pub fn estimate_open_loop_pitch(
    state: &mut EncoderState,
    config: &AnalysisConfig,
    wsp: &[Word16],
) -> Result<OpenLoopPitch> {
    config.validate()?;
    let frame_length = config.pitch_frame_length;
    if wsp.len() != frame_length {
        return Err(DspError::InvalidFrameSize {
            expected: frame_length,
            actual: wsp.len(),
        });
    }
    let lag_min = config.pitch_lag_min;
    let lag_max = config.pitch_lag_max;

    let mut buffer = [0 as Word16; MAX_PITCH_LAG + MAX_PITCH_FRAME];
    buffer[..lag_max].copy_from_slice(&state.wsp_history[MAX_PITCH_LAG - lag_max..]);
    buffer[lag_max..lag_max + frame_length].copy_from_slice(wsp);
    let signal = &buffer[..lag_max + frame_length];

    let mut corr_buf = [0 as Word32; MAX_PITCH_LAG];
    let corr = &mut corr_buf[..config.pitch_lag_count()];
    correlate(signal, frame_length, lag_min, lag_max, corr)?;

    // Downward scan with `>=`: equal correlations settle on the shorter lag.
    let mut lag = lag_max;
    let mut max = MIN_32;
    for t in (lag_min..=lag_max).rev() {
        if corr[t - lag_min] >= max {
            max = corr[t - lag_min];
            lag = t;
        }
    }

    let gain = normalized_gain(&signal[lag_max..], &signal[lag_max - lag..], frame_length);

    state.prev_lag = lag;
    state.ol_gain = gain;
    state.push_wsp(wsp);

    debug!(lag, gain, "open-loop pitch");
    Ok(OpenLoopPitch { lag, gain })
}

/// `R0 / sqrt(R1·R2)` in Q15 over the first `len` samples of both inputs.
fn normalized_gain(current: &[Word16], delayed: &[Word16], len: usize) -> Word16 {
    let mut r0: Word32 = 0;
    let mut r1: Word32 = 0;
    let mut r2: Word32 = 0;
    for (&x, &y) in current[..len].iter().zip(&delayed[..len]) {
        r0 = l_mac(r0, x, y);
        r1 = l_mac(r1, x, x);
        r2 = l_mac(r2, y, y);
    }
    r1 = l_add(r1, 1);
    r2 = l_add(r2, 1);

    let e0 = norm_l(r0);
    let e1 = norm_l(r1);
    let e2 = norm_l(r2);
    let r0 = l_shl(r0, e0);
    let r1 = l_shl(r1, e1);
    let r2 = l_shl(r2, e2);

    let energy = l_mult(round(r1), round(r2));
    let shift = norm_l(energy);
    let inv = isqrt_n(Normalized {
        mantissa: l_shl(energy, shift),
        exponent: 62 - (e1 + e2 + shift),
    });

    let product = l_mult(round(r0), round(inv.mantissa));
    round(l_shl(product, 31 - e0 + inv.exponent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn sawtooth(len: usize, period: usize) -> Vec<Word16> {
        (0..len)
            .map(|n| ((n % period) as Word16 - (period / 2) as Word16) * 100)
            .collect()
    }

    #[test]
    fn test_periodic_signal_locks_on_period() {
        let config = AnalysisConfig::default();
        let frame = config.pitch_frame_length;
        let signal = sawtooth(4 * frame, 40);
        let mut state = EncoderState::new();

        let mut decisions = Vec::new();
        for chunk in signal.chunks(frame) {
            decisions.push(estimate_open_loop_pitch(&mut state, &config, chunk).unwrap());
        }
        // The first frame only sees part of its history.
        for pitch in &decisions[1..] {
            // Lag 80 correlates exactly as well; the shorter lag wins.
            assert_eq!(pitch.lag, 40);
            assert!(pitch.gain > 32000, "gain {}", pitch.gain);
        }
        assert_eq!(state.prev_lag, 40);
        assert_eq!(state.ol_gain, decisions[3].gain);
    }

    #[test]
    fn test_noise_has_low_gain() {
        let config = AnalysisConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        let mut state = EncoderState::new();
        let mut last = None;
        for _ in 0..3 {
            let frame: Vec<Word16> = (0..config.pitch_frame_length)
                .map(|_| rng.gen_range(-4000..4000))
                .collect();
            last = Some(estimate_open_loop_pitch(&mut state, &config, &frame).unwrap());
        }
        let pitch = last.unwrap();
        assert!((config.pitch_lag_min..=config.pitch_lag_max).contains(&pitch.lag));
        assert!(pitch.gain.abs() < 16384, "gain {}", pitch.gain);
    }

    #[test]
    fn test_silence_picks_shortest_lag() {
        let config = AnalysisConfig::default().with_pitch_lags(20, 60);
        let mut state = EncoderState::new();
        let frame = vec![0; config.pitch_frame_length];
        let pitch = estimate_open_loop_pitch(&mut state, &config, &frame).unwrap();
        assert_eq!(pitch, OpenLoopPitch { lag: 20, gain: 0 });
    }

    #[test]
    fn test_history_advances_with_each_frame() {
        let config = AnalysisConfig::default().with_pitch_frame_length(64);
        let mut state = EncoderState::new();
        let frame: Vec<Word16> = (0..64).map(|i| i * 10).collect();
        estimate_open_loop_pitch(&mut state, &config, &frame).unwrap();
        assert_eq!(&state.wsp_history[MAX_PITCH_LAG - 64..], &frame[..]);
        assert!(state.wsp_history[..MAX_PITCH_LAG - 64].iter().all(|&v| v == 0));
    }

    #[test]
    fn test_rejects_bad_input() {
        let mut state = EncoderState::new();
        let config = AnalysisConfig::default();
        let short = vec![0; config.pitch_frame_length - 1];
        assert!(matches!(
            estimate_open_loop_pitch(&mut state, &config, &short),
            Err(DspError::InvalidFrameSize { .. })
        ));

        let bad = AnalysisConfig::default().with_pitch_lags(50, 10);
        let frame = vec![0; bad.pitch_frame_length];
        assert!(matches!(
            estimate_open_loop_pitch(&mut state, &bad, &frame),
            Err(DspError::InvalidConfig { .. })
        ));
        assert_eq!(state, EncoderState::new());
    }
}
