//! Per-channel analysis state
//!
//! Everything the speech routines carry from one call to the next lives
//! here, owned by the caller. There is no global mutable state.

use super::LPC_ORDER;
use crate::config::MAX_PITCH_LAG;
use crate::math::basic_ops::Word16;

/// Open-loop lag reported before the first pitch decision.
pub const INITIAL_PITCH_LAG: usize = 40;

/// Filter memories and pitch history of one encoder channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderState {
    /// Last `LPC_ORDER` input samples of the residual filter, oldest first
    pub lpc_memory: [Word16; LPC_ORDER],
    /// Last `LPC_ORDER` outputs of the synthesis filter, oldest first
    pub syn_memory: [Word16; LPC_ORDER],
    /// Open-loop lag of the previous frame
    pub prev_lag: usize,
    /// Normalized correlation at `prev_lag`, Q15
    pub ol_gain: Word16,
    /// Weighted speech preceding the current pitch frame, oldest first
    pub wsp_history: [Word16; MAX_PITCH_LAG],
}

impl Default for EncoderState {
    fn default() -> Self {
        Self {
            lpc_memory: [0; LPC_ORDER],
            syn_memory: [0; LPC_ORDER],
            prev_lag: INITIAL_PITCH_LAG,
            ol_gain: 0,
            wsp_history: [0; MAX_PITCH_LAG],
        }
    }
}

impl EncoderState {
    /// State at power-up: silent history and the initial pitch lag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return to the power-up state, e.g. after a stream discontinuity.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Append a frame of weighted speech to the pitch history.
    pub(crate) fn push_wsp(&mut self, frame: &[Word16]) {
        let len = frame.len();
        if len >= MAX_PITCH_LAG {
            self.wsp_history.copy_from_slice(&frame[len - MAX_PITCH_LAG..]);
        } else {
            self.wsp_history.copy_within(len.., 0);
            self.wsp_history[MAX_PITCH_LAG - len..].copy_from_slice(frame);
        }
    }
}
