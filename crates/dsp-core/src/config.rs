//! Configuration types
//!
//! The transform kernels have fixed sizes and need no configuration beyond
//! the block length. The analysis side (open-loop pitch and multi-stage
//! VQ) exposes its search ranges through [`AnalysisConfig`].

use std::fmt;
use tracing::warn;

use crate::error::{DspError, Result};

/// Largest open-loop pitch lag the history buffers are sized for.
pub const MAX_PITCH_LAG: usize = 143;
/// Largest pitch analysis frame, in samples.
pub const MAX_PITCH_FRAME: usize = 256;
/// Largest survivor list kept by the first VQ stage.
pub const N_SURV_MAX: usize = 4;

/// IMDCT block size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockLength {
    /// 1024 coefficients, 2048 output samples
    Long,
    /// 128 coefficients, 256 output samples
    Short,
}

impl BlockLength {
    /// Number of spectral coefficients consumed
    pub const fn coefficients(self) -> usize {
        self.samples() / 2
    }

    /// Number of time samples produced
    pub const fn samples(self) -> usize {
        match self {
            Self::Long => crate::transform::IMDCT_LONG,
            Self::Short => crate::transform::IMDCT_SHORT,
        }
    }

    /// Complex points of the underlying FFT
    pub const fn fft_points(self) -> usize {
        self.samples() / 4
    }
}

impl fmt::Display for BlockLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Long => write!(f, "long"),
            Self::Short => write!(f, "short"),
        }
    }
}

/// Search ranges for the speech analysis routines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Smallest open-loop pitch lag searched
    pub pitch_lag_min: usize,
    /// Largest open-loop pitch lag searched
    pub pitch_lag_max: usize,
    /// Samples correlated per pitch decision
    pub pitch_frame_length: usize,
    /// Candidates the first VQ stage keeps
    pub vq_survivors: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            pitch_lag_min: 17,
            pitch_lag_max: 115,
            pitch_frame_length: 128,
            vq_survivors: N_SURV_MAX,
        }
    }
}

impl AnalysisConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pitch lag range
    pub fn with_pitch_lags(mut self, min: usize, max: usize) -> Self {
        self.pitch_lag_min = min;
        self.pitch_lag_max = max;
        self
    }

    /// Set the pitch analysis frame length
    pub fn with_pitch_frame_length(mut self, frame_length: usize) -> Self {
        self.pitch_frame_length = frame_length;
        self
    }

    /// Set the number of VQ survivors
    pub fn with_vq_survivors(mut self, survivors: usize) -> Self {
        self.vq_survivors = survivors;
        self
    }

    /// Number of lags in the pitch search range
    pub fn pitch_lag_count(&self) -> usize {
        self.pitch_lag_max - self.pitch_lag_min + 1
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.pitch_lag_min == 0
            || self.pitch_lag_min > self.pitch_lag_max
            || self.pitch_lag_max > MAX_PITCH_LAG
        {
            warn!(
                min = self.pitch_lag_min,
                max = self.pitch_lag_max,
                "rejecting pitch lag range"
            );
            return Err(DspError::invalid_config(format!(
                "pitch lag range {}..={} must satisfy 1 <= min <= max <= {}",
                self.pitch_lag_min, self.pitch_lag_max, MAX_PITCH_LAG
            )));
        }

        if self.pitch_frame_length == 0 || self.pitch_frame_length > MAX_PITCH_FRAME {
            warn!(frame_length = self.pitch_frame_length, "rejecting pitch frame length");
            return Err(DspError::invalid_config(format!(
                "pitch frame length {} outside 1..={}",
                self.pitch_frame_length, MAX_PITCH_FRAME
            )));
        }

        if self.vq_survivors == 0 || self.vq_survivors > N_SURV_MAX {
            warn!(survivors = self.vq_survivors, "rejecting survivor count");
            return Err(DspError::invalid_config(format!(
                "VQ survivor count {} outside 1..={}",
                self.vq_survivors, N_SURV_MAX
            )));
        }

        Ok(())
    }
}
