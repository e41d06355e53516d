//! Speech analysis kernels
//!
//! Fixed-point building blocks of an AMR-WB style encoder working on
//! 64-sample subframes:
//!
//! - `residual`: LPC inverse filtering
//! - `synthesis`: LPC synthesis filtering, the inverse of `residual`
//! - `convolve` / `correlation`: filtering, lag correlation and the
//!   backward-filtered target used by the codebook search
//! - `acelp`: 2-track, 2-pulse algebraic codebook search
//! - `isf_vq`: split multi-stage vector quantization
//! - `pitch`: open-loop pitch lag estimation
//! - `state`: per-stream encoder state threaded between calls
//!
//! Q-formats are noted on each entry point. Samples are Q0 unless stated,
//! LPC coefficients and impulse responses are Q12.

pub mod acelp;
pub mod convolve;
pub mod correlation;
pub mod isf_vq;
pub mod pitch;
pub mod residual;
pub mod state;
pub mod synthesis;

pub use acelp::{AcelpCodeword, search_pulses};
pub use convolve::convolve;
pub use correlation::{cor_h_x, correlate};
pub use isf_vq::{Codebook, Survivors, TwoStageVq, VqResult, nearest_codeword, top_k_nearest};
pub use pitch::{OpenLoopPitch, estimate_open_loop_pitch};
pub use residual::{compute_residual, residual_filter};
pub use state::EncoderState;
pub use synthesis::{syn_filt, synthesis_filter};

/// Samples per subframe.
pub const L_SUBFR: usize = 64;

/// LPC analysis order.
pub const LPC_ORDER: usize = 16;
