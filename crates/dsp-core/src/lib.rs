//! # DSP-Core: Fixed-Point Audio Transform and Codebook Search
//!
//! Block floating-point kernels shared by perceptual audio decoding and
//! CELP speech encoding. Everything operates on 16/32-bit integers with
//! saturating arithmetic; scale is tracked explicitly as a returned
//! exponent rather than through floating point.
//!
//! ## Components
//!
//! - **Arithmetic** ([`math`]): saturating 16/32-bit primitives,
//!   normalization and inverse square root
//! - **Transforms** ([`transform`]): radix-4 FFTs (256 and 64 points), the
//!   512-point mixed-radix composition and the long/short IMDCT
//! - **Speech analysis** ([`speech`]): LPC residual, convolution and
//!   correlation, 2-pulse ACELP search, split multi-stage VQ and open-loop
//!   pitch estimation
//!
//! ## Usage
//!
//! ```rust
//! use dsp_core::transform::{imdct, BlockLength};
//!
//! dsp_core::init()?;
//!
//! let mut coefficients = vec![0i32; BlockLength::Long.coefficients()];
//! coefficients[5] = 1000;
//! let mut samples = vec![0i16; BlockLength::Long.samples()];
//!
//! // Time sample n is samples[n] * 2^exponent.
//! let exponent = imdct(&coefficients, &mut samples, BlockLength::Long)?;
//! assert!(exponent < 0);
//! # Ok::<(), dsp_core::DspError>(())
//! ```
//!
//! ## State
//!
//! Lookup tables are built once on first use and shared read-only. The
//! only mutable state is [`EncoderState`], owned by the caller and passed
//! into the speech routines that need it.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod math;
pub mod speech;
pub mod transform;

// Re-export commonly used types
pub use config::{AnalysisConfig, BlockLength};
pub use error::{DspError, ErrorCategory, Result};
pub use speech::EncoderState;
pub use transform::BlockScale;

/// Version information for the DSP library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the DSP library
///
/// Installs a default tracing subscriber if none is set and builds every
/// lookup table up front so the first transform call does not pay for it.
/// Safe to call multiple times.
pub fn init() -> Result<()> {
    let _ = tracing_subscriber::fmt::try_init();

    transform::tables::init_tables();

    tracing::info!("DSP-Core v{} initialized", VERSION);
    Ok(())
}

/// Get library information
pub fn info() -> LibraryInfo {
    LibraryInfo {
        version: VERSION,
        imdct_lengths: [
            BlockLength::Long.samples(),
            BlockLength::Short.samples(),
        ],
        subframe_length: speech::L_SUBFR,
    }
}

/// Library information structure
#[derive(Debug, Clone)]
pub struct LibraryInfo {
    /// Library version
    pub version: &'static str,
    /// Output lengths of the long and short IMDCT
    pub imdct_lengths: [usize; 2],
    /// Speech subframe length in samples
    pub subframe_length: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init() {
        assert!(init().is_ok());
        // Second call finds the subscriber already set.
        assert!(init().is_ok());
    }

    #[test]
    fn test_info() {
        let info = info();
        assert_eq!(info.version, VERSION);
        assert_eq!(info.imdct_lengths, [2048, 256]);
        assert_eq!(info.subframe_length, 64);
    }
}
