//! Transform test modules
//!
//! Floating-point references come from `rustfft` and a direct IMDCT sum.

mod utils;
