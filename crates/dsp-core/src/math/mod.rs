//! Fixed-point arithmetic
//!
//! - `basic_ops`: saturating 16/32-bit primitives (`add`, `l_mac`, `round`, ...)
//! - `normalize`: redundant sign-bit counting for block floating point
//! - `dsp_operations`: normalized dot products and inverse square root

pub mod basic_ops;
pub mod dsp_operations;
pub mod normalize;

pub use basic_ops::{Word16, Word32, MAX_16, MAX_32, MIN_16, MIN_32};
pub use dsp_operations::{dot_product12, isqrt_n, Normalized};
pub use normalize::{norm_l, norm_s, normalize};
