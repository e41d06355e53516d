//! Transform lookup tables
//!
//! Twiddle factors for the radix-4 and radix-2 stages, the IMDCT
//! pre/post-rotation factors and the base-4 digit-reversal permutations.
//!
//! The trigonometric tables are generated once on first use and shared
//! read-only afterwards. Each factor is a Q15 `(cos θ, sin θ)` pair rounded
//! with `round(x * 32767)`; the transform multiplies by `e^{-jθ}`.
//!
//! ## Memory Usage
//!
//! - radix-4 long twiddles: 81 triples (stages 256, 64, 16)
//! - radix-4 short twiddles: 18 triples (stages 64, 16)
//! - radix-2 twiddles: 128 pairs
//! - rotation factors: 512 + 64 pairs

use once_cell::sync::Lazy;
use std::f64::consts::PI;

use super::{FFT_RX4_LONG, FFT_RX4_SHORT, IMDCT_LONG, IMDCT_SHORT, MIX_RADIX_LEN};

/// A Q15 rotation factor `(cos θ, sin θ)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Twiddle {
    /// `cos θ` in Q15
    pub cos: i16,
    /// `sin θ` in Q15
    pub sin: i16,
}

impl Twiddle {
    /// Q15 factor for angle `theta` (radians).
    pub fn from_angle(theta: f64) -> Self {
        Self {
            cos: to_q15(theta.cos()),
            sin: to_q15(theta.sin()),
        }
    }
}

fn to_q15(x: f64) -> i16 {
    (x * 32767.0).round().clamp(-32768.0, 32767.0) as i16
}

/// Per-stage twiddle triples in the order the butterflies consume them:
/// for each stage of length `n1` (largest first) and each tap `j` in
/// `1..n1/4`, the factors for angles `2π·m·j/n1`, `m = 1, 2, 3`.
fn radix4_stage_twiddles(n: usize) -> Vec<[Twiddle; 3]> {
    let mut table = Vec::new();
    let mut n2 = n;
    while n2 > 4 {
        let n1 = n2;
        n2 >>= 2;
        for j in 1..n2 {
            let step = 2.0 * PI * j as f64 / n1 as f64;
            table.push([
                Twiddle::from_angle(step),
                Twiddle::from_angle(2.0 * step),
                Twiddle::from_angle(3.0 * step),
            ]);
        }
    }
    table
}

fn rotation_factors(n: usize) -> Vec<Twiddle> {
    (0..n / 4)
        .map(|p| Twiddle::from_angle(2.0 * PI * (p as f64 + 0.125) / n as f64))
        .collect()
}

/// Twiddles for the 256-point radix-4 FFT.
pub static W_256_RX4: Lazy<Vec<[Twiddle; 3]>> = Lazy::new(|| radix4_stage_twiddles(FFT_RX4_LONG));

/// Twiddles for the 64-point radix-4 FFT.
pub static W_64_RX4: Lazy<Vec<[Twiddle; 3]>> = Lazy::new(|| radix4_stage_twiddles(FFT_RX4_SHORT));

/// Radix-2 twiddles `e^{-j2πn/512}` for `n` in `0..128`.
///
/// The second quarter of the combination pass reuses these rotated by `-j`.
pub static W_512_RX2: Lazy<Vec<Twiddle>> = Lazy::new(|| {
    (0..MIX_RADIX_LEN / 4)
        .map(|n| Twiddle::from_angle(2.0 * PI * n as f64 / MIX_RADIX_LEN as f64))
        .collect()
});

/// IMDCT rotation factors `e^{-j2π(p+1/8)/2048}`, 512 entries.
pub static ROTATION_2048: Lazy<Vec<Twiddle>> = Lazy::new(|| rotation_factors(IMDCT_LONG));

/// IMDCT rotation factors `e^{-j2π(p+1/8)/256}`, 64 entries.
pub static ROTATION_256: Lazy<Vec<Twiddle>> = Lazy::new(|| rotation_factors(IMDCT_SHORT));

const fn digit_reverse_table<const N: usize>(digits: u32) -> [u16; N] {
    let mut table = [0u16; N];
    let mut k = 0;
    while k < N {
        let mut rest = k;
        let mut reversed = 0;
        let mut d = 0;
        while d < digits {
            reversed = (reversed << 2) | (rest & 3);
            rest >>= 2;
            d += 1;
        }
        table[k] = reversed as u16;
        k += 1;
    }
    table
}

/// Base-4 digit reversal over 4 digits (256 points).
pub static DIGIT_REVERSE_256: [u16; FFT_RX4_LONG] = digit_reverse_table::<FFT_RX4_LONG>(4);

/// Base-4 digit reversal over 3 digits (64 points).
pub static DIGIT_REVERSE_64: [u16; FFT_RX4_SHORT] = digit_reverse_table::<FFT_RX4_SHORT>(3);

/// Build every lazily generated table up front.
pub fn init_tables() {
    Lazy::force(&W_256_RX4);
    Lazy::force(&W_64_RX4);
    Lazy::force(&W_512_RX2);
    Lazy::force(&ROTATION_2048);
    Lazy::force(&ROTATION_256);
}
