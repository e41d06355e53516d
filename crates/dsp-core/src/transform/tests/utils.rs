//! Shared fixtures for the transform tests

use num_complex::Complex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustfft::FftPlanner;

use crate::transform::peak_bits;

/// Random complex block with components in `[-amplitude, amplitude]`.
pub fn random_block(len: usize, amplitude: i32, seed: u64) -> Vec<Complex<i32>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|_| {
            Complex::new(
                rng.gen_range(-amplitude..=amplitude),
                rng.gen_range(-amplitude..=amplitude),
            )
        })
        .collect()
}

/// Random real coefficients in `[-amplitude, amplitude]`.
pub fn random_coefficients(len: usize, amplitude: i32, seed: u64) -> Vec<i32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(-amplitude..=amplitude)).collect()
}

pub fn block_peak(block: &[Complex<i32>]) -> i32 {
    block
        .iter()
        .fold(0, |acc, v| acc | peak_bits(v.re) | peak_bits(v.im))
}

/// Forward DFT `Σ x[n]·e^{-j2πnk/N}` in double precision.
pub fn reference_fft(block: &[Complex<i32>]) -> Vec<Complex<f64>> {
    let mut buffer: Vec<Complex<f64>> = block
        .iter()
        .map(|v| Complex::new(v.re as f64, v.im as f64))
        .collect();
    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_forward(buffer.len()).process(&mut buffer);
    buffer
}

/// `x[n] = Σ_k X[k]·cos(2π/N·(n + n0)·(k + 1/2))`, `n0 = (N/2 + 1)/2`.
pub fn reference_imdct(coef: &[i32]) -> Vec<f64> {
    let n = 2 * coef.len();
    let n0 = (n as f64 / 2.0 + 1.0) / 2.0;
    let step = 2.0 * std::f64::consts::PI / n as f64;
    (0..n)
        .map(|i| {
            coef.iter()
                .enumerate()
                .filter(|(_, x)| **x != 0)
                .map(|(k, &x)| x as f64 * (step * (i as f64 + n0) * (k as f64 + 0.5)).cos())
                .sum()
        })
        .collect()
}

/// Largest `|a - b|` over two spectra.
pub fn max_error(got: &[Complex<f64>], expected: &[Complex<f64>]) -> f64 {
    got.iter()
        .zip(expected)
        .map(|(a, b)| (a - b).norm())
        .fold(0.0, f64::max)
}

pub fn max_magnitude(spectrum: &[Complex<f64>]) -> f64 {
    spectrum.iter().map(|v| v.norm()).fold(0.0, f64::max)
}
