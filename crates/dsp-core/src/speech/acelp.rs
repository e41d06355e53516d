//! Algebraic codebook search, 2 tracks × 32 positions
//!
//! Places two unit pulses in a 64-sample subframe, one on the even track
//! and one on the odd track, maximizing `(d·c)² / (c·Φ·c)` where `d` is the
//! backward-filtered target and `Φ` the impulse-response correlation
//! matrix. All 1024 pairs are tested.
//!
//! Output formats: `code` is Q9 (±512 per pulse), `filtered` is `code`
//! convolved with `h` and scaled to Q9, and the 12-bit index packs
//! `(pos0 + 32·neg0) << 6 | (pos1 + 32·neg1)`.

use super::L_SUBFR;
use crate::math::basic_ops::{
    MAX_16, MIN_16, Word16, Word32, add, extract_h, l_mac, l_msu, l_mult, l_shl, mult, mult_r,
    negate, round, shr_r,
};
use crate::math::dsp_operations::{dot_product12, isqrt_n};

const NB_TRACK: usize = 2;
const NB_POS: usize = 32;
const STEP: usize = 2;

/// Relative weight of the backward-filtered target in the sign decision (2.0 in Q12).
const ALPHA: Word16 = 8192;

/// Winning codeword of one subframe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcelpCodeword {
    /// Algebraic excitation, Q9
    pub code: [Word16; L_SUBFR],
    /// Excitation filtered through the impulse response, Q9
    pub filtered: [Word16; L_SUBFR],
    /// Packed 12-bit codebook index
    pub index: Word16,
    /// Pulse positions `[even, odd]`
    pub pulses: [usize; NB_TRACK],
}

/// Search the best two-pulse codeword.
///
/// * `dn` - correlation between target and impulse response (< 12 bits), see
///   [`cor_h_x`](super::correlation::cor_h_x)
/// * `cn` - residual after long-term prediction (< 12 bits)
/// * `h` - impulse response of the weighted synthesis filter, Q12
pub fn search_pulses(
    dn: &[Word16; L_SUBFR],
    cn: &[Word16; L_SUBFR],
    h: &[Word16; L_SUBFR],
) -> AcelpCodeword {
    // Energy-normalize cn and dn so the sign decision ignores their scale.
    let norm = isqrt_n(dot_product12(cn, cn));
    let k_cn = round(l_shl(norm.mantissa, norm.exponent + 5));
    let norm = isqrt_n(dot_product12(dn, dn));
    let k_dn = mult_r(ALPHA, round(l_shl(norm.mantissa, norm.exponent + 8)));

    let mut dn = *dn;
    let mut sign = [0 as Word16; L_SUBFR];
    let mut sign_neg = [0 as Word16; L_SUBFR];
    for i in 0..L_SUBFR {
        let blended = (k_cn as i64 * cn[i] as i64 + k_dn as i64 * dn[i] as i64) >> 7;
        if blended >= 0 {
            sign[i] = MAX_16;
            sign_neg[i] = MIN_16;
        } else {
            sign[i] = MIN_16;
            sign_neg[i] = MAX_16;
            dn[i] = negate(dn[i]);
        }
    }

    let h_inv: [Word16; L_SUBFR] = h.map(negate);

    // rrixix[track][pos]: half the energy of h from the pulse to the end
    // of the subframe.
    let mut rrixix = [[0 as Word16; NB_POS]; NB_TRACK];
    let mut cor: Word32 = 0x0001_0000;
    for i in 0..NB_POS {
        cor = l_mac(cor, h[2 * i], h[2 * i]);
        rrixix[1][NB_POS - 1 - i] = extract_h(cor) >> 1;
        cor = l_mac(cor, h[2 * i + 1], h[2 * i + 1]);
        rrixix[0][NB_POS - 1 - i] = extract_h(cor) >> 1;
    }

    // rrixiy[even/2][odd/2]: cross-correlation of two pulses. Each odd lag
    // is one diagonal, accumulated from the end of the subframe backwards.
    let mut rrixiy = [[0 as Word16; NB_POS]; NB_POS];
    for lag in (1..L_SUBFR).step_by(STEP) {
        let mut cor: Word32 = 0x8000;
        for (m, top) in (lag..L_SUBFR).rev().enumerate() {
            cor = l_mac(cor, h[m], h[m + lag]);
            let (i0, i1) = if top % 2 == 1 {
                (top - lag, top)
            } else {
                (top, top - lag)
            };
            rrixiy[i0 / 2][i1 / 2] = extract_h(cor);
        }
    }

    // Fold the pulse signs into the cross terms.
    for i0 in (0..L_SUBFR).step_by(STEP) {
        let psign = if sign[i0] < 0 { &sign_neg } else { &sign };
        for i1 in (1..L_SUBFR).step_by(STEP) {
            let rr = &mut rrixiy[i0 / 2][i1 / 2];
            *rr = mult(*rr, psign[i1]);
        }
    }

    let mut psk: Word16 = -1;
    let mut alpk: Word16 = 1;
    let mut ix = 0;
    let mut iy = 1;
    for i0 in (0..L_SUBFR).step_by(STEP) {
        let ps1 = dn[i0];
        let alp1 = rrixix[0][i0 / 2];
        let mut pos = None;
        for i1 in (1..L_SUBFR).step_by(STEP) {
            let ps2 = add(ps1, dn[i1]);
            let alp2 = add(alp1, add(rrixix[1][i1 / 2], rrixiy[i0 / 2][i1 / 2]));
            let sq = mult(ps2, ps2);
            // sq/alp2 > psk/alpk, cross-multiplied
            let s = l_msu(l_mult(alpk, sq), psk, alp2);
            if s > 0 {
                psk = sq;
                alpk = alp2;
                pos = Some(i1);
            }
        }
        if let Some(i1) = pos {
            ix = i0;
            iy = i1;
        }
    }

    let mut code = [0 as Word16; L_SUBFR];
    let mut place = |pos: usize| -> (Word16, &[Word16; L_SUBFR]) {
        let track_pos = (pos >> 1) as Word16;
        if sign[pos] > 0 {
            code[pos] = 512;
            (track_pos, h)
        } else {
            code[pos] = -512;
            (track_pos + NB_POS as Word16, &h_inv)
        }
    };
    let (i0, resp0) = place(ix);
    let (i1, resp1) = place(iy);
    let index = (i0 << 6) + i1;

    let mut filtered = [0 as Word16; L_SUBFR];
    for (i, y) in filtered.iter_mut().enumerate() {
        let tap0 = if i >= ix { resp0[i - ix] } else { 0 };
        let tap1 = if i >= iy { resp1[i - iy] } else { 0 };
        *y = shr_r(add(tap0, tap1), 3);
    }

    AcelpCodeword {
        code,
        filtered,
        index,
        pulses: [ix, iy],
    }
}
