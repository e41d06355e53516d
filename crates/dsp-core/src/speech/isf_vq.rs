//! Split multi-stage vector quantization
//!
//! Codebooks are flat `Word16` slices of `dim`-sized entries, borrowed for
//! the lifetime of the quantizer. Distances follow the MAC convention
//! `Σ 2·(x - c)²` and saturate at `MAX_32`.
//!
//! The first stage can keep several candidates ([`top_k_nearest`]) instead
//! of committing to one. [`TwoStageVq`] then refines each survivor with a
//! set of split stage-2 codebooks and keeps the combination with the lowest
//! total distortion.

use crate::config::{AnalysisConfig, N_SURV_MAX};
use crate::error::{DspError, Result};
use crate::math::basic_ops::{MAX_32, Word16, Word32, add, l_add, l_mac, sub};

/// Largest vector dimension handled without allocation.
pub const MAX_VQ_DIM: usize = 16;
/// Largest number of stage-2 splits.
pub const MAX_SPLITS: usize = 5;

/// Immutable view of a codebook
#[derive(Debug, Clone, Copy)]
pub struct Codebook<'a> {
    data: &'a [Word16],
    dim: usize,
}

impl<'a> Codebook<'a> {
    /// Wrap `data` as a codebook of `dim`-dimensional entries.
    pub fn new(data: &'a [Word16], dim: usize) -> Result<Self> {
        if dim == 0 || dim > MAX_VQ_DIM {
            return Err(DspError::invalid_codebook(format!(
                "dimension {dim} outside 1..={MAX_VQ_DIM}"
            )));
        }
        if data.is_empty() || data.len() % dim != 0 {
            return Err(DspError::invalid_codebook(format!(
                "{} values do not form whole {dim}-dimensional entries",
                data.len()
            )));
        }
        Ok(Self { data, dim })
    }

    /// Dimension of every entry
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of entries
    pub fn size(&self) -> usize {
        self.data.len() / self.dim
    }

    /// Entry `index`, or `None` past the end
    pub fn entry(&self, index: usize) -> Option<&'a [Word16]> {
        let start = index.checked_mul(self.dim)?;
        self.data.get(start..start + self.dim)
    }

    fn entries(&self) -> impl Iterator<Item = &'a [Word16]> {
        self.data.chunks_exact(self.dim)
    }

    fn check_vector(&self, len: usize) -> Result<()> {
        if len != self.dim {
            return Err(DspError::InvalidFrameSize {
                expected: self.dim,
                actual: len,
            });
        }
        Ok(())
    }
}

#[inline]
fn distance(x: &[Word16], c: &[Word16]) -> Word32 {
    x.iter().zip(c).fold(0, |dist, (&a, &b)| {
        let t = sub(a, b);
        l_mac(dist, t, t)
    })
}

/// Nearest entry of `codebook` to `x`.
///
/// Returns `(index, distance)` and overwrites `x` with the winning entry.
/// Ties go to the lowest index.
pub fn nearest_codeword(x: &mut [Word16], codebook: &Codebook<'_>) -> Result<(usize, Word32)> {
    codebook.check_vector(x.len())?;

    let mut best = 0;
    let mut best_dist = MAX_32;
    for (i, entry) in codebook.entries().enumerate() {
        let dist = distance(x, entry);
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }

    let winner = &codebook.data[best * codebook.dim..(best + 1) * codebook.dim];
    x.copy_from_slice(winner);
    Ok((best, best_dist))
}

/// Ranked candidates of one search, ascending by distance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Survivors {
    indices: [usize; N_SURV_MAX],
    distances: [Word32; N_SURV_MAX],
    len: usize,
}

impl Survivors {
    /// Number of candidates kept
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no candidate was kept
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Codebook indices, best first
    pub fn indices(&self) -> &[usize] {
        &self.indices[..self.len]
    }

    /// Distances matching [`Survivors::indices`]
    pub fn distances(&self) -> &[Word32] {
        &self.distances[..self.len]
    }

    /// Best candidate first
    pub fn iter(&self) -> impl Iterator<Item = (usize, Word32)> + '_ {
        self.indices().iter().copied().zip(self.distances().iter().copied())
    }
}

/// The `k` entries of `codebook` closest to `x`.
///
/// Slots start as indices `0..k` at `MAX_32`. A new distance is inserted
/// before the first survivor it strictly beats, pushing the rest down, so
/// equal distances keep codebook order.
pub fn top_k_nearest(x: &[Word16], codebook: &Codebook<'_>, k: usize) -> Result<Survivors> {
    codebook.check_vector(x.len())?;
    if k == 0 || k > N_SURV_MAX {
        return Err(DspError::invalid_config(format!(
            "survivor count {k} outside 1..={N_SURV_MAX}"
        )));
    }
    if k > codebook.size() {
        return Err(DspError::invalid_config(format!(
            "{k} survivors requested from a {}-entry codebook",
            codebook.size()
        )));
    }

    let mut survivors = Survivors {
        indices: [0; N_SURV_MAX],
        distances: [MAX_32; N_SURV_MAX],
        len: k,
    };
    for (slot, index) in survivors.indices[..k].iter_mut().zip(0..) {
        *slot = index;
    }

    for (i, entry) in codebook.entries().enumerate() {
        let dist = distance(x, entry);
        if let Some(rank) = survivors.distances[..k].iter().position(|&d| dist < d) {
            survivors.indices.copy_within(rank..k - 1, rank + 1);
            survivors.distances.copy_within(rank..k - 1, rank + 1);
            survivors.indices[rank] = i;
            survivors.distances[rank] = dist;
        }
    }
    Ok(survivors)
}

/// Outcome of a two-stage quantization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VqResult {
    /// Stage-1 entry
    pub stage1: usize,
    stage2: [usize; MAX_SPLITS],
    splits: usize,
    /// Summed stage-2 distance
    pub distortion: Word32,
    quantized: [Word16; MAX_VQ_DIM],
    dim: usize,
}

impl VqResult {
    /// Stage-2 entry for each split, in split order
    pub fn stage2_indices(&self) -> &[usize] {
        &self.stage2[..self.splits]
    }

    /// Reconstructed vector: stage-1 entry plus the stage-2 entries
    pub fn quantized(&self) -> &[Word16] {
        &self.quantized[..self.dim]
    }
}

/// First stage with survivors, second stage split into sub-vectors
#[derive(Debug, Clone)]
pub struct TwoStageVq<'a> {
    stage1: Codebook<'a>,
    stage2: Vec<Codebook<'a>>,
}

impl<'a> TwoStageVq<'a> {
    /// The stage-2 split dimensions must add up to the stage-1 dimension.
    pub fn new(stage1: Codebook<'a>, stage2: Vec<Codebook<'a>>) -> Result<Self> {
        if stage2.is_empty() || stage2.len() > MAX_SPLITS {
            return Err(DspError::invalid_codebook(format!(
                "{} stage-2 splits outside 1..={MAX_SPLITS}",
                stage2.len()
            )));
        }
        let split_dims: usize = stage2.iter().map(Codebook::dim).sum();
        if split_dims != stage1.dim() {
            return Err(DspError::invalid_codebook(format!(
                "stage-2 splits cover {split_dims} dimensions, stage 1 has {}",
                stage1.dim()
            )));
        }
        Ok(Self { stage1, stage2 })
    }

    /// Dimension of the quantized vectors
    pub fn dim(&self) -> usize {
        self.stage1.dim()
    }

    /// Quantize `x`, refining the `config.vq_survivors` best stage-1
    /// entries.
    pub fn quantize(&self, x: &[Word16], config: &AnalysisConfig) -> Result<VqResult> {
        config.validate()?;
        let candidates = top_k_nearest(x, &self.stage1, config.vq_survivors)?;
        let dim = self.dim();
        let mut best: Option<VqResult> = None;

        for (stage1, _) in candidates.iter() {
            let Some(entry) = self.stage1.entry(stage1) else {
                return Err(DspError::internal_error(format!(
                    "survivor {stage1} outside the stage-1 codebook"
                )));
            };

            let mut refined = [0 as Word16; MAX_VQ_DIM];
            for ((r, &a), &c) in refined.iter_mut().zip(x).zip(entry) {
                *r = sub(a, c);
            }

            let mut stage2 = [0; MAX_SPLITS];
            let mut distortion: Word32 = 0;
            let mut offset = 0;
            for (slot, codebook) in stage2.iter_mut().zip(&self.stage2) {
                let split = &mut refined[offset..offset + codebook.dim()];
                let (index, dist) = nearest_codeword(split, codebook)?;
                *slot = index;
                distortion = l_add(distortion, dist);
                offset += codebook.dim();
            }

            if best.as_ref().is_none_or(|b| distortion < b.distortion) {
                let mut quantized = [0 as Word16; MAX_VQ_DIM];
                for ((q, &c), &r) in quantized.iter_mut().zip(entry).zip(&refined) {
                    *q = add(c, r);
                }
                best = Some(VqResult {
                    stage1,
                    stage2,
                    splits: self.stage2.len(),
                    distortion,
                    quantized,
                    dim,
                });
            }
        }

        best.ok_or_else(|| DspError::internal_error("no stage-1 survivor evaluated"))
    }
}
