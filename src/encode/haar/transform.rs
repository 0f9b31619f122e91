// src/encode/haar/transform.rs

//! Unnormalized integer Haar transform of one sample line.
//!
//! A coefficient sequence is ordered finest scale first: the first half holds
//! single-pair differences, each following halved block the next coarser
//! scale, and the last entry is the sum of the whole line. A lossy transform
//! at level `L` starts from leaves that already aggregate `2^L` samples, so the
//! finest `L` scales are never computed.
//!
//! Lines whose length is not a power of two are split greedily into the
//! largest power-of-two prefixes that fit (see [`GreedyChunks`]). The split is
//! part of the container contract: nothing but the original length is stored,
//! so the inverse replays the same split to find each chunk's coefficients.

use super::sum_tree::{combine_pairs, SumTree, DIFFERENCE};
use crate::utils::math::{block_size, sup_power_of_two};

/// Lossless transform of a line whose length is a power of two.
///
/// # Panics
/// If `line.len()` is not a power of two.
pub fn transform_power_of_two(line: &[i8]) -> Vec<i32> {
    lossy_transform_power_of_two(line, 0)
}

/// Transform of a power-of-two line discarding the finest `level` scales.
///
/// Returns `line.len() / 2^level` coefficients. Levels deeper than the line
/// keep only the total sum.
///
/// # Panics
/// If `line.len()` is not a power of two.
pub fn lossy_transform_power_of_two(line: &[i8], level: u16) -> Vec<i32> {
    assert!(
        line.len().is_power_of_two(),
        "line length {} is not a power of two",
        line.len()
    );
    let leaf_size = block_size(level).min(line.len());
    coefficients(&SumTree::build(line, leaf_size))
}

/// Detail coefficients of every sibling pair, level by level, then the root.
fn coefficients(tree: &SumTree) -> Vec<i32> {
    let nodes = tree.as_slice();
    let Some((&total, below)) = nodes.split_last() else {
        return Vec::new();
    };
    // Every level below the root has even width, so pairs never straddle levels.
    let mut out = Vec::with_capacity(tree.leaves());
    out.extend(combine_pairs(below, DIFFERENCE));
    out.push(total);
    out
}

/// Exact inverse of [`transform_power_of_two`].
///
/// Bit-exact as long as no intermediate sum of the forward transform left
/// the `i32` range.
///
/// # Panics
/// If `coeffs.len()` is not a power of two.
pub fn inverse_power_of_two(coeffs: &[i32]) -> Vec<i8> {
    inverse_lossy_power_of_two(coeffs, 0)
}

/// Approximate inverse of [`lossy_transform_power_of_two`].
///
/// Produces `coeffs.len() * 2^level` samples where every aligned block of
/// `2^level` samples holds the (truncated) block mean. A single coefficient
/// is returned as a one-sample line.
///
/// # Panics
/// If `coeffs.len()` is not a power of two or the output would not fit in
/// memory addressing.
pub fn inverse_lossy_power_of_two(coeffs: &[i32], level: u16) -> Vec<i8> {
    assert!(
        coeffs.len().is_power_of_two(),
        "coefficient count {} is not a power of two",
        coeffs.len()
    );
    if coeffs.len() == 1 {
        return vec![coeffs[0] as i8];
    }
    let Some(original_size) = coeffs.len().checked_mul(block_size(level)) else {
        panic!(
            "level of loss {} is too deep for {} coefficients",
            level,
            coeffs.len()
        );
    };
    reconstruct(coeffs, original_size)
}

/// Rebuilds `original_size` samples from one power-of-two coefficient block.
///
/// Each wavelet with `how_many` siblings adds `coeff * how_many` to the first
/// half of its support and subtracts it from the second half. The total sum
/// is added back before dividing by `original_size`. Accumulators are 64-bit.
pub(crate) fn reconstruct(coeffs: &[i32], original_size: usize) -> Vec<i8> {
    let size = coeffs.len();
    debug_assert!(size.is_power_of_two());
    debug_assert_eq!(original_size % size, 0);

    let total = i64::from(coeffs[size - 1]);
    let mut acc = vec![0i64; original_size];

    let mut pointer = 0;
    let mut how_many = size / 2;
    while how_many > 0 {
        let step = original_size / (2 * how_many);
        let weight = how_many as i64;
        for (wavelet, &coeff) in coeffs[pointer..pointer + how_many].iter().enumerate() {
            let delta = i64::from(coeff) * weight;
            let start = wavelet * 2 * step;
            let (first, second) = acc[start..start + 2 * step].split_at_mut(step);
            first.iter_mut().for_each(|a| *a += delta);
            second.iter_mut().for_each(|a| *a -= delta);
        }
        pointer += how_many;
        how_many /= 2;
    }

    let divisor = original_size as i64;
    acc.into_iter()
        .map(|a| ((a + total) / divisor) as i8)
        .collect()
}

/// Greedy power-of-two split of a line length.
///
/// Yields the largest power of two that fits the remaining length while at
/// least two samples remain. Chunk sizes strictly decrease; at most one
/// sample is left over (see [`residual`]).
#[derive(Debug, Clone)]
pub struct GreedyChunks {
    remaining: usize,
}

impl Iterator for GreedyChunks {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining < 2 {
            return None;
        }
        let chunk = sup_power_of_two(self.remaining);
        self.remaining -= chunk;
        Some(chunk)
    }
}

/// Chunk sizes of the greedy split of a line of `len` samples.
pub fn greedy_chunks(len: usize) -> GreedyChunks {
    GreedyChunks { remaining: len }
}

/// Samples left untransformed after the greedy split (0 or 1).
pub fn residual(len: usize) -> usize {
    len - greedy_chunks(len).sum::<usize>()
}

/// Coefficients kept for one power-of-two chunk at `level`.
#[inline]
pub fn kept_len(chunk: usize, level: u16) -> usize {
    chunk / block_size(level).min(chunk)
}

/// Length of the coefficient sequence produced for a line of `len` samples.
///
/// # Examples
///
/// ```
/// use wtf_codec::encode::haar::compressed_len;
///
/// assert_eq!(compressed_len(7, 0), 7);
/// assert_eq!(compressed_len(7, 1), 2 + 1 + 1);
/// assert_eq!(compressed_len(12, 3), 1 + 1);
/// ```
pub fn compressed_len(len: usize, level: u16) -> usize {
    greedy_chunks(len).map(|chunk| kept_len(chunk, level)).sum::<usize>() + residual(len)
}

/// Lossless transform of a line of any length.
pub fn transform_arbitrary_length(line: &[i8]) -> Vec<i32> {
    lossy_transform_arbitrary_length(line, 0)
}

/// Transforms every greedy chunk with [`lossy_transform_power_of_two`] and
/// concatenates the results. An odd trailing sample is stored verbatim in
/// one extra final slot.
pub fn lossy_transform_arbitrary_length(line: &[i8], level: u16) -> Vec<i32> {
    let mut out = Vec::with_capacity(compressed_len(line.len(), level));
    let mut offset = 0;
    for chunk in greedy_chunks(line.len()) {
        out.extend(lossy_transform_power_of_two(&line[offset..offset + chunk], level));
        offset += chunk;
    }
    if let Some(&last) = line.get(offset) {
        out.push(i32::from(last));
    }
    out
}

/// Exact inverse of [`transform_arbitrary_length`].
pub fn inverse_arbitrary_length(coeffs: &[i32]) -> Vec<i8> {
    inverse_lossy_arbitrary_length(coeffs, coeffs.len(), 0)
}

/// Inverse of [`lossy_transform_arbitrary_length`] for a line that had
/// `original_len` samples.
///
/// # Panics
/// If `coeffs.len()` differs from `compressed_len(original_len, level)`.
pub fn inverse_lossy_arbitrary_length(coeffs: &[i32], original_len: usize, level: u16) -> Vec<i8> {
    assert_eq!(
        coeffs.len(),
        compressed_len(original_len, level),
        "coefficient count does not match a line of {} samples at level {}",
        original_len,
        level
    );

    let mut out = Vec::with_capacity(original_len);
    let mut read = 0;
    for chunk in greedy_chunks(original_len) {
        let kept = kept_len(chunk, level);
        out.extend(reconstruct(&coeffs[read..read + kept], chunk));
        read += kept;
    }
    if residual(original_len) == 1 {
        out.push(coeffs[read] as i8);
    }
    out
}
