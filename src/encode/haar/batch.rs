// src/encode/haar/batch.rs

//! Applies the line transform to every `(channel, column)` line of a plane set.
//!
//! Only the height axis is transformed; channels and columns are iterated.
//! With the `rayon` feature lines are processed in parallel. Line order in
//! the output is the same either way.

use super::coeff_planes::CoeffPlanes;
use super::transform::{
    compressed_len, inverse_lossy_arbitrary_length, lossy_transform_arbitrary_length,
};
use crate::image::planes::SamplePlanes;
use log::debug;

/// Lossless transform of every line.
pub fn transform(samples: &SamplePlanes) -> CoeffPlanes {
    lossy_transform(samples, 0)
}

/// Lossy transform of every line at `level`.
pub fn lossy_transform(samples: &SamplePlanes, level: u16) -> CoeffPlanes {
    let line_len = compressed_len(samples.height(), level);
    let mut coeffs = CoeffPlanes::new(samples.channels(), samples.width(), line_len);
    debug!(
        "Transforming {}x{}x{} samples at level {} ({} coefficients per line)",
        samples.channels(),
        samples.width(),
        samples.height(),
        level,
        line_len
    );

    map_lines(
        samples.as_slice(),
        samples.height(),
        coeffs.as_mut_slice(),
        line_len,
        |line| lossy_transform_arbitrary_length(line, level),
    );
    coeffs
}

/// Inverse of [`transform`].
pub fn inverse_transform(coeffs: &CoeffPlanes) -> SamplePlanes {
    inverse_lossy_transform(coeffs, coeffs.line_len(), 0)
}

/// Inverse of [`lossy_transform`].
///
/// `original_height` cannot be derived from the compressed line length and
/// has to be carried alongside the coefficients.
///
/// # Panics
/// If `coeffs.line_len()` is not `compressed_len(original_height, level)`.
pub fn inverse_lossy_transform(coeffs: &CoeffPlanes, original_height: usize, level: u16) -> SamplePlanes {
    assert_eq!(
        coeffs.line_len(),
        compressed_len(original_height, level),
        "compressed line length does not match height {} at level {}",
        original_height,
        level
    );

    let mut samples = SamplePlanes::new(coeffs.channels(), coeffs.width(), original_height);
    map_lines(
        coeffs.as_slice(),
        coeffs.line_len(),
        samples.as_mut_slice(),
        original_height,
        |line| inverse_lossy_arbitrary_length(line, original_height, level),
    );
    samples
}

/// Runs `f` on every `src_len` line of `src` and stores the result in the
/// matching `dst_len` line of `dst`. A non-empty output line always comes
/// from a non-empty input line.
fn map_lines<S, D, F>(src: &[S], src_len: usize, dst: &mut [D], dst_len: usize, f: F)
where
    S: Sync,
    D: Copy + Send,
    F: Fn(&[S]) -> Vec<D> + Sync,
{
    if dst_len == 0 {
        return;
    }
    #[cfg(feature = "rayon")]
    {
        use rayon::prelude::*;
        dst.par_chunks_mut(dst_len)
            .zip(src.par_chunks(src_len))
            .for_each(|(out, line)| out.copy_from_slice(&f(line)));
    }

    #[cfg(not(feature = "rayon"))]
    for (out, line) in dst.chunks_mut(dst_len).zip(src.chunks(src_len)) {
        out.copy_from_slice(&f(line));
    }
}
