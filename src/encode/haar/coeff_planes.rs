// src/encode/haar/coeff_planes.rs

use crate::utils::error::{Result, WtfError};

/// Owns the coefficient lines of every `(channel, column)` pair.
///
/// Lines are stored back to back in `(channel, column)` order, which is also
/// the order they appear in a container body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoeffPlanes {
    channels: usize,
    width: usize,
    line_len: usize,
    data: Vec<i32>,
}

impl CoeffPlanes {
    pub fn new(channels: usize, width: usize, line_len: usize) -> Self {
        CoeffPlanes {
            channels,
            width,
            line_len,
            data: vec![0; channels * width * line_len],
        }
    }

    pub fn from_vec(channels: usize, width: usize, line_len: usize, data: Vec<i32>) -> Result<Self> {
        let expected = channels * width * line_len;
        if data.len() != expected {
            return Err(WtfError::DimensionMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(CoeffPlanes {
            channels,
            width,
            line_len,
            data,
        })
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of coefficients per line (the compressed line length).
    pub fn line_len(&self) -> usize {
        self.line_len
    }

    pub fn line(&self, channel: usize, x: usize) -> &[i32] {
        let start = (channel * self.width + x) * self.line_len;
        &self.data[start..start + self.line_len]
    }

    pub fn line_mut(&mut self, channel: usize, x: usize) -> &mut [i32] {
        let start = (channel * self.width + x) * self.line_len;
        &mut self.data[start..start + self.line_len]
    }

    pub fn lines(&self) -> impl Iterator<Item = &[i32]> + '_ {
        let lines = self.channels * self.width;
        (0..lines).map(move |i| &self.data[i * self.line_len..(i + 1) * self.line_len])
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [i32] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<i32> {
        self.data
    }
}
