// src/image/planes.rs

//! Centered 8-bit sample planes, the input and output of the codec.
//!
//! Samples are addressed as `[channel][x][y]` and stored flat so that every
//! `(channel, column)` line along the height axis is one contiguous slice.
//! Helpers convert from and to interleaved RGB buffers such as the ones
//! produced by common image decoders; channels are stored blue, green, red.

use crate::utils::error::{Result, WtfError};
use bytemuck::{Pod, Zeroable};

/// Channel index of blue in planes built from RGB buffers.
pub const BLUE: usize = 0;
/// Channel index of green in planes built from RGB buffers.
pub const GREEN: usize = 1;
/// Channel index of red in planes built from RGB buffers.
pub const RED: usize = 2;
/// Number of channels of planes built from RGB buffers.
pub const NO_OF_COLORS: usize = 3;

/// A single RGB pixel with 8-bit components.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Pixel {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Pixel { r, g, b }
    }

    /// Unpacks a `0x00RRGGBB` integer.
    pub fn from_rgb_int(rgb: u32) -> Self {
        Pixel {
            r: (rgb >> 16) as u8,
            g: (rgb >> 8) as u8,
            b: rgb as u8,
        }
    }

    /// Packs into a `0x00RRGGBB` integer.
    pub fn to_rgb_int(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }

    /// Centered samples in channel order (blue, green, red).
    pub fn to_samples(self) -> [i8; NO_OF_COLORS] {
        [center(self.b), center(self.g), center(self.r)]
    }

    /// Inverse of [`Pixel::to_samples`].
    pub fn from_samples(samples: [i8; NO_OF_COLORS]) -> Self {
        Pixel {
            r: uncenter(samples[RED]),
            g: uncenter(samples[GREEN]),
            b: uncenter(samples[BLUE]),
        }
    }
}

/// Maps an unsigned intensity to the centered range `[-128, 127]`.
#[inline]
pub fn center(v: u8) -> i8 {
    (v as i16 - 128) as i8
}

/// Maps a centered sample back to an unsigned intensity.
#[inline]
pub fn uncenter(v: i8) -> u8 {
    (v as i16 + 128) as u8
}

/// Owned 3D sample structure `samples[channel][x][y]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplePlanes {
    channels: usize,
    width: usize,
    height: usize,
    data: Vec<i8>,
}

impl SamplePlanes {
    /// Zero-filled planes.
    pub fn new(channels: usize, width: usize, height: usize) -> Self {
        Self {
            channels,
            width,
            height,
            data: vec![0; channels * width * height],
        }
    }

    /// Wraps a flat buffer laid out as `(channel, x, y)` with `y` fastest.
    pub fn from_vec(channels: usize, width: usize, height: usize, data: Vec<i8>) -> Result<Self> {
        let expected = channels * width * height;
        if data.len() != expected {
            return Err(WtfError::DimensionMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            channels,
            width,
            height,
            data,
        })
    }

    /// Builds planes from nested `samples[channel][x][y]` vectors.
    ///
    /// Every channel must have the same width and every column the same height.
    pub fn from_nested(samples: &[Vec<Vec<i8>>]) -> Result<Self> {
        let channels = samples.len();
        let width = samples.first().map_or(0, |c| c.len());
        let height = samples
            .first()
            .and_then(|c| c.first())
            .map_or(0, |column| column.len());

        let mut data = Vec::with_capacity(channels * width * height);
        for channel in samples {
            if channel.len() != width {
                return Err(WtfError::DimensionMismatch {
                    expected: width,
                    actual: channel.len(),
                });
            }
            for column in channel {
                if column.len() != height {
                    return Err(WtfError::DimensionMismatch {
                        expected: height,
                        actual: column.len(),
                    });
                }
                data.extend_from_slice(column);
            }
        }
        Self::from_vec(channels, width, height, data)
    }

    /// Splits a row-major interleaved RGB buffer into centered B, G, R planes.
    pub fn from_rgb(width: usize, height: usize, rgb: &[u8]) -> Result<Self> {
        let expected = width * height * NO_OF_COLORS;
        if rgb.len() != expected {
            return Err(WtfError::DimensionMismatch {
                expected,
                actual: rgb.len(),
            });
        }
        let pixels: &[Pixel] = bytemuck::cast_slice(rgb);

        let mut planes = Self::new(NO_OF_COLORS, width, height);
        for y in 0..height {
            for x in 0..width {
                let samples = pixels[y * width + x].to_samples();
                for (channel, &sample) in samples.iter().enumerate() {
                    planes.set(channel, x, y, sample);
                }
            }
        }
        Ok(planes)
    }

    /// Reassembles a row-major interleaved RGB buffer from three B, G, R planes.
    pub fn to_rgb(&self) -> Result<Vec<u8>> {
        if self.channels != NO_OF_COLORS {
            return Err(WtfError::DimensionMismatch {
                expected: NO_OF_COLORS,
                actual: self.channels,
            });
        }
        let mut pixels = Vec::with_capacity(self.width * self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                pixels.push(Pixel::from_samples([
                    self.get(BLUE, x, y),
                    self.get(GREEN, x, y),
                    self.get(RED, x, y),
                ]));
            }
        }
        Ok(bytemuck::cast_slice(&pixels).to_vec())
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, channel: usize, x: usize, y: usize) -> usize {
        debug_assert!(channel < self.channels && x < self.width && y < self.height);
        (channel * self.width + x) * self.height + y
    }

    #[inline]
    pub fn get(&self, channel: usize, x: usize, y: usize) -> i8 {
        self.data[self.index(channel, x, y)]
    }

    #[inline]
    pub fn set(&mut self, channel: usize, x: usize, y: usize, value: i8) {
        let i = self.index(channel, x, y);
        self.data[i] = value;
    }

    /// The line along the height axis at `(channel, x)`.
    pub fn line(&self, channel: usize, x: usize) -> &[i8] {
        let start = (channel * self.width + x) * self.height;
        &self.data[start..start + self.height]
    }

    pub fn line_mut(&mut self, channel: usize, x: usize) -> &mut [i8] {
        let start = (channel * self.width + x) * self.height;
        &mut self.data[start..start + self.height]
    }

    /// All lines in `(channel, column)` order.
    pub fn lines(&self) -> impl Iterator<Item = &[i8]> + '_ {
        let lines = self.channels * self.width;
        (0..lines).map(move |i| &self.data[i * self.height..(i + 1) * self.height])
    }

    pub fn as_slice(&self) -> &[i8] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [i8] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<i8> {
        self.data
    }

    /// Nested `samples[channel][x][y]` copy of the planes.
    pub fn to_nested(&self) -> Vec<Vec<Vec<i8>>> {
        (0..self.channels)
            .map(|c| (0..self.width).map(|x| self.line(c, x).to_vec()).collect())
            .collect()
    }
}
