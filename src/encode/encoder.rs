// src/encode/encoder.rs

//! Whole-picture encode and decode: transform plus container.

use super::haar::{inverse_lossy_transform, lossy_transform};
use crate::container::{write_container, write_file, BodyFormat, WtfReader};
use crate::image::planes::SamplePlanes;
use crate::utils::error::Result;
use log::info;
use std::io::{Cursor, Read, Write};
use std::path::Path;

/// Parameters controlling how sample planes are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeParams {
    /// 0 is lossless; level `L` keeps one coefficient per `2^L` samples.
    pub level_of_loss: u16,
    /// Body representation in the container.
    pub format: BodyFormat,
}

impl Default for EncodeParams {
    fn default() -> Self {
        EncodeParams {
            level_of_loss: 0,
            format: BodyFormat::Mixed,
        }
    }
}

impl EncodeParams {
    pub fn with_level_of_loss(mut self, level_of_loss: u16) -> Self {
        self.level_of_loss = level_of_loss;
        self
    }

    pub fn with_format(mut self, format: BodyFormat) -> Self {
        self.format = format;
        self
    }
}

/// Planes recovered from a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub samples: SamplePlanes,
    pub original_height: usize,
    pub level_of_loss: u16,
}

/// Encodes `samples` at `level_of_loss` into a Mixed container.
pub fn encode(samples: &SamplePlanes, level_of_loss: u16) -> Result<Vec<u8>> {
    encode_with(samples, &EncodeParams::default().with_level_of_loss(level_of_loss))
}

/// Encodes `samples` into an in-memory container.
pub fn encode_with(samples: &SamplePlanes, params: &EncodeParams) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    encode_to_writer(&mut out, samples, params)?;
    Ok(out)
}

/// Encodes `samples` into `writer`.
pub fn encode_to_writer<W: Write>(
    writer: &mut W,
    samples: &SamplePlanes,
    params: &EncodeParams,
) -> Result<()> {
    let coeffs = lossy_transform(samples, params.level_of_loss);
    write_container(
        writer,
        &coeffs,
        samples.height(),
        params.level_of_loss,
        params.format,
    )?;
    info!(
        "Encoded {}x{}x{} samples, level {}, {:?} body",
        samples.channels(),
        samples.width(),
        samples.height(),
        params.level_of_loss,
        params.format
    );
    Ok(())
}

/// Encodes `samples` into the file at `path`.
pub fn encode_to_file<P: AsRef<Path>>(
    path: P,
    samples: &SamplePlanes,
    params: &EncodeParams,
) -> Result<()> {
    let coeffs = lossy_transform(samples, params.level_of_loss);
    write_file(
        path,
        &coeffs,
        samples.height(),
        params.level_of_loss,
        params.format,
    )
}

/// Decodes an in-memory container.
pub fn decode(bytes: &[u8]) -> Result<Decoded> {
    decode_reader(WtfReader::new(Cursor::new(bytes))?)
}

/// Decodes the container file at `path`.
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<Decoded> {
    decode_reader(WtfReader::open(path)?)
}

/// Reads the body of an opened container and inverts the transform.
pub fn decode_reader<R: Read>(reader: WtfReader<R>) -> Result<Decoded> {
    let original_height = reader.original_height();
    let level_of_loss = reader.level_of_loss();
    // The header has already been checked against compressed_len, so the
    // inverse cannot see a mismatched line length.
    let coeffs = reader.read_data()?;
    let samples = inverse_lossy_transform(&coeffs, original_height, level_of_loss);
    info!(
        "Decoded {}x{}x{} samples at level {}",
        samples.channels(),
        samples.width(),
        original_height,
        level_of_loss
    );
    Ok(Decoded {
        samples,
        original_height,
        level_of_loss,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::WtfError;

    fn ramp(channels: usize, width: usize, height: usize) -> SamplePlanes {
        let data = (0..channels * width * height)
            .map(|i| ((i * 37) % 256) as u8 as i8)
            .collect();
        SamplePlanes::from_vec(channels, width, height, data).unwrap()
    }

    #[test]
    fn test_default_params() {
        let params = EncodeParams::default();
        assert_eq!(params.level_of_loss, 0);
        assert_eq!(params.format, BodyFormat::Mixed);

        let params = params.with_level_of_loss(3).with_format(BodyFormat::Dense);
        assert_eq!(params.level_of_loss, 3);
        assert_eq!(params.format, BodyFormat::Dense);
    }

    #[test]
    fn test_lossless_roundtrip_both_formats() {
        let samples = ramp(3, 4, 9);
        for format in [BodyFormat::Dense, BodyFormat::Mixed] {
            let bytes = encode_with(&samples, &EncodeParams::default().with_format(format)).unwrap();
            let decoded = decode(&bytes).unwrap();
            assert_eq!(decoded.samples, samples);
            assert_eq!(decoded.original_height, 9);
            assert_eq!(decoded.level_of_loss, 0);
        }
    }

    #[test]
    fn test_lossy_keeps_shape() {
        let samples = ramp(2, 3, 13);
        let bytes = encode(&samples, 2).unwrap();
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.level_of_loss, 2);
        assert_eq!(decoded.samples.channels(), 2);
        assert_eq!(decoded.samples.width(), 3);
        assert_eq!(decoded.samples.height(), 13);
    }

    #[test]
    fn test_file_matches_in_memory_container() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ramp.wtf");
        let samples = ramp(2, 5, 11);
        let params = EncodeParams::default()
            .with_level_of_loss(1)
            .with_format(BodyFormat::Dense);

        encode_to_file(&path, &samples, &params).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), encode_with(&samples, &params).unwrap());

        let decoded = decode_file(&path).unwrap();
        assert_eq!(decoded, decode(&encode_with(&samples, &params).unwrap()).unwrap());
    }

    #[test]
    fn test_decode_empty_input() {
        let err = decode(&[]).unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_decode_bad_tag() {
        let mut bytes = encode(&ramp(1, 1, 4), 0).unwrap();
        bytes[0] = 7;
        assert!(matches!(decode(&bytes), Err(WtfError::UnsupportedFormat(7))));
    }
}
