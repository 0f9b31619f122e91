// src/container/wtf.rs

//! Reading and writing whole compressed-picture containers.
//!
//! A container is a [`Header`] followed by every `(channel, column)` line in
//! row-major order, either as plain 32-bit integers (Dense) or as
//! variable-width lines (Mixed). Header and body are written in one pass; a
//! failure part way leaves an unusable container behind.

use super::byte_stream::{ByteReader, ByteWriter};
use super::header::{BodyFormat, Header};
use super::line::{read_line, write_line};
use crate::encode::haar::CoeffPlanes;
use crate::utils::error::{Result, WtfError};
use log::{debug, info};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Writes a container holding `coeffs`, the transform of planes that were
/// `original_height` samples high, at `level_of_loss`.
pub fn write_container<W: Write>(
    writer: &mut W,
    coeffs: &CoeffPlanes,
    original_height: usize,
    level_of_loss: u16,
    format: BodyFormat,
) -> Result<()> {
    let header = Header::new(
        format,
        coeffs.channels(),
        coeffs.width(),
        original_height,
        level_of_loss,
    )?;
    if header.line_len as usize != coeffs.line_len() {
        return Err(WtfError::DimensionMismatch {
            expected: header.line_len as usize,
            actual: coeffs.line_len(),
        });
    }

    header.write_to(writer)?;
    match format {
        BodyFormat::Dense => writer.write_i32_slice(coeffs.as_slice())?,
        BodyFormat::Mixed => {
            for line in coeffs.lines() {
                write_line(writer, line)?;
            }
        }
    }
    debug!(
        "Wrote {:?} body of {} lines x {} coefficients",
        format,
        header.line_count(),
        header.line_len
    );
    Ok(())
}

/// Writes a container to the file at `path`, replacing any existing file.
pub fn write_file<P: AsRef<Path>>(
    path: P,
    coeffs: &CoeffPlanes,
    original_height: usize,
    level_of_loss: u16,
    format: BodyFormat,
) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    write_container(&mut writer, coeffs, original_height, level_of_loss, format)?;
    writer.flush()?;
    info!("Wrote container {}", path.as_ref().display());
    Ok(())
}

/// Reads a container. The header is parsed as soon as the reader is created,
/// so its fields are available before the body is read.
#[derive(Debug)]
pub struct WtfReader<R: Read> {
    reader: R,
    header: Header,
}

impl WtfReader<BufReader<File>> {
    /// Opens the container file at `path` and reads its header.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        debug!("Opened container {}", path.as_ref().display());
        Self::new(BufReader::new(file))
    }
}

impl<R: Read> WtfReader<R> {
    pub fn new(mut reader: R) -> Result<Self> {
        let header = Header::read_from(&mut reader)?;
        Ok(WtfReader { reader, header })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn format(&self) -> BodyFormat {
        self.header.format
    }

    pub fn channels(&self) -> usize {
        self.header.channels as usize
    }

    pub fn original_width(&self) -> usize {
        self.header.width as usize
    }

    pub fn original_height(&self) -> usize {
        self.header.height as usize
    }

    pub fn level_of_loss(&self) -> u16 {
        self.header.level_of_loss
    }

    /// Length of every coefficient line in the body.
    pub fn compressed_height(&self) -> usize {
        self.header.line_len as usize
    }

    /// Reads the body in the format named by the header.
    pub fn read_data(self) -> Result<CoeffPlanes> {
        match self.header.format {
            BodyFormat::Dense => self.read_dense_data(),
            BodyFormat::Mixed => self.read_mixed_data(),
        }
    }

    /// Reads the body as plain 32-bit integers.
    pub fn read_dense_data(mut self) -> Result<CoeffPlanes> {
        let line_len = self.compressed_height();
        let mut data = Vec::new();
        if line_len > 0 {
            for _ in 0..self.header.line_count() {
                data.extend(self.reader.read_i32_slice(line_len)?);
            }
        }
        self.into_planes(data)
    }

    /// Reads the body as variable-width lines.
    pub fn read_mixed_data(mut self) -> Result<CoeffPlanes> {
        let line_len = self.compressed_height();
        let mut data = Vec::new();
        for _ in 0..self.header.line_count() {
            data.extend(read_line(&mut self.reader, line_len)?);
        }
        self.into_planes(data)
    }

    fn into_planes(self, data: Vec<i32>) -> Result<CoeffPlanes> {
        debug!(
            "Read {} coefficients ({} lines)",
            data.len(),
            self.header.line_count()
        );
        CoeffPlanes::from_vec(
            self.channels(),
            self.original_width(),
            self.compressed_height(),
            data,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::header::HEADER_SIZE;
    use std::io::Cursor;

    fn sample_coeffs() -> CoeffPlanes {
        // 2 channels, 3 columns, height 5 -> 5 coefficients per line
        let data: Vec<i32> = (0..30).map(|i| (i - 15) * (i * i) * 11).collect();
        CoeffPlanes::from_vec(2, 3, 5, data).unwrap()
    }

    #[test]
    fn test_dense_body_layout() {
        let coeffs = sample_coeffs();
        let mut bytes: Vec<u8> = Vec::new();
        write_container(&mut bytes, &coeffs, 5, 0, BodyFormat::Dense).unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE + 30 * 4);
        assert_eq!(bytes[0], 0);
        // Second coefficient of the first line
        let second = i32::from_be_bytes(bytes[HEADER_SIZE + 4..HEADER_SIZE + 8].try_into().unwrap());
        assert_eq!(second, coeffs.line(0, 0)[1]);

        let reader = WtfReader::new(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.format(), BodyFormat::Dense);
        assert_eq!(reader.channels(), 2);
        assert_eq!(reader.original_width(), 3);
        assert_eq!(reader.original_height(), 5);
        assert_eq!(reader.compressed_height(), 5);
        assert_eq!(reader.read_data().unwrap(), coeffs);
    }

    #[test]
    fn test_mixed_roundtrip() {
        let coeffs = sample_coeffs();
        let mut bytes: Vec<u8> = Vec::new();
        write_container(&mut bytes, &coeffs, 5, 0, BodyFormat::Mixed).unwrap();
        assert_eq!(bytes[0], 1);

        let reader = WtfReader::new(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.read_data().unwrap(), coeffs);
    }

    #[test]
    fn test_line_length_must_match_height() {
        let coeffs = sample_coeffs();
        let mut bytes: Vec<u8> = Vec::new();
        let err = write_container(&mut bytes, &coeffs, 6, 0, BodyFormat::Mixed).unwrap_err();
        assert!(matches!(err, WtfError::DimensionMismatch { expected: 6, actual: 5 }));
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_truncated_body_is_io_error() {
        let coeffs = sample_coeffs();
        for format in [BodyFormat::Dense, BodyFormat::Mixed] {
            let mut bytes: Vec<u8> = Vec::new();
            write_container(&mut bytes, &coeffs, 5, 0, format).unwrap();
            bytes.truncate(bytes.len() - 3);
            let err = WtfReader::new(Cursor::new(bytes))
                .unwrap()
                .read_data()
                .unwrap_err();
            assert!(err.is_io(), "{:?}", format);
        }
    }

    /// A consistent header for one line of `i32::MAX` samples.
    fn oversized_header(format: BodyFormat) -> Vec<u8> {
        let height = i32::MAX as usize;
        let header = Header::new(format, 1, 1, height, 0).unwrap();
        assert_eq!(header.line_len as usize, height);
        let mut bytes: Vec<u8> = Vec::new();
        header.write_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_oversized_header_with_missing_body_is_io_error() {
        for format in [BodyFormat::Dense, BodyFormat::Mixed] {
            let bytes = oversized_header(format);
            assert_eq!(bytes.len(), HEADER_SIZE);
            let err = WtfReader::new(Cursor::new(bytes))
                .unwrap()
                .read_data()
                .unwrap_err();
            assert!(err.is_io(), "{:?}: {:?}", format, err);
        }
    }

    #[test]
    fn test_oversized_mixed_line_with_short_body_is_io_error() {
        // Offsets (0, 0) announce i32::MAX 32-bit values; only two follow.
        let mut bytes = oversized_header(BodyFormat::Mixed);
        bytes.extend_from_slice(&[0u8; 8]);
        bytes.extend_from_slice(&[0, 0, 0, 1, 0, 0, 0, 2]);
        let err = WtfReader::new(Cursor::new(bytes))
            .unwrap()
            .read_data()
            .unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_empty_lines_need_no_body() {
        let header = Header::new(BodyFormat::Dense, 3, 1 << 30, 0, 0).unwrap();
        let mut bytes: Vec<u8> = Vec::new();
        header.write_to(&mut bytes).unwrap();
        let coeffs = WtfReader::new(Cursor::new(bytes)).unwrap().read_data().unwrap();
        assert_eq!(coeffs.line_len(), 0);
        assert!(coeffs.as_slice().is_empty());
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planes.wtf");
        let coeffs = sample_coeffs();
        write_file(&path, &coeffs, 5, 0, BodyFormat::Mixed).unwrap();

        let reader = WtfReader::open(&path).unwrap();
        assert_eq!(reader.header().line_len, 5);
        assert_eq!(reader.read_mixed_data().unwrap(), coeffs);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = WtfReader::open(dir.path().join("missing.wtf")).unwrap_err();
        assert!(err.is_io());
    }
}
