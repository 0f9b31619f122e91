// src/container/header.rs

//! The fixed-size container header.
//!
//! ```text
//! byte   format tag        (0 = Dense, 1 = Mixed)
//! int16  channel count
//! int32  original width
//! int32  original height
//! int16  level of loss
//! int32  compressed line length
//! ```
//!
//! All fields are big-endian and signed on the wire; negative values are
//! rejected when reading.

use super::byte_stream::{ByteReader, ByteWriter};
use crate::encode::haar::compressed_len;
use crate::utils::error::{Result, WtfError};
use log::debug;
use std::io::{Read, Write};

/// Size of the encoded header in bytes.
pub const HEADER_SIZE: usize = 1 + 2 + 4 + 4 + 2 + 4;

/// How the container body stores coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum BodyFormat {
    /// Every coefficient as a 32-bit integer.
    Dense = 0,
    /// Per line: two offsets, then 8, 16 and 32-bit runs.
    #[default]
    Mixed = 1,
}

impl TryFrom<u8> for BodyFormat {
    type Error = WtfError;

    fn try_from(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(BodyFormat::Dense),
            1 => Ok(BodyFormat::Mixed),
            other => Err(WtfError::UnsupportedFormat(other)),
        }
    }
}

impl From<BodyFormat> for u8 {
    fn from(format: BodyFormat) -> Self {
        format as u8
    }
}

/// Container header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub format: BodyFormat,
    pub channels: u16,
    pub width: u32,
    pub height: u32,
    pub level_of_loss: u16,
    pub line_len: u32,
}

impl Header {
    /// Builds a header for planes of the given shape, deriving the line length.
    pub fn new(
        format: BodyFormat,
        channels: usize,
        width: usize,
        height: usize,
        level_of_loss: u16,
    ) -> Result<Self> {
        let header = Header {
            format,
            channels: signed_field::<i16, _>("channel count", channels)?,
            width: signed_field::<i32, _>("width", width)?,
            height: signed_field::<i32, _>("height", height)?,
            level_of_loss: signed_field::<i16, _>("level of loss", level_of_loss as usize)?,
            line_len: signed_field::<i32, _>(
                "compressed line length",
                compressed_len(height, level_of_loss),
            )?,
        };
        header.validate()?;
        Ok(header)
    }

    /// Number of `(channel, column)` lines in the body.
    pub fn line_count(&self) -> usize {
        self.channels as usize * self.width as usize
    }

    /// Checks that the line length matches the height and level, and that
    /// the body is addressable.
    pub fn validate(&self) -> Result<()> {
        let expected = compressed_len(self.height as usize, self.level_of_loss);
        if self.line_len as usize != expected {
            return Err(WtfError::DimensionMismatch {
                expected,
                actual: self.line_len as usize,
            });
        }
        if self.line_count().checked_mul(self.line_len as usize).is_none() {
            return Err(WtfError::InvalidHeader(format!(
                "body of {} lines of {} coefficients is too large",
                self.line_count(),
                self.line_len
            )));
        }
        Ok(())
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u8(self.format.into())?;
        writer.write_i16(self.channels as i16)?;
        writer.write_i32(self.width as i32)?;
        writer.write_i32(self.height as i32)?;
        writer.write_i16(self.level_of_loss as i16)?;
        writer.write_i32(self.line_len as i32)?;
        debug!("Wrote header {:?}", self);
        Ok(())
    }

    /// Reads and validates a header. An unknown format tag fails before any
    /// further byte is consumed.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let format = BodyFormat::try_from(reader.read_u8()?)?;
        let channels = non_negative("channel count", reader.read_i16()?.into())?;
        let width = non_negative("width", reader.read_i32()?)?;
        let height = non_negative("height", reader.read_i32()?)?;
        let level_of_loss = non_negative("level of loss", reader.read_i16()?.into())?;
        let line_len = non_negative("compressed line length", reader.read_i32()?)?;

        let header = Header {
            format,
            channels: channels as u16,
            width,
            height,
            level_of_loss: level_of_loss as u16,
            line_len,
        };
        debug!("Read header {:?}", header);
        header.validate()?;
        Ok(header)
    }
}

/// Converts `value` to the unsigned storage type `U` if it fits the signed
/// wire type `S`.
fn signed_field<S, U>(name: &str, value: usize) -> Result<U>
where
    S: TryFrom<usize>,
    U: TryFrom<usize>,
{
    if S::try_from(value).is_err() {
        return Err(WtfError::InvalidArg(format!(
            "{} {} does not fit the container header",
            name, value
        )));
    }
    U::try_from(value)
        .map_err(|_| WtfError::InvalidArg(format!("{} {} is out of range", name, value)))
}

fn non_negative(name: &str, value: i32) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| WtfError::InvalidHeader(format!("negative {}: {}", name, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_header_layout() {
        let header = Header::new(BodyFormat::Mixed, 3, 640, 480, 2).unwrap();
        assert_eq!(header.line_len as usize, compressed_len(480, 2));

        let mut bytes: Vec<u8> = Vec::new();
        header.write_to(&mut bytes).unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE);
        assert_eq!(bytes[0], 1);
        assert_eq!(&bytes[1..3], &[0, 3]);
        assert_eq!(&bytes[3..7], &640u32.to_be_bytes());
        assert_eq!(&bytes[7..11], &480u32.to_be_bytes());
        assert_eq!(&bytes[11..13], &[0, 2]);
        assert_eq!(&bytes[13..17], &header.line_len.to_be_bytes());

        let parsed = Header::read_from(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let mut bytes: Vec<u8> = Vec::new();
        Header::new(BodyFormat::Dense, 1, 1, 1, 0)
            .unwrap()
            .write_to(&mut bytes)
            .unwrap();
        bytes[0] = 2;
        let err = Header::read_from(&mut Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, WtfError::UnsupportedFormat(2)));
        assert!(!err.is_io());
    }

    #[test]
    fn test_negative_field_rejected() {
        let mut bytes: Vec<u8> = Vec::new();
        Header::new(BodyFormat::Dense, 1, 4, 4, 0)
            .unwrap()
            .write_to(&mut bytes)
            .unwrap();
        bytes[3] = 0xFF;
        assert!(matches!(
            Header::read_from(&mut Cursor::new(bytes)),
            Err(WtfError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_inconsistent_line_length_rejected() {
        let mut header = Header::new(BodyFormat::Mixed, 3, 2, 10, 1).unwrap();
        header.line_len += 1;
        let mut bytes: Vec<u8> = Vec::new();
        header.write_to(&mut bytes).unwrap();
        assert!(matches!(
            Header::read_from(&mut Cursor::new(bytes)),
            Err(WtfError::DimensionMismatch { expected: 5, actual: 6 })
        ));
    }

    #[test]
    fn test_truncated_header_is_io_error() {
        let err = Header::read_from(&mut Cursor::new(vec![1u8, 0, 3, 0])).unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_oversized_shape_rejected() {
        assert!(matches!(
            Header::new(BodyFormat::Dense, 40_000, 1, 1, 0),
            Err(WtfError::InvalidArg(_))
        ));
    }
}
