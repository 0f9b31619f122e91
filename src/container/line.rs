// src/container/line.rs

//! Variable-width encoding of one coefficient line.
//!
//! A line is written as two big-endian 32-bit offsets followed by three runs:
//! signed bytes up to `short_offset`, signed 16-bit values up to
//! `int_offset`, and signed 32-bit values for the rest. Once a value needs
//! 32 bits every later value is written with 32 bits too.

use super::byte_stream::{be_i16_bytes, be_i32_bytes, i8_bytes, ByteReader};
use crate::utils::error::{Result, WtfError};
use log::trace;
use std::io::{Cursor, Read, Write};

/// Where a line switches from 8 to 16 bits and from 16 to 32 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineOffsets {
    pub short_offset: usize,
    pub int_offset: usize,
}

impl LineOffsets {
    /// Encoded size in bytes of a line of `line_len` values, offsets included.
    pub fn encoded_len(&self, line_len: usize) -> usize {
        8 + self.short_offset
            + 2 * (self.int_offset - self.short_offset)
            + 4 * (line_len - self.int_offset)
    }

    /// Validates offsets read from a stream against the expected line length.
    fn checked(short_offset: i32, int_offset: i32, line_len: usize) -> Result<Self> {
        match (usize::try_from(short_offset), usize::try_from(int_offset)) {
            (Ok(short_offset), Ok(int_offset))
                if short_offset <= int_offset && int_offset <= line_len =>
            {
                Ok(LineOffsets {
                    short_offset,
                    int_offset,
                })
            }
            _ => Err(WtfError::InvalidData(format!(
                "line offsets ({}, {}) out of order for a line of {} values",
                short_offset, int_offset, line_len
            ))),
        }
    }
}

#[inline]
fn fits_i8(v: i32) -> bool {
    i8::try_from(v).is_ok()
}

#[inline]
fn fits_i16(v: i32) -> bool {
    i16::try_from(v).is_ok()
}

/// Finds the first value outside the byte range and the first value outside
/// the 16-bit range.
///
/// Offsets default to `line.len()`. When a value jumps straight from byte to
/// 32-bit range the short region is empty. The scan stops at the first 32-bit
/// value.
pub fn calculate_offsets(line: &[i32]) -> LineOffsets {
    let mut short_offset = None;
    for (i, &value) in line.iter().enumerate() {
        if short_offset.is_none() && !fits_i8(value) {
            short_offset = Some(i);
        }
        if !fits_i16(value) {
            return LineOffsets {
                short_offset: short_offset.unwrap_or(i),
                int_offset: i,
            };
        }
    }
    LineOffsets {
        short_offset: short_offset.unwrap_or(line.len()),
        int_offset: line.len(),
    }
}

/// Encodes one line, offsets first.
pub fn encode_line(line: &[i32]) -> Vec<u8> {
    let offsets = calculate_offsets(line);
    let LineOffsets {
        short_offset,
        int_offset,
    } = offsets;
    trace!("Line offsets ({}, {}) of {}", short_offset, int_offset, line.len());

    let mut out = Vec::with_capacity(offsets.encoded_len(line.len()));
    out.extend_from_slice(&be_i32_bytes(&[short_offset as i32, int_offset as i32]));
    out.extend_from_slice(&i8_bytes(&line[..short_offset]));
    out.extend_from_slice(&be_i16_bytes(&line[short_offset..int_offset]));
    out.extend_from_slice(&be_i32_bytes(&line[int_offset..]));
    out
}

/// Writes one encoded line to `writer`.
pub fn write_line<W: Write>(writer: &mut W, line: &[i32]) -> Result<()> {
    writer.write_all(&encode_line(line))?;
    Ok(())
}

/// Reads one encoded line of `line_len` values from `reader`.
pub fn read_line<R: Read>(reader: &mut R, line_len: usize) -> Result<Vec<i32>> {
    let short_offset = reader.read_i32()?;
    let int_offset = reader.read_i32()?;
    let offsets = LineOffsets::checked(short_offset, int_offset, line_len)?;

    let mut line = Vec::new();
    line.extend(reader.read_i8_slice(offsets.short_offset)?.into_iter().map(i32::from));
    line.extend(
        reader
            .read_i16_slice(offsets.int_offset - offsets.short_offset)?
            .into_iter()
            .map(i32::from),
    );
    line.extend(reader.read_i32_slice(line_len - offsets.int_offset)?);
    Ok(line)
}

/// Decodes a line produced by [`encode_line`].
///
/// Trailing bytes after the line are rejected.
pub fn decode_line(bytes: &[u8], line_len: usize) -> Result<Vec<i32>> {
    let mut cursor = Cursor::new(bytes);
    let line = read_line(&mut cursor, line_len)?;
    let consumed = cursor.position() as usize;
    if consumed != bytes.len() {
        return Err(WtfError::InvalidData(format!(
            "{} trailing bytes after line",
            bytes.len() - consumed
        )));
    }
    Ok(line)
}
