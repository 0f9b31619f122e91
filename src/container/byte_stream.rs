// src/container/byte_stream.rs

//! Big-endian read and write helpers for the container format.
//!
//! Single values go through `byteorder`; runs of 16 and 32-bit values are
//! cast to and from byte slices through `bytemuck` big-endian wrappers.

use crate::utils::error::Result;
use bytemuck::{cast_slice, Pod, Zeroable};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

/// Reading side of the container byte order.
pub trait ByteReader: Read {
    fn read_u8(&mut self) -> Result<u8> {
        Ok(ReadBytesExt::read_u8(self)?)
    }

    fn read_u16(&mut self) -> Result<u16> {
        Ok(ReadBytesExt::read_u16::<BigEndian>(self)?)
    }

    fn read_i16(&mut self) -> Result<i16> {
        Ok(ReadBytesExt::read_i16::<BigEndian>(self)?)
    }

    fn read_i32(&mut self) -> Result<i32> {
        Ok(ReadBytesExt::read_i32::<BigEndian>(self)?)
    }

    /// Reads exactly `len` bytes without reserving `len` up front, so a
    /// length taken from a corrupt header fails with `UnexpectedEof` once the
    /// stream runs dry.
    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        (&mut *self).take(len as u64).read_to_end(&mut buffer)?;
        if buffer.len() != len {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("expected {} bytes, stream ended after {}", len, buffer.len()),
            )
            .into());
        }
        Ok(buffer)
    }

    fn read_i8_slice(&mut self, count: usize) -> Result<Vec<i8>> {
        let buffer = self.read_bytes(count)?;
        Ok(buffer.into_iter().map(|b| b as i8).collect())
    }

    /// Efficiently read a run of i16 values in big-endian format using bytemuck
    fn read_i16_slice(&mut self, count: usize) -> Result<Vec<i16>> {
        let buffer = self.read_bytes(count.saturating_mul(2))?;
        let be_values: &[BeI16] = cast_slice(&buffer);
        Ok(be_values.iter().map(|&v| v.into()).collect())
    }

    /// Efficiently read a run of i32 values in big-endian format using bytemuck
    fn read_i32_slice(&mut self, count: usize) -> Result<Vec<i32>> {
        let buffer = self.read_bytes(count.saturating_mul(4))?;
        let be_values: &[BeI32] = cast_slice(&buffer);
        Ok(be_values.iter().map(|&v| v.into()).collect())
    }
}

impl<T: Read> ByteReader for T {}

/// Writing side of the container byte order.
pub trait ByteWriter: Write {
    fn write_u8(&mut self, value: u8) -> Result<()> {
        Ok(WriteBytesExt::write_u8(self, value)?)
    }

    fn write_u16(&mut self, value: u16) -> Result<()> {
        Ok(WriteBytesExt::write_u16::<BigEndian>(self, value)?)
    }

    fn write_i16(&mut self, value: i16) -> Result<()> {
        Ok(WriteBytesExt::write_i16::<BigEndian>(self, value)?)
    }

    fn write_i32(&mut self, value: i32) -> Result<()> {
        Ok(WriteBytesExt::write_i32::<BigEndian>(self, value)?)
    }

    /// Efficiently write a run of i32 values in big-endian format using bytemuck
    fn write_i32_slice(&mut self, values: &[i32]) -> Result<()> {
        self.write_all(&be_i32_bytes(values))?;
        Ok(())
    }
}

impl<T: Write> ByteWriter for T {}

/// Values truncated to i8 as raw bytes.
pub fn i8_bytes(values: &[i32]) -> Vec<u8> {
    values.iter().map(|&v| v as i8 as u8).collect()
}

/// Values truncated to i16 as big-endian bytes.
pub fn be_i16_bytes(values: &[i32]) -> Vec<u8> {
    let be_values: Vec<BeI16> = values.iter().map(|&v| (v as i16).into()).collect();
    cast_slice(&be_values).to_vec()
}

/// Values as big-endian bytes.
pub fn be_i32_bytes(values: &[i32]) -> Vec<u8> {
    let be_values: Vec<BeI32> = values.iter().map(|&v| v.into()).collect();
    cast_slice(&be_values).to_vec()
}

/// Big-endian i16 that can be safely cast to/from bytes
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct BeI16([u8; 2]);

/// Big-endian i32 that can be safely cast to/from bytes
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct BeI32([u8; 4]);

impl From<i16> for BeI16 {
    fn from(value: i16) -> Self {
        BeI16(value.to_be_bytes())
    }
}

impl From<BeI16> for i16 {
    fn from(value: BeI16) -> Self {
        i16::from_be_bytes(value.0)
    }
}

impl From<i32> for BeI32 {
    fn from(value: i32) -> Self {
        BeI32(value.to_be_bytes())
    }
}

impl From<BeI32> for i32 {
    fn from(value: BeI32) -> Self {
        i32::from_be_bytes(value.0)
    }
}
