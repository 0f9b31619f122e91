pub mod encoder;
pub mod haar;

pub use encoder::{
    decode, decode_file, decode_reader, encode, encode_to_file, encode_to_writer, encode_with,
    Decoded, EncodeParams,
};
pub use haar::*;

pub use crate::utils::error::{Result, WtfError};
