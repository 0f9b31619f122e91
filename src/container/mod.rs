pub mod byte_stream;
pub mod header;
pub mod line;
pub mod wtf;

// Re-export commonly used types
pub use byte_stream::{ByteReader, ByteWriter};
pub use header::{BodyFormat, Header, HEADER_SIZE};
pub use line::{calculate_offsets, decode_line, encode_line, LineOffsets};
pub use wtf::{write_container, write_file, WtfReader};
