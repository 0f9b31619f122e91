//! In-memory sample planes and conversions from pixel buffers.

pub mod planes;

pub use planes::{Pixel, SamplePlanes};
