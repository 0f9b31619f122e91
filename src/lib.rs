//! Integer Haar wavelet compression of 8-bit sample planes.
//!
//! Every `(channel, column)` line of a set of planes is transformed along the
//! height axis with an unnormalized integer Haar transform. Lines of any
//! length are split greedily into power-of-two chunks. A level of loss `L`
//! keeps one coefficient per `2^L` samples and reconstructs block means.
//! The coefficients are stored in a small big-endian container, either as
//! plain 32-bit integers or with per-line 8/16/32-bit runs.
//!
//! # Quick Start
//!
//! ```
//! use wtf_codec::{decode, encode, SamplePlanes};
//!
//! // One channel, two columns of three samples each
//! let samples = SamplePlanes::from_nested(&[vec![vec![1, 2, 3], vec![-4, 5, 6]]])?;
//! let bytes = encode(&samples, 0)?;
//! let decoded = decode(&bytes)?;
//! assert_eq!(decoded.samples, samples);
//! # Ok::<(), wtf_codec::WtfError>(())
//! ```
//!
//! # Features
//!
//! - **Lossless and lossy**: level 0 round-trips exactly
//! - **Any line length**: greedy power-of-two partition, odd residual kept
//! - **Two body formats**: Dense (32-bit) and Mixed (8/16/32-bit runs)
//! - **Optional parallelism**: Enable `rayon` feature for per-line parallel transforms

// Core modules
pub mod container;
pub mod encode;
pub mod image;
pub mod utils;

// Public encode/decode API
pub use encode::{
    decode, decode_file, encode, encode_to_file, encode_with, Decoded, EncodeParams,
};

// Line transform (for custom pipelines)
pub use encode::haar::{
    compressed_len, inverse_arbitrary_length, inverse_lossy_arbitrary_length,
    inverse_lossy_transform, inverse_transform, lossy_transform, lossy_transform_arbitrary_length,
    transform, transform_arbitrary_length, CoeffPlanes,
};

// Container types
pub use container::{BodyFormat, Header, WtfReader};

// Image types
pub use image::{Pixel, SamplePlanes};

// Error types
pub use utils::error::{Result, WtfError};

// Constants
pub const WTF_VERSION: &str = "0.3.0";
