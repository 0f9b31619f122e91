// src/encode/haar/mod.rs

//! Integer Haar wavelet transform engine
//!
//! This module provides the forward and inverse transforms for single lines
//! (power-of-two and arbitrary lengths, lossless and lossy) and their batch
//! application along the height axis of a plane set.

pub mod batch;
pub mod coeff_planes;
pub mod sum_tree;
pub mod transform;


// Re-export commonly used types and functions
pub use batch::*;
pub use coeff_planes::CoeffPlanes;
pub use sum_tree::{sum_tree, SumTree};
pub use transform::*;
