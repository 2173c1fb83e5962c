//! Scalar and SIMD renditions of elementwise array addition.
//!
//! This crate walks the first example everyone meets when learning SIMD: add
//! two integer arrays elementwise. The interesting part is not the addition
//! but the boundary handling: a fixed-width vector loop over an array whose
//! length is not a multiple of the lane count would read past the end, so the
//! loop is split at the last full vector and the leftovers run through a
//! scalar remainder loop.
//!
//! # Variants
//!
//! - [`add_scalar`] / [`add_scalar_into`] — plain indexed loop
//! - [`add_iter`] — iterator zip the compiler autovectorizes
//! - [`add_simd`] / [`add_simd_into`] — explicit NEON/AVX2 kernels with a
//!   scalar tail, dispatched at runtime
//! - [`vector_split_point`] — the bitmask rounding that separates the two
//!
//! # References
//!
//! - [SIMD chapter](https://en.algorithmica.org/hpc/simd/)

mod elementwise;

pub use elementwise::*;
