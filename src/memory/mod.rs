//! Sparse Distributed Memory.
//!
//! - **Binary vectors** packed into `u64` words
//! - **Hard locations** with random addresses and `i64` counter rows
//! - **Hamming activation** with an inclusive radius
//! - **Majority-vote read** over activated counters

pub mod activation;
pub mod binary_vector;
pub mod hard_location;
pub mod sdm;
