//! Error types for the SDM engine.
//!
//! Every error is raised before any counter is touched, so a failed call
//! leaves the engine exactly as it was.

use std::fmt;

/// Which argument of an operation failed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VectorKind {
    /// A query or write address (length N).
    Address,
    /// A memory (data) vector (length U).
    Memory,
}

impl fmt::Display for VectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VectorKind::Address => f.write_str("address"),
            VectorKind::Memory => f.write_str("memory"),
        }
    }
}

/// Shape or content problem with a caller-supplied vector.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum DimensionMismatch {
    /// The vector has the wrong number of entries.
    #[error("{vector} has {actual} entries, expected {expected}")]
    Length {
        vector: VectorKind,
        expected: usize,
        actual: usize,
    },
    /// The vector contains an entry other than 0 or 1.
    #[error("{vector} entry {index} is {value}, expected 0 or 1")]
    NonBinary {
        vector: VectorKind,
        index: usize,
        value: u8,
    },
}

/// Crate-level error type.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SdmError {
    /// Invalid construction parameters. No engine is produced.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A supplied vector does not match the engine's geometry.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(#[from] DimensionMismatch),
}

pub type Result<T> = std::result::Result<T, SdmError>;
