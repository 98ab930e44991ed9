//! # kanerva-sdm
//!
//! Kanerva's **Sparse Distributed Memory**: an associative memory for
//! high-dimensional binary vectors.
//!
//! ## Model
//!
//! 1. **Hard locations**: M slots, each with a random N-bit address
//! 2. **Activation**: every location within Hamming radius H of a query
//! 3. **Write**: activated counters move ±1 toward each memory bit
//! 4. **Read**: per-dimension majority vote over activated counters
//! 5. **Erase**: the exact inverse of a write
//!
//! ## Example
//!
//! ```
//! use kanerva_sdm::KanervaSdm;
//!
//! let mut sdm = KanervaSdm::construct(8, 4, 20, 3, 42).unwrap();
//! let address = sdm.address(0).unwrap().to_bits();
//! sdm.write(&address, &[1, 0, 1, 1]).unwrap();
//! assert_eq!(sdm.read(&address).unwrap(), vec![1, 0, 1, 1]);
//! ```
//!
//! Reference: Pentti Kanerva (1992), *Sparse Distributed Memory and
//! Related Models*.

pub mod error;
pub mod memory;
pub mod runtime;

pub use error::{DimensionMismatch, Result, SdmError, VectorKind};
pub use memory::binary_vector::BinaryVector;
pub use memory::sdm::{KanervaSdm, SdmConfig};

/// Crate-wide constants.
pub mod config {
    /// Seed used when none is given.
    pub const DEFAULT_SEED: u64 = 42;

    /// Reference benchmark address dimension (N).
    pub const DEFAULT_ADDRESS_DIM: usize = 100;

    /// Reference benchmark memory dimension (U).
    pub const DEFAULT_MEMORY_DIM: usize = 100;

    /// Reference benchmark hard-location count (M).
    pub const DEFAULT_NUM_LOCATIONS: usize = 10_000;

    /// Reference benchmark activation radius (H).
    pub const DEFAULT_ACTIVATION_THRESHOLD: usize = 37;

    /// Patterns written and read back by the speed test.
    pub const DEFAULT_NUM_MEMORIES: usize = 10_000;

    /// Bit produced by a read when a dimension's counter sum is zero.
    pub const TIE_BIT: bool = false;

    /// Tables with at least this many locations are scanned with rayon.
    pub const PARALLEL_SCAN_MIN_LOCATIONS: usize = 4096;
}
