//! Hard-location storage: the random address table and its counter view.
//!
//! Addresses for all M locations live in one contiguous buffer of packed
//! words, row-major, `words_per_row` words per location. The table is
//! written once at construction and never changes afterwards.

use std::fmt;

use ndarray::ArrayView1;
use rand::Rng;

use crate::memory::binary_vector::{hamming_words, words_for, BinaryVector, WORD_BITS};

/// The immutable address table (Kanerva's matrix A).
#[derive(Clone, PartialEq, Eq)]
pub struct AddressTable {
    /// Packed address bits, `rows * words_per_row` words.
    words: Vec<u64>,

    /// Address dimension N.
    dimension: usize,

    /// Number of hard locations M.
    rows: usize,

    words_per_row: usize,
}

impl AddressTable {
    /// Draw `rows` random addresses of `dimension` bits.
    ///
    /// Location 0 is generated first, and within a location bit 0 first,
    /// one generator draw per bit.
    pub fn generate<R: Rng + ?Sized>(rows: usize, dimension: usize, rng: &mut R) -> Self {
        let words_per_row = words_for(dimension);
        let mut words = Vec::with_capacity(rows * words_per_row);
        for _ in 0..rows {
            let address = BinaryVector::random(dimension, rng);
            words.extend_from_slice(address.words());
        }
        Self {
            words,
            dimension,
            rows,
            words_per_row,
        }
    }

    /// Address dimension N.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of hard locations M.
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Packed words of location `i`.
    pub fn row(&self, i: usize) -> &[u64] {
        let start = i * self.words_per_row;
        &self.words[start..start + self.words_per_row]
    }

    /// Owned copy of the address of location `i`.
    pub fn address(&self, i: usize) -> BinaryVector {
        BinaryVector::from_words(self.row(i).to_vec(), self.dimension)
    }

    /// Hamming distance from location `i` to `query`.
    ///
    /// The caller guarantees `query.len() == self.dimension()`.
    #[inline]
    pub fn distance(&self, i: usize, query: &BinaryVector) -> u32 {
        debug_assert_eq!(query.len(), self.dimension);
        hamming_words(self.row(i), query.words())
    }

    /// Memory footprint of the packed table in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.words.len() * (WORD_BITS / 8)
    }
}

impl fmt::Debug for AddressTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AddressTable(rows={}, dimension={}, bytes={})",
            self.rows,
            self.dimension,
            self.memory_bytes()
        )
    }
}

/// Borrowed view of one hard location: its address and counter row.
#[derive(Clone, Debug)]
pub struct HardLocation<'a> {
    /// Slot index in the table.
    pub index: usize,

    /// Address vector (N bits).
    pub address: BinaryVector,

    /// Counter row (U entries).
    pub counters: ArrayView1<'a, i64>,
}

impl HardLocation<'_> {
    /// True while no write has landed here, or every write has been erased.
    pub fn is_blank(&self) -> bool {
        self.counters.iter().all(|&c| c == 0)
    }
}
