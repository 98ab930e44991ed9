//! Fixed-length binary vectors for SDM addresses and memories.
//!
//! Bits are packed little-endian into `u64` words: bit i lives at
//! `(words[i / 64] >> (i % 64)) & 1`. Padding bits past `len` are always
//! zero, so Hamming distance is a plain popcount over the words.

use std::fmt;

use rand::Rng;

use crate::error::{DimensionMismatch, Result, VectorKind};

/// Number of bits per storage word.
pub const WORD_BITS: usize = 64;

/// Number of `u64` words needed to hold `len` bits.
pub const fn words_for(len: usize) -> usize {
    (len + WORD_BITS - 1) / WORD_BITS
}

/// A packed binary vector of fixed length.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BinaryVector {
    words: Vec<u64>,
    len: usize,
}

impl BinaryVector {
    /// All-zero vector of `len` bits.
    pub fn zeros(len: usize) -> Self {
        Self {
            words: vec![0u64; words_for(len)],
            len,
        }
    }

    /// All-one vector of `len` bits.
    pub fn ones(len: usize) -> Self {
        let mut v = Self::zeros(len);
        for i in 0..len {
            v.set_bit(i, true);
        }
        v
    }

    /// Random vector, each bit an independent fair coin.
    ///
    /// Bits are drawn in index order, one draw per bit, so the result is a
    /// pure function of the generator state.
    pub fn random<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        let mut v = Self::zeros(len);
        for i in 0..len {
            if rng.gen::<bool>() {
                v.set_bit(i, true);
            }
        }
        v
    }

    /// Build from a slice of 0/1 entries, checking length and content.
    pub fn parse(bits: &[u8], expected_len: usize, kind: VectorKind) -> Result<Self> {
        if bits.len() != expected_len {
            return Err(DimensionMismatch::Length {
                vector: kind,
                expected: expected_len,
                actual: bits.len(),
            }
            .into());
        }
        let mut v = Self::zeros(expected_len);
        for (i, &b) in bits.iter().enumerate() {
            match b {
                0 => {}
                1 => v.set_bit(i, true),
                value => {
                    return Err(DimensionMismatch::NonBinary {
                        vector: kind,
                        index: i,
                        value,
                    }
                    .into())
                }
            }
        }
        Ok(v)
    }

    /// Build from booleans. Cannot fail.
    pub fn from_bools(bits: &[bool]) -> Self {
        let mut v = Self::zeros(bits.len());
        for (i, &b) in bits.iter().enumerate() {
            if b {
                v.set_bit(i, true);
            }
        }
        v
    }

    /// Build from packed words. Bits past `len` are cleared.
    pub fn from_words(mut words: Vec<u64>, len: usize) -> Self {
        words.resize(words_for(len), 0);
        let tail = len % WORD_BITS;
        if tail != 0 {
            if let Some(last) = words.last_mut() {
                *last &= (1u64 << tail) - 1;
            }
        }
        Self { words, len }
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Packed storage words.
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Get bit at position i.
    pub fn get_bit(&self, i: usize) -> bool {
        assert!(i < self.len, "bit {} out of range for length {}", i, self.len);
        (self.words[i / WORD_BITS] >> (i % WORD_BITS)) & 1 == 1
    }

    /// Set bit at position i.
    pub fn set_bit(&mut self, i: usize, val: bool) {
        assert!(i < self.len, "bit {} out of range for length {}", i, self.len);
        let mask = 1u64 << (i % WORD_BITS);
        if val {
            self.words[i / WORD_BITS] |= mask;
        } else {
            self.words[i / WORD_BITS] &= !mask;
        }
    }

    /// Flip bit at position i.
    pub fn flip_bit(&mut self, i: usize) {
        let current = self.get_bit(i);
        self.set_bit(i, !current);
    }

    /// Hamming distance to another vector of the same length.
    pub fn hamming_distance(&self, other: &BinaryVector) -> u32 {
        assert_eq!(self.len, other.len, "hamming distance needs equal lengths");
        hamming_words(&self.words, &other.words)
    }

    /// NOT (flip all bits).
    pub fn not(&self) -> BinaryVector {
        let words = self.words.iter().map(|&w| !w).collect();
        BinaryVector::from_words(words, self.len)
    }

    /// Population count (number of 1-bits).
    pub fn popcount(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    /// Fraction of bits that are 1.
    pub fn density(&self) -> f64 {
        if self.len == 0 {
            return 0.0;
        }
        self.popcount() as f64 / self.len as f64
    }

    /// Iterate bits in index order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |i| self.get_bit(i))
    }

    /// Unpack to one `u8` (0 or 1) per bit.
    pub fn to_bits(&self) -> Vec<u8> {
        self.iter().map(u8::from).collect()
    }
}

/// Popcount distance between two packed rows of equal word length.
#[inline]
pub fn hamming_words(a: &[u64], b: &[u64]) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x ^ y).count_ones())
        .sum()
}

impl fmt::Debug for BinaryVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BinaryVector(len={}, popcount={}, density={:.3})",
            self.len,
            self.popcount(),
            self.density()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SdmError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_zeros() {
        let v = BinaryVector::zeros(100);
        assert_eq!(v.len(), 100);
        assert_eq!(v.popcount(), 0);
        assert_eq!(v.words().len(), 2);
    }

    #[test]
    fn test_ones_respects_padding() {
        let v = BinaryVector::ones(70);
        assert_eq!(v.popcount(), 70);
        assert_eq!(v.words()[1], (1u64 << 6) - 1);
    }

    #[test]
    fn test_random_density() {
        let mut rng = StdRng::seed_from_u64(42);
        let v = BinaryVector::random(10_000, &mut rng);
        let d = v.density();
        assert!(d > 0.45 && d < 0.55, "density = {}", d);
    }

    #[test]
    fn test_random_is_reproducible() {
        let a = BinaryVector::random(257, &mut StdRng::seed_from_u64(7));
        let b = BinaryVector::random(257, &mut StdRng::seed_from_u64(7));
        let c = BinaryVector::random(257, &mut StdRng::seed_from_u64(8));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_parse_round_trip() {
        let bits = vec![1, 0, 0, 1, 1, 0, 1];
        let v = BinaryVector::parse(&bits, 7, VectorKind::Memory).unwrap();
        assert_eq!(v.to_bits(), bits);
        assert_eq!(v.popcount(), 4);
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        let err = BinaryVector::parse(&[0, 1, 1], 4, VectorKind::Address).unwrap_err();
        assert_eq!(
            err,
            SdmError::DimensionMismatch(DimensionMismatch::Length {
                vector: VectorKind::Address,
                expected: 4,
                actual: 3,
            })
        );
    }

    #[test]
    fn test_parse_rejects_non_binary() {
        let err = BinaryVector::parse(&[0, 1, 2, 1], 4, VectorKind::Memory).unwrap_err();
        assert_eq!(
            err,
            SdmError::DimensionMismatch(DimensionMismatch::NonBinary {
                vector: VectorKind::Memory,
                index: 2,
                value: 2,
            })
        );
    }

    #[test]
    fn test_hamming_complement_is_full_length() {
        let v = BinaryVector::random(130, &mut StdRng::seed_from_u64(1));
        assert_eq!(v.hamming_distance(&v.not()), 130);
        assert_eq!(v.hamming_distance(&v), 0);
    }

    #[test]
    fn test_hamming_symmetry() {
        let mut rng = StdRng::seed_from_u64(3);
        let a = BinaryVector::random(100, &mut rng);
        let b = BinaryVector::random(100, &mut rng);
        assert_eq!(a.hamming_distance(&b), b.hamming_distance(&a));
    }

    #[test]
    fn test_flip_bit_moves_distance_by_one() {
        let a = BinaryVector::random(64, &mut StdRng::seed_from_u64(5));
        let mut b = a.clone();
        b.flip_bit(17);
        assert_eq!(a.hamming_distance(&b), 1);
    }

    #[test]
    fn test_from_words_clears_padding() {
        let v = BinaryVector::from_words(vec![u64::MAX], 10);
        assert_eq!(v.popcount(), 10);
    }

    #[test]
    fn test_set_get_bit() {
        let mut v = BinaryVector::zeros(200);
        v.set_bit(0, true);
        v.set_bit(63, true);
        v.set_bit(64, true);
        v.set_bit(199, true);
        assert!(v.get_bit(0));
        assert!(v.get_bit(63));
        assert!(v.get_bit(64));
        assert!(v.get_bit(199));
        assert!(!v.get_bit(1));
        assert_eq!(v.popcount(), 4);
        v.set_bit(63, false);
        assert_eq!(v.popcount(), 3);
    }
}
