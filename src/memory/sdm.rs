//! The SDM engine: hard locations, write, read, erase.
//!
//! Notation follows Kanerva (1992): N address bits, U memory bits,
//! M hard locations, activation radius H, counter matrix C, stored
//! pattern count T.
//!
//! Read tie rule: a dimension whose counter sum is exactly zero reads
//! as `config::TIE_BIT` (0). An empty activated set sums to zero in
//! every dimension, so it reads as the all-zero vector.

use std::fmt;

use ndarray::{Array1, Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::config::{self, DEFAULT_SEED, TIE_BIT};
use crate::error::{DimensionMismatch, Result, SdmError, VectorKind};
use crate::memory::activation::ActivationSelector;
use crate::memory::binary_vector::BinaryVector;
use crate::memory::hard_location::{AddressTable, HardLocation};

/// Engine geometry and seed. Immutable once the engine is built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdmConfig {
    /// Length of address vectors (N).
    pub address_dimension: usize,

    /// Length of memory vectors (U).
    pub memory_dimension: usize,

    /// Number of hard locations (M).
    pub num_locations: usize,

    /// Hamming distance cutoff for activation (H), inclusive.
    pub activation_threshold: usize,

    /// Seed for the hard-location address generator.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

impl Default for SdmConfig {
    fn default() -> Self {
        Self {
            address_dimension: config::DEFAULT_ADDRESS_DIM,
            memory_dimension: config::DEFAULT_MEMORY_DIM,
            num_locations: config::DEFAULT_NUM_LOCATIONS,
            activation_threshold: config::DEFAULT_ACTIVATION_THRESHOLD,
            seed: DEFAULT_SEED,
        }
    }
}

impl SdmConfig {
    /// Geometry with the default seed.
    pub fn new(
        address_dimension: usize,
        memory_dimension: usize,
        num_locations: usize,
        activation_threshold: usize,
    ) -> Self {
        Self {
            address_dimension,
            memory_dimension,
            num_locations,
            activation_threshold,
            seed: DEFAULT_SEED,
        }
    }

    /// Replace the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check that N, U and M are strictly positive.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("address_dimension", self.address_dimension),
            ("memory_dimension", self.memory_dimension),
            ("num_locations", self.num_locations),
        ];
        for (name, value) in checks {
            if value == 0 {
                return Err(SdmError::Configuration(format!(
                    "{} must be a positive integer, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Kanerva Sparse Distributed Memory.
///
/// `read` and the other observers take `&self`; `write`, `erase` and
/// `clear` take `&mut self`. Sharing one engine between threads that
/// write needs an external lock.
#[derive(Clone, PartialEq)]
pub struct KanervaSdm {
    config: SdmConfig,

    /// Address matrix A (M × N bits).
    addresses: AddressTable,

    /// Counter matrix C (M × U).
    counters: Array2<i64>,

    /// Stored pattern count T.
    memory_count: u64,
}

impl KanervaSdm {
    /// Build an engine from a validated configuration.
    pub fn new(config: SdmConfig) -> Result<Self> {
        config.validate()?;

        if config.activation_threshold >= config.address_dimension {
            tracing::warn!(
                threshold = config.activation_threshold,
                address_dimension = config.address_dimension,
                "activation threshold covers the whole address space; every location activates"
            );
        }

        let mut rng = StdRng::seed_from_u64(config.seed);
        let addresses =
            AddressTable::generate(config.num_locations, config.address_dimension, &mut rng);
        let counters = Array2::<i64>::zeros((config.num_locations, config.memory_dimension));

        tracing::debug!(
            n = config.address_dimension,
            u = config.memory_dimension,
            m = config.num_locations,
            h = config.activation_threshold,
            seed = config.seed,
            "constructed SDM"
        );

        Ok(Self {
            config,
            addresses,
            counters,
            memory_count: 0,
        })
    }

    /// Positional constructor mirroring the classic
    /// `(N, U, M, H, seed)` signature.
    pub fn construct(
        address_dimension: usize,
        memory_dimension: usize,
        num_locations: usize,
        activation_threshold: usize,
        seed: u64,
    ) -> Result<Self> {
        Self::new(
            SdmConfig::new(
                address_dimension,
                memory_dimension,
                num_locations,
                activation_threshold,
            )
            .with_seed(seed),
        )
    }

    // ── operations on 0/1 slices ─────────────────────────────────

    /// Write `memory` at `address`.
    ///
    /// Each activated location's counter d moves by +1 where the memory
    /// bit is 1 and by −1 where it is 0. An empty activated set makes this
    /// a no-op.
    pub fn write(&mut self, address: &[u8], memory: &[u8]) -> Result<()> {
        let address = self.parse_address(address)?;
        let memory = self.parse_memory(memory)?;
        self.write_vector(&address, &memory)
    }

    /// Read the memory stored around `address`.
    pub fn read(&self, address: &[u8]) -> Result<Vec<u8>> {
        let address = self.parse_address(address)?;
        Ok(self.read_vector(&address)?.to_bits())
    }

    /// Remove one written pattern's contribution: the exact inverse of
    /// `write(address, memory)`.
    ///
    /// This relies on the same locations activating as at write time,
    /// which holds because the address table never changes.
    pub fn erase(&mut self, address: &[u8], memory: &[u8]) -> Result<()> {
        let address = self.parse_address(address)?;
        let memory = self.parse_memory(memory)?;
        self.erase_vector(&address, &memory)
    }

    /// Per-dimension counter sums over the activated set (Kanerva's s).
    pub fn read_sums(&self, address: &[u8]) -> Result<Array1<i64>> {
        let address = self.parse_address(address)?;
        self.read_sums_vector(&address)
    }

    /// Indices of the hard locations activated by `address`.
    pub fn activated_locations(&self, address: &[u8]) -> Result<Vec<usize>> {
        let address = self.parse_address(address)?;
        self.selector().select(&address)
    }

    // ── operations on packed vectors ─────────────────────────────

    pub fn write_vector(&mut self, address: &BinaryVector, memory: &BinaryVector) -> Result<()> {
        self.check_memory(memory)?;
        let activated = self.selector().select(address)?;
        if self.apply(&activated, memory, 1) {
            self.memory_count += 1;
        }
        Ok(())
    }

    pub fn erase_vector(&mut self, address: &BinaryVector, memory: &BinaryVector) -> Result<()> {
        self.check_memory(memory)?;
        let activated = self.selector().select(address)?;
        if self.apply(&activated, memory, -1) {
            self.memory_count = self.memory_count.saturating_sub(1);
        }
        Ok(())
    }

    pub fn read_vector(&self, address: &BinaryVector) -> Result<BinaryVector> {
        let sums = self.read_sums_vector(address)?;
        Ok(resolve_sums(sums.view()))
    }

    pub fn read_sums_vector(&self, address: &BinaryVector) -> Result<Array1<i64>> {
        let activated = self.selector().select(address)?;
        let mut sums = Array1::<i64>::zeros(self.config.memory_dimension);
        for &i in &activated {
            sums += &self.counters.row(i);
        }
        if activated.is_empty() {
            tracing::trace!("read activated no locations; returning tie vector");
        }
        Ok(sums)
    }

    /// Zero every counter and reset T. Addresses are kept.
    pub fn clear(&mut self) {
        self.counters.fill(0);
        self.memory_count = 0;
    }

    // ── accessors ────────────────────────────────────────────────

    /// Address dimension N.
    pub fn address_dimension(&self) -> usize {
        self.config.address_dimension
    }

    /// Memory dimension U.
    pub fn memory_dimension(&self) -> usize {
        self.config.memory_dimension
    }

    /// Number of hard locations M.
    pub fn num_locations(&self) -> usize {
        self.config.num_locations
    }

    /// Activation threshold H.
    pub fn activation_threshold(&self) -> usize {
        self.config.activation_threshold
    }

    pub fn seed(&self) -> u64 {
        self.config.seed
    }

    pub fn config(&self) -> &SdmConfig {
        &self.config
    }

    /// Number of stored patterns T: writes that reached at least one
    /// location, minus erases that did.
    pub fn memory_count(&self) -> u64 {
        self.memory_count
    }

    /// The activation selector bound to this engine's table.
    pub fn selector(&self) -> ActivationSelector<'_> {
        ActivationSelector::new(&self.addresses, self.config.activation_threshold)
    }

    /// Address of hard location `index`.
    pub fn address(&self, index: usize) -> Option<BinaryVector> {
        (index < self.num_locations()).then(|| self.addresses.address(index))
    }

    /// Counter row of hard location `index`.
    pub fn counters(&self, index: usize) -> Option<ArrayView1<'_, i64>> {
        (index < self.num_locations()).then(|| self.counters.row(index))
    }

    /// Full view of hard location `index`.
    pub fn hard_location(&self, index: usize) -> Option<HardLocation<'_>> {
        (index < self.num_locations()).then(|| HardLocation {
            index,
            address: self.addresses.address(index),
            counters: self.counters.row(index),
        })
    }

    /// The whole counter matrix C.
    pub fn counter_matrix(&self) -> &Array2<i64> {
        &self.counters
    }

    /// Approximate heap footprint in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.addresses.memory_bytes() + self.counters.len() * std::mem::size_of::<i64>()
    }

    // ── internals ────────────────────────────────────────────────

    fn parse_address(&self, bits: &[u8]) -> Result<BinaryVector> {
        BinaryVector::parse(bits, self.config.address_dimension, VectorKind::Address)
    }

    fn parse_memory(&self, bits: &[u8]) -> Result<BinaryVector> {
        BinaryVector::parse(bits, self.config.memory_dimension, VectorKind::Memory)
    }

    fn check_memory(&self, memory: &BinaryVector) -> Result<()> {
        if memory.len() != self.config.memory_dimension {
            return Err(DimensionMismatch::Length {
                vector: VectorKind::Memory,
                expected: self.config.memory_dimension,
                actual: memory.len(),
            }
            .into());
        }
        Ok(())
    }

    /// Add `sign * (2*bit - 1)` to every activated counter row.
    /// Returns whether any location was touched.
    fn apply(&mut self, activated: &[usize], memory: &BinaryVector, sign: i64) -> bool {
        if activated.is_empty() {
            tracing::trace!("no locations activated; update dropped");
            return false;
        }
        let polar = Array1::from_iter(memory.iter().map(|b| if b { sign } else { -sign }));
        for &i in activated {
            let mut row = self.counters.row_mut(i);
            row += &polar;
        }
        true
    }
}

/// Majority decision for one dimension: positive ⇒ 1, negative ⇒ 0,
/// zero ⇒ `TIE_BIT`.
#[inline]
pub fn resolve_sum(sum: i64) -> bool {
    match sum.signum() {
        1 => true,
        -1 => false,
        _ => TIE_BIT,
    }
}

/// Threshold a sum vector into a memory vector.
pub fn resolve_sums(sums: ArrayView1<'_, i64>) -> BinaryVector {
    let bits: Vec<bool> = sums.iter().map(|&s| resolve_sum(s)).collect();
    BinaryVector::from_bools(&bits)
}

impl fmt::Debug for KanervaSdm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "KanervaSdm(N={}, U={}, M={}, H={}, seed={}, T={})",
            self.address_dimension(),
            self.memory_dimension(),
            self.num_locations(),
            self.activation_threshold(),
            self.seed(),
            self.memory_count
        )
    }
}
