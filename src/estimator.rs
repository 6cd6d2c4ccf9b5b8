//! Cardinality estimator allows to estimate number of distinct byte strings
//! in the stream or dataset and is defined by runtime precision `P`:
//! - `P`: precision parameter in [4..16] range, which defines
//!   number of bits to use for HyperLogLog register indices.
//!
//! # Data-structure design rationale
//!
//! ## Low memory footprint
//!
//! Registers are 6 bits wide, packed 5 per `u32` word:
//! - P = 4:  16 registers - 16 bytes
//! - P = 12: 4096 registers - 3280 bytes
//! - P = 16: 65536 registers - 52432 bytes
//!
//! ## Low latency
//! - Number of zero registers and registers' harmonic sum are
//!   stored and updated dynamically as more data being inserted,
//!   allowing to have truly constant `estimate` operations
//!   (apart from one-time bias table construction per precision).
//! - Harmonic sum is stored as exact fixed point number, so estimate
//!   only depends on register values and survives serialization bit-for-bit.
//!
//! ## High accuracy
//! - For small cardinality range linear counting is used
//!   while it stays below HyperLogLog++ empirical thresholds.
//! - For medium cardinality range (raw estimate <= 5 * M) HyperLogLog++
//!   empirical bias correction is applied.
//!   - Expected error:
//!     P = 4:  1.04 / sqrt(2^4)  = 26%
//!     P = 12: 1.04 / sqrt(2^12) = 1.625%
//!     P = 16: 1.04 / sqrt(2^16) = 0.406%
//!
//! # Hashing
//! Elements are hashed with `H: Hasher + Default` (`WyHash` by default). Each element is
//! written into a fresh hasher as raw bytes. Top `P` bits of the hash select a register and
//! rank is the number of leading zeros in the remaining bits plus one.

use std::fmt::{Debug, Formatter};
use std::hash::{BuildHasher, BuildHasherDefault, Hasher};
use std::mem::size_of;
use std::ops::BitOr;

use wyhash::WyHash;

use crate::bias::{raw_estimate, threshold, BiasTable};
use crate::element::ByteSequence;
use crate::error::CardinalityError;
use crate::precision::Precision;
use crate::registers::RegisterArray;

/// Raw estimates up to `BIAS_CORRECTION_RANGE * M` are bias corrected
const BIAS_CORRECTION_RANGE: f64 = 5.0;

pub struct CardinalityEstimator<H: Hasher + Default = WyHash> {
    /// HyperLogLog registers
    registers: RegisterArray,
    /// Number of inserted elements, including duplicates
    count: u64,
    /// Zero-sized build hasher
    build_hasher: BuildHasherDefault<H>,
}

impl CardinalityEstimator<WyHash> {
    /// Creates new instance of `CardinalityEstimator` with precision `p`.
    /// Fails if `p` is outside of `[MIN_PRECISION, MAX_PRECISION]` range.
    #[inline]
    pub fn new(p: u8) -> Result<Self, CardinalityError> {
        Precision::new(p).map(Self::with_precision)
    }

    /// Creates new instance of `CardinalityEstimator` with the smallest precision
    /// having relative error of at most `target_error`.
    #[inline]
    pub fn with_error(target_error: f64) -> Result<Self, CardinalityError> {
        Precision::for_error(target_error).map(Self::with_precision)
    }
}

impl<H: Hasher + Default> CardinalityEstimator<H> {
    /// Creates new instance of `CardinalityEstimator` with validated precision
    #[inline]
    pub fn with_precision(precision: Precision) -> Self {
        Self::from_parts(RegisterArray::new(precision), 0)
    }

    #[inline]
    pub(crate) fn from_parts(registers: RegisterArray, count: u64) -> Self {
        Self {
            registers,
            count,
            build_hasher: BuildHasherDefault::default(),
        }
    }

    /// Return precision of `CardinalityEstimator`
    #[inline]
    pub fn precision(&self) -> u8 {
        self.registers.precision().get()
    }

    /// Return number of HyperLogLog registers
    #[inline]
    pub fn num_registers(&self) -> usize {
        self.registers.len()
    }

    /// Return theoretical relative standard error of estimates
    #[inline]
    pub fn relative_error(&self) -> f64 {
        self.registers.precision().relative_error()
    }

    /// Insert a byte sequence into `CardinalityEstimator`
    #[inline]
    pub fn add<T: ByteSequence + ?Sized>(&mut self, element: &T) {
        let mut hasher = self.build_hasher.build_hasher();
        hasher.write(element.as_byte_slice());
        let hash = hasher.finish();
        self.insert_hash(hash);
    }

    /// Insert every byte sequence of `elements`, in order
    pub fn update<I>(&mut self, elements: I)
    where
        I: IntoIterator,
        I::Item: ByteSequence,
    {
        for element in elements {
            self.add(&element);
        }
    }

    /// Insert hash into `CardinalityEstimator`
    #[inline]
    pub fn insert_hash(&mut self, hash: u64) {
        self.count = self.count.saturating_add(1);
        self.registers.insert_hash(hash);
    }

    /// Return exact number of inserted elements, including duplicates
    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Return cardinality estimate
    ///
    /// The first bias corrected estimate for a precision builds its bias table once per
    /// process, which takes from microseconds at `P = 4` to tens of milliseconds at `P = 16`.
    pub fn estimate(&self) -> f64 {
        let registers = &self.registers;
        let precision = registers.precision();
        let m = registers.len() as f64;

        let zeros = registers.zeros();
        if zeros > 0 {
            let linear_count = m * (m / f64::from(zeros)).ln();
            if linear_count <= threshold(precision) {
                return linear_count;
            }
        }

        let raw = raw_estimate(registers);
        if raw <= BIAS_CORRECTION_RANGE * m {
            (raw - BiasTable::get(precision).bias(raw)).max(0.0)
        } else {
            raw
        }
    }

    /// Return cardinality estimate rounded to the nearest integer
    #[inline]
    pub fn len(&self) -> usize {
        self.estimate().round() as usize
    }

    /// Return whether no element was inserted since creation or last `clear`
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.registers.zeros() as usize == self.registers.len()
    }

    /// Merge cardinality estimators into a new one.
    /// Both estimators must have the same precision.
    pub fn merge(&self, rhs: &Self) -> Result<Self, CardinalityError> {
        let mut merged = self.clone();
        merged.merge_in_place(rhs)?;
        Ok(merged)
    }

    /// Merge `rhs` into `self` without changing `rhs`.
    /// Both estimators must have the same precision.
    pub fn merge_in_place(&mut self, rhs: &Self) -> Result<(), CardinalityError> {
        if self.precision() != rhs.precision() {
            return Err(CardinalityError::PrecisionMismatch {
                lhs: self.precision(),
                rhs: rhs.precision(),
            });
        }
        self.registers.merge(&rhs.registers);
        self.count = self.count.saturating_add(rhs.count);
        Ok(())
    }

    /// Reset registers and inserted elements count
    pub fn clear(&mut self) {
        self.registers.clear();
        self.count = 0;
    }

    /// Iterate over register values
    pub fn registers(&self) -> impl Iterator<Item = u8> + '_ {
        self.registers.iter()
    }

    #[inline]
    pub(crate) fn register_array(&self) -> &RegisterArray {
        &self.registers
    }

    /// Return memory size of `CardinalityEstimator`
    pub fn size_of(&self) -> usize {
        size_of::<Self>() + self.registers.heap_size()
    }
}

impl<H: Hasher + Default> Default for CardinalityEstimator<H> {
    fn default() -> Self {
        Self::with_precision(Precision::default())
    }
}

impl<H: Hasher + Default> Clone for CardinalityEstimator<H> {
    fn clone(&self) -> Self {
        Self::from_parts(self.registers.clone(), self.count)
    }
}

impl<H: Hasher + Default> PartialEq for CardinalityEstimator<H> {
    /// Compare precision and registers of cardinality estimators.
    /// Inserted elements count is not part of the sketch and is ignored.
    fn eq(&self, rhs: &Self) -> bool {
        self.registers == rhs.registers
    }
}

impl<H: Hasher + Default> Debug for CardinalityEstimator<H> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ precision: {}, count: {}, estimate: {:.2}, size: {} }}",
            self.precision(),
            self.count,
            self.estimate(),
            self.size_of()
        )
    }
}

impl<H: Hasher + Default> BitOr for &CardinalityEstimator<H> {
    type Output = Result<CardinalityEstimator<H>, CardinalityError>;

    /// Same as `CardinalityEstimator::merge`
    fn bitor(self, rhs: Self) -> Self::Output {
        self.merge(rhs)
    }
}
