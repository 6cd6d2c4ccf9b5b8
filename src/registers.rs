//! ## Register array
//! Stores `M = 2^P` HyperLogLog registers of `REGISTER_WIDTH` bits packed into `u32` words.
//!
//! Word encoding:
//! - bits 0..29    - five registers, 6 bits each, lowest register index first.
//! - bits 30..31   - unused, always zero.
//!
//! Registers past `M` in the last word are padding and always zero.
//!
//! Number of zero registers and harmonic sum of registers are updated together with
//! register values, allowing constant time estimates. The harmonic sum is kept as a
//! `u128` fixed point number scaled by `2^64`: every reachable rank is at most 61, so
//! the sum is exact and depends only on register values, not on insertion order.

use std::fmt::{Debug, Formatter};
use std::mem::size_of_val;

use crate::error::FormatError;
use crate::precision::Precision;

/// Number of bits used by a single register
pub(crate) const REGISTER_WIDTH: usize = 6;
/// Number of registers packed into a single `u32` word
pub(crate) const REGISTERS_PER_WORD: usize = u32::BITS as usize / REGISTER_WIDTH;
/// Mask of a single register
const REGISTER_MASK: u32 = (1 << REGISTER_WIDTH) - 1;
/// Mask of all register bits within a word
const WORD_MASK: u32 = (1 << (REGISTER_WIDTH * REGISTERS_PER_WORD)) - 1;
/// Fixed point shift of the harmonic sum
const SUM_SHIFT: u32 = 64;
/// `2^SUM_SHIFT` as `f64`
const SUM_SCALE: f64 = 18_446_744_073_709_551_616.0;

#[derive(Clone, PartialEq, Eq)]
pub(crate) struct RegisterArray {
    precision: Precision,
    /// Packed registers
    words: Box<[u32]>,
    /// Number of registers set to 0
    zeros: u32,
    /// Sum of `2^(SUM_SHIFT - rank)` over all registers
    harmonic_sum: u128,
}

impl RegisterArray {
    /// Create register array with all registers set to 0
    pub(crate) fn new(precision: Precision) -> Self {
        Self {
            precision,
            words: vec![0u32; precision.words()].into_boxed_slice(),
            zeros: precision.registers() as u32,
            harmonic_sum: Self::empty_sum(precision),
        }
    }

    /// Restore register array from packed words, validating every register.
    pub(crate) fn from_words(precision: Precision, words: &[u32]) -> Result<Self, FormatError> {
        if words.len() != precision.words() {
            return Err(FormatError::InvalidLength {
                expected: precision.words(),
                actual: words.len(),
            });
        }

        let m = precision.registers();
        let max_rank = max_rank(precision);
        let mut registers = Self::new(precision);
        for (word_idx, &word) in words.iter().enumerate() {
            if word & !WORD_MASK != 0 {
                return Err(FormatError::InvalidPadding);
            }
            for slot in 0..REGISTERS_PER_WORD {
                let index = word_idx * REGISTERS_PER_WORD + slot;
                let rank = ((word >> (slot * REGISTER_WIDTH)) & REGISTER_MASK) as u8;
                if index >= m {
                    if rank != 0 {
                        return Err(FormatError::InvalidPadding);
                    }
                } else if rank > max_rank {
                    return Err(FormatError::InvalidRegister { index, rank });
                } else {
                    registers.raise(index, rank);
                }
            }
        }

        Ok(registers)
    }

    /// Insert 64-bit hash, returning whether any register changed
    #[inline]
    pub(crate) fn insert_hash(&mut self, hash: u64) -> bool {
        let (idx, rank) = decode_hash(hash, self.precision);
        self.raise(idx, rank)
    }

    /// Get `idx` register
    #[inline]
    pub(crate) fn get(&self, idx: usize) -> u8 {
        let word = self.words[idx / REGISTERS_PER_WORD];
        let shift = (idx % REGISTERS_PER_WORD) * REGISTER_WIDTH;
        ((word >> shift) & REGISTER_MASK) as u8
    }

    /// Set `idx` register to `rank` if it is larger than the current value.
    /// Returns whether the register changed.
    #[inline]
    pub(crate) fn raise(&mut self, idx: usize, rank: u8) -> bool {
        let old_rank = self.get(idx);
        if rank <= old_rank {
            return false;
        }

        let shift = (idx % REGISTERS_PER_WORD) * REGISTER_WIDTH;
        let word = &mut self.words[idx / REGISTERS_PER_WORD];
        *word &= !(REGISTER_MASK << shift);
        *word |= u32::from(rank) << shift;

        // Update number of zero registers and harmonic sum
        self.zeros -= u32::from(old_rank == 0);
        self.harmonic_sum -= harmonic_term(old_rank);
        self.harmonic_sum += harmonic_term(rank);
        true
    }

    /// Merge `rhs` registers into `self` taking register-wise maximum.
    /// Both arrays must have the same precision.
    pub(crate) fn merge(&mut self, rhs: &RegisterArray) {
        debug_assert_eq!(self.precision, rhs.precision);
        for (word_idx, &rhs_word) in rhs.words.iter().enumerate() {
            // skip words without any non-zero register
            if rhs_word == 0 {
                continue;
            }
            let first = word_idx * REGISTERS_PER_WORD;
            let last = (first + REGISTERS_PER_WORD).min(self.len());
            for idx in first..last {
                self.raise(idx, rhs.get(idx));
            }
        }
    }

    /// Reset all registers to 0
    pub(crate) fn clear(&mut self) {
        self.words.fill(0);
        self.zeros = self.precision.registers() as u32;
        self.harmonic_sum = Self::empty_sum(self.precision);
    }

    #[inline]
    pub(crate) fn precision(&self) -> Precision {
        self.precision
    }

    /// Number of registers
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.precision.registers()
    }

    /// Number of registers set to 0
    #[inline]
    pub(crate) fn zeros(&self) -> u32 {
        self.zeros
    }

    /// Harmonic sum of registers, `sum(2^-rank)`
    #[inline]
    pub(crate) fn harmonic_sum(&self) -> f64 {
        self.harmonic_sum as f64 / SUM_SCALE
    }

    /// Packed register words
    #[inline]
    pub(crate) fn words(&self) -> &[u32] {
        &self.words
    }

    /// Iterate over register values
    pub(crate) fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..self.len()).map(move |idx| self.get(idx))
    }

    /// Heap memory occupied by packed registers
    #[inline]
    pub(crate) fn heap_size(&self) -> usize {
        size_of_val(&*self.words)
    }

    #[inline]
    fn empty_sum(precision: Precision) -> u128 {
        (precision.registers() as u128) << SUM_SHIFT
    }
}

impl Debug for RegisterArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterArray")
            .field("precision", &self.precision.get())
            .field("zeros", &self.zeros)
            .field("harmonic_sum", &self.harmonic_sum())
            .finish()
    }
}

/// Split hash into register index taken from the top `P` bits and rank of the remaining bits.
///
/// Bit `P - 1` is set after shifting out the index, so the rank never exceeds `65 - P`.
#[inline]
pub(crate) fn decode_hash(hash: u64, precision: Precision) -> (usize, u8) {
    let p = precision.get();
    let idx = (hash >> (64 - p)) as usize;
    let w = (hash << p) | (1 << (p - 1));
    let rank = w.leading_zeros() as u8 + 1;
    (idx, rank)
}

/// Largest rank `decode_hash` produces for given precision
#[inline]
pub(crate) fn max_rank(precision: Precision) -> u8 {
    65 - precision.get()
}

/// Fixed point value of `2^-rank`
#[inline]
fn harmonic_term(rank: u8) -> u128 {
    1u128 << (SUM_SHIFT - u32::from(rank))
}
