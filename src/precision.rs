//! Precision, relative error and storage size conversions.
//!
//! HyperLogLog with `m = 2^p` registers has relative standard error of `1.04 / sqrt(m)`.
//! Registers are 6 bits wide and packed 5 per `u32` word, so storage takes
//! `4 * ceil(m / 5)` bytes:
//!
//! | p  | registers | bytes | error  |
//! |----|-----------|-------|--------|
//! | 4  | 16        | 16    | 26.0%  |
//! | 10 | 1024      | 820   | 3.25%  |
//! | 12 | 4096      | 3280  | 1.625% |
//! | 14 | 16384     | 13108 | 0.81%  |
//! | 16 | 65536     | 52432 | 0.406% |

use std::fmt::{Display, Formatter};
use std::mem::size_of;

use crate::error::CardinalityError;
use crate::registers::REGISTERS_PER_WORD;

/// Minimum supported precision
pub const MIN_PRECISION: u8 = 4;
/// Maximum supported precision
pub const MAX_PRECISION: u8 = 16;
/// Precision used by `CardinalityEstimator::default()`
pub const DEFAULT_PRECISION: u8 = 12;

/// Number of precisions in `[MIN_PRECISION, MAX_PRECISION]` range
pub(crate) const PRECISION_COUNT: usize = 13;

/// Numerator of HyperLogLog relative standard error `1.04 / sqrt(m)`
const ERROR_NUMERATOR: f64 = 1.04;

/// Validated number of register index bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Precision(u8);

impl Precision {
    /// Create precision, failing if `p` is outside of `[MIN_PRECISION, MAX_PRECISION]`.
    #[inline]
    pub fn new(p: u8) -> Result<Self, CardinalityError> {
        if (MIN_PRECISION..=MAX_PRECISION).contains(&p) {
            Ok(Self(p))
        } else {
            Err(CardinalityError::InvalidPrecision(p))
        }
    }

    /// Smallest precision whose relative error does not exceed `target_error`.
    pub fn for_error(target_error: f64) -> Result<Self, CardinalityError> {
        if !(target_error > 0.0 && target_error < 1.0) {
            return Err(CardinalityError::InvalidError(target_error));
        }
        (MIN_PRECISION..=MAX_PRECISION)
            .map(Self)
            .find(|p| p.relative_error() <= target_error)
            .ok_or(CardinalityError::InvalidError(target_error))
    }

    /// Return raw precision value
    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Number of registers, `2^p`
    #[inline]
    pub fn registers(self) -> usize {
        1 << self.0
    }

    /// Number of `u32` words holding the packed registers
    #[inline]
    pub fn words(self) -> usize {
        self.registers().div_ceil(REGISTERS_PER_WORD)
    }

    /// Register array footprint in bytes
    #[inline]
    pub fn bytes(self) -> usize {
        self.words() * size_of::<u32>()
    }

    /// Theoretical relative standard error
    #[inline]
    pub fn relative_error(self) -> f64 {
        ERROR_NUMERATOR / (self.registers() as f64).sqrt()
    }

    /// Zero-based position in `[MIN_PRECISION, MAX_PRECISION]`, used to index per-precision tables
    #[inline]
    pub(crate) fn index(self) -> usize {
        usize::from(self.0 - MIN_PRECISION)
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self(DEFAULT_PRECISION)
    }
}

impl TryFrom<u8> for Precision {
    type Error = CardinalityError;

    fn try_from(p: u8) -> Result<Self, Self::Error> {
        Self::new(p)
    }
}

impl From<Precision> for u8 {
    fn from(p: Precision) -> Self {
        p.0
    }
}

impl Display for Precision {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Theoretical relative standard error of an estimator with precision `p`.
pub fn error_for_precision(p: u8) -> Result<f64, CardinalityError> {
    Precision::new(p).map(Precision::relative_error)
}

/// Smallest precision whose relative standard error is at most `target_error`.
///
/// Fails when `target_error` is not in `(0, 1)` or is smaller than what `MAX_PRECISION` delivers.
pub fn precision_for_error(target_error: f64) -> Result<u8, CardinalityError> {
    Precision::for_error(target_error).map(Precision::get)
}

/// Register array footprint in bytes for precision `p`.
pub fn bytes_for_precision(p: u8) -> Result<usize, CardinalityError> {
    Precision::new(p).map(Precision::bytes)
}
