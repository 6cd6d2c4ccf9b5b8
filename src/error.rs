//! Errors returned by `CardinalityEstimator` and the precision helpers.

use thiserror::Error;

use crate::precision::{MAX_PRECISION, MIN_PRECISION};

/// Error returned by fallible estimator operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CardinalityError {
    /// Precision outside of `[MIN_PRECISION, MAX_PRECISION]` range.
    #[error("precision {0} is outside of supported range [{MIN_PRECISION}, {MAX_PRECISION}]")]
    InvalidPrecision(u8),
    /// Target relative error which no supported precision can satisfy.
    #[error("target error {0} is outside of supported domain")]
    InvalidError(f64),
    /// Merge of two estimators built with different precision.
    #[error("cannot merge estimators with different precision: {lhs} != {rhs}")]
    PrecisionMismatch { lhs: u8, rhs: u8 },
    /// Serialized estimator could not be decoded.
    #[error("invalid serialized estimator: {0}")]
    Format(#[from] FormatError),
}

/// Reason why a serialized estimator was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Buffer is shorter than the fixed header.
    #[error("buffer of {0} bytes is shorter than header")]
    Truncated(usize),
    /// Format version is not known to this crate.
    #[error("unsupported format version {0}")]
    UnsupportedVersion(u8),
    /// Header declares precision outside of supported range.
    #[error("declared precision {0} is outside of supported range")]
    InvalidPrecision(u8),
    /// Buffer length does not match declared precision.
    #[error("expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    /// Register holds a rank no hash can produce.
    #[error("register {index} holds rank {rank} above maximum")]
    InvalidRegister { index: usize, rank: u8 },
    /// Unused word bits or padding registers are set.
    #[error("unused register bits are set")]
    InvalidPadding,
}
