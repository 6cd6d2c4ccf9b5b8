//! # Binary format of `CardinalityEstimator`
//!
//! Serialized estimator has fixed layout, all integers are little-endian:
//! - bytes[0]          - format version (`FORMAT_VERSION`).
//! - bytes[1]          - precision `P` in [4..16] range.
//! - bytes[2..10]      - number of inserted elements (`u64`).
//! - bytes[10..]       - packed register words (`u32` each), `bytes_for_precision(P)` bytes.
//!
//! Decoding validates every field, so a successfully decoded estimator
//! is identical to the one which was encoded.

use std::hash::Hasher;

use crate::error::{CardinalityError, FormatError};
use crate::estimator::CardinalityEstimator;
use crate::precision::Precision;
use crate::registers::RegisterArray;

/// Current version of binary format
pub const FORMAT_VERSION: u8 = 1;
/// Length of fixed header preceding register words
pub const HEADER_LEN: usize = 10;

/// Offset of the count field within the header
const COUNT_OFFSET: usize = 2;
/// Size of a single register word
const WORD_LEN: usize = 4;

/// Exact length of serialized estimator with precision `p`.
pub fn serialized_len(p: u8) -> Result<usize, CardinalityError> {
    Precision::new(p).map(|precision| HEADER_LEN + precision.bytes())
}

impl<H: Hasher + Default> CardinalityEstimator<H> {
    /// Serialize `CardinalityEstimator` into its binary format
    pub fn to_bytes(&self) -> Vec<u8> {
        let registers = self.register_array();
        let mut bytes = Vec::with_capacity(HEADER_LEN + registers.heap_size());
        bytes.push(FORMAT_VERSION);
        bytes.push(registers.precision().get());
        bytes.extend_from_slice(&self.count().to_le_bytes());
        for word in registers.words() {
            bytes.extend_from_slice(&word.to_le_bytes());
        }
        bytes
    }

    /// Deserialize `CardinalityEstimator` from its binary format
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CardinalityError> {
        match decode(bytes) {
            Ok((registers, count)) => Ok(Self::from_parts(registers, count)),
            Err(err) => {
                tracing::debug!(len = bytes.len(), %err, "rejected serialized estimator");
                Err(err.into())
            }
        }
    }
}

fn decode(bytes: &[u8]) -> Result<(RegisterArray, u64), FormatError> {
    if bytes.len() < HEADER_LEN {
        return Err(FormatError::Truncated(bytes.len()));
    }
    let (header, body) = bytes.split_at(HEADER_LEN);

    if header[0] != FORMAT_VERSION {
        return Err(FormatError::UnsupportedVersion(header[0]));
    }
    let precision =
        Precision::new(header[1]).map_err(|_| FormatError::InvalidPrecision(header[1]))?;

    let expected = HEADER_LEN + precision.bytes();
    if bytes.len() != expected {
        return Err(FormatError::InvalidLength {
            expected,
            actual: bytes.len(),
        });
    }

    let mut count = [0u8; 8];
    count.copy_from_slice(&header[COUNT_OFFSET..]);
    let count = u64::from_le_bytes(count);

    let words: Vec<u32> = body
        .chunks_exact(WORD_LEN)
        .map(|w| u32::from_le_bytes([w[0], w[1], w[2], w[3]]))
        .collect();
    let registers = RegisterArray::from_words(precision, &words)?;

    Ok((registers, count))
}
