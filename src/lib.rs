//! `cardinality-hll` is a Rust crate designed to estimate the number of distinct byte strings in a stream or dataset in an efficient manner.
//!
//! This library uses HyperLogLog with HyperLogLog++ bias correction, linear counting for small
//! cardinalities and a compact packed register array, suitable for large-scale data analysis tasks.
//!
//! ```
//! use cardinality_hll::CardinalityEstimator;
//!
//! let mut lhs = CardinalityEstimator::new(12).unwrap();
//! lhs.update([b"foo", b"bar"]);
//!
//! let mut rhs = CardinalityEstimator::new(12).unwrap();
//! rhs.add(b"baz");
//!
//! let merged = lhs.merge(&rhs).unwrap();
//! assert_eq!(merged.len(), 3);
//! assert_eq!(merged.count(), 3);
//!
//! let restored: CardinalityEstimator = CardinalityEstimator::from_bytes(&merged.to_bytes()).unwrap();
//! assert_eq!(restored, merged);
//! ```
mod bias;
pub mod codec;
mod element;
pub mod error;
pub mod estimator;
pub mod precision;
mod registers;
#[cfg(feature = "with_serde")]
mod serde;

pub use codec::{serialized_len, FORMAT_VERSION, HEADER_LEN};
pub use element::ByteSequence;
pub use error::{CardinalityError, FormatError};
pub use estimator::CardinalityEstimator;
pub use precision::{
    bytes_for_precision, error_for_precision, precision_for_error, Precision, DEFAULT_PRECISION,
    MAX_PRECISION, MIN_PRECISION,
};
