//! Byte sequences accepted by `CardinalityEstimator`.
//!
//! Only raw bytes can be inserted into an estimator. Text and numbers have to be encoded
//! by the caller first, so that logically equal values are always hashed from the same bytes:
//!
//! ```compile_fail
//! let mut estimator = cardinality_hll::CardinalityEstimator::new(12).unwrap();
//! estimator.add("foo");
//! ```
//!
//! ```
//! let mut estimator = cardinality_hll::CardinalityEstimator::new(12).unwrap();
//! estimator.add("foo".as_bytes());
//! estimator.add(&1u64.to_le_bytes());
//! assert_eq!(estimator.len(), 2);
//! ```
//!
//! ```compile_fail
//! let mut estimator = cardinality_hll::CardinalityEstimator::new(12).unwrap();
//! estimator.add(&1u64);
//! ```

use std::borrow::Cow;

/// Byte sequence which can be inserted into `CardinalityEstimator`.
pub trait ByteSequence {
    /// Return underlying bytes
    fn as_byte_slice(&self) -> &[u8];
}

impl ByteSequence for [u8] {
    #[inline]
    fn as_byte_slice(&self) -> &[u8] {
        self
    }
}

impl<const N: usize> ByteSequence for [u8; N] {
    #[inline]
    fn as_byte_slice(&self) -> &[u8] {
        self
    }
}

impl ByteSequence for Vec<u8> {
    #[inline]
    fn as_byte_slice(&self) -> &[u8] {
        self
    }
}

impl ByteSequence for Box<[u8]> {
    #[inline]
    fn as_byte_slice(&self) -> &[u8] {
        self
    }
}

impl ByteSequence for Cow<'_, [u8]> {
    #[inline]
    fn as_byte_slice(&self) -> &[u8] {
        self
    }
}

impl<T: ByteSequence + ?Sized> ByteSequence for &T {
    #[inline]
    fn as_byte_slice(&self) -> &[u8] {
        (**self).as_byte_slice()
    }
}

impl<T: ByteSequence + ?Sized> ByteSequence for &mut T {
    #[inline]
    fn as_byte_slice(&self) -> &[u8] {
        (**self).as_byte_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes<T: ByteSequence + ?Sized>(v: &T) -> &[u8] {
        v.as_byte_slice()
    }

    #[test]
    fn test_byte_sequences_agree() {
        let expected: &[u8] = b"foo";
        assert_eq!(bytes(b"foo"), expected);
        assert_eq!(bytes(&b"foo"[..]), expected);
        assert_eq!(bytes(&b"foo".to_vec()), expected);
        assert_eq!(bytes(&Box::<[u8]>::from(&b"foo"[..])), expected);
        assert_eq!(bytes(&Cow::Borrowed(expected)), expected);
        assert_eq!(bytes(&&&b"foo"[..]), expected);
        assert_eq!(bytes("foo".as_bytes()), expected);
    }
}
