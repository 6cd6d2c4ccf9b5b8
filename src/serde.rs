//! # Serde module for CardinalityEstimator
//!
//! This module provides serde-based (serialization and deserialization) features for
//! `CardinalityEstimator`.
//!
//! Estimator is serialized as a byte sequence holding its binary format (see `codec` module),
//! so every serde data format carries exactly the same bytes as `to_bytes` produces.
//! Deserialization runs the same validation as `from_bytes`.
//!
//! Refer to the serde documentation for more details on custom serialization and deserialization:
//! - [Serialization](https://serde.rs/impl-serialize.html)
//! - [Deserialization](https://serde.rs/impl-deserialize.html)
use std::hash::Hasher;

use serde::de::Error;
use serde::{Deserialize, Serialize};

use crate::estimator::CardinalityEstimator;

impl<H: Hasher + Default> Serialize for CardinalityEstimator<H> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bytes(&self.to_bytes())
    }
}

impl<'de, H: Hasher + Default> Deserialize<'de> for CardinalityEstimator<H> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Human readable formats hand bytes back as a sequence, hence owned buffer
        let bytes: Vec<u8> = Deserialize::deserialize(deserializer)?;
        Self::from_bytes(&bytes).map_err(Error::custom)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(4, 0; "empty set")]
    #[test_case(12, 1; "single element")]
    #[test_case(12, 2; "two distinct elements")]
    #[test_case(12, 100; "hundred distinct elements")]
    #[test_case(12, 10000; "ten thousand distinct elements")]
    #[test_case(16, 10000; "max precision")]
    fn test_serde(p: u8, n: usize) {
        let mut original_estimator = CardinalityEstimator::new(p).unwrap();

        for i in 0..n {
            let item = format!("item{}", i);
            original_estimator.add(item.as_bytes());
        }

        let serialized = serde_json::to_string(&original_estimator).expect("serialization failed");
        assert!(
            !serialized.is_empty(),
            "serialized string should not be empty"
        );

        let deserialized_estimator: CardinalityEstimator =
            serde_json::from_str(&serialized).expect("deserialization failed");

        assert_eq!(original_estimator, deserialized_estimator);
        assert_eq!(
            original_estimator.estimate().to_bits(),
            deserialized_estimator.estimate().to_bits()
        );
    }

    #[test]
    fn test_serde_carries_binary_format() {
        let mut estimator = CardinalityEstimator::new(4).unwrap();
        estimator.add(b"foo");
        let serialized = serde_json::to_vec(&estimator).unwrap();
        let bytes: Vec<u8> = serde_json::from_slice(&serialized).unwrap();
        assert_eq!(bytes, estimator.to_bytes());
    }

    #[test]
    fn test_deserialize_invalid_json() {
        let invalid_json = "{ invalid_json_string }";
        let result: Result<CardinalityEstimator, _> = serde_json::from_str(invalid_json);

        assert!(
            result.is_err(),
            "Deserialization should fail for invalid JSON"
        );
    }

    #[test_case("[12345,null]".as_bytes(); "case 1")]
    #[test_case("[]".as_bytes(); "empty buffer")]
    #[test_case("[1,12,0,0,0,0,0,0,0,0]".as_bytes(); "header only")]
    #[test_case("[2,4,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0]".as_bytes(); "unknown version")]
    #[test_case("[1,3,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0]".as_bytes(); "invalid precision")]
    #[test_case("[1,4,0,0,0,0,0,0,0,0,62,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0]".as_bytes(); "register above maximum")]
    #[test_case(&[91, 51, 44, 10, 110, 117, 108, 108, 93]; "case 4")]
    fn test_failed_deserialization(input: &[u8]) {
        let result: Result<CardinalityEstimator, _> = serde_json::from_slice(input);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialization_error_message() {
        let result: Result<CardinalityEstimator, _> = serde_json::from_str("[1,12]");
        let message = result.unwrap_err().to_string();
        assert!(message.contains("shorter than header"), "{}", message);
    }
}
