use cardinality_hll::{
    bytes_for_precision, error_for_precision, precision_for_error, CardinalityError,
    MAX_PRECISION, MIN_PRECISION,
};
use test_case::test_case;

fn assert_almost_eq(lhs: f64, rhs: f64) {
    assert!((lhs - rhs).abs() < 1e-7, "{} != {}", lhs, rhs);
}

#[test]
fn test_bytes_for_precision() {
    assert!(bytes_for_precision(MIN_PRECISION - 1).is_err());
    assert!(bytes_for_precision(MAX_PRECISION + 1).is_err());
    assert!(bytes_for_precision(MIN_PRECISION).unwrap() > 0);
    assert!(bytes_for_precision(MAX_PRECISION).unwrap() > 0);
    assert_eq!(bytes_for_precision(4).unwrap(), 16);
    assert_eq!(bytes_for_precision(12).unwrap(), 3280);
    assert_eq!(bytes_for_precision(16).unwrap(), 52432);
}

#[test]
fn test_error_for_precision() {
    assert!(error_for_precision(MIN_PRECISION - 1).is_err());
    assert!(error_for_precision(MAX_PRECISION + 1).is_err());
    assert!(error_for_precision(MIN_PRECISION).unwrap() > 0.0);
    assert!(error_for_precision(MAX_PRECISION).unwrap() > 0.0);
    assert_almost_eq(error_for_precision(4).unwrap(), 0.26);
    assert_almost_eq(error_for_precision(12).unwrap(), 0.01625);
    assert_almost_eq(error_for_precision(16).unwrap(), 0.0040625);
}

#[test_case(0.26 => 4)]
#[test_case(0.01625 => 12)]
#[test_case(0.0040625 => 16)]
fn test_precision_for_error(error: f64) -> u8 {
    precision_for_error(error).unwrap()
}

#[test_case(2.0; "above one")]
#[test_case(-2.0; "negative")]
fn test_precision_for_error_invalid(error: f64) {
    assert_eq!(
        precision_for_error(error),
        Err(CardinalityError::InvalidError(error))
    );
}

#[test]
fn test_precision_for_error_inverts_error_for_precision() {
    for p in MIN_PRECISION..=MAX_PRECISION {
        assert_eq!(precision_for_error(error_for_precision(p).unwrap()).unwrap(), p);
    }
}
