#![no_main]

use cardinality_hll::CardinalityEstimator;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(estimator) = CardinalityEstimator::<wyhash::WyHash>::from_bytes(data) {
        assert_eq!(estimator.to_bytes(), data);
        assert!(estimator.estimate() >= 0.0);
    }

    if let Ok(mut estimator) = serde_json::from_slice::<CardinalityEstimator>(data) {
        estimator.add(b"foo");
        assert!(estimator.estimate() > 0.0);
    }
});
