#![no_main]

use cardinality_hll::CardinalityEstimator;
use libfuzzer_sys::fuzz_target;
use wyhash::wyhash;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let p = 4 + data[0] % 13;
    let data = &data[1..];
    let split_index = wyhash(data, 0) as usize % data.len();
    let (first_half, second_half) = data.split_at(split_index);

    let mut estimator1 = CardinalityEstimator::new(p).unwrap();
    for chunk in first_half.chunks(4) {
        estimator1.add(chunk);
        assert!(estimator1.estimate() >= 0.0);
        assert!(!estimator1.is_empty());
    }

    let mut estimator2 = CardinalityEstimator::new(p).unwrap();
    estimator2.update(second_half.chunks(4));

    let merged = estimator1.merge(&estimator2).unwrap();
    assert_eq!(merged.count(), estimator1.count() + estimator2.count());
    assert_eq!(merged, estimator2.merge(&estimator1).unwrap());

    let restored: CardinalityEstimator =
        CardinalityEstimator::from_bytes(&merged.to_bytes()).unwrap();
    assert_eq!(restored.estimate().to_bits(), merged.estimate().to_bits());
});
