use cardinality_hll::{CardinalityEstimator, CardinalityError};

fn main() -> Result<(), CardinalityError> {
    let mut estimator1 = CardinalityEstimator::new(12)?;
    for i in 0..10u64 {
        estimator1.add(&i.to_le_bytes());
    }
    println!("estimator1 estimate = {:.2}", estimator1.estimate());

    let mut estimator2 = CardinalityEstimator::with_error(0.01625)?;
    estimator2.update((10..15u64).map(|i| i.to_le_bytes()));
    println!("estimator2 estimate = {:.2}", estimator2.estimate());

    estimator1.merge_in_place(&estimator2)?;
    println!("merged estimate = {:.2}, count = {}", estimator1.estimate(), estimator1.count());

    let bytes = estimator1.to_bytes();
    let restored: CardinalityEstimator = CardinalityEstimator::from_bytes(&bytes)?;
    println!("restored {:?} from {} bytes", restored, bytes.len());

    Ok(())
}
