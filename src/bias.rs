//! HyperLogLog++ empirical bias correction.
//!
//! Raw HyperLogLog estimates overshoot the true cardinality while many registers are still
//! small. HyperLogLog++ measures that bias once per precision and subtracts it from raw
//! estimates up to `5 * M`.
//!
//! Bias tables are measured by running the register array over deterministic hash streams
//! with known cardinality and recording the mean raw estimate at reference points up to `6 * M`.
//! Every table is built at most once per process on first use and is read-only afterwards.
//!
//! [Original HyperLogLog++ paper](https://static.googleusercontent.com/media/research.google.com/en//pubs/archive/40671.pdf)

use std::sync::OnceLock;

use wyhash::wyhash;

use crate::precision::{Precision, PRECISION_COUNT};
use crate::registers::RegisterArray;

/// Number of reference points per bias table
const TABLE_POINTS: usize = 200;
/// Reference points cover true cardinalities up to `TABLE_RANGE * M`
const TABLE_RANGE: usize = 6;
/// Approximate number of hashes inserted while building one table
const INSERT_BUDGET: usize = 1 << 21;
/// Lower bound for number of simulated streams per table
const MIN_TRIALS: usize = 8;

/// Linear counting is used while its estimate is at or below this threshold, indexed by `P - 4`.
const THRESHOLD: [f64; PRECISION_COUNT] = [
    10.0, 20.0, 40.0, 80.0, 220.0, 400.0, 900.0, 1800.0, 3100.0, 6500.0, 11500.0, 20000.0, 50000.0,
];

static TABLES: [OnceLock<BiasTable>; PRECISION_COUNT] =
    [const { OnceLock::new() }; PRECISION_COUNT];

/// Mean raw estimates and their bias, sorted by raw estimate
#[derive(Debug)]
pub(crate) struct BiasTable {
    raw_estimates: Vec<f64>,
    biases: Vec<f64>,
}

impl BiasTable {
    /// Return shared bias table for precision, building it on first use
    pub(crate) fn get(precision: Precision) -> &'static BiasTable {
        TABLES[precision.index()].get_or_init(|| Self::build(precision))
    }

    /// Interpolate bias of raw estimate between two closest reference points
    pub(crate) fn bias(&self, raw_estimate: f64) -> f64 {
        let estimates = &self.raw_estimates;
        let biases = &self.biases;
        let last = estimates.len() - 1;

        if raw_estimate <= estimates[0] {
            return biases[0];
        }
        if raw_estimate >= estimates[last] {
            return biases[last];
        }

        let pos = estimates.partition_point(|&e| e < raw_estimate);
        let (e1, e2) = (estimates[pos - 1], estimates[pos]);
        let c = (raw_estimate - e1) / (e2 - e1);
        biases[pos - 1] * (1.0 - c) + biases[pos] * c
    }

    fn build(precision: Precision) -> Self {
        let m = precision.registers();
        let max_cardinality = TABLE_RANGE * m;
        let points = TABLE_POINTS.min(max_cardinality);
        let cardinalities: Vec<usize> = (1..=points)
            .map(|k| k * max_cardinality / points)
            .collect();
        let trials = (INSERT_BUDGET / max_cardinality).max(MIN_TRIALS);

        let mut raw_sums = vec![0.0; points];
        let mut registers = RegisterArray::new(precision);
        for trial in 0..trials as u64 {
            registers.clear();
            let mut inserted = 0;
            for (sum, &cardinality) in raw_sums.iter_mut().zip(&cardinalities) {
                while inserted < cardinality {
                    registers.insert_hash(wyhash(&(inserted as u64).to_le_bytes(), trial));
                    inserted += 1;
                }
                *sum += raw_estimate(&registers);
            }
        }

        let mut points: Vec<(f64, f64)> = raw_sums
            .iter()
            .zip(&cardinalities)
            .map(|(&sum, &cardinality)| {
                let mean = sum / trials as f64;
                (mean, mean - cardinality as f64)
            })
            .collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));

        tracing::debug!(
            precision = precision.get(),
            points = points.len(),
            trials,
            "built bias correction table"
        );

        Self {
            raw_estimates: points.iter().map(|p| p.0).collect(),
            biases: points.iter().map(|p| p.1).collect(),
        }
    }
}

/// Normalization constant of the raw estimate
#[inline]
pub(crate) fn alpha(m: usize) -> f64 {
    match m {
        16 => 0.673,
        32 => 0.697,
        64 => 0.709,
        _ => 0.7213 / (1.0 + 1.079 / (m as f64)),
    }
}

/// Uncorrected HyperLogLog estimate `alpha * M^2 / sum(2^-rank)`
#[inline]
pub(crate) fn raw_estimate(registers: &RegisterArray) -> f64 {
    let m = registers.len() as f64;
    alpha(registers.len()) * m * m / registers.harmonic_sum()
}

/// Linear counting switch threshold for precision
#[inline]
pub(crate) fn threshold(precision: Precision) -> f64 {
    THRESHOLD[precision.index()]
}
