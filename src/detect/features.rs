//! Volatility features over the sample sequence.

use crate::core::metadata::{FeatureSet, Metadata, Sample};

/// Derive volatility metrics from consecutive variance deltas.
///
/// With fewer than two samples there are no deltas; both metrics are then
/// defined as exactly 0.0 rather than NaN.
pub fn extract(samples: &[Sample], metadata: &Metadata) -> FeatureSet {
    let deltas: Vec<f64> = samples
        .windows(2)
        .map(|pair| (pair[1].variance - pair[0].variance).abs())
        .collect();

    let (variance_volatility, max_variance_change) = if deltas.is_empty() {
        (0.0, 0.0)
    } else {
        let mean = deltas.iter().sum::<f64>() / deltas.len() as f64;
        let max = deltas.iter().copied().fold(0.0, f64::max);
        (mean, max)
    };

    FeatureSet {
        variance_volatility,
        max_variance_change,
        file_size: metadata.size,
        codec: metadata.codec,
    }
}
