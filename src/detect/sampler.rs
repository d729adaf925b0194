//! Windowed byte-statistics sampling.
//!
//! The buffer is partitioned into equal-size contiguous windows and each
//! window contributes one [`Sample`] with the mean and population
//! variance of the bytes actually read. Window order is significant:
//! feature extraction works on adjacent-sample deltas.

use crate::core::metadata::Sample;
use crate::detect::config::SamplerConfig;
use tracing::trace;

/// Partition the buffer and compute per-window statistics.
///
/// The effective window count is clamped to `min(sample_count, len)` so
/// every window is at least one byte wide; a buffer shorter than the
/// configured count simply yields fewer samples, and an empty buffer
/// yields none. Offsets are strictly increasing and evenly spaced by
/// `len / effective_count`.
pub fn sample(data: &[u8], cfg: &SamplerConfig) -> Vec<Sample> {
    if data.is_empty() || cfg.sample_count == 0 {
        return Vec::new();
    }

    let count = cfg.sample_count.min(data.len());
    let chunk_size = data.len() / count;

    let mut samples = Vec::with_capacity(count);
    for i in 0..count {
        let offset = i * chunk_size;
        let end = (offset + cfg.window_read_bytes).min(data.len());
        let window = &data[offset..end];

        let (mean, variance) = mean_and_variance(window);
        let lead_len = window.len().min(cfg.leading_bytes);
        trace!(offset, len = window.len(), mean, variance, "sampled window");

        samples.push(Sample {
            offset,
            mean,
            variance,
            leading: window[..lead_len].to_vec(),
        });
    }
    samples
}

/// Arithmetic mean and population variance (divide by n) of a byte slice.
fn mean_and_variance(window: &[u8]) -> (f64, f64) {
    if window.is_empty() {
        return (0.0, 0.0);
    }
    let len = window.len() as f64;
    let sum: f64 = window.iter().map(|&b| b as f64).sum();
    let mean = sum / len;
    let variance = window
        .iter()
        .map(|&b| {
            let d = b as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / len;
    (mean, variance)
}
