//! Configuration for the detection pipeline.
//!
//! Every tunable the pipeline consults lives here, so tests can probe
//! boundary values precisely instead of chasing constants through the
//! rule engine and aggregator.

use serde::{Deserialize, Serialize};

/// Master configuration for a detection run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Structural corruption checks.
    pub corruption: CorruptionConfig,
    /// Byte-statistics sampling.
    pub sampler: SamplerConfig,
    /// Rule-engine thresholds.
    pub rules: RuleConfig,
    /// Frame-vote aggregation.
    pub vote: VoteConfig,
    /// Confidence values per outcome path.
    pub confidence: ConfidenceConfig,
    /// Frame submission limits for the AI attempt.
    pub frames: FrameConfig,
}

/// Structural minimum-viability thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorruptionConfig {
    /// Buffers below this many bytes are flagged as likely incomplete
    /// (default: 1024).
    pub min_file_size: usize,
    /// Prefix length handed to the header validity check (default: 20).
    pub header_probe_bytes: usize,
}

impl Default for CorruptionConfig {
    fn default() -> Self {
        Self {
            min_file_size: 1024,
            header_probe_bytes: 20,
        }
    }
}

/// Windowed byte-statistics sampling parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Number of equal-size windows to partition the buffer into
    /// (default: 10). Clamped down for buffers shorter than this.
    pub sample_count: usize,
    /// Bytes read per window, never past the buffer end (default: 100).
    pub window_read_bytes: usize,
    /// Leading bytes of each window retained on the sample (default: 20).
    pub leading_bytes: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            sample_count: 10,
            window_read_bytes: 100,
            leading_bytes: 20,
        }
    }
}

/// Fixed thresholds for the rule engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Variance volatility above this flags a glitch (default: 5000).
    pub variance_volatility_threshold: f64,
    /// Max variance change above this flags a stutter (default: 10000).
    pub max_variance_change_threshold: f64,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            variance_volatility_threshold: 5000.0,
            max_variance_change_threshold: 10000.0,
        }
    }
}

/// Majority-fraction vote over per-frame classifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteConfig {
    /// An issue kind aggregates as present iff the fraction of frames
    /// reporting it strictly exceeds this value (default: 0.3).
    pub frame_vote_fraction: f64,
}

impl Default for VoteConfig {
    fn default() -> Self {
        Self {
            frame_vote_fraction: 0.3,
        }
    }
}

/// Confidence assigned per outcome path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceConfig {
    /// Rule engine ran because AI was disabled or unconfigured (default: 0.6).
    pub rule_only: f32,
    /// Rule engine ran because the AI attempt failed (default: 0.5).
    pub fallback: f32,
    /// AI attempt via the preferred capability (default: 0.8).
    pub primary: f32,
    /// AI attempt via the secondary capability (default: 0.7).
    pub secondary: f32,
    /// Floor applied when at least one frame classification succeeded
    /// (default: 0.85).
    pub frame_floor: f32,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            rule_only: 0.6,
            fallback: 0.5,
            primary: 0.8,
            secondary: 0.7,
            frame_floor: 0.85,
        }
    }
}

/// Limits on frame submission during the AI attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameConfig {
    /// Maximum frames submitted for classification (default: 5).
    pub max_frames: usize,
    /// Ceiling on the whole AI attempt in seconds (default: 30). On
    /// timeout the attempt is treated as failed and the rule-engine
    /// fallback runs.
    pub attempt_timeout_secs: u64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_frames: 5,
            attempt_timeout_secs: crate::timeout::AI_ATTEMPT_TIMEOUT_SECONDS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let cfg = DetectionConfig::default();
        assert_eq!(cfg.corruption.min_file_size, 1024);
        assert_eq!(cfg.sampler.sample_count, 10);
        assert_eq!(cfg.sampler.window_read_bytes, 100);
        assert_eq!(cfg.rules.variance_volatility_threshold, 5000.0);
        assert_eq!(cfg.rules.max_variance_change_threshold, 10000.0);
        assert_eq!(cfg.vote.frame_vote_fraction, 0.3);
        assert_eq!(cfg.confidence.rule_only, 0.6);
        assert_eq!(cfg.confidence.fallback, 0.5);
        assert_eq!(cfg.confidence.primary, 0.8);
        assert_eq!(cfg.confidence.secondary, 0.7);
        assert_eq!(cfg.confidence.frame_floor, 0.85);
        assert_eq!(cfg.frames.max_frames, 5);
        assert_eq!(cfg.frames.attempt_timeout_secs, 30);
    }

    #[test]
    fn config_serde_round_trip() {
        let cfg = DetectionConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: DetectionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.sampler.sample_count, cfg.sampler.sample_count);
        assert_eq!(
            back.rules.variance_volatility_threshold,
            cfg.rules.variance_volatility_threshold
        );
    }
}
