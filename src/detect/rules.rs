//! Fixed-threshold rule engine over the extracted features.
//!
//! This is both the default detector (AI disabled or unconfigured) and
//! the fallback when the AI attempt fails. Thresholds come from
//! [`RuleConfig`]; there are no learned parameters, so identical input
//! always yields identical output.

use crate::core::metadata::{Codec, FeatureSet};
use crate::core::report::IssueVector;
use crate::detect::config::RuleConfig;
use tracing::debug;

pub const DETAIL_GLITCH: &str = "abnormal data fluctuation, possible screen glitch";
pub const DETAIL_CODEC: &str = "unrecognized codec, possible corruption";
pub const DETAIL_STUTTER: &str = "data discontinuity, possible stutter";
pub const DETAIL_FRAME_ANALYSIS_NEEDED: &str =
    "color shift and missing-subject checks require frame-level image analysis";

/// Issue vector plus the detail strings a stage produced, combined by the
/// orchestrator's merge fold.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuleVerdict {
    pub issues: IssueVector,
    pub details: Vec<String>,
}

/// Classify the feature set against the configured thresholds.
///
/// Color shift and missing subject are never set here; byte statistics
/// carry no signal for them, which the fixed trailing detail records.
pub fn evaluate(features: &FeatureSet, cfg: &RuleConfig) -> RuleVerdict {
    let mut issues = IssueVector::default();
    let mut details = Vec::new();

    if features.variance_volatility > cfg.variance_volatility_threshold {
        issues.glitch = true;
        details.push(DETAIL_GLITCH.to_string());
    }

    if features.codec == Codec::Unknown {
        issues.corruption = true;
        details.push(DETAIL_CODEC.to_string());
    }

    if features.max_variance_change > cfg.max_variance_change_threshold {
        issues.stutter = true;
        details.push(DETAIL_STUTTER.to_string());
    }

    details.push(DETAIL_FRAME_ANALYSIS_NEEDED.to_string());

    debug!(
        glitch = issues.glitch,
        corruption = issues.corruption,
        stutter = issues.stutter,
        "rule engine verdict"
    );
    RuleVerdict { issues, details }
}
