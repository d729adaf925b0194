//! Per-frame image classification against an external capability.
//!
//! The capability is a black box: submit an image, get labeled scores
//! back, or fail. The core only parses label text into an issue vector;
//! transport, authentication, and retry policy all belong to the
//! capability implementation behind the trait.

use crate::core::report::{FrameResult, IssueVector};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Failure modes of the classification capability.
///
/// The core treats both variants identically: the frame is dropped and
/// the batch continues. Retry/backoff, if desired, belongs to the
/// capability client, not here.
#[derive(Debug, Error)]
pub enum CapabilityError {
    /// The capability exists but cannot serve right now (e.g. the model
    /// is still warming up).
    #[error("capability transiently unavailable: {0}")]
    TransientUnavailable(String),

    /// The classification request itself failed.
    #[error("classification request failed: {0}")]
    Request(#[from] anyhow::Error),
}

/// One labeled score from the capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledScore {
    pub label: String,
    #[serde(default)]
    pub score: f32,
}

/// The two output shapes the capability contract allows: an ordered list
/// of labeled scores, or a single bare label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassifierOutput {
    Labels(Vec<LabeledScore>),
    Single { label: String },
}

/// External image-classification capability.
///
/// Implementations wrap a concrete inference backend (a platform-native
/// classifier, a hosted inference API, a test fake). They must be cheap
/// to share across the concurrent frame fan-out.
pub trait ImageClassifier: Send + Sync {
    /// Short backend name for logging.
    fn name(&self) -> &str;

    /// Classify one frame image.
    fn classify(&self, image: &[u8]) -> Result<ClassifierOutput, CapabilityError>;
}

/// Keywords that map label text to the glitch/corruption pair.
const DEFECT_KEYWORDS: [&str; 3] = ["glitch", "corrupt", "error"];

/// Parse capability output into a per-frame issue vector.
///
/// All labels are lower-cased and joined; any defect keyword sets both
/// glitch and corruption for the frame. The classifier has no signal for
/// stutter, color shift, or missing subject, so those stay false: a
/// known coverage gap of the capability, not a defect here.
pub fn parse_output(output: &ClassifierOutput) -> IssueVector {
    let joined = match output {
        ClassifierOutput::Labels(scores) => scores
            .iter()
            .map(|s| s.label.to_lowercase())
            .collect::<Vec<_>>()
            .join(" "),
        ClassifierOutput::Single { label } => label.to_lowercase(),
    };

    let mut issues = IssueVector::default();
    if DEFECT_KEYWORDS.iter().any(|kw| joined.contains(kw)) {
        issues.glitch = true;
        issues.corruption = true;
    }
    issues
}

/// Classify one frame, returning `None` when the capability fails.
///
/// The drop reason is logged rather than swallowed; the caller keeps
/// only successes, in frame order.
pub fn classify_frame(
    capability: &dyn ImageClassifier,
    image: &[u8],
    frame_index: usize,
) -> Option<FrameResult> {
    match capability.classify(image) {
        Ok(output) => {
            let issues = parse_output(&output);
            debug!(
                frame_index,
                backend = capability.name(),
                flagged = issues.any(),
                "frame classified"
            );
            Some(FrameResult {
                frame_index,
                issues,
            })
        }
        Err(err) => {
            warn!(
                frame_index,
                backend = capability.name(),
                reason = %err,
                "frame classification dropped"
            );
            None
        }
    }
}
