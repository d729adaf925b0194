//! Detection orchestration: corruption check, mode selection, the AI
//! attempt with its fallback, and the final merge.
//!
//! Every stage returns an immutable partial verdict; this module combines
//! them with a pure union fold. AI issues merge over rule issues, and a
//! set bit is never cleared, so the corruption check's findings survive
//! whatever the downstream path produces.

use crate::core::metadata::Metadata;
use crate::core::report::{DetectionReport, FrameResult, IssueVector};
use crate::detect::aggregate;
use crate::detect::classifier::{classify_frame, ImageClassifier};
use crate::detect::config::DetectionConfig;
use crate::detect::corruption;
use crate::detect::features;
use crate::detect::rules::{self, RuleVerdict};
use crate::detect::sampler;
use crate::detect::sniffer;
use crate::error::{Result, VidtriageError};
use crate::timeout::{with_timeout, TimeoutConfig};
use bytes::Bytes;
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DETAIL_RULE_ONLY: &str = "rule engine used (AI disabled)";
pub const DETAIL_NO_CLASSIFIER: &str = "rule engine used (no classifier configured)";
pub const DETAIL_AI_FALLBACK: &str = "AI detection failed, fell back to rule engine";

/// Classification capabilities available to this orchestrator, passed in
/// explicitly at construction; there is no ambient environment lookup.
#[derive(Clone, Default)]
pub struct Capabilities {
    /// Preferred capability. When configured it is used exclusively and
    /// the secondary is skipped.
    pub primary: Option<Arc<dyn ImageClassifier>>,
    /// Secondary capability, used only when no primary is configured.
    pub secondary: Option<Arc<dyn ImageClassifier>>,
}

impl Capabilities {
    /// No classification capability at all; the AI path will be skipped.
    pub fn none() -> Self {
        Self::default()
    }
}

/// Outcome of the rule-or-AI branch, folded into the final report.
struct PathOutcome {
    issues: IssueVector,
    details: Vec<String>,
    confidence: f32,
}

/// Sequences the detection pipeline for one request.
pub struct DetectionOrchestrator {
    config: DetectionConfig,
    capabilities: Capabilities,
}

impl DetectionOrchestrator {
    pub fn new(config: DetectionConfig, capabilities: Capabilities) -> Self {
        Self {
            config,
            capabilities,
        }
    }

    /// Default configuration with no classification capability.
    pub fn rule_only() -> Self {
        Self::new(DetectionConfig::default(), Capabilities::none())
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Run one detection over a raw buffer.
    ///
    /// `frames` are decoded frame images supplied by the caller's capture
    /// layer; an empty slice means no frame-level analysis. Errors only
    /// on an empty buffer, which callers are expected to pre-validate;
    /// every other path terminates in a valid report.
    pub async fn detect(
        &self,
        data: &[u8],
        mime_hint: &str,
        ai_enabled: bool,
        frames: &[Bytes],
    ) -> Result<DetectionReport> {
        if data.is_empty() {
            return Err(VidtriageError::InvalidInput("empty buffer".to_string()));
        }

        let detect_id = generate_id(data.len());
        info!(
            detect_id = %detect_id,
            size_bytes = data.len(),
            ai = ai_enabled,
            frames = frames.len(),
            "detection start"
        );

        debug!(phase = "sniffing", "container format + corruption checks");
        let metadata = sniffer::sniff_metadata(data, mime_hint);
        let corruption_report = corruption::check(data, &self.config.corruption);
        let corruption_issues = IssueVector {
            corruption: corruption_report.has_issue,
            ..IssueVector::default()
        };

        let mut details = corruption_report.issues;
        if let Some(mismatch) = sniffer::mime_mismatch_detail(mime_hint, data) {
            details.push(mismatch);
        }

        let outcome = if !ai_enabled {
            debug!(phase = "rules", "AI disabled, rule-only pass");
            self.rule_only_outcome(data, &metadata, DETAIL_RULE_ONLY)
        } else {
            match self.select_backend() {
                None => {
                    debug!(phase = "rules", "AI requested but no capability configured");
                    self.rule_only_outcome(data, &metadata, DETAIL_NO_CLASSIFIER)
                }
                Some((backend, base_confidence)) => {
                    debug!(phase = "ai", backend = backend.name(), "AI attempt");
                    let budget = TimeoutConfig::new(
                        self.config.frames.attempt_timeout_secs,
                        "ai attempt",
                    );
                    let attempt =
                        self.ai_attempt(data, &metadata, backend, base_confidence, frames);
                    match with_timeout(budget, attempt).await {
                        Ok(outcome) => outcome,
                        Err(err) => {
                            warn!(detect_id = %detect_id, reason = %err, "AI attempt failed");
                            let mut outcome =
                                self.rule_only_outcome(data, &metadata, DETAIL_AI_FALLBACK);
                            outcome.confidence = self.config.confidence.fallback;
                            outcome
                        }
                    }
                }
            }
        };

        let issues = corruption_issues.merged(&outcome.issues);
        details.extend(outcome.details);

        info!(
            detect_id = %detect_id,
            flagged = issues.any(),
            confidence = outcome.confidence,
            "detection complete"
        );
        Ok(DetectionReport {
            issues,
            details,
            confidence: outcome.confidence,
            used_ai: ai_enabled,
        })
    }

    /// Sampler, feature extraction, then the rule engine.
    fn rule_pass(&self, data: &[u8], metadata: &Metadata) -> RuleVerdict {
        let samples = sampler::sample(data, &self.config.sampler);
        let features = features::extract(&samples, metadata);
        rules::evaluate(&features, &self.config.rules)
    }

    fn rule_only_outcome(&self, data: &[u8], metadata: &Metadata, marker: &str) -> PathOutcome {
        let verdict = self.rule_pass(data, metadata);
        let mut details = verdict.details;
        details.push(marker.to_string());
        PathOutcome {
            issues: verdict.issues,
            details,
            confidence: self.config.confidence.rule_only,
        }
    }

    /// Preferred capability wins outright; the secondary is only
    /// consulted when no primary is configured.
    fn select_backend(&self) -> Option<(Arc<dyn ImageClassifier>, f32)> {
        if let Some(primary) = &self.capabilities.primary {
            return Some((Arc::clone(primary), self.config.confidence.primary));
        }
        self.capabilities
            .secondary
            .as_ref()
            .map(|secondary| (Arc::clone(secondary), self.config.confidence.secondary))
    }

    /// The AI attempt: rule baseline, then the bounded concurrent frame
    /// fan-out when frames were supplied.
    ///
    /// All-frames-dropped is not a failure; the attempt then contributes
    /// zero AI issues and keeps the backend's base confidence. Only an
    /// unexpected error (or the caller's timeout) propagates, which the
    /// caller converts into the rule-engine fallback.
    async fn ai_attempt(
        &self,
        data: &[u8],
        metadata: &Metadata,
        backend: Arc<dyn ImageClassifier>,
        base_confidence: f32,
        frames: &[Bytes],
    ) -> Result<PathOutcome> {
        let rule = self.rule_pass(data, metadata);
        let mut issues = rule.issues;
        let mut details = rule.details;
        let mut confidence = base_confidence;

        if !frames.is_empty() {
            let submitted: Vec<Bytes> = frames
                .iter()
                .take(self.config.frames.max_frames)
                .cloned()
                .collect();
            let total = submitted.len();

            let mut handles = Vec::with_capacity(total);
            for (frame_index, frame) in submitted.into_iter().enumerate() {
                let backend = Arc::clone(&backend);
                handles.push(tokio::task::spawn_blocking(move || {
                    classify_frame(backend.as_ref(), &frame, frame_index)
                }));
            }

            // Wait-for-all join, tolerating per-frame failure. Successes
            // stay in submission order for deterministic aggregation.
            let mut results: Vec<FrameResult> = Vec::new();
            for handle in handles {
                match handle.await {
                    Ok(Some(result)) => results.push(result),
                    Ok(None) => {}
                    Err(err) => {
                        return Err(VidtriageError::Internal(format!(
                            "classification task failed: {}",
                            err
                        )))
                    }
                }
            }

            let vote = aggregate::aggregate(&results, &self.config.vote);
            issues = issues.merged(&vote.issues);
            if vote.any_success() {
                confidence = confidence.max(self.config.confidence.frame_floor);
            }
            details.push(format!(
                "frame analysis covered {}/{} frames",
                vote.frames_considered, total
            ));
        }

        Ok(PathOutcome {
            issues,
            details,
            confidence,
        })
    }
}

/// Mint a per-run id for log correlation.
fn generate_id(size: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(size.to_le_bytes());
    let nanos: i128 = Utc::now().timestamp_nanos_opt().unwrap_or_default().into();
    hasher.update(nanos.to_le_bytes());
    let digest = hasher.finalize();
    format!(
        "detect_{}_{}",
        Utc::now().timestamp_millis(),
        hex::encode(&digest[..8])
    )
}
