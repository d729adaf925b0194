//! Output-side data model: issue vectors, per-frame results, and the
//! final detection report.
//!
//! The report's JSON field names are serialization-stable: callers of the
//! excluded HTTP layer depend on `issues.{glitch, corruption, stutter,
//! colorShift, missingPerson}`, `details`, `confidence` and `usedAI`.

use crate::error::{Result, VidtriageError};
use serde::{Deserialize, Serialize};

/// The five fixed defect categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueKind {
    Glitch,
    Corruption,
    Stutter,
    ColorShift,
    MissingPerson,
}

impl IssueKind {
    /// Every issue kind, in report order.
    pub const ALL: [IssueKind; 5] = [
        IssueKind::Glitch,
        IssueKind::Corruption,
        IssueKind::Stutter,
        IssueKind::ColorShift,
        IssueKind::MissingPerson,
    ];
}

/// Boolean verdict per issue kind. Keys are fixed and exhaustive; every
/// producer populates all five (default false).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueVector {
    pub glitch: bool,
    pub corruption: bool,
    pub stutter: bool,
    pub color_shift: bool,
    pub missing_person: bool,
}

impl IssueVector {
    pub fn get(&self, kind: IssueKind) -> bool {
        match kind {
            IssueKind::Glitch => self.glitch,
            IssueKind::Corruption => self.corruption,
            IssueKind::Stutter => self.stutter,
            IssueKind::ColorShift => self.color_shift,
            IssueKind::MissingPerson => self.missing_person,
        }
    }

    pub fn set(&mut self, kind: IssueKind, value: bool) {
        match kind {
            IssueKind::Glitch => self.glitch = value,
            IssueKind::Corruption => self.corruption = value,
            IssueKind::Stutter => self.stutter = value,
            IssueKind::ColorShift => self.color_shift = value,
            IssueKind::MissingPerson => self.missing_person = value,
        }
    }

    /// Pure union merge. A bit set in either input stays set, so a later
    /// stage can never clear an earlier stage's finding.
    pub fn merged(&self, other: &IssueVector) -> IssueVector {
        IssueVector {
            glitch: self.glitch || other.glitch,
            corruption: self.corruption || other.corruption,
            stutter: self.stutter || other.stutter,
            color_shift: self.color_shift || other.color_shift,
            missing_person: self.missing_person || other.missing_person,
        }
    }

    /// True if any issue kind is set.
    pub fn any(&self) -> bool {
        IssueKind::ALL.iter().any(|k| self.get(*k))
    }
}

/// One successfully classified frame. Failed classifications are dropped,
/// not retained as a value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameResult {
    pub frame_index: usize,
    pub issues: IssueVector,
}

/// Final output of a detection run; immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionReport {
    pub issues: IssueVector,
    /// Human-readable findings, in pipeline order, not de-duplicated.
    pub details: Vec<String>,
    /// Confidence in [0, 1].
    pub confidence: f32,
    /// The requested AI mode, not actual AI success.
    #[serde(rename = "usedAI")]
    pub used_ai: bool,
}

impl DetectionReport {
    /// Serialize to a JSON string.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| VidtriageError::Serialization(e.to_string()))
    }

    /// Deserialize from a JSON string.
    pub fn from_json_str(s: &str) -> Result<DetectionReport> {
        serde_json::from_str(s).map_err(|e| VidtriageError::Serialization(e.to_string()))
    }
}
