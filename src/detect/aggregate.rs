//! Vote aggregation over per-frame classification results.

use crate::core::report::{FrameResult, IssueKind, IssueVector};
use crate::detect::config::VoteConfig;
use tracing::debug;

/// Outcome of the frame vote.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameVote {
    /// Issue kinds that cleared the vote threshold.
    pub issues: IssueVector,
    /// Number of successfully classified frames that voted.
    pub frames_considered: usize,
}

impl FrameVote {
    /// True when at least one frame classification succeeded, which is
    /// what entitles the AI path to its elevated confidence floor.
    pub fn any_success(&self) -> bool {
        self.frames_considered > 0
    }
}

/// Aggregate successful frame results with a strict majority-fraction vote.
///
/// An issue kind is present iff the count of frames reporting it strictly
/// exceeds `frame_vote_fraction * total`; at the default 0.3, three of
/// ten frames is not enough, four is. An empty input yields the zero
/// vector: no AI contribution.
pub fn aggregate(results: &[FrameResult], cfg: &VoteConfig) -> FrameVote {
    let total = results.len();
    let mut issues = IssueVector::default();

    if total == 0 {
        return FrameVote {
            issues,
            frames_considered: 0,
        };
    }

    for kind in IssueKind::ALL {
        let count = results.iter().filter(|r| r.issues.get(kind)).count();
        if count as f64 > cfg.frame_vote_fraction * total as f64 {
            issues.set(kind, true);
        }
    }

    debug!(
        frames = total,
        flagged = issues.any(),
        "aggregated frame votes"
    );
    FrameVote {
        issues,
        frames_considered: total,
    }
}
