//! Structural minimum-viability checks.
//!
//! Failures are recorded as issues on the report, never raised as
//! errors; the result is merged into the final verdict on every path,
//! AI or not.

use crate::core::metadata::{Codec, CorruptionReport};
use crate::detect::config::CorruptionConfig;
use tracing::debug;

pub const ISSUE_TOO_SMALL: &str = "file too small / likely incomplete";
pub const ISSUE_BAD_HEADER: &str = "invalid header / possibly corrupted";

/// Run the size-floor and header-validity checks.
///
/// A buffer under the size floor short-circuits: a truncated buffer
/// cannot reliably be header-checked, so only the size issue is recorded.
pub fn check(data: &[u8], cfg: &CorruptionConfig) -> CorruptionReport {
    let mut issues = Vec::new();

    if data.len() < cfg.min_file_size {
        debug!(
            size = data.len(),
            floor = cfg.min_file_size,
            "buffer below size floor"
        );
        issues.push(ISSUE_TOO_SMALL.to_string());
        return CorruptionReport {
            has_issue: true,
            issues,
        };
    }

    let probe = &data[..data.len().min(cfg.header_probe_bytes)];
    if Codec::sniff(probe) == Codec::Unknown {
        debug!("no known container magic in header probe");
        issues.push(ISSUE_BAD_HEADER.to_string());
    }

    CorruptionReport {
        has_issue: !issues.is_empty(),
        issues,
    }
}
