//! Container-format sniffing from magic bytes.
//!
//! The codec decision is a pure function of the first 12 bytes; the
//! declared MIME type is carried through as advisory metadata only. An
//! `infer`-based content hint is available separately so the orchestrator
//! can surface a declared-vs-sniffed disagreement.

use crate::core::metadata::{Codec, Metadata};
use tracing::debug;

/// Bytes inspected for the codec decision.
const SNIFF_PREFIX: usize = 12;

/// Identify the container format and assemble the run's [`Metadata`].
///
/// Pure function of the buffer prefix and the declared MIME string; never
/// fails. An unrecognized prefix yields `Codec::Unknown`.
pub fn sniff_metadata(data: &[u8], mime_hint: &str) -> Metadata {
    let prefix = &data[..data.len().min(SNIFF_PREFIX)];
    let codec = Codec::sniff(prefix);
    debug!(size = data.len(), codec = %codec, "sniffed container format");
    Metadata {
        size: data.len() as u64,
        mime_type: mime_hint.to_string(),
        codec,
    }
}

/// Content-based MIME hint from the `infer` signature database.
///
/// Advisory only: it never changes the codec decision, which follows the
/// fixed magic table in [`Codec::sniff`].
pub fn content_hint(data: &[u8]) -> Option<String> {
    infer::get(data).map(|kind| kind.mime_type().to_string())
}

/// Detail string when the declared MIME disagrees with the sniffed one.
///
/// Returns `None` when either side is missing or when they agree ignoring
/// case. A generic declared type ("application/octet-stream") is not
/// treated as a disagreement.
pub fn mime_mismatch_detail(declared: &str, data: &[u8]) -> Option<String> {
    if declared.is_empty() || declared.eq_ignore_ascii_case("application/octet-stream") {
        return None;
    }
    let sniffed = content_hint(data)?;
    if declared.eq_ignore_ascii_case(&sniffed) {
        return None;
    }
    Some(format!(
        "declared content type {} disagrees with sniffed {}",
        declared, sniffed
    ))
}
