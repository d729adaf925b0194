//! Input-side data model for a detection run.
//!
//! Everything here is created fresh per request from the raw buffer and
//! discarded after the report is returned; there is no cross-request state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Container format recognized from the buffer's magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Codec {
    Mp4,
    Avi,
    WebM,
    Unknown,
}

impl Codec {
    /// Match the three known container magics against a buffer prefix.
    ///
    /// Priority order: MP4 `ftyp` at offset 4, then `RIFF` at offset 0,
    /// then the EBML magic at offset 0. Anything else, including a prefix
    /// too short to test, is `Unknown`; absence of a match is a normal
    /// outcome, not a failure.
    pub fn sniff(prefix: &[u8]) -> Codec {
        if prefix.len() >= 8 && &prefix[4..8] == b"ftyp" {
            return Codec::Mp4;
        }
        if prefix.len() >= 4 && &prefix[0..4] == b"RIFF" {
            return Codec::Avi;
        }
        if prefix.len() >= 4 && prefix[0..4] == [0x1A, 0x45, 0xDF, 0xA3] {
            return Codec::WebM;
        }
        Codec::Unknown
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Codec::Mp4 => "mp4",
            Codec::Avi => "avi",
            Codec::WebM => "webm",
            Codec::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// Buffer metadata recorded once per detection run; never mutated after
/// creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Buffer length in bytes.
    pub size: u64,
    /// Declared MIME type, advisory only.
    pub mime_type: String,
    /// Codec recognized from the first 12 bytes.
    pub codec: Codec,
}

/// Outcome of the structural minimum-viability checks.
///
/// Derived solely from the raw buffer, independent of [`Metadata`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorruptionReport {
    pub has_issue: bool,
    /// Human-readable findings, in check order.
    pub issues: Vec<String>,
}

/// Byte statistics for one sampled window of the buffer.
///
/// Samples are ordered by window position; adjacent-sample deltas drive
/// the feature extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Window start offset in the buffer.
    pub offset: usize,
    /// Arithmetic mean of the bytes read from this window.
    pub mean: f64,
    /// Population variance (divide by n) of the bytes read.
    pub variance: f64,
    /// First bytes of the window, retained for inspection (capped).
    pub leading: Vec<u8>,
}

/// Volatility metrics derived from an ordered sample sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    /// Mean absolute delta between consecutive samples' variance.
    /// Defined as 0.0 when fewer than two samples exist.
    pub variance_volatility: f64,
    /// Maximum absolute delta between consecutive samples' variance.
    /// 0.0 when fewer than two deltas exist.
    pub max_variance_change: f64,
    pub file_size: u64,
    pub codec: Codec,
}
