//! Error types for the vidtriage detection pipeline.
//!
//! The pipeline itself never fails a caller under normal operation; these
//! errors cover caller contract violations, internal timeouts (which the
//! orchestrator converts into the rule-engine fallback), and serialization.

use thiserror::Error;

/// Main error type for vidtriage operations.
#[derive(Debug, Error)]
pub enum VidtriageError {
    /// Invalid input data (e.g. an empty buffer the caller should have
    /// rejected before calling the core)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An operation exceeded its time budget
    #[error("Operation timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for vidtriage operations
pub type Result<T> = std::result::Result<T, VidtriageError>;
