//! Timeout utilities for bounding detection operations.
//!
//! The AI attempt submits frames to an external capability and must not
//! hold a request open indefinitely; the orchestrator wraps the whole
//! attempt in [`with_timeout`] and falls back to the rule engine when the
//! budget is exceeded.

use crate::error::{Result, VidtriageError};
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error};

/// Default ceiling for the per-request AI attempt, in seconds.
pub const AI_ATTEMPT_TIMEOUT_SECONDS: u64 = 30;

/// Timeout configuration for a bounded operation.
#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    /// Maximum duration for the operation
    pub duration: Duration,
    /// Operation name for logging
    pub operation_name: String,
}

impl TimeoutConfig {
    /// Create a new timeout configuration
    pub fn new(seconds: u64, operation: impl Into<String>) -> Self {
        Self {
            duration: Duration::from_secs(seconds),
            operation_name: operation.into(),
        }
    }

    /// Default AI-attempt timeout configuration (30 seconds)
    pub fn ai_attempt(operation: impl Into<String>) -> Self {
        Self::new(AI_ATTEMPT_TIMEOUT_SECONDS, operation)
    }
}

/// Execute an async operation with a timeout.
pub async fn with_timeout<T, F>(config: TimeoutConfig, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    debug!(
        "starting operation '{}' with timeout of {}s",
        config.operation_name,
        config.duration.as_secs()
    );

    match timeout(config.duration, future).await {
        Ok(result) => result,
        Err(_) => {
            error!(
                "operation '{}' timed out after {}s",
                config.operation_name,
                config.duration.as_secs()
            );
            Err(VidtriageError::Timeout {
                seconds: config.duration.as_secs(),
            })
        }
    }
}
