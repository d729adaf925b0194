//! Core data types for vidtriage.
//!
//! All entities here are created fresh per detection request and
//! discarded once the report is returned; nothing persists across calls.

pub mod metadata;
pub mod report;
