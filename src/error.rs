//! Construction-time errors for partitioners.
//!
//! Per-message anomalies never surface as errors; they degrade to the
//! default partition key inside `resolver`. Everything here indicates a
//! deployment misconfiguration and should abort startup.

use crate::pattern::PatternError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PartitionerError {
    /// Input timestamp pattern is empty or uses tokens the pattern
    /// mini-language does not support
    #[error("invalid input timestamp pattern: {0}")]
    Pattern(#[from] PatternError),

    /// Time zone string is not a known IANA identifier
    #[error("unknown time zone: '{zone}'")]
    UnknownTimeZone { zone: String },

    /// Bucket width of zero would divide by zero in the offset quantizer
    #[error("offsets_per_partition must be greater than 0")]
    ZeroBucketWidth,
}

/// Result type alias for PartitionerError
pub type Result<T> = std::result::Result<T, PartitionerError>;
