//! Error types for the orchestration layer

use thiserror::Error;

/// Errors surfaced by soxwrap operations.
///
/// Every way the external tool can fail (missing binary, malformed
/// arguments, non-zero exit) collapses into [`SoxError::CommandFailed`];
/// callers get the failing operation and source name, nothing more. There
/// are no retries, failures are fatal to the calling operation.
#[derive(Debug, Error)]
pub enum SoxError {
    /// The external process invocation failed.
    #[error("there was an error running {operation} on {input}")]
    CommandFailed { operation: String, input: String },

    /// The source value's kind is not accepted by the operation.
    #[error("unsupported input kind: expected {expected}")]
    UnsupportedInput { expected: &'static str },

    /// The feature extractor's output was not valid MessagePack.
    #[error("failed to decode feature output: {0}")]
    FeatureDecode(#[from] rmp_serde::decode::Error),

    /// Temp file creation or source cleanup failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SoxError {
    pub(crate) fn command_failed(operation: &str, input: &str) -> Self {
        SoxError::CommandFailed {
            operation: operation.to_string(),
            input: input.to_string(),
        }
    }
}
