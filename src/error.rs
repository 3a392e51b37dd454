//! Error types for allocation runs.
//!
//! Only missing input is fatal to a run. Malformed per-request payloads are
//! reported as structured errors for that request and the batch continues;
//! infeasible scheduling is a diagnostic, never an error.

use thiserror::Error;

/// Errors surfaced by allocation runs.
#[derive(Error, Debug, Clone)]
pub enum AllocError {
    /// A required input (request feed or prior snapshot) was absent or empty.
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// A feasibility option for one request could not be interpreted.
    #[error("Malformed option for request '{request_id}': {reason}")]
    MalformedOption { request_id: String, reason: String },

    /// A risk profile for one request could not be interpreted.
    #[error("Malformed risk profile for request '{request_id}': {reason}")]
    MalformedProfile { request_id: String, reason: String },

    /// A batch window does not intersect the backing request list.
    #[error("Batch window out of range: start_index {start_index} >= feed length {feed_len}")]
    WindowOutOfRange { start_index: usize, feed_len: usize },
}

pub type AllocResult<T> = Result<T, AllocError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let e = AllocError::MissingInput("request feed is empty".into());
        assert_eq!(e.to_string(), "Missing input: request feed is empty");

        let e = AllocError::MalformedOption {
            request_id: "P-001".into(),
            reason: "negative staff load".into(),
        };
        assert!(e.to_string().contains("P-001"));
        assert!(e.to_string().contains("negative staff load"));
    }
}
