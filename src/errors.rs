//! Error types for the scoring and network engine
//!
//! Every engine operation returns `Result<T, EngineError>` instead of
//! silently repairing or dropping bad input. Degenerate but valid input
//! (no communications, zero or one member) is NOT an error: it produces
//! well-defined zero/neutral results.

use thiserror::Error;

/// Errors surfaced by the engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A record references something that is not in the supplied inputs
    #[error("data consistency error in {computation}: {record}: {detail}")]
    DataConsistency {
        /// Which computation rejected the input (e.g. "snapshot")
        computation: &'static str,
        /// The offending record, e.g. "communication 17"
        record: String,
        detail: String,
    },

    /// A precondition the computation needs cannot be satisfied
    #[error("insufficient data for {computation}: {reason}")]
    InsufficientData {
        computation: &'static str,
        reason: String,
    },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EngineError {
    pub(crate) fn data_consistency(
        computation: &'static str,
        record: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        EngineError::DataConsistency {
            computation,
            record: record.into(),
            detail: detail.into(),
        }
    }

    pub(crate) fn insufficient_data(computation: &'static str, reason: impl Into<String>) -> Self {
        EngineError::InsufficientData {
            computation,
            reason: reason.into(),
        }
    }
}

/// Convenience alias used across the engine
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_consistency_message_names_record() {
        let err = EngineError::data_consistency("snapshot", "communication 7", "unknown sender 99");
        let msg = err.to_string();
        assert!(msg.contains("snapshot"));
        assert!(msg.contains("communication 7"));
        assert!(msg.contains("unknown sender 99"));
    }

    #[test]
    fn test_insufficient_data_message() {
        let err = EngineError::insufficient_data("overall score", "energy undefined");
        assert_eq!(
            err.to_string(),
            "insufficient data for overall score: energy undefined"
        );
    }
}
