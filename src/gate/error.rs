//! Failure taxonomy for the command gatekeeper.
//!
//! None of these ever escape [`Gatekeeper::attempt`](super::Gatekeeper::attempt)
//! as a `Result::Err`; they ride inside a failed
//! [`ExecutionResult`](super::ExecutionResult) so the caller always gets a
//! finished value with a short human-readable reason.

use std::time::Duration;
use thiserror::Error;

/// Why a gated command did not run, or did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    /// Terminal policy denial. No confirmation is offered.
    #[error("{0}")]
    PolicyDenied(&'static str),

    /// The user's answer did not match the challenge.
    #[error("confirmation code incorrect")]
    ConfirmationRejected,

    /// The shell process could not be started.
    #[error("failed to start command: {0}")]
    SpawnFailure(String),

    /// The process ran and exited with a non-zero status.
    #[error("command exited with status {exit_status}")]
    RuntimeFailure { exit_status: i32 },

    /// The process outlived the runner's deadline and was killed.
    #[error("timed out after {0:?}")]
    TimedOut(Duration),
}

impl GateError {
    /// True for failures decided before any process was spawned.
    pub fn is_pre_execution(&self) -> bool {
        matches!(self, Self::PolicyDenied(_) | Self::ConfirmationRejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_keeps_subsecond_limits() {
        assert_eq!(
            GateError::TimedOut(Duration::from_millis(300)).to_string(),
            "timed out after 300ms"
        );
        assert_eq!(
            GateError::TimedOut(Duration::from_secs(30)).to_string(),
            "timed out after 30s"
        );
    }

    #[test]
    fn test_pre_execution_split() {
        assert!(GateError::PolicyDenied("empty command").is_pre_execution());
        assert!(GateError::ConfirmationRejected.is_pre_execution());
        assert!(!GateError::SpawnFailure("command not found: x".into()).is_pre_execution());
        assert!(!GateError::RuntimeFailure { exit_status: 1 }.is_pre_execution());
    }
}
