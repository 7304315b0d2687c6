//! Port traits for infrastructure boundaries.
//!
//! These are the only abstractions in the console. Ports exist for:
//! - The simulation service (status and scene reports)
//! - The assistant service (readiness and instruction dispatch)
//! - The clock (for deterministic timestamps in tests)

use async_trait::async_trait;
use chrono::{DateTime, Local};
use simdeck_shared::{ProtocolError, PromptReply, SimulationReport};

// =============================================================================
// Error Types
// =============================================================================

/// Failure talking to a backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Request rejected, connection refused or timed out
    #[error("Request failed: {0}")]
    Network(String),
    /// Backend answered with a non-2xx status
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    /// Backend answered with a body of the wrong shape
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl BackendError {
    /// Network failures include non-2xx answers; everything else is a
    /// malformed payload.
    pub fn is_network_failure(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Status { .. })
    }
}

// =============================================================================
// Backend Ports
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SimulationPort: Send + Sync {
    /// Latest simulation report, or `None` while the simulation has not
    /// reported anything yet.
    async fn fetch_status(&self) -> Result<Option<SimulationReport>, BackendError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssistantPort: Send + Sync {
    /// Whether the LLM service reports itself ready.
    async fn llm_status(&self) -> Result<bool, BackendError>;

    /// Send an instruction and decode the reply.
    async fn submit_prompt(&self, prompt: &str) -> Result<PromptReply, BackendError>;
}

// =============================================================================
// Testability Ports
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_failure_classification() {
        assert!(BackendError::Network("refused".into()).is_network_failure());
        assert!(BackendError::Status {
            status: 502,
            body: String::new()
        }
        .is_network_failure());
        assert!(!BackendError::from(ProtocolError::malformed("x")).is_network_failure());
    }

    #[test]
    fn status_error_message() {
        let err = BackendError::Status {
            status: 503,
            body: "warming up".into(),
        };
        assert_eq!(err.to_string(), "Unexpected status 503: warming up");
    }
}
