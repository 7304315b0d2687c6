//! Sticky connection status for the two backends.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The two independent backends the console talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Simulation runtime (scene, inventories, action results)
    Simulation,
    /// LLM orchestration service
    Assistant,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simulation => write!(f, "simulation"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// Whether a backend has ever answered with a valid payload.
///
/// Starts disconnected and flips to connected exactly once. A later failed
/// poll never resets it; failures are only logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    connected: bool,
}

impl ConnectionStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Mark connected. Returns `true` only on the first transition.
    pub fn mark_connected(&mut self) -> bool {
        let transitioned = !self.connected;
        self.connected = true;
        transitioned
    }

    /// Operator-facing label.
    pub fn label(&self) -> &'static str {
        if self.connected {
            "Connected"
        } else {
            "Loading..."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_disconnected() {
        let status = ConnectionStatus::new();
        assert!(!status.is_connected());
        assert_eq!(status.label(), "Loading...");
    }

    #[test]
    fn transitions_exactly_once() {
        let mut status = ConnectionStatus::new();
        assert!(status.mark_connected());
        assert!(!status.mark_connected());
        assert!(status.is_connected());
        assert_eq!(status.label(), "Connected");
    }

    #[test]
    fn backend_display() {
        assert_eq!(Backend::Simulation.to_string(), "simulation");
        assert_eq!(Backend::Assistant.to_string(), "assistant");
    }
}
