//! Shared reqwest plumbing for the backend clients.

use std::time::Duration;

use reqwest::{Client, Response};
use serde_json::Value;
use simdeck_shared::ProtocolError;

use crate::infrastructure::ports::BackendError;

/// Build a client whose every request is bounded by `timeout`.
pub fn build_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to build HTTP client with timeout, using defaults");
            Client::new()
        })
}

/// Normalize a base URL so paths can be appended with `format!`.
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

pub fn network_error(e: reqwest::Error) -> BackendError {
    if e.is_timeout() {
        BackendError::Network(format!("timed out: {}", e))
    } else {
        BackendError::Network(e.to_string())
    }
}

/// Check the status and read the body as JSON.
pub async fn read_json(response: Response) -> Result<Value, BackendError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(BackendError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let text = response.text().await.map_err(network_error)?;
    serde_json::from_str(&text)
        .map_err(|e| BackendError::Protocol(ProtocolError::malformed(e.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_loses_trailing_slashes() {
        assert_eq!(normalize_base_url("http://localhost:8008/"), "http://localhost:8008");
        assert_eq!(normalize_base_url("http://host/api//"), "http://host/api");
        assert_eq!(normalize_base_url("http://host"), "http://host");
    }
}
