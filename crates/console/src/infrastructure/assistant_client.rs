//! LLM orchestration service client.
//!
//! Readiness and instructions may live on different hosts: in the reference
//! deployment the readiness flag is relayed through the simulation API while
//! instructions go straight to the LLM service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use simdeck_shared::{
    AssistantStatus, PromptReply, PromptRequest, ProtocolError, ASSISTANT_STATUS_PATH, PROMPT_PATH,
};

use crate::infrastructure::http::{build_client, network_error, normalize_base_url, read_json};
use crate::infrastructure::ports::{AssistantPort, BackendError};

/// Default host of the readiness endpoint.
pub const DEFAULT_ASSISTANT_STATUS_URL: &str = "http://localhost:8008";

/// Default host of the instruction endpoint.
pub const DEFAULT_ASSISTANT_URL: &str = "http://localhost:8009";

/// Client for the assistant's status and prompt endpoints
#[derive(Clone)]
pub struct AssistantClient {
    client: Client,
    status_base_url: String,
    base_url: String,
}

impl AssistantClient {
    pub fn new(status_base_url: &str, base_url: &str, timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            status_base_url: normalize_base_url(status_base_url),
            base_url: normalize_base_url(base_url),
        }
    }
}

#[async_trait]
impl AssistantPort for AssistantClient {
    async fn llm_status(&self) -> Result<bool, BackendError> {
        let response = self
            .client
            .get(format!("{}{}", self.status_base_url, ASSISTANT_STATUS_PATH))
            .send()
            .await
            .map_err(network_error)?;

        let body = read_json(response).await?;
        let status: AssistantStatus = serde_json::from_value(body).map_err(ProtocolError::from)?;
        Ok(status.llm_status)
    }

    async fn submit_prompt(&self, prompt: &str) -> Result<PromptReply, BackendError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, PROMPT_PATH))
            .json(&PromptRequest::new(prompt))
            .send()
            .await
            .map_err(network_error)?;

        let body = read_json(response).await?;
        Ok(PromptReply::from_body(body)?)
    }
}
