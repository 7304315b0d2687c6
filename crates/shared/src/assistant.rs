//! Contracts of the LLM orchestration service.

use serde::{Deserialize, Serialize};

/// Path of the assistant readiness endpoint.
pub const ASSISTANT_STATUS_PATH: &str = "/llm_status";

/// Path of the instruction endpoint.
pub const PROMPT_PATH: &str = "/set/prompt";

/// Body of `GET /llm_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantStatus {
    #[serde(rename = "llmStatus")]
    pub llm_status: bool,
}

/// Body of `POST /set/prompt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRequest {
    pub prompt: String,
}

impl PromptRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_uses_camel_case_field() {
        let status: AssistantStatus = serde_json::from_value(json!({ "llmStatus": true })).unwrap();
        assert!(status.llm_status);
        assert!(serde_json::from_value::<AssistantStatus>(json!({ "llm_status": true })).is_err());
    }

    #[test]
    fn prompt_request_shape() {
        let body = serde_json::to_value(PromptRequest::new("spawn a wrench")).unwrap();
        assert_eq!(body, json!({ "prompt": "spawn a wrench" }));
    }
}
