//! SimDeck Shared - wire contracts between the console and its backends
//!
//! This crate contains the JSON shapes exchanged with:
//! - the simulation service (`GET /response`)
//! - the LLM orchestration service (`GET /llm_status`, `POST /set/prompt`)
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde, serde_json, thiserror and tracing
//! 2. **No business logic** - Pure data types and payload normalization
//! 3. **Total readers** - every reader returns a `ProtocolError` instead of panicking

pub mod assistant;
pub mod error;
pub mod reply;
pub mod simulation;

pub use assistant::{AssistantStatus, PromptRequest, ASSISTANT_STATUS_PATH, PROMPT_PATH};
pub use error::ProtocolError;
pub use reply::PromptReply;
pub use simulation::{parse_simulation_status, SimulationReport, SIMULATION_STATUS_PATH};
