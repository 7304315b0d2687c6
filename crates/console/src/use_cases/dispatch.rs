//! Instruction dispatcher - sends operator instructions to the assistant.
//!
//! The operator's entry is appended before the request goes out, so the
//! instruction shows up immediately. The reply is then classified: a reply
//! carrying both object lists is a scene update from the simulation, any
//! other reply is advisory text from the assistant.

use std::sync::Arc;

use simdeck_domain::{DispatchId, DomainError, UserInstruction};
use simdeck_shared::PromptReply;
use tokio::sync::{Mutex, MutexGuard};

use crate::infrastructure::ports::{AssistantPort, BackendError, ClockPort};
use crate::session::{Session, SessionUpdate};

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Nothing was sent and nothing was appended
    #[error("Instruction rejected: {0}")]
    Rejected(#[from] DomainError),
    /// The operator's entry is on the timeline but no reply arrived
    #[error("Dispatch {dispatch} failed: {source}")]
    Backend {
        dispatch: DispatchId,
        #[source]
        source: BackendError,
    },
}

/// How a reply was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    SceneUpdate,
    Advisory,
}

impl ReplyKind {
    pub fn of(reply: &PromptReply) -> Self {
        if reply.is_scene_update() {
            Self::SceneUpdate
        } else {
            Self::Advisory
        }
    }
}

/// Timeline positions touched by one successful dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub dispatch: DispatchId,
    pub user_entry: usize,
    pub reply_entry: usize,
    pub kind: ReplyKind,
}

pub struct InstructionDispatcher {
    session: Arc<Session>,
    assistant: Arc<dyn AssistantPort>,
    clock: Arc<dyn ClockPort>,
    /// One dispatch at a time per session
    lane: Mutex<()>,
    surface_failures: bool,
}

impl InstructionDispatcher {
    pub fn new(
        session: Arc<Session>,
        assistant: Arc<dyn AssistantPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            session,
            assistant,
            clock,
            lane: Mutex::new(()),
            surface_failures: false,
        }
    }

    /// Append a visible entry when a dispatch fails.
    pub fn with_surfaced_failures(mut self, enabled: bool) -> Self {
        self.surface_failures = enabled;
        self
    }

    /// Submit one instruction and wait for its reply.
    ///
    /// Blank text is rejected before anything happens. A second submit
    /// while one is in flight waits for the first to finish, and its
    /// operator entry is appended only once the first reply has landed.
    /// The entry is immediate relative to its own request, never ahead of
    /// an earlier instruction's reply.
    pub async fn submit(&self, text: &str) -> Result<DispatchOutcome, DispatchError> {
        let instruction = UserInstruction::parse(text)?;

        let _lane = self.lane.lock().await;
        let _busy = self.session.begin_dispatch();
        let dispatch = DispatchId::new();

        let user_update = self
            .session
            .apply(SessionUpdate::InstructionSent {
                instruction: instruction.clone(),
                dispatch,
                at: self.clock.now().time(),
            })
            .await;
        let user_entry = user_update.appended.unwrap_or_default();

        tracing::info!(dispatch = %dispatch, instruction = %instruction, "Dispatching instruction");

        let reply = match self.assistant.submit_prompt(instruction.as_str()).await {
            Ok(reply) => reply,
            Err(e) => return Err(self.fail(dispatch, e).await),
        };

        let kind = ReplyKind::of(&reply);
        let reply_update = self
            .session
            .apply(SessionUpdate::ReplyReceived {
                reply,
                dispatch,
                at: self.clock.now().time(),
            })
            .await;

        tracing::debug!(dispatch = %dispatch, ?kind, "Reply applied");

        Ok(DispatchOutcome {
            dispatch,
            user_entry,
            reply_entry: reply_update.appended.unwrap_or_default(),
            kind,
        })
    }

    /// Wait for the in-flight dispatch and hold off new ones while the
    /// guard lives.
    pub(crate) async fn quiesce(&self) -> MutexGuard<'_, ()> {
        self.lane.lock().await
    }

    async fn fail(&self, dispatch: DispatchId, error: BackendError) -> DispatchError {
        tracing::warn!(
            dispatch = %dispatch,
            error = %error,
            network = error.is_network_failure(),
            "Instruction dispatch failed"
        );

        if self.surface_failures {
            self.session
                .apply(SessionUpdate::DispatchFailed {
                    reason: error.to_string(),
                    dispatch,
                    at: self.clock.now().time(),
                })
                .await;
        }

        DispatchError::Backend {
            dispatch,
            source: error,
        }
    }
}
