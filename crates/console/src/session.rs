//! Client session state.
//!
//! One [`Session`] owns the timeline, both inventories and both connection
//! flags. The poller and the dispatcher are its only writers: they describe
//! a change as a [`SessionUpdate`] and the session applies it under a single
//! write lock, so a poll tick and a dispatch can never interleave partial
//! writes. No lock is held across an await.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::NaiveTime;
use simdeck_domain::{
    Backend, ConnectionStatus, DispatchId, EntryOrigin, Inventory, Timeline, TimelineEntry,
    UserInstruction,
};
use simdeck_shared::{PromptReply, SimulationReport};
use tokio::sync::{watch, RwLock};

/// Everything the operator sees, minus presentation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub timeline: Timeline,
    pub available: Inventory,
    pub scene: Inventory,
    pub simulation: ConnectionStatus,
    pub assistant: ConnectionStatus,
}

impl SessionState {
    pub fn connection(&self, backend: Backend) -> ConnectionStatus {
        match backend {
            Backend::Simulation => self.simulation,
            Backend::Assistant => self.assistant,
        }
    }

    pub fn both_connected(&self) -> bool {
        self.simulation.is_connected() && self.assistant.is_connected()
    }

    /// Apply one update as a unit.
    pub(crate) fn apply(&mut self, update: SessionUpdate) -> UpdateOutcome {
        match update {
            SessionUpdate::SimulationReported { report, at } => {
                self.replace_inventories(&report.available_prefabs, &report.current_objects);
                let appended = self.timeline.append(TimelineEntry::new(
                    EntryOrigin::FromSimulation,
                    report.message,
                    at,
                ));
                UpdateOutcome {
                    appended: Some(appended),
                    connected: self
                        .simulation
                        .mark_connected()
                        .then_some(Backend::Simulation),
                }
            }
            SessionUpdate::AssistantReady => UpdateOutcome {
                appended: None,
                connected: self.assistant.mark_connected().then_some(Backend::Assistant),
            },
            SessionUpdate::InstructionSent {
                instruction,
                dispatch,
                at,
            } => {
                let entry = TimelineEntry::new(EntryOrigin::FromUser, instruction.into_inner(), at)
                    .with_dispatch(dispatch);
                UpdateOutcome::appended(self.timeline.append(entry))
            }
            SessionUpdate::ReplyReceived {
                reply,
                dispatch,
                at,
            } => {
                let entry = match reply {
                    PromptReply::SceneUpdate {
                        message,
                        available_prefabs,
                        current_objects,
                    } => {
                        self.replace_inventories(&available_prefabs, &current_objects);
                        TimelineEntry::new(EntryOrigin::FromSimulation, message, at)
                    }
                    PromptReply::Advisory { message } => {
                        TimelineEntry::new(EntryOrigin::FromAssistant, message, at)
                    }
                };
                UpdateOutcome::appended(self.timeline.append(entry.with_dispatch(dispatch)))
            }
            SessionUpdate::DispatchFailed {
                reason,
                dispatch,
                at,
            } => {
                let entry = TimelineEntry::new(
                    EntryOrigin::FromAssistant,
                    format!("Instruction failed: {}", reason),
                    at,
                )
                .with_dispatch(dispatch);
                UpdateOutcome::appended(self.timeline.append(entry))
            }
        }
    }

    fn replace_inventories(&mut self, available: &str, scene: &str) {
        self.available = Inventory::parse(available);
        self.scene = Inventory::parse(scene);
    }
}

/// A change to the session, described by its writer.
#[derive(Debug, Clone)]
pub(crate) enum SessionUpdate {
    SimulationReported {
        report: SimulationReport,
        at: NaiveTime,
    },
    AssistantReady,
    InstructionSent {
        instruction: UserInstruction,
        dispatch: DispatchId,
        at: NaiveTime,
    },
    ReplyReceived {
        reply: PromptReply,
        dispatch: DispatchId,
        at: NaiveTime,
    },
    DispatchFailed {
        reason: String,
        dispatch: DispatchId,
        at: NaiveTime,
    },
}

/// What applying an update did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct UpdateOutcome {
    /// Insertion index of the appended timeline entry
    pub appended: Option<usize>,
    /// Backend that became connected with this update
    pub connected: Option<Backend>,
}

impl UpdateOutcome {
    fn appended(index: usize) -> Self {
        Self {
            appended: Some(index),
            connected: None,
        }
    }
}

/// Read-only copy of the session for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub state: SessionState,
    /// An instruction is waiting for its reply
    pub busy: bool,
}

/// The session controller.
#[derive(Debug)]
pub struct Session {
    state: RwLock<SessionState>,
    busy: AtomicBool,
    /// Bumped after every applied update and every reset
    revision: watch::Sender<u64>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            state: RwLock::new(SessionState::default()),
            busy: AtomicBool::new(false),
            revision,
        }
    }

    /// Receiver that wakes whenever session state changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state.read().await.clone(),
            busy: self.is_busy(),
        }
    }

    /// Run a read-only closure against the current state.
    pub async fn read<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        let state = self.state.read().await;
        f(&state)
    }

    pub async fn is_connected(&self, backend: Backend) -> bool {
        self.state.read().await.connection(backend).is_connected()
    }

    pub async fn both_connected(&self) -> bool {
        self.state.read().await.both_connected()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Drop all state and start over disconnected.
    pub async fn reset(&self) {
        *self.state.write().await = SessionState::default();
        self.bump();
        tracing::info!("Session reset");
    }

    pub(crate) async fn apply(&self, update: SessionUpdate) -> UpdateOutcome {
        let outcome = self.state.write().await.apply(update);
        self.bump();
        outcome
    }

    /// Mark the session busy until the returned guard is dropped.
    pub(crate) fn begin_dispatch(&self) -> BusyGuard<'_> {
        self.busy.store(true, Ordering::SeqCst);
        self.bump();
        BusyGuard { session: self }
    }

    fn bump(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }
}

/// Clears the busy flag on every exit path of a dispatch.
pub(crate) struct BusyGuard<'a> {
    session: &'a Session,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.session.busy.store(false, Ordering::SeqCst);
        self.session.bump();
    }
}
