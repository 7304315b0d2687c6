//! Timeline - the chat-like log of instructions and replies.
//!
//! The timeline is append-only. Entries keep the raw message exactly as it
//! arrived; decoding of simulation results happens when an entry is shown
//! (see [`crate::command_result`]).

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::ids::{DispatchId, EntryId};

/// Display format for entry timestamps (local time of day).
pub const TIMESTAMP_FORMAT: &str = "%H:%M:%S";

/// Who produced a timeline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryOrigin {
    /// Typed by the operator
    FromUser,
    /// Reported by the simulation runtime
    FromSimulation,
    /// Advisory reply from the LLM service
    FromAssistant,
}

/// One item of the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    id: EntryId,
    origin: EntryOrigin,
    message: String,
    timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dispatch: Option<DispatchId>,
}

impl TimelineEntry {
    /// Create an entry stamped with the given local time of day.
    pub fn new(origin: EntryOrigin, message: impl Into<String>, at: NaiveTime) -> Self {
        Self {
            id: EntryId::new(),
            origin,
            message: message.into(),
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            dispatch: None,
        }
    }

    /// Tie this entry to the instruction dispatch it belongs to.
    pub fn with_dispatch(mut self, dispatch: DispatchId) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn origin(&self) -> EntryOrigin {
        self.origin
    }

    /// The raw, undecoded message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Time of day as `HH:MM:SS`.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn dispatch(&self) -> Option<DispatchId> {
        self.dispatch
    }
}

/// Ordered, append-only sequence of [`TimelineEntry`].
///
/// There is deliberately no way to remove or reorder entries. Entries that
/// share a timestamp stay in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return its insertion index.
    pub fn append(&mut self, entry: TimelineEntry) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TimelineEntry> {
        self.entries.get(index)
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    /// Entries newest first, each paired with its insertion index.
    pub fn newest_first(&self) -> impl Iterator<Item = (usize, &TimelineEntry)> {
        self.entries.iter().enumerate().rev()
    }

    /// Insertion index of the entry with this id.
    pub fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }
}
