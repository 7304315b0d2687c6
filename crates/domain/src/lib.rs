//! SimDeck domain model.
//!
//! Pure types shared by the console: the append-only timeline, object
//! inventories and the scene filter, the simulation result decoder, and
//! sticky connection status. Nothing here performs I/O.

pub mod command_result;
pub mod connection;
pub mod error;
pub mod ids;
pub mod instruction;
pub mod inventory;
pub mod timeline;

pub use command_result::{decode, headline, CommandResult, CommandStatus, SUCCESS_MARKER};
pub use connection::{Backend, ConnectionStatus};
pub use error::DomainError;
pub use ids::{DispatchId, EntryId};
pub use instruction::{InstructionDraft, UserInstruction};
pub use inventory::{
    filter_scene, ExclusionList, Inventory, InventoryKind, DEFAULT_EXCLUDED_KEYWORDS,
};
pub use timeline::{EntryOrigin, Timeline, TimelineEntry, TIMESTAMP_FORMAT};
