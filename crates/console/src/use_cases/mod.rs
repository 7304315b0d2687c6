//! Use cases - the only writers of session state.

pub mod dispatch;
pub mod poll;

pub use dispatch::{DispatchError, DispatchOutcome, InstructionDispatcher, ReplyKind};
pub use poll::{BackendPoller, PollLoop, PollOutcome, TickOutcome};
