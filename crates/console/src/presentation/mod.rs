//! Text presentation and the interactive terminal.

pub mod render;
pub mod terminal;

pub use terminal::{ConsoleCommand, Terminal};
