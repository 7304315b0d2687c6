//! SimDeck Console library.
//!
//! The operator client for the simulation and assistant services.
//!
//! ## Structure
//!
//! - `infrastructure/` - Ports, HTTP adapters, clock and configuration
//! - `session` - Session state and its single write path
//! - `use_cases/` - Backend poller and instruction dispatcher
//! - `presentation/` - Text rendering and the interactive terminal
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod presentation;
pub mod session;
pub mod use_cases;

pub use app::App;
pub use infrastructure::config::{ConfigError, ConsoleConfig};
pub use session::{Session, SessionSnapshot, SessionState};
