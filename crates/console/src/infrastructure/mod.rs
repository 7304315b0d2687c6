//! Infrastructure implementations.
//!
//! Contains port trait implementations for the two backends and the clock,
//! plus environment configuration.

pub mod assistant_client;
pub mod clock;
pub mod config;
pub mod http;
pub mod ports;
pub mod simulation_client;
