//! CLI command handlers.

pub mod alerts;
pub mod config;
pub mod watch;
