//! Core blinkguard library (tracker, monitor loop, config, alert history).

pub mod alerts;
pub mod config;
pub mod interrupt;
pub mod monitor;
pub mod tracker;
