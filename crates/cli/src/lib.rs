//! CLI tool for exercising consistent hash rings.
//!
//! Provides commands for:
//! - Running the basic / virtual-node / replicated ring walkthrough
//! - Looking up the owners of keys on an ad-hoc ring
//! - Inspecting ring topology

pub mod commands;
pub mod config;

pub use commands::{Command, CommandResult};
pub use config::CliConfig;
