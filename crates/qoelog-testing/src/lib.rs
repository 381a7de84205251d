//! Testing infrastructure for qoelog integration tests.
//!
//! This crate provides utilities for writing robust integration tests:
//! - `fixtures`: Packet, addendum and group file text builders
//! - `TestWorld`: Temporary log directories plus a CLI runner
//! - `assertions`: Checks over the CLI's JSON output

pub mod assertions;
pub mod fixtures;
pub mod world;

pub use fixtures::{AddendumBuilder, PacketBuilder, group_line, log_text};
pub use world::{CliResult, TestWorld};
