//! gireflect command-line inspector
//!
//! The binary in `main.rs` only parses arguments and sets up logging; every
//! command lives here so it can be driven against an in-memory writer.

pub mod commands;
pub mod output;

pub use commands::{open, RequireArgs};
