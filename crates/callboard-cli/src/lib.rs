//! Callboard CLI library.
//!
//! Argument parsing and command handlers for the `callboard` binary.

pub mod cli;
pub mod commands;
