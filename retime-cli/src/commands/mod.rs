//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

/// Module containing the `list` command, which prints the edit services and
/// their setting schemas.
pub mod list;

/// Module containing the conversion commands (`slow-down`, `speed-up` and
/// `run`). These resolve settings, start a service and wait on it.
pub mod retime;
