//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait and is routed by
//! [`CommandDispatcher`]. `check` runs when no subcommand is given.

pub mod check;
pub mod completions;
pub mod dispatcher;
pub mod list;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
