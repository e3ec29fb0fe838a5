//! Shell command execution for install hooks.

pub mod command;
pub mod platform;

pub use command::{execute, CommandOptions, CommandResult};
pub use platform::{is_ci, quote_arg};
