//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::PathBuf;

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::ui::UserInterface;

use super::check::CheckCommand;
use super::completions::CompletionsCommand;
use super::list::ListCommand;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command.
    ///
    /// Fatal problems are returned as errors; the caller reports them and
    /// exits with status 1.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    config_path: Option<PathBuf>,
}

impl CommandDispatcher {
    /// Create a dispatcher; `config_path` is the explicit `--config` value.
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self { config_path }
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Some(Commands::Check(args)) => {
                CheckCommand::new(self.config_path.clone(), args.clone()).execute(ui)
            }
            Some(Commands::List(args)) => {
                ListCommand::new(self.config_path.clone(), args.clone()).execute(ui)
            }
            Some(Commands::Completions(args)) => {
                CompletionsCommand::new(args.clone()).execute(ui)
            }
            None => CheckCommand::new(self.config_path.clone(), cli.check.clone()).execute(ui),
        }
    }
}
