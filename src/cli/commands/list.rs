//! List command implementation.
//!
//! The `reltrack list` command shows the recorded installed versions.

use std::path::PathBuf;

use crate::cli::args::ListArgs;
use crate::config::{load_config, Overrides, Settings};
use crate::error::Result;
use crate::state::{InstalledState, StateFile};
use crate::ui::{Table, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// The list command implementation.
pub struct ListCommand {
    config_path: Option<PathBuf>,
    args: ListArgs,
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(config_path: Option<PathBuf>, args: ListArgs) -> Self {
        Self { config_path, args }
    }

    fn load_state(&self) -> Result<(PathBuf, InstalledState)> {
        let file = load_config(self.config_path.as_deref())?;
        let overrides = Overrides {
            state_file: self.args.state_file.clone(),
            ..Default::default()
        };
        let settings = Settings::resolve(&overrides, &file)?;
        let store = StateFile::new(settings.state_file);
        let state = store.load()?;
        Ok((store.path().to_path_buf(), state))
    }
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let (path, state) = self.load_state()?;
        tracing::debug!("Listing {} packages from {}", state.len(), path.display());

        if self.args.json {
            let json = serde_json::to_string_pretty(state.packages())
                .map_err(|e| anyhow::anyhow!("Failed to encode state: {}", e))?;
            println!("{}", json);
            return Ok(CommandResult::success());
        }

        if state.is_empty() {
            ui.message(&format!("No packages recorded in {}", path.display()));
            return Ok(CommandResult::success());
        }

        let mut table = Table::new(&["PACKAGE", "VERSION"]);
        for pkg in state.iter() {
            table.add_row(&[pkg.name.as_str(), pkg.version.as_str()]);
        }
        for line in table.render().lines() {
            ui.message(line);
        }

        Ok(CommandResult::success())
    }
}
