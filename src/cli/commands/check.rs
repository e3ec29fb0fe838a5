//! Check command implementation.
//!
//! The `reltrack check` command (also the default) walks the manifest,
//! compares each repository's latest release with the recorded version and
//! offers installs and updates. State is saved once, after the loop.

use std::path::PathBuf;

use crate::cli::args::CheckArgs;
use crate::config::{load_config, Settings};
use crate::error::Result;
use crate::reconcile::{ReconciliationEngine, RunOptions};
use crate::release::GitHubClient;
use crate::state::StateFile;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The check command implementation.
pub struct CheckCommand {
    config_path: Option<PathBuf>,
    args: CheckArgs,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(config_path: Option<PathBuf>, args: CheckArgs) -> Self {
        Self { config_path, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &CheckArgs {
        &self.args
    }

    fn options(&self) -> RunOptions {
        RunOptions {
            assume_yes: self.args.yes,
            dry_run: self.args.dry_run,
        }
    }
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let file = load_config(self.config_path.as_deref())?;
        let settings = Settings::resolve(&self.args.overrides(), &file)?;
        tracing::debug!("Resolved settings: {:?}", settings);
        let source = settings.require_manifest()?;

        let client = GitHubClient::new(settings.client_config())?;
        let mut spinner = ui.start_spinner(&format!("Connecting to {}", client.api_url()));
        if let Err(e) = client.check_access() {
            spinner.finish_error("API unreachable");
            return Err(e);
        }
        spinner.finish_clear();
        if !client.is_authenticated() {
            tracing::debug!("Running without an API token");
        }

        let manifest = source.load(settings.timeout)?;
        if manifest.is_empty() {
            ui.warning("Manifest lists no repositories");
        }

        let store = StateFile::new(settings.state_file.clone());
        let mut state = store.load()?;
        tracing::debug!(
            "Loaded {} installed packages from {}",
            state.len(),
            store.path().display()
        );

        let engine = ReconciliationEngine::new(&client)
            .with_matcher(settings.asset_matcher())
            .with_options(self.options());
        let mut installer = settings.installer();
        let report = engine.run(manifest.entries(), &mut state, ui, installer.as_mut());

        if self.args.dry_run {
            ui.message("Dry run: state not saved");
        } else {
            store.save(&state)?;
            tracing::debug!("Saved state to {}", store.path().display());
        }

        if report.is_clean() {
            ui.success(&report.to_string());
        } else {
            ui.warning(&report.to_string());
        }

        Ok(CommandResult::success())
    }
}
