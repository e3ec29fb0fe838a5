//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::config::Overrides;

/// reltrack - Keep GitHub-released tools at their latest release.
#[derive(Debug, Parser)]
#[command(name = "reltrack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default ~/.reltrack/config.yml)
    #[arg(short, long, global = true, env = "RELTRACK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Arguments for `check` when no subcommand is given
    #[command(flatten)]
    pub check: CheckArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Whether prompts may be shown for this invocation.
    pub fn wants_prompts(&self) -> bool {
        match &self.command {
            Some(Commands::Check(args)) => args.allows_prompts(),
            None => self.check.allows_prompts(),
            Some(_) => false,
        }
    }
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compare installed versions with the latest releases (default)
    Check(CheckArgs),

    /// Show recorded installed versions
    List(ListArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CheckArgs {
    /// Manifest location: file path or http(s) URL
    #[arg(short, long, env = "RELTRACK_MANIFEST")]
    pub manifest: Option<String>,

    /// Installed-state file
    #[arg(short, long = "state", env = "RELTRACK_STATE")]
    pub state_file: Option<PathBuf>,

    /// Releases API root
    #[arg(long, env = "RELTRACK_API_URL")]
    pub api_url: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long, env = "RELTRACK_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Answer yes to every install/update prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Report what would change without installing or saving
    #[arg(long)]
    pub dry_run: bool,

    /// Never prompt; unanswered prompts default to no
    #[arg(long)]
    pub non_interactive: bool,
}

impl CheckArgs {
    /// Flag values as configuration overrides.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            manifest: self.manifest.clone(),
            state_file: self.state_file.clone(),
            api_url: self.api_url.clone(),
            timeout_secs: self.timeout,
        }
    }

    fn allows_prompts(&self) -> bool {
        !self.non_interactive && !self.yes && !self.dry_run
    }
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Installed-state file
    #[arg(short, long = "state", env = "RELTRACK_STATE")]
    pub state_file: Option<PathBuf>,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_defaults_to_check_args() {
        let cli = Cli::try_parse_from(["reltrack", "--manifest", "tools.txt", "--yes"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.check.manifest.as_deref(), Some("tools.txt"));
        assert!(cli.check.yes);
    }

    #[test]
    fn check_subcommand_parses_flags() {
        let cli = Cli::try_parse_from([
            "reltrack",
            "check",
            "-m",
            "https://example.com/tools.txt",
            "--state",
            "/tmp/state.json",
            "--dry-run",
            "--timeout",
            "5",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Check(args)) => {
                assert_eq!(
                    args.manifest.as_deref(),
                    Some("https://example.com/tools.txt")
                );
                assert_eq!(args.state_file, Some(PathBuf::from("/tmp/state.json")));
                assert!(args.dry_run);
                assert_eq!(args.overrides().timeout_secs, Some(5));
            }
            other => panic!("expected check, got {:?}", other),
        }
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::try_parse_from(["reltrack", "list", "--json", "--quiet"]).unwrap();
        assert!(cli.quiet);
        assert!(matches!(cli.command, Some(Commands::List(ListArgs { json: true, .. }))));
    }

    #[test]
    fn completions_requires_known_shell() {
        assert!(Cli::try_parse_from(["reltrack", "completions", "bash"]).is_ok());
        assert!(Cli::try_parse_from(["reltrack", "completions", "cmd"]).is_err());
    }

    #[test]
    fn prompts_disabled_by_yes_dry_run_or_flag() {
        let prompting = Cli::try_parse_from(["reltrack", "check"]).unwrap();
        assert!(prompting.wants_prompts());
        for flag in ["--yes", "--dry-run", "--non-interactive"] {
            let cli = Cli::try_parse_from(["reltrack", "check", flag]).unwrap();
            assert!(!cli.wants_prompts(), "{} should disable prompts", flag);
        }
        let list = Cli::try_parse_from(["reltrack", "list"]).unwrap();
        assert!(!list.wants_prompts());
    }
}
