//! Installer backed by shell command templates.
//!
//! Templates may reference `{name}`, `{version}`, `{repo}`, `{owner}` and
//! `{asset}`. Each placeholder expands to a shell-quoted word, so templates
//! must not add their own quotes around it. Tags and asset names come from
//! the release host and are never interpreted by the shell. The same values
//! are exported as `RELTRACK_*` environment variables for scripts that
//! prefer them.

use std::collections::HashMap;

use super::{Installer, PackageRef};
use crate::error::{ReltrackError, Result};
use crate::shell::{execute, quote_arg, CommandOptions};

/// Runs configured commands to install or update packages.
#[derive(Debug, Clone)]
pub struct CommandInstaller {
    install_command: String,
    update_command: Option<String>,
}

impl CommandInstaller {
    /// Create an installer.
    ///
    /// Without an update command, updates run the install command.
    pub fn new(install_command: impl Into<String>, update_command: Option<String>) -> Self {
        Self {
            install_command: install_command.into(),
            update_command,
        }
    }

    /// Substitute quoted package values into a template.
    ///
    /// Substitution is a single pass, so placeholder text inside a value
    /// is never expanded again.
    pub fn render(template: &str, pkg: &PackageRef) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];
            let Some(end) = tail.find('}') else {
                out.push_str(tail);
                return out;
            };
            match Self::placeholder(&tail[1..end], pkg) {
                Some(value) => {
                    out.push_str(&quote_arg(&value));
                    rest = &tail[end + 1..];
                }
                None => {
                    out.push('{');
                    rest = &tail[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }

    fn placeholder(key: &str, pkg: &PackageRef) -> Option<String> {
        match key {
            "name" => Some(pkg.name.clone()),
            "version" => Some(pkg.version.clone()),
            "repo" => Some(pkg.repo.to_string()),
            "owner" => Some(pkg.repo.owner().to_string()),
            "asset" => Some(pkg.asset.clone().unwrap_or_default()),
            _ => None,
        }
    }

    fn run(&self, template: &str, pkg: &PackageRef) -> Result<()> {
        let command = Self::render(template, pkg);

        let mut env = HashMap::new();
        env.insert("RELTRACK_NAME".to_string(), pkg.name.clone());
        env.insert("RELTRACK_VERSION".to_string(), pkg.version.clone());
        env.insert("RELTRACK_REPO".to_string(), pkg.repo.to_string());
        if let Some(asset) = &pkg.asset {
            env.insert("RELTRACK_ASSET".to_string(), asset.clone());
        }

        let result = execute(
            &command,
            &CommandOptions {
                env,
                ..Default::default()
            },
        )?;

        if !result.success {
            return Err(ReltrackError::CommandFailed {
                command,
                code: result.exit_code,
            });
        }
        Ok(())
    }
}

impl Installer for CommandInstaller {
    fn install(&mut self, pkg: &PackageRef) -> Result<()> {
        self.run(&self.install_command, pkg)
    }

    fn update(&mut self, pkg: &PackageRef, _from: &str) -> Result<()> {
        let template = self
            .update_command
            .as_deref()
            .unwrap_or(&self.install_command);
        self.run(template, pkg)
    }
}
