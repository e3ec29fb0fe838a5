//! Non-interactive UI for CI/headless environments.

use std::collections::HashMap;

use crate::error::Result;

use super::theme::ReltrackTheme;
use super::{parse_answer, OutputMode, Prompt, SpinnerHandle, UserInterface};

/// Prefix of environment variables that answer prompts.
const PROMPT_ENV_PREFIX: &str = "RELTRACK_PROMPT_";

/// UI implementation for non-interactive mode.
///
/// Prompts are answered from `RELTRACK_PROMPT_<KEY>` environment variables
/// when present, otherwise with the prompt's default.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
    theme: ReltrackTheme,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
            .collect();

        Self::with_overrides(mode, env_overrides)
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
            theme: ReltrackTheme::plain(),
        }
    }

    /// Environment variable that answers the prompt with this key.
    pub fn override_key(prompt_key: &str) -> String {
        let normalized: String = prompt_key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        format!("{}{}", PROMPT_ENV_PREFIX, normalized)
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", self.theme.format_success(msg));
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("{}", self.theme.format_warning(msg));
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{}", self.theme.format_error(msg));
    }

    fn confirm(&mut self, prompt: &Prompt) -> Result<bool> {
        let answer = match self.env_overrides.get(&Self::override_key(&prompt.key)) {
            Some(value) => parse_answer(value),
            None => prompt.default,
        };

        if self.mode.shows_status() {
            println!(
                "{} {}",
                prompt.question,
                if answer { "yes" } else { "no" }
            );
        }
        Ok(answer)
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            println!("{}", message);
        }
        Box::new(NoopSpinner {
            theme: self.theme.clone(),
        })
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", title);
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner that prints only its final line.
struct NoopSpinner {
    theme: ReltrackTheme,
}

impl SpinnerHandle for NoopSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        println!("{}", self.theme.format_success(msg));
    }

    fn finish_error(&mut self, msg: &str) {
        println!("{}", self.theme.format_error(msg));
    }

    fn finish_clear(&mut self) {}
}
