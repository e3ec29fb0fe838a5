//! reltrack - track installed versions of GitHub-released tools.
//!
//! reltrack reads a manifest of `owner/name` repositories, looks up each
//! repository's latest release, compares its tag with the version recorded
//! locally, and offers to install or update. Tags are opaque: any
//! difference is an update.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading and layering
//! - [`error`] - Error types and result aliases
//! - [`installer`] - Install/update capabilities
//! - [`manifest`] - Manifest sources and repository identifiers
//! - [`reconcile`] - The per-repository decision loop
//! - [`release`] - Latest-release lookup and binary availability
//! - [`shell`] - Shell command execution
//! - [`state`] - Persisted installed versions
//! - [`ui`] - Prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use reltrack::reconcile::{decide, Action};
//!
//! assert_eq!(
//!     decide(Some("v1.0.0"), "v1.1.0"),
//!     Action::Update { installed: "v1.0.0".into(), latest: "v1.1.0".into() }
//! );
//! assert_eq!(decide(None, ""), Action::NoRelease);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod installer;
pub mod manifest;
pub mod reconcile;
pub mod release;
pub mod shell;
pub mod state;
pub mod ui;

pub use error::{ReltrackError, Result};
