//! Configuration loading and resolution.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Layering with environment and flags in [`settings`]
//!
//! # Example
//!
//! ```
//! use reltrack::config::{parse_config, Overrides, Settings};
//! use std::path::Path;
//!
//! let file = parse_config("manifest: tools.txt\ntimeout_secs: 10\n", Path::new("config.yml")).unwrap();
//! let overrides = Overrides { timeout_secs: Some(5), ..Default::default() };
//! let settings = Settings::resolve_with_env(&overrides, &file, |_| None).unwrap();
//! assert_eq!(settings.timeout.as_secs(), 5);
//! ```

pub mod loader;
pub mod schema;
pub mod settings;

pub use loader::{default_config_path, load_config, load_config_file, parse_config};
pub use schema::{ConfigFile, DEFAULT_TIMEOUT_SECS, DEFAULT_TOKEN_ENV};
pub use settings::{Overrides, Settings};
