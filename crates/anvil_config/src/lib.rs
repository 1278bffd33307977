//! Parsing and validation of `anvil.toml` settings and `key=value` property files.
//!
//! The settings file tells the `compile` command where hardware packages,
//! tools and libraries live and which external builder program to run.
//! [`Properties`] reads the flat property files used by boards, platforms
//! and IDE preferences.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod properties;
pub mod types;

pub use error::ConfigError;
pub use loader::{find_config, load_config, load_config_from_str, CONFIG_FILE};
pub use properties::Properties;
pub use types::*;
