//! Settings file discovery, loading and validation.

use crate::error::ConfigError;
use crate::types::Settings;
use std::path::{Path, PathBuf};

/// Name of the settings file.
pub const CONFIG_FILE: &str = "anvil.toml";

/// Loads and validates settings from an `anvil.toml` file.
pub fn load_config(path: &Path) -> Result<Settings, ConfigError> {
    log::debug!("loading settings from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates settings from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<Settings, ConfigError> {
    let settings: Settings =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&settings)?;
    Ok(settings)
}

/// Walks up from `start` looking for the nearest `anvil.toml`.
///
/// Returns the path of the file itself, or `None` if no ancestor has one.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE))
        .find(|candidate| candidate.is_file())
}

fn validate_config(settings: &Settings) -> Result<(), ConfigError> {
    if settings.directories.data.as_os_str().is_empty() {
        return Err(ConfigError::MissingField("directories.data".to_string()));
    }
    Ok(())
}
