//! Settings types deserialized from `anvil.toml`.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default external builder executable, looked up on `PATH`.
pub const DEFAULT_BUILDER_PROGRAM: &str = "anvil-builder";

/// Core API version passed to the builder when none is configured.
pub const DEFAULT_CORE_API_VERSION: &str = "10600";

/// The top-level settings parsed from `anvil.toml`.
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Where packages, tools and libraries are installed.
    pub directories: Directories,
    /// External builder settings.
    #[serde(default)]
    pub builder: BuilderSettings,
}

/// Installation directories.
#[derive(Debug, Deserialize)]
pub struct Directories {
    /// Data directory holding installed packages, tools and IDE preferences.
    pub data: PathBuf,
    /// User libraries directory. Defaults to `<data>/libraries`.
    #[serde(default)]
    pub libraries: Option<PathBuf>,
    /// Extra hardware package directories, searched before `<data>/packages`.
    #[serde(default)]
    pub hardware: Vec<PathBuf>,
    /// Extra bundled tool directories, searched before `<data>/tools`.
    #[serde(default)]
    pub tools: Vec<PathBuf>,
}

/// How to run the external builder.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BuilderSettings {
    /// Builder executable name or path.
    #[serde(default = "default_program")]
    pub program: String,
    /// Core API version advertised to platform recipes.
    #[serde(default = "default_core_api_version")]
    pub core_api_version: String,
}

impl Default for BuilderSettings {
    fn default() -> Self {
        Self {
            program: default_program(),
            core_api_version: default_core_api_version(),
        }
    }
}

fn default_program() -> String {
    DEFAULT_BUILDER_PROGRAM.to_string()
}

fn default_core_api_version() -> String {
    DEFAULT_CORE_API_VERSION.to_string()
}

impl Settings {
    /// Hardware directories: configured ones first, then `<data>/packages` if present.
    pub fn hardware_directories(&self) -> Vec<PathBuf> {
        with_data_subdir(&self.directories.hardware, &self.directories.data, "packages")
    }

    /// Tool directories: configured ones first, then `<data>/tools` if present.
    pub fn tools_directories(&self) -> Vec<PathBuf> {
        with_data_subdir(&self.directories.tools, &self.directories.data, "tools")
    }

    /// The user libraries directory.
    pub fn libraries_directory(&self) -> PathBuf {
        self.directories
            .libraries
            .clone()
            .unwrap_or_else(|| self.directories.data.join("libraries"))
    }

    /// Path of the IDE preferences file inside the data directory.
    pub fn preferences_file(&self) -> PathBuf {
        self.directories.data.join("preferences.txt")
    }
}

/// Appends `<data>/<subdir>` to `configured` when it exists, dropping duplicates.
fn with_data_subdir(configured: &[PathBuf], data: &Path, subdir: &str) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::with_capacity(configured.len() + 1);
    for dir in configured {
        if !dirs.contains(dir) {
            dirs.push(dir.clone());
        }
    }
    let default_dir = data.join(subdir);
    if default_dir.is_dir() && !dirs.contains(&default_dir) {
        dirs.push(default_dir);
    }
    dirs
}
