//! The explicit build configuration handed to a builder.

use std::path::PathBuf;

use anvil_compdb::DATABASE_FILE;

use crate::WarningsLevel;

/// What the builder should do with the sketch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildMode {
    /// Compile and link the sketch.
    Compile,
    /// Print the resolved build properties instead of compiling.
    ShowProperties,
    /// Print the preprocessed sketch instead of compiling.
    Preprocess,
}

/// Everything a builder needs to know about one compile request.
///
/// Assembled once from the command-line flags and settings, then passed by
/// reference; nothing is read from global state.
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// Fully qualified board name.
    pub fqbn: String,
    /// Main file of the sketch to build.
    pub sketch_location: PathBuf,
    /// Hardware package directories.
    pub hardware_dirs: Vec<PathBuf>,
    /// Bundled tool directories.
    pub tools_dirs: Vec<PathBuf>,
    /// Libraries shipped with an installed IDE.
    pub built_in_libraries_dirs: Vec<PathBuf>,
    /// User library directories.
    pub other_libraries_dirs: Vec<PathBuf>,
    /// Where build products go.
    pub build_path: PathBuf,
    /// Where compiled core archives are cached between builds, if requested.
    pub build_cache_path: Option<PathBuf>,
    /// Scratch cache for the core of the selected board.
    pub core_build_cache_path: PathBuf,
    /// Compiler warning level.
    pub warnings_level: WarningsLevel,
    /// Extra `key=value` build properties.
    pub custom_build_properties: Vec<String>,
    /// USB VID/PID used to select board variant properties.
    pub usb_vid_pid: Option<String>,
    /// Core API version advertised to platform recipes.
    pub core_api_version: String,
    /// Builder debug level.
    pub debug_level: u8,
    /// Whether the builder prints every command it runs.
    pub verbose: bool,
}

impl BuildContext {
    /// Path of the compilation database inside the build directory.
    pub fn compilation_database_path(&self) -> PathBuf {
        self.build_path.join(DATABASE_FILE)
    }
}
