//! Sketch discovery and `sketch.json` metadata.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Main source file extension of a sketch.
const SKETCH_EXT: &str = "ino";

/// Name of the optional metadata file inside a sketch directory.
const METADATA_FILE: &str = "sketch.json";

/// Errors that can occur when opening a sketch.
#[derive(Debug, thiserror::Error)]
pub enum SketchError {
    /// The sketch path does not exist or cannot be resolved.
    #[error("cannot open sketch at {path}: {source}")]
    NotFound {
        /// The path given on the command line.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The sketch directory has no `<name>.ino` file.
    #[error("no main sketch file found: expected {0}")]
    MissingMainFile(PathBuf),

    /// `sketch.json` exists but could not be read or parsed.
    #[error("invalid sketch metadata in {path}: {reason}")]
    Metadata {
        /// The metadata file path.
        path: PathBuf,
        /// Description of the problem.
        reason: String,
    },
}

/// A sketch: a directory `<name>/` holding `<name>.ino`.
#[derive(Debug)]
pub struct Sketch {
    /// Sketch name, taken from the directory name.
    pub name: String,
    /// Absolute sketch directory.
    pub dir: PathBuf,
    /// The `<name>.ino` main file.
    pub main_file: PathBuf,
    /// Contents of `sketch.json`, or defaults if absent.
    pub metadata: SketchMetadata,
}

/// Per-sketch metadata stored in `sketch.json`.
#[derive(Debug, Default, Deserialize)]
pub struct SketchMetadata {
    /// The board the sketch was last used with.
    #[serde(default)]
    pub cpu: CpuMetadata,
}

/// Board selection remembered for a sketch.
#[derive(Debug, Default, Deserialize)]
pub struct CpuMetadata {
    /// Fully qualified board name.
    #[serde(default)]
    pub fqbn: String,
}

impl Sketch {
    /// Opens the sketch at `path`, which may be the sketch directory or its main file.
    pub fn load(path: &Path) -> Result<Self, SketchError> {
        let resolved = std::fs::canonicalize(path).map_err(|source| SketchError::NotFound {
            path: path.to_path_buf(),
            source,
        })?;
        let dir = if resolved.is_dir() {
            resolved
        } else {
            resolved
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or(resolved)
        };

        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let main_file = dir.join(format!("{name}.{SKETCH_EXT}"));
        if name.is_empty() || !main_file.is_file() {
            return Err(SketchError::MissingMainFile(main_file));
        }

        let metadata = load_metadata(&dir.join(METADATA_FILE))?;

        Ok(Self {
            name,
            dir,
            main_file,
            metadata,
        })
    }
}

fn load_metadata(path: &Path) -> Result<SketchMetadata, SketchError> {
    if !path.exists() {
        return Ok(SketchMetadata::default());
    }
    let content = std::fs::read_to_string(path).map_err(|e| SketchError::Metadata {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| SketchError::Metadata {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
