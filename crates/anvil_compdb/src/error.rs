//! Error and warning types for compilation database operations.

use std::path::PathBuf;

/// Errors returned when loading a compilation database from disk.
///
/// Both variants are recoverable: a typical caller treats a missing or
/// corrupt database as "start fresh".
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// The database file could not be read (missing, permission denied, I/O).
    #[error("failed to read compilation database {path}: {source}")]
    Read {
        /// The path that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The file contents are not a JSON array of compile command records.
    #[error("failed to parse compilation database {path}: {source}")]
    Parse {
        /// The path whose contents failed to parse.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// A record has neither a `command` nor an `arguments` entry.
    #[error("compilation database {path}: entry {index} has no command")]
    MissingCommand {
        /// The path that was loaded.
        path: PathBuf,
        /// Zero-based position of the offending record.
        index: usize,
    },
}

/// Non-fatal problems encountered while recording or saving.
///
/// These never abort a build. They are carried in an
/// [`Outcome`](crate::Outcome) so the caller can decide whether to surface them.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseWarning {
    /// The current working directory could not be determined for an entry.
    #[error("error getting current directory for compilation database: {source}")]
    CurrentDir {
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// An invocation with an empty argument vector was recorded.
    #[error("recorded an empty command line for {file}")]
    EmptyCommand {
        /// The source file of the entry.
        file: String,
    },

    /// The entries could not be serialized to JSON.
    #[error("error serializing compilation database: {source}")]
    Serialize {
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// The serialized database could not be written to its file.
    #[error("error writing compilation database {path}: {source}")]
    Write {
        /// The destination path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
