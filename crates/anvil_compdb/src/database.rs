//! The compilation database and its on-disk representation.
//!
//! The database is stored as a clangd-compatible `compile_commands.json`,
//! see <https://clang.llvm.org/docs/JSONCompilationDatabase.html>.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use crate::command::CompileCommand;
use crate::error::{DatabaseError, DatabaseWarning};
use crate::invocation::{Invocation, ProcessInvocation};
use crate::outcome::Outcome;

/// Conventional file name of a compilation database.
pub const DATABASE_FILE: &str = "compile_commands.json";

/// Directory recorded when neither the invocation nor the process can
/// provide one.
const FALLBACK_DIR: &str = ".";

/// An ordered, append-only log of compiler invocations bound to a file.
///
/// Entries are kept in the order they were added. Nothing is ever removed or
/// reordered; a saved database is replaced wholesale on the next save.
#[derive(Debug, Clone)]
pub struct CompilationDatabase {
    /// Recorded invocations, in invocation order.
    entries: Vec<CompileCommand>,

    /// Where the database is persisted.
    file: PathBuf,
}

impl CompilationDatabase {
    /// Creates an empty database bound to `file`. Does not touch the filesystem.
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            entries: Vec::new(),
            file: file.into(),
        }
    }

    /// Reads a database from `file` and binds the result to the same path.
    ///
    /// Fails with [`DatabaseError::Read`] if the file cannot be read, with
    /// [`DatabaseError::Parse`] if it is not a JSON array of command records
    /// and with [`DatabaseError::MissingCommand`] if a record carries neither
    /// command form.
    pub fn load(file: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let file = file.as_ref();
        let content = std::fs::read(file).map_err(|source| DatabaseError::Read {
            path: file.to_path_buf(),
            source,
        })?;
        let entries: Vec<CompileCommand> =
            serde_json::from_slice(&content).map_err(|source| DatabaseError::Parse {
                path: file.to_path_buf(),
                source,
            })?;
        if let Some(index) = entries
            .iter()
            .position(|e| e.command.is_empty() && e.arguments.is_empty())
        {
            return Err(DatabaseError::MissingCommand {
                path: file.to_path_buf(),
                index,
            });
        }
        Ok(Self {
            entries,
            file: file.to_path_buf(),
        })
    }

    /// Loads the database at `file`, or starts an empty one bound to it.
    ///
    /// This is fail-safe: a missing or corrupt file results in a fresh
    /// database rather than an error.
    pub fn load_or_create(file: impl AsRef<Path>) -> Self {
        let file = file.as_ref();
        match Self::load(file) {
            Ok(db) => db,
            Err(err) => {
                log::debug!("starting a fresh compilation database: {err}");
                Self::new(file)
            }
        }
    }

    /// Records one compiler invocation for `source`.
    ///
    /// The entry's directory is the invocation's explicit directory, or the
    /// current working directory at call time. An entry is always appended;
    /// if the current directory cannot be determined it is recorded as `.`
    /// and the failure is returned as a warning. An empty argument vector is
    /// recorded as well but reported as [`DatabaseWarning::EmptyCommand`].
    pub fn add<I>(&mut self, source: impl AsRef<Path>, invocation: &I) -> Outcome
    where
        I: Invocation + ?Sized,
    {
        let (directory, outcome) = match invocation.working_directory() {
            Some(dir) if !dir.as_os_str().is_empty() => (path_string(&dir), Outcome::clean()),
            _ => match std::env::current_dir() {
                Ok(dir) => (path_string(&dir), Outcome::clean()),
                Err(source) => (
                    FALLBACK_DIR.to_string(),
                    DatabaseWarning::CurrentDir { source }.into(),
                ),
            },
        };

        let argv = invocation.argv();
        let file = path_string(source.as_ref());
        let outcome = if argv.is_empty() && outcome.is_clean() {
            DatabaseWarning::EmptyCommand { file: file.clone() }.into()
        } else {
            outcome
        };

        self.entries.push(CompileCommand::from_arguments(directory, argv, file));
        outcome
    }

    /// Appends previously recorded entries after the current ones.
    pub fn extend(&mut self, entries: impl IntoIterator<Item = CompileCommand>) {
        self.entries.extend(entries);
    }

    /// Writes the database to its bound file, replacing any previous content.
    ///
    /// The JSON is written to a temporary file next to the target and renamed
    /// into place, so the target is either fully replaced or left untouched.
    /// Failures are returned as a warning and never abort the caller.
    pub fn save(&self) -> Outcome {
        let mut json = match serde_json::to_string_pretty(&self.entries) {
            Ok(json) => json,
            Err(source) => return DatabaseWarning::Serialize { source }.into(),
        };
        json.push('\n');

        match write_replacing(&self.file, json.as_bytes()) {
            Ok(()) => {
                log::debug!(
                    "wrote {} compile command(s) to {}",
                    self.entries.len(),
                    self.file.display()
                );
                Outcome::clean()
            }
            Err(source) => DatabaseWarning::Write {
                path: self.file.clone(),
                source,
            }
            .into(),
        }
    }

    /// Returns the recorded entries in invocation order.
    pub fn entries(&self) -> &[CompileCommand] {
        &self.entries
    }

    /// Returns the file this database is bound to.
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Returns the number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Records `invocation` in `db` and then runs it.
///
/// A recording warning is logged; it never prevents the process from running.
pub fn record_and_run(
    db: &mut CompilationDatabase,
    source: impl AsRef<Path>,
    invocation: &ProcessInvocation,
) -> std::io::Result<ExitStatus> {
    db.add(source, invocation).log();
    invocation.run()
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Replaces `path` with `contents` via a temporary file in the same directory.
///
/// The replacement keeps the permissions of an existing file. A new file gets
/// the same mode as `std::fs::write` would give it (0o666 less the umask).
fn write_replacing(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut builder = tempfile::Builder::new();
    builder.prefix(".compile_commands");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let mut tmp = builder.tempfile_in(dir)?;
    if let Ok(existing) = std::fs::metadata(path) {
        tmp.as_file().set_permissions(existing.permissions())?;
    }
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
