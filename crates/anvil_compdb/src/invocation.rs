//! Process invocation descriptors consumed by the compilation database.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// Metadata about a process invocation that the database can record.
///
/// The database never runs processes itself; it only reads the working
/// directory and argument vector of invocations performed by its caller.
pub trait Invocation {
    /// The explicit working directory, or `None` to inherit the caller's.
    fn working_directory(&self) -> Option<PathBuf>;

    /// The full argument vector, program first.
    fn argv(&self) -> Vec<String>;
}

/// An owned description of a tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInvocation {
    args: Vec<String>,
    dir: Option<PathBuf>,
}

impl ProcessInvocation {
    /// Creates an invocation from an argument vector (program first).
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            dir: None,
        }
    }

    /// Sets the working directory the process will run in.
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// Returns the explicit working directory, if one was set.
    pub fn working_dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Returns the argument vector.
    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// Builds a [`Command`] for this invocation.
    pub fn to_command(&self) -> std::io::Result<Command> {
        let (program, rest) = self.args.split_first().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty argument vector")
        })?;
        let mut command = Command::new(program);
        command.args(rest);
        if let Some(ref dir) = self.dir {
            command.current_dir(dir);
        }
        Ok(command)
    }

    /// Runs the process to completion with inherited stdio.
    pub fn run(&self) -> std::io::Result<ExitStatus> {
        log::debug!("running {}", self.args.join(" "));
        self.to_command()?.status()
    }
}

impl Invocation for ProcessInvocation {
    fn working_directory(&self) -> Option<PathBuf> {
        self.dir.clone()
    }

    fn argv(&self) -> Vec<String> {
        self.args.clone()
    }
}

impl Invocation for Command {
    fn working_directory(&self) -> Option<PathBuf> {
        self.get_current_dir().map(Path::to_path_buf)
    }

    fn argv(&self) -> Vec<String> {
        std::iter::once(self.get_program())
            .chain(self.get_args())
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }
}

impl<T: Invocation + ?Sized> Invocation for &T {
    fn working_directory(&self) -> Option<PathBuf> {
        (**self).working_directory()
    }

    fn argv(&self) -> Vec<String> {
        (**self).argv()
    }
}
