//! A single compilation database record.

use serde::{Deserialize, Serialize};

/// One compiler invocation as recorded in `compile_commands.json`.
///
/// Field order matches the serialized key order: `directory`, `command`,
/// `arguments`, `file`. Exactly one of `command` and `arguments` is
/// populated; the empty one is omitted from the JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileCommand {
    /// Working directory the compiler was run from.
    pub directory: String,

    /// Shell-style command line, when the record uses the string form.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub command: String,

    /// Argument vector, when the record uses the structured form.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<String>,

    /// The source file that was compiled.
    pub file: String,
}

/// Borrowed view of the command line of a [`CompileCommand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandLine<'a> {
    /// A single shell-quoted command string.
    Shell(&'a str),
    /// A structured argument vector.
    Arguments(&'a [String]),
}

impl CompileCommand {
    /// Creates a record in the structured `arguments` form.
    pub fn from_arguments(
        directory: impl Into<String>,
        arguments: Vec<String>,
        file: impl Into<String>,
    ) -> Self {
        Self {
            directory: directory.into(),
            command: String::new(),
            arguments,
            file: file.into(),
        }
    }

    /// Creates a record in the shell `command` string form.
    pub fn from_command(
        directory: impl Into<String>,
        command: impl Into<String>,
        file: impl Into<String>,
    ) -> Self {
        Self {
            directory: directory.into(),
            command: command.into(),
            arguments: Vec::new(),
            file: file.into(),
        }
    }

    /// Returns whichever command line representation this record carries.
    ///
    /// The argument vector wins if a hand-edited file populated both.
    pub fn command_line(&self) -> CommandLine<'_> {
        if !self.arguments.is_empty() || self.command.is_empty() {
            CommandLine::Arguments(&self.arguments)
        } else {
            CommandLine::Shell(&self.command)
        }
    }
}
