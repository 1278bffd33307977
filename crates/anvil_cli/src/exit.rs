//! Process exit codes reported by `anvil`.

/// Exit status of an `anvil` command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitCode {
    /// The command completed.
    Success,
    /// No `anvil.toml` settings file could be found.
    NoConfigFile,
    /// The command was called in a way that cannot work (e.g. unwritable paths).
    BadCall,
    /// Any other failure, including a failed compilation.
    Generic,
    /// Packages, tools or directories are misconfigured.
    CoreConfig,
    /// A command-line argument is malformed.
    BadArgument,
}

impl ExitCode {
    /// Numeric process exit status. Code 4 is reserved for network failures.
    pub fn code(self) -> i32 {
        match self {
            ExitCode::Success => 0,
            ExitCode::NoConfigFile => 1,
            ExitCode::BadCall => 2,
            ExitCode::Generic => 3,
            ExitCode::CoreConfig => 5,
            ExitCode::BadArgument => 6,
        }
    }
}
