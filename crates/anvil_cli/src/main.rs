//! Anvil CLI, the command-line interface for the Anvil hardware build tool.
//!
//! Provides `anvil compile`, which resolves the target board, locates
//! hardware packages, tools and libraries, runs the builder and records a
//! `compile_commands.json` compilation database in the build directory.

#![warn(missing_docs)]

mod builder;
mod compile;
mod context;
mod exit;
mod sketch;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use crate::exit::ExitCode;

/// Anvil: build firmware sketches for hardware boards.
#[derive(Parser, Debug)]
#[command(name = "anvil", version, about = "Anvil hardware build tool")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `anvil.toml` settings file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile a sketch.
    Compile(CompileArgs),
}

/// Arguments for the `anvil compile` subcommand.
#[derive(Parser, Debug)]
pub struct CompileArgs {
    /// Sketch directory or main file (default: current directory).
    pub sketch: Option<String>,

    /// Fully Qualified Board Name, e.g. `anvil:avr:uno`.
    #[arg(short = 'b', long)]
    pub fqbn: Option<String>,

    /// Show all build properties used instead of compiling.
    #[arg(long)]
    pub show_properties: bool,

    /// Print preprocessed code to stdout instead of compiling.
    #[arg(long)]
    pub preprocess: bool,

    /// Builds of the core archive are saved into this folder to be cached and reused.
    #[arg(long)]
    pub build_cache_path: Option<String>,

    /// Folder where to save compiled files (default: a folder in the system temp dir).
    #[arg(long)]
    pub build_path: Option<String>,

    /// Custom build properties, comma-separated or repeated.
    #[arg(long, value_delimiter = ',')]
    pub build_properties: Vec<String>,

    /// Compiler warning level.
    #[arg(long, value_enum, default_value_t = WarningsLevel::None)]
    pub warnings: WarningsLevel,

    /// Builder debug level. Set it to 10 when submitting an issue.
    #[arg(long, default_value_t = 5)]
    pub debug_level: u8,

    /// Use VID/PID specific build properties, if the board supports them.
    #[arg(long)]
    pub vid_pid: Option<String>,

    /// Do not write `compile_commands.json` to the build folder.
    #[arg(long)]
    pub no_compilation_database: bool,
}

/// Compiler warning level passed to the builder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum WarningsLevel {
    /// No warnings.
    None,
    /// The platform's default warnings.
    Default,
    /// More warnings.
    More,
    /// All warnings.
    All,
}

impl WarningsLevel {
    /// The name the builder expects.
    pub fn as_str(self) -> &'static str {
        match self {
            WarningsLevel::None => "none",
            WarningsLevel::Default => "default",
            WarningsLevel::More => "more",
            WarningsLevel::All => "all",
        }
    }
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom settings file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };
    init_logging(&global);

    let result = match cli.command {
        Command::Compile(ref args) => compile::run(args, &global),
    };

    match result {
        Ok(()) => process::exit(ExitCode::Success.code()),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(e.exit_code().code());
        }
    }
}

/// Default log filter for the verbosity flags; `RUST_LOG` overrides it.
fn log_filter(global: &GlobalArgs) -> &'static str {
    if global.quiet {
        "error"
    } else if global.verbose {
        "debug"
    } else {
        "warn"
    }
}

fn init_logging(global: &GlobalArgs) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_filter(global)))
        .format_timestamp(None)
        .init();
}
