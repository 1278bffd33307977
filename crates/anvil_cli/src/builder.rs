//! The builder seam: whatever actually turns a sketch into a binary.
//!
//! The compile command only assembles a [`BuildContext`] and hands it to a
//! [`Builder`]. The shipped implementation, [`ExternalBuilder`], drives a
//! separate builder executable; tests substitute their own.

use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use anvil_compdb::{CompilationDatabase, ProcessInvocation, SharedDatabase};
use anvil_config::Properties;

use crate::context::{BuildContext, BuildMode};

/// Property template that locates the primary build product.
pub const OUTPUT_FILE_TEMPLATE: &str = "{build.path}/{recipe.output.tmp_file}";

/// Errors reported by a builder.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The builder process could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// The builder executable.
        program: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The builder process exited unsuccessfully.
    #[error("{program} exited with {status}")]
    Failed {
        /// The builder executable.
        program: String,
        /// Its exit status.
        status: ExitStatus,
    },

    /// The build properties do not say where the output file is.
    #[error("cannot determine output file: '{0}' has unresolved properties")]
    UnresolvedOutput(String),
}

/// What a finished builder run produced.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildOutput {
    /// The primary build product (e.g. a `.hex` image), for [`BuildMode::Compile`].
    pub output_file: Option<PathBuf>,
}

/// Something that can build a sketch.
///
/// Implementations record every compiler invocation they perform in `db`.
pub trait Builder {
    /// Runs the build described by `ctx` in the given mode.
    fn run(
        &self,
        ctx: &BuildContext,
        mode: BuildMode,
        db: &SharedDatabase,
    ) -> Result<BuildOutput, BuildError>;
}

/// Drives a separate builder executable.
///
/// The executable's compiler calls are not visible from here. If it leaves
/// its own `compile_commands.json` in the build directory during the run,
/// those entries are merged into the database.
#[derive(Debug, Clone)]
pub struct ExternalBuilder {
    program: String,
}

impl ExternalBuilder {
    /// Creates a builder that runs `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Builds the command line for one builder run.
    pub fn invocation(&self, ctx: &BuildContext, mode: BuildMode) -> ProcessInvocation {
        let mut args = vec![self.program.clone()];
        args.push(
            match mode {
                BuildMode::Compile => "-compile",
                BuildMode::ShowProperties => "-dump-prefs",
                BuildMode::Preprocess => "-preprocess",
            }
            .to_string(),
        );
        push_dirs(&mut args, "-hardware", &ctx.hardware_dirs);
        push_dirs(&mut args, "-tools", &ctx.tools_dirs);
        push_dirs(&mut args, "-built-in-libraries", &ctx.built_in_libraries_dirs);
        push_dirs(&mut args, "-libraries", &ctx.other_libraries_dirs);
        args.extend(["-fqbn".to_string(), ctx.fqbn.clone()]);
        push_path(&mut args, "-build-path", &ctx.build_path);
        push_path(
            &mut args,
            "-build-cache",
            ctx.build_cache_path
                .as_deref()
                .unwrap_or(ctx.core_build_cache_path.as_path()),
        );
        args.extend([
            "-warnings".to_string(),
            ctx.warnings_level.as_str().to_string(),
            "-debug-level".to_string(),
            ctx.debug_level.to_string(),
            "-core-api-version".to_string(),
            ctx.core_api_version.clone(),
        ]);
        if let Some(ref vid_pid) = ctx.usb_vid_pid {
            args.extend(["-vid-pid".to_string(), vid_pid.clone()]);
        }
        if ctx.verbose {
            args.push("-verbose".to_string());
        }
        for prop in &ctx.custom_build_properties {
            args.extend(["-prefs".to_string(), prop.clone()]);
        }
        args.push(ctx.sketch_location.to_string_lossy().into_owned());
        ProcessInvocation::new(args)
    }

    fn run_inherited(&self, invocation: &ProcessInvocation) -> Result<(), BuildError> {
        let status = invocation.run().map_err(|source| self.spawn_error(source))?;
        if !status.success() {
            return Err(BuildError::Failed {
                program: self.program.clone(),
                status,
            });
        }
        Ok(())
    }

    /// Asks the builder for the resolved build properties.
    fn dump_properties(&self, ctx: &BuildContext) -> Result<Properties, BuildError> {
        let output = self
            .invocation(ctx, BuildMode::ShowProperties)
            .to_command()
            .and_then(|mut cmd| cmd.output())
            .map_err(|source| self.spawn_error(source))?;
        if !output.status.success() {
            return Err(BuildError::Failed {
                program: self.program.clone(),
                status: output.status,
            });
        }
        Ok(Properties::parse(&String::from_utf8_lossy(&output.stdout)))
    }

    fn spawn_error(&self, source: std::io::Error) -> BuildError {
        BuildError::Spawn {
            program: self.program.clone(),
            source,
        }
    }
}

impl Builder for ExternalBuilder {
    fn run(
        &self,
        ctx: &BuildContext,
        mode: BuildMode,
        db: &SharedDatabase,
    ) -> Result<BuildOutput, BuildError> {
        let invocation = self.invocation(ctx, mode);
        if mode != BuildMode::Compile {
            self.run_inherited(&invocation)?;
            return Ok(BuildOutput::default());
        }

        let produced = ctx.compilation_database_path();
        clear_stale_database(&produced);
        let built = self.run_inherited(&invocation);
        // Merged even after a failed build; the caller saves over this file.
        merge_produced_database(&produced, db);
        built?;

        let properties = self.dump_properties(ctx)?;
        Ok(BuildOutput {
            output_file: Some(resolve_output_file(&properties)?),
        })
    }
}

/// Expands [`OUTPUT_FILE_TEMPLATE`] against the build properties.
pub fn resolve_output_file(properties: &Properties) -> Result<PathBuf, BuildError> {
    let expanded = properties.expand(OUTPUT_FILE_TEMPLATE);
    if expanded.contains('{') {
        return Err(BuildError::UnresolvedOutput(expanded));
    }
    Ok(PathBuf::from(expanded))
}

/// Removes a database left behind by an earlier build, so that whatever
/// exists after the run was written by the run.
fn clear_stale_database(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => log::debug!("removed stale {}", path.display()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => log::warn!("cannot remove stale {}: {err}", path.display()),
    }
}

/// Merges the database the builder wrote at `path`, if any, into `db`.
fn merge_produced_database(path: &Path, db: &SharedDatabase) {
    if !path.exists() {
        return;
    }
    match CompilationDatabase::load(path) {
        Ok(produced) => {
            log::debug!(
                "merging {} compile command(s) reported by the builder",
                produced.len()
            );
            db.extend(produced.entries().iter().cloned());
        }
        Err(err) => log::warn!("ignoring builder compilation database: {err}"),
    }
}

fn push_dirs(args: &mut Vec<String>, flag: &str, dirs: &[PathBuf]) {
    for dir in dirs {
        push_path(args, flag, dir);
    }
}

fn push_path(args: &mut Vec<String>, flag: &str, path: &Path) {
    args.push(flag.to_string());
    args.push(path.to_string_lossy().into_owned());
}
