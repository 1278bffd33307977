//! `anvil compile`: build a sketch for a board.
//!
//! Assembles the build configuration and hands it to the builder:
//! 1. Open the sketch and resolve the board (FQBN)
//! 2. Load settings and locate hardware, tools and libraries
//! 3. Create the build and cache folders
//! 4. Run the builder, recording into the compilation database
//! 5. Copy the build products next to the sketch

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anvil_compdb::{CompilationDatabase, SharedDatabase};
use anvil_config::{ConfigError, Properties, Settings};

use crate::builder::{BuildError, Builder, ExternalBuilder};
use crate::context::{BuildContext, BuildMode};
use crate::exit::ExitCode;
use crate::sketch::{Sketch, SketchError};
use crate::{CompileArgs, GlobalArgs};

/// Environment variable naming the settings file.
const CONFIG_ENV: &str = "ANVIL_CONFIG";

/// Property always appended to the user's custom build properties.
const WARN_DATA_PERCENTAGE: &str = "build.warn_data_percentage=75";

/// Errors that stop `anvil compile`, each mapped to an exit code.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The current directory could not be determined.
    #[error("cannot determine current directory: {0}")]
    CurrentDir(std::io::Error),

    /// The sketch could not be opened.
    #[error("error opening sketch: {0}")]
    Sketch(#[from] SketchError),

    /// Neither `--fqbn` nor the sketch metadata names a board.
    #[error("no Fully Qualified Board Name provided")]
    MissingFqbn,

    /// The FQBN does not have 3 or 4 colon-separated parts.
    #[error("Fully Qualified Board Name has incorrect format: '{0}'")]
    InvalidFqbn(String),

    /// No settings file was given or found.
    #[error("no anvil.toml settings file found; use --config or set {CONFIG_ENV}")]
    NoConfigFile,

    /// The settings file could not be loaded.
    #[error("cannot load settings: {0}")]
    Config(#[from] ConfigError),

    /// No hardware package directory exists.
    #[error("cannot get hardware directories: none configured or installed")]
    NoHardwareDirectories,

    /// A required output folder could not be created.
    #[error("cannot create the {what} {path}: {source}")]
    CreateDir {
        /// Which folder was being created.
        what: &'static str,
        /// The folder path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The builder failed.
    #[error("compilation failed: {0}")]
    Build(#[from] BuildError),

    /// A build product could not be copied next to the sketch.
    #[error("error copying {from} to {to}: {source}")]
    CopyOutput {
        /// Source file in the build folder.
        from: PathBuf,
        /// Destination in the sketch folder.
        to: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

impl CompileError {
    /// The process exit code for this error.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CompileError::InvalidFqbn(_) => ExitCode::BadArgument,
            CompileError::NoConfigFile => ExitCode::NoConfigFile,
            CompileError::Config(_) | CompileError::NoHardwareDirectories => ExitCode::CoreConfig,
            CompileError::CreateDir { .. } => ExitCode::BadCall,
            CompileError::CurrentDir(_)
            | CompileError::Sketch(_)
            | CompileError::MissingFqbn
            | CompileError::Build(_)
            | CompileError::CopyOutput { .. } => ExitCode::Generic,
        }
    }
}

/// Runs the `anvil compile` command.
pub fn run(args: &CompileArgs, global: &GlobalArgs) -> Result<(), CompileError> {
    log::debug!("executing `anvil compile`");
    let cwd = std::env::current_dir().map_err(CompileError::CurrentDir)?;

    let sketch_path = args
        .sketch
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| cwd.clone());
    let sketch = Sketch::load(&sketch_path)?;
    let fqbn = resolve_fqbn(args.fqbn.as_deref(), &sketch.metadata.cpu.fqbn)?;

    let settings_file = settings_path(
        global.config.as_deref(),
        std::env::var_os(CONFIG_ENV),
        &cwd,
    )
    .ok_or(CompileError::NoConfigFile)?;
    let settings = anvil_config::load_config(&settings_file)?;

    let ctx = build_context(args, global, &sketch, fqbn, &settings)?;
    let builder = ExternalBuilder::new(settings.builder.program.clone());

    compile_sketch(
        &builder,
        &ctx,
        build_mode(args),
        &sketch,
        !args.no_compilation_database,
        global,
    )
}

/// Runs `builder` and handles its products.
///
/// The compilation database is saved after a compile even if the build
/// fails, so tooling can still index what was attempted. It holds whatever
/// the builder recorded before stopping.
pub fn compile_sketch<B: Builder + ?Sized>(
    builder: &B,
    ctx: &BuildContext,
    mode: BuildMode,
    sketch: &Sketch,
    record_database: bool,
    global: &GlobalArgs,
) -> Result<(), CompileError> {
    if !global.quiet && mode == BuildMode::Compile {
        eprintln!("   Compiling {} for {}", sketch.name, ctx.fqbn);
    }

    let db = SharedDatabase::new(CompilationDatabase::new(ctx.compilation_database_path()));
    let result = builder.run(ctx, mode, &db);

    if record_database && mode == BuildMode::Compile {
        let outcome = db.save();
        if outcome.is_clean() && !global.quiet {
            eprintln!(
                "   Wrote {} ({} entries)",
                ctx.compilation_database_path().display(),
                db.len()
            );
        }
        outcome.log();
    }

    let output = result?;

    if let Some(ref output_file) = output.output_file {
        for copied in copy_outputs(output_file, sketch, &ctx.fqbn)? {
            if !global.quiet {
                eprintln!("   Copied {}", copied.display());
            }
        }
    }

    if !global.quiet && mode == BuildMode::Compile {
        eprintln!("   Build complete.");
    }
    Ok(())
}

/// Picks the builder mode from the flags; `--show-properties` wins over `--preprocess`.
pub fn build_mode(args: &CompileArgs) -> BuildMode {
    if args.show_properties {
        BuildMode::ShowProperties
    } else if args.preprocess {
        BuildMode::Preprocess
    } else {
        BuildMode::Compile
    }
}

/// Chooses the FQBN from the flag or the sketch metadata and checks its shape.
pub fn resolve_fqbn(flag: Option<&str>, from_sketch: &str) -> Result<String, CompileError> {
    let fqbn = match flag {
        Some(f) if !f.is_empty() => f,
        _ => from_sketch,
    };
    if fqbn.is_empty() {
        return Err(CompileError::MissingFqbn);
    }
    let parts = fqbn.split(':').count();
    if !(3..=4).contains(&parts) {
        return Err(CompileError::InvalidFqbn(fqbn.to_string()));
    }
    Ok(fqbn.to_string())
}

/// Locates the settings file: `--config`, then the environment, then the
/// nearest `anvil.toml` above `cwd`.
pub fn settings_path(explicit: Option<&str>, env: Option<OsString>, cwd: &Path) -> Option<PathBuf> {
    explicit
        .map(PathBuf::from)
        .or_else(|| env.filter(|v| !v.is_empty()).map(PathBuf::from))
        .or_else(|| anvil_config::find_config(cwd))
}

/// Assembles the [`BuildContext`], creating the build and cache folders.
pub fn build_context(
    args: &CompileArgs,
    global: &GlobalArgs,
    sketch: &Sketch,
    fqbn: String,
    settings: &Settings,
) -> Result<BuildContext, CompileError> {
    let hardware_dirs = settings.hardware_directories();
    if hardware_dirs.is_empty() {
        return Err(CompileError::NoHardwareDirectories);
    }

    let build_path = args
        .build_path
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| default_build_path(&sketch.name));
    create_dir("build folder", &build_path)?;

    let build_cache_path = match args.build_cache_path {
        Some(ref p) => {
            let path = PathBuf::from(p);
            create_dir("build cache folder", &path)?;
            Some(path)
        }
        None => None,
    };

    let mut custom_build_properties = args.build_properties.clone();
    custom_build_properties.push(WARN_DATA_PERCENTAGE.to_string());

    Ok(BuildContext {
        fqbn,
        sketch_location: sketch.main_file.clone(),
        hardware_dirs,
        tools_dirs: settings.tools_directories(),
        built_in_libraries_dirs: ide_builtin_libraries(&settings.preferences_file()),
        other_libraries_dirs: vec![settings.libraries_directory()],
        build_path,
        build_cache_path,
        core_build_cache_path: std::env::temp_dir().join("anvil-core-cache"),
        warnings_level: args.warnings,
        custom_build_properties,
        usb_vid_pid: args.vid_pid.clone().filter(|v| !v.is_empty()),
        core_api_version: settings.builder.core_api_version.clone(),
        debug_level: args.debug_level,
        verbose: global.verbose,
    })
}

fn default_build_path(sketch_name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("anvil-build-{sketch_name}"))
}

fn create_dir(what: &'static str, path: &Path) -> Result<(), CompileError> {
    std::fs::create_dir_all(path).map_err(|source| CompileError::CreateDir {
        what,
        path: path.to_path_buf(),
        source,
    })
}

/// Finds the libraries folder of the most recent IDE recorded in `preferences.txt`.
///
/// Preferences may hold `last.ide.<version>.hardwarepath` entries from several
/// IDE versions; the lexicographically last one is used.
pub fn ide_builtin_libraries(preferences: &Path) -> Vec<PathBuf> {
    let props = match Properties::load(preferences) {
        Ok(props) => props,
        Err(err) => {
            log::debug!("no IDE preferences at {}: {err}", preferences.display());
            return Vec::new();
        }
    };
    let ide = props.sub_tree("last").sub_tree("ide");
    ide.iter()
        .filter(|(key, _)| key.ends_with(".hardwarepath"))
        .last()
        .and_then(|(_, hardware)| Path::new(hardware).parent().map(|p| p.join("libraries")))
        .into_iter()
        .collect()
}

/// Destinations in the sketch folder for the primary product and its `.elf`.
///
/// Names are `<sketch>.<fqbn with ':' replaced by '.'>.<ext>`.
pub fn output_destinations(
    sketch_dir: &Path,
    sketch_name: &str,
    fqbn: &str,
    output_file: &Path,
) -> (PathBuf, PathBuf) {
    let board = fqbn.replace(':', ".");
    let ext = output_file
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    (
        sketch_dir.join(format!("{sketch_name}.{board}{ext}")),
        sketch_dir.join(format!("{sketch_name}.{board}.elf")),
    )
}

/// Copies the primary build product and its sibling `.elf` next to the sketch.
fn copy_outputs(
    output_file: &Path,
    sketch: &Sketch,
    fqbn: &str,
) -> Result<Vec<PathBuf>, CompileError> {
    let (primary_dst, elf_dst) = output_destinations(&sketch.dir, &sketch.name, fqbn, output_file);
    let elf_src = output_file.with_extension("elf");

    let mut copied = Vec::with_capacity(2);
    for (from, to) in [(output_file.to_path_buf(), primary_dst), (elf_src, elf_dst)] {
        std::fs::copy(&from, &to).map_err(|source| CompileError::CopyOutput {
            from: from.clone(),
            to: to.clone(),
            source,
        })?;
        copied.push(to);
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::BuildOutput;
    use crate::context::tests::sample_context;
    use crate::sketch::tests::make_sketch;
    use crate::{Cli, Command, WarningsLevel};
    use anvil_compdb::{ProcessInvocation, DATABASE_FILE};
    use clap::Parser;

    fn quiet() -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            config: None,
        }
    }

    fn parse_args(extra: &[&str]) -> CompileArgs {
        let mut argv = vec!["anvil", "compile"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Command::Compile(args) => args,
        }
    }

    fn settings_for(data: &Path) -> Settings {
        std::fs::create_dir_all(data.join("packages")).unwrap();
        anvil_config::load_config_from_str(&format!(
            "[directories]\ndata = {:?}\n",
            data.to_string_lossy()
        ))
        .unwrap()
    }

    /// Pretends to compile: records two compiler calls and writes the products.
    struct FakeBuilder {
        fail: bool,
    }

    impl Builder for FakeBuilder {
        fn run(
            &self,
            ctx: &BuildContext,
            mode: BuildMode,
            db: &SharedDatabase,
        ) -> Result<BuildOutput, BuildError> {
            if mode != BuildMode::Compile {
                return Ok(BuildOutput::default());
            }
            for src in ["sketch/Blink.ino.cpp", "core/wiring.c"] {
                let inv = ProcessInvocation::new(["avr-gcc", "-c", src]).with_dir(&ctx.build_path);
                db.add(ctx.build_path.join(src), &inv).log();
            }
            if self.fail {
                return Err(BuildError::UnresolvedOutput("{recipe.output.tmp_file}".into()));
            }
            let hex = ctx.build_path.join("Blink.ino.hex");
            std::fs::write(&hex, ":00000001FF\n").unwrap();
            std::fs::write(hex.with_extension("elf"), b"\x7fELF").unwrap();
            Ok(BuildOutput {
                output_file: Some(hex),
            })
        }
    }

    // -- resolve_fqbn tests --

    #[test]
    fn fqbn_flag_wins() {
        assert_eq!(
            resolve_fqbn(Some("anvil:avr:mega"), "anvil:avr:uno").unwrap(),
            "anvil:avr:mega"
        );
    }

    #[test]
    fn fqbn_falls_back_to_sketch() {
        assert_eq!(resolve_fqbn(None, "anvil:avr:uno").unwrap(), "anvil:avr:uno");
        assert_eq!(resolve_fqbn(Some(""), "anvil:avr:uno").unwrap(), "anvil:avr:uno");
    }

    #[test]
    fn fqbn_with_options_is_accepted() {
        assert!(resolve_fqbn(Some("anvil:avr:nano:cpu=atmega328old"), "").is_ok());
    }

    #[test]
    fn fqbn_missing() {
        let err = resolve_fqbn(None, "").unwrap_err();
        assert!(matches!(err, CompileError::MissingFqbn));
        assert_eq!(err.exit_code(), ExitCode::Generic);
    }

    #[test]
    fn fqbn_wrong_shape() {
        for bad in ["uno", "anvil:avr", "a:b:c:d:e"] {
            let err = resolve_fqbn(Some(bad), "").unwrap_err();
            assert!(matches!(err, CompileError::InvalidFqbn(_)));
            assert_eq!(err.exit_code(), ExitCode::BadArgument);
        }
    }

    // -- mode and settings lookup --

    #[test]
    fn build_mode_precedence() {
        assert_eq!(build_mode(&parse_args(&[])), BuildMode::Compile);
        assert_eq!(build_mode(&parse_args(&["--preprocess"])), BuildMode::Preprocess);
        assert_eq!(
            build_mode(&parse_args(&["--preprocess", "--show-properties"])),
            BuildMode::ShowProperties
        );
    }

    #[test]
    fn settings_path_precedence() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("anvil.toml"), "").unwrap();

        assert_eq!(
            settings_path(Some("/etc/anvil.toml"), Some("/env.toml".into()), dir.path()),
            Some(PathBuf::from("/etc/anvil.toml"))
        );
        assert_eq!(
            settings_path(None, Some("/env.toml".into()), dir.path()),
            Some(PathBuf::from("/env.toml"))
        );
        assert_eq!(
            settings_path(None, Some("".into()), dir.path()),
            Some(dir.path().join("anvil.toml"))
        );
    }

    // -- build_context tests --

    #[test]
    fn context_from_flags_and_settings() {
        let root = tempfile::tempdir().unwrap();
        let sketch = Sketch::load(&make_sketch(root.path(), "Blink")).unwrap();
        let settings = settings_for(&root.path().join("data"));
        let build = root.path().join("out");
        let cache = root.path().join("cache");
        let args = parse_args(&[
            "--build-path",
            build.to_str().unwrap(),
            "--build-cache-path",
            cache.to_str().unwrap(),
            "--build-properties",
            "build.extra_flags=-DFOO",
            "--warnings",
            "more",
        ]);

        let ctx = build_context(&args, &quiet(), &sketch, "anvil:avr:uno".into(), &settings).unwrap();
        assert!(build.is_dir());
        assert!(cache.is_dir());
        assert_eq!(ctx.build_path, build);
        assert_eq!(ctx.build_cache_path, Some(cache));
        assert_eq!(ctx.sketch_location, sketch.main_file);
        assert_eq!(ctx.hardware_dirs, vec![root.path().join("data").join("packages")]);
        assert_eq!(
            ctx.other_libraries_dirs,
            vec![root.path().join("data").join("libraries")]
        );
        assert_eq!(
            ctx.custom_build_properties,
            vec!["build.extra_flags=-DFOO", "build.warn_data_percentage=75"]
        );
        assert_eq!(ctx.warnings_level, WarningsLevel::More);
        assert_eq!(ctx.core_api_version, "10600");
        assert!(ctx.built_in_libraries_dirs.is_empty());
    }

    #[test]
    fn context_without_hardware_dirs() {
        let root = tempfile::tempdir().unwrap();
        let sketch = Sketch::load(&make_sketch(root.path(), "Blink")).unwrap();
        let settings = anvil_config::load_config_from_str(&format!(
            "[directories]\ndata = {:?}\n",
            root.path().join("empty").to_string_lossy()
        ))
        .unwrap();
        let err = build_context(&parse_args(&[]), &quiet(), &sketch, "a:b:c".into(), &settings)
            .unwrap_err();
        assert!(matches!(err, CompileError::NoHardwareDirectories));
        assert_eq!(err.exit_code(), ExitCode::CoreConfig);
    }

    #[test]
    fn context_build_path_not_creatable() {
        let root = tempfile::tempdir().unwrap();
        let sketch = Sketch::load(&make_sketch(root.path(), "Blink")).unwrap();
        let settings = settings_for(&root.path().join("data"));
        let blocker = root.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let build = blocker.join("out");
        let args = parse_args(&["--build-path", build.to_str().unwrap()]);

        let err = build_context(&args, &quiet(), &sketch, "a:b:c".into(), &settings).unwrap_err();
        assert!(matches!(err, CompileError::CreateDir { .. }));
        assert_eq!(err.exit_code(), ExitCode::BadCall);
    }

    // -- IDE preferences --

    #[test]
    fn builtin_libraries_from_latest_ide() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = dir.path().join("preferences.txt");
        std::fs::write(
            &prefs,
            "last.ide.1.6.5.hardwarepath=/opt/ide-1.6.5/hardware\n\
             last.ide.1.8.0.hardwarepath=/opt/ide-1.8.0/hardware\n\
             last.ide.1.8.0.daterun=1500000000\n",
        )
        .unwrap();
        assert_eq!(
            ide_builtin_libraries(&prefs),
            vec![PathBuf::from("/opt/ide-1.8.0/libraries")]
        );
    }

    #[test]
    fn builtin_libraries_without_preferences() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ide_builtin_libraries(&dir.path().join("preferences.txt")).is_empty());
    }

    #[test]
    fn builtin_libraries_without_hardwarepath() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = dir.path().join("preferences.txt");
        std::fs::write(&prefs, "editor.font=Monospaced\n").unwrap();
        assert!(ide_builtin_libraries(&prefs).is_empty());
    }

    // -- output copying --

    #[test]
    fn output_names_use_dotted_fqbn() {
        let (hex, elf) = output_destinations(
            Path::new("/sketches/Blink"),
            "Blink",
            "anvil:avr:uno",
            Path::new("/tmp/build/Blink.ino.hex"),
        );
        assert_eq!(hex, PathBuf::from("/sketches/Blink/Blink.anvil.avr.uno.hex"));
        assert_eq!(elf, PathBuf::from("/sketches/Blink/Blink.anvil.avr.uno.elf"));
    }

    #[test]
    fn output_names_for_bin_products() {
        let (bin, _) = output_destinations(
            Path::new("/s"),
            "Fade",
            "anvil:samd:zero",
            Path::new("/b/Fade.ino.bin"),
        );
        assert_eq!(bin, PathBuf::from("/s/Fade.anvil.samd.zero.bin"));
    }

    // -- compile_sketch tests --

    #[test]
    fn compile_copies_outputs_and_writes_database() {
        let root = tempfile::tempdir().unwrap();
        let sketch = Sketch::load(&make_sketch(root.path(), "Blink")).unwrap();
        let build = root.path().join("build");
        std::fs::create_dir_all(&build).unwrap();
        let ctx = sample_context(&build);

        compile_sketch(
            &FakeBuilder { fail: false },
            &ctx,
            BuildMode::Compile,
            &sketch,
            true,
            &quiet(),
        )
        .unwrap();

        assert!(sketch.dir.join("Blink.anvil.avr.uno.hex").is_file());
        assert!(sketch.dir.join("Blink.anvil.avr.uno.elf").is_file());

        let db = CompilationDatabase::load(build.join(DATABASE_FILE)).unwrap();
        assert_eq!(db.len(), 2);
        assert_eq!(db.entries()[0].arguments, vec!["avr-gcc", "-c", "sketch/Blink.ino.cpp"]);
        assert_eq!(db.entries()[1].directory, build.to_string_lossy());
    }

    #[test]
    fn failed_build_still_saves_database() {
        let root = tempfile::tempdir().unwrap();
        let sketch = Sketch::load(&make_sketch(root.path(), "Blink")).unwrap();
        let build = root.path().join("build");
        let ctx = sample_context(&build);

        let err = compile_sketch(
            &FakeBuilder { fail: true },
            &ctx,
            BuildMode::Compile,
            &sketch,
            true,
            &quiet(),
        )
        .unwrap_err();

        assert!(matches!(err, CompileError::Build(_)));
        assert_eq!(err.exit_code(), ExitCode::Generic);
        let db = CompilationDatabase::load(build.join(DATABASE_FILE)).unwrap();
        assert_eq!(db.len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn failed_external_build_keeps_builder_database() {
        use crate::builder::tests::{script_builder, REPORTED_ENTRY};

        let root = tempfile::tempdir().unwrap();
        let sketch = Sketch::load(&make_sketch(root.path(), "Blink")).unwrap();
        let build = root.path().join("build");
        std::fs::create_dir_all(&build).unwrap();
        let ctx = sample_context(&build);
        let builder = script_builder(
            root.path(),
            &format!(
                "printf '%s\\n' '{REPORTED_ENTRY}' > '{}'\nexit 1",
                ctx.compilation_database_path().display()
            ),
        );

        let err = compile_sketch(&builder, &ctx, BuildMode::Compile, &sketch, true, &quiet())
            .unwrap_err();
        assert!(matches!(err, CompileError::Build(BuildError::Failed { .. })));

        let db = CompilationDatabase::load(build.join(DATABASE_FILE)).unwrap();
        assert_eq!(db.len(), 1);
        assert_eq!(db.entries()[0].file, "x.c");
    }

    #[test]
    fn database_can_be_disabled() {
        let root = tempfile::tempdir().unwrap();
        let sketch = Sketch::load(&make_sketch(root.path(), "Blink")).unwrap();
        let build = root.path().join("build");
        std::fs::create_dir_all(&build).unwrap();
        let ctx = sample_context(&build);

        compile_sketch(
            &FakeBuilder { fail: false },
            &ctx,
            BuildMode::Compile,
            &sketch,
            false,
            &quiet(),
        )
        .unwrap();
        assert!(!build.join(DATABASE_FILE).exists());
    }

    #[test]
    fn show_properties_copies_nothing() {
        let root = tempfile::tempdir().unwrap();
        let sketch = Sketch::load(&make_sketch(root.path(), "Blink")).unwrap();
        let build = root.path().join("build");
        let ctx = sample_context(&build);

        compile_sketch(
            &FakeBuilder { fail: false },
            &ctx,
            BuildMode::ShowProperties,
            &sketch,
            true,
            &quiet(),
        )
        .unwrap();
        assert!(!sketch.dir.join("Blink.anvil.avr.uno.hex").exists());
        assert!(!build.join(DATABASE_FILE).exists());
    }

    #[test]
    fn missing_elf_is_copy_error() {
        let root = tempfile::tempdir().unwrap();
        let sketch = Sketch::load(&make_sketch(root.path(), "Blink")).unwrap();
        let hex = root.path().join("Blink.ino.hex");
        std::fs::write(&hex, "").unwrap();

        let err = copy_outputs(&hex, &sketch, "anvil:avr:uno").unwrap_err();
        assert!(matches!(err, CompileError::CopyOutput { .. }));
        // The primary product was copied before the failure.
        assert!(sketch.dir.join("Blink.anvil.avr.uno.hex").is_file());
    }
}
