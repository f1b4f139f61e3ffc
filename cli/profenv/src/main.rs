//! profenv CLI: resolve named build profiles into execution environments.

mod commands;
mod manifest;

use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use manifest::ProfenvManifest;

#[derive(Parser)]
#[command(name = "profenv", version, about = "Profile-driven build environments")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create profenv.toml and an empty database
    Init {
        /// Project name; initializes the current directory when omitted
        name: Option<String>,
    },
    /// List profiles, components, and database contents
    List,
    /// Resolve a profile and print the environment
    Resolve {
        /// Profile name
        profile: String,
        /// Output format (human, json)
        #[arg(long)]
        format: Option<String>,
    },
    /// Print the variables a build session should launch with
    Env {
        /// Profile name
        profile: String,
        /// Output format (shell, json)
        #[arg(long)]
        format: Option<String>,
    },
    /// Describe the host platform, a given triple, or a platform file
    Platform {
        /// Target triple to describe instead of the host
        #[arg(long, conflicts_with = "file")]
        triple: Option<String>,
        /// TOML file with an `arch`/`os`/`abi` table
        #[arg(long)]
        file: Option<PathBuf>,
        /// Output format (human, toml)
        #[arg(long)]
        format: Option<String>,
    },
    /// Register entries in the project database
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
    /// Check the manifest, the database, and optionally one profile
    Doctor {
        /// Profile to resolve and check
        profile: Option<String>,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Register a package build
    AddPackage {
        /// Package name
        name: String,
        /// Target triple; registers the platform-independent entry when omitted
        #[arg(long)]
        target: Option<String>,
        /// Executable directory, relative to the entry
        #[arg(long)]
        bin: Option<String>,
        /// Library directory, relative to the entry (repeatable)
        #[arg(long = "lib")]
        libs: Vec<String>,
    },
    /// Register a cross compiler suite
    AddSuite {
        /// Target or toolchain triple the suite builds for
        triple: String,
        /// Installation root (defaults to the entry directory)
        #[arg(long)]
        root: Option<PathBuf>,
        /// Compiler path, relative to the root
        #[arg(long)]
        compiler: String,
        /// Archiver path, relative to the root
        #[arg(long)]
        archiver: String,
        /// Linker path, relative to the root (defaults to the compiler)
        #[arg(long)]
        linker: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("PROFENV_LOG").unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Init { name } => commands::init::run(&cwd, name.as_deref()),

        Commands::List => {
            let (manifest, project_dir) = load_manifest_required(&cwd)?;
            commands::list::run(&manifest, &project_dir)
        }

        Commands::Resolve { profile, format } => {
            let (manifest, project_dir) = load_manifest_required(&cwd)?;
            commands::resolve::run(&manifest, &project_dir, &profile, format.as_deref())
        }

        Commands::Env { profile, format } => {
            let (manifest, project_dir) = load_manifest_required(&cwd)?;
            commands::env::run(&manifest, &project_dir, &profile, format.as_deref())
        }

        Commands::Platform {
            triple,
            file,
            format,
        } => {
            let (manifest, _) = load_manifest_optional(&cwd)?;
            let source = match (&triple, &file) {
                (Some(triple), _) => commands::platform::Source::Triple(triple),
                (None, Some(file)) => commands::platform::Source::File(file),
                (None, None) => commands::platform::Source::Host,
            };
            commands::platform::run(manifest.as_ref(), source, format.as_deref())
        }

        Commands::Db { action } => {
            let (manifest, project_dir) = load_manifest_required(&cwd)?;
            match action {
                DbAction::AddPackage {
                    name,
                    target,
                    bin,
                    libs,
                } => commands::db::add_package(
                    &manifest,
                    &project_dir,
                    &name,
                    target.as_deref(),
                    bin,
                    libs,
                ),
                DbAction::AddSuite {
                    triple,
                    root,
                    compiler,
                    archiver,
                    linker,
                } => commands::db::add_suite(
                    &manifest,
                    &project_dir,
                    &triple,
                    commands::db::SuiteArgs {
                        root,
                        compiler,
                        archiver,
                        linker,
                    },
                ),
            }
        }

        Commands::Doctor { profile } => commands::doctor::run(&cwd, profile.as_deref()),
    }
}

/// Load manifest, returning error if not found.
fn load_manifest_required(cwd: &Path) -> anyhow::Result<(ProfenvManifest, PathBuf)> {
    require_manifest(ProfenvManifest::find_and_load(cwd)?)
}

fn require_manifest(
    found: Option<(ProfenvManifest, PathBuf)>,
) -> anyhow::Result<(ProfenvManifest, PathBuf)> {
    match found {
        Some((manifest, dir)) => Ok((manifest, dir)),
        None => anyhow::bail!("no profenv.toml found (run `profenv init` first)"),
    }
}

/// Try to load a manifest from the current directory upward. Returns (None, None) if not found.
fn load_manifest_optional(cwd: &Path) -> anyhow::Result<(Option<ProfenvManifest>, Option<PathBuf>)> {
    match ProfenvManifest::find_and_load(cwd)? {
        Some((manifest, dir)) => Ok((Some(manifest), Some(dir))),
        None => Ok((None, None)),
    }
}

#[cfg(test)]
mod integration_tests {
    use std::fs;

    use profenv_platform::PlatformDescriptor;
    use profenv_registry::{LocalDatabase, PackageEntry, SuiteEntry};

    use super::*;

    const CROSS_MANIFEST: &str = r#"
[project]
name = "cross"

[host]
arch = "x86_64"
os = "linux"
abi = "gnu"

[profiles.default]
components = ["gcc-base"]
packages = ["openssl", "zlib"]

[profiles.win]
components = ["rust-base", "windows-gnu-std"]
target = "x86_64-pc-windows-gnu"
packages = ["pthreads"]

[profiles.win.env]
CC_x86_64_pc_windows_gnu = "custom-cc"
"#;

    /// A project with two host packages sharing a library directory and a
    /// MinGW suite whose tools exist on disk.
    fn cross_project(root: &Path) -> PathBuf {
        let project = root.join("cross");
        commands::init::create_project(&project, "cross").unwrap();
        fs::write(project.join(manifest::MANIFEST_FILE), CROSS_MANIFEST).unwrap();

        let db = LocalDatabase::new(project.join(".profenv/db"));
        let shared = project.join("shared/lib").to_string_lossy().into_owned();
        db.add_package(
            "openssl",
            None,
            &PackageEntry {
                bin: Some("bin".into()),
                libs: vec!["lib".into(), shared.clone()],
            },
        )
        .unwrap();
        db.add_package(
            "zlib",
            None,
            &PackageEntry {
                bin: None,
                libs: vec![shared],
            },
        )
        .unwrap();
        db.add_package(
            "pthreads",
            Some(&PlatformDescriptor::windows_gnu_x86_64()),
            &PackageEntry {
                bin: None,
                libs: vec!["lib".into()],
            },
        )
        .unwrap();

        let suite_dir = db
            .add_suite(
                "x86_64-w64-mingw32",
                &SuiteEntry {
                    root: None,
                    compiler: "bin/x86_64-w64-mingw32-gcc".into(),
                    archiver: "bin/x86_64-w64-mingw32-ar".into(),
                    linker: None,
                },
            )
            .unwrap();
        fs::create_dir_all(suite_dir.join("bin")).unwrap();
        fs::write(suite_dir.join("bin/x86_64-w64-mingw32-gcc"), "").unwrap();
        fs::write(suite_dir.join("bin/x86_64-w64-mingw32-ar"), "").unwrap();

        project
    }

    /// Full workflow: init → resolve → env on a fresh project.
    #[test]
    fn init_resolve_env_workflow() {
        let dir = tempfile::tempdir().unwrap();
        let project_path = dir.path().join("workflow");

        commands::init::create_project(&project_path, "workflow").unwrap();
        let (mut manifest, project_dir) =
            ProfenvManifest::find_and_load(&project_path).unwrap().unwrap();
        assert_eq!(project_dir, project_path);

        // Pin the host so the test does not depend on the machine.
        manifest.host = Some(PlatformDescriptor::linux_x86_64());

        commands::resolve::run(&manifest, &project_dir, "default", None).unwrap();
        commands::resolve::run(&manifest, &project_dir, "default", Some("json")).unwrap();
        commands::env::run(&manifest, &project_dir, "default", None).unwrap();
        commands::list::run(&manifest, &project_dir).unwrap();
    }

    #[test]
    fn host_profile_dedups_shared_library_directory() {
        let dir = tempfile::tempdir().unwrap();
        let project = cross_project(dir.path());
        let (manifest, project_dir) = ProfenvManifest::find_and_load(&project).unwrap().unwrap();

        let env = commands::resolve_environment(&manifest, &project_dir, "default").unwrap();
        assert!(env.variables().is_empty());
        assert_eq!(env.ordered_library_paths().len(), 2);
        assert_eq!(env.ordered_binary_paths().len(), 1);

        let launch = env.launch_variables(|_| None);
        let ld = &launch["LD_LIBRARY_PATH"];
        assert_eq!(ld.split(':').count(), 2);
        assert!(launch["PATH"].ends_with("openssl/any/bin"));
    }

    #[test]
    fn cross_profile_binds_suite_and_explicit_wins() {
        let dir = tempfile::tempdir().unwrap();
        let project = cross_project(dir.path());
        let (manifest, project_dir) = ProfenvManifest::find_and_load(&project).unwrap().unwrap();

        let env = commands::resolve_environment(&manifest, &project_dir, "win").unwrap();
        assert_eq!(env.platform(), &PlatformDescriptor::windows_gnu_x86_64());
        assert_eq!(env.variable("CC_x86_64_pc_windows_gnu"), Some("custom-cc"));
        assert!(env
            .variable("AR_x86_64_pc_windows_gnu")
            .unwrap()
            .ends_with("bin/x86_64-w64-mingw32-ar"));
        assert!(env
            .variable("CARGO_TARGET_X86_64_PC_WINDOWS_GNU_LINKER")
            .unwrap()
            .ends_with("bin/x86_64-w64-mingw32-gcc"));
        assert!(env.toolchain_summary()["x86_64-pc-windows-gnu"].std_supported);

        let human = commands::resolve::render_human(&env).unwrap();
        assert!(human.contains("(cross)"));
    }

    #[test]
    fn resolution_errors_carry_kind() {
        let dir = tempfile::tempdir().unwrap();
        let project = cross_project(dir.path());
        let (manifest, project_dir) = ProfenvManifest::find_and_load(&project).unwrap().unwrap();

        let err = commands::resolve_environment(&manifest, &project_dir, "nope").unwrap_err();
        assert!(format!("{err:#}").contains("[UnknownProfile]"));

        // Remove a tool: the suite is no longer usable.
        let suite_bin = project.join(".profenv/db/toolchains/x86_64-w64-mingw32/bin");
        fs::remove_file(suite_bin.join("x86_64-w64-mingw32-ar")).unwrap();
        let err = commands::resolve_environment(&manifest, &project_dir, "win").unwrap_err();
        assert!(format!("{err:#}").contains("[NoCrossSupport]"));
    }

    #[test]
    fn unknown_format_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let project = cross_project(dir.path());
        let (manifest, project_dir) = ProfenvManifest::find_and_load(&project).unwrap().unwrap();

        assert!(commands::resolve::run(&manifest, &project_dir, "default", Some("yaml")).is_err());
        assert!(commands::env::run(&manifest, &project_dir, "default", Some("yaml")).is_err());
        commands::env::run(&manifest, &project_dir, "win", Some("json")).unwrap();
    }

    #[test]
    fn doctor_checks_profile() {
        let dir = tempfile::tempdir().unwrap();
        let project = cross_project(dir.path());
        commands::doctor::run(&project, Some("win")).unwrap();
    }

    #[test]
    fn missing_manifest_is_an_error() {
        let err = require_manifest(None).unwrap_err();
        assert!(err.to_string().contains("run `profenv init` first"));
    }

    #[test]
    fn manifest_is_found_from_a_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("up");
        commands::init::create_project(&project, "up").unwrap();
        let nested = project.join("src/deep");
        fs::create_dir_all(&nested).unwrap();

        let (manifest, found) = load_manifest_required(&nested).unwrap();
        assert_eq!(manifest.project.name, "up");
        assert_eq!(found, project);
    }

    #[test]
    fn suite_tool_escaping_root_is_not_bound() {
        let dir = tempfile::tempdir().unwrap();
        let project = cross_project(dir.path());
        let suite_dir = project.join(".profenv/db/toolchains/x86_64-w64-mingw32");
        let host_ar = project.join(".profenv/host/bin/ar");
        fs::create_dir_all(host_ar.parent().unwrap()).unwrap();
        fs::write(&host_ar, "").unwrap();
        fs::write(
            suite_dir.join("suite.toml"),
            "compiler = \"bin/x86_64-w64-mingw32-gcc\"\n\
             archiver = \"../../../host/bin/ar\"\n",
        )
        .unwrap();
        let (manifest, project_dir) = ProfenvManifest::find_and_load(&project).unwrap().unwrap();

        let err = commands::resolve_environment(&manifest, &project_dir, "win").unwrap_err();
        let text = format!("{err:#}");
        assert!(text.contains("[NoCrossSupport]"));
        assert!(text.contains("outside suite root"));
    }

    #[test]
    fn shell_env_refuses_injected_variable_name() {
        let dir = tempfile::tempdir().unwrap();
        let project = cross_project(dir.path());
        let manifest_path = project.join(manifest::MANIFEST_FILE);
        let mut text = fs::read_to_string(&manifest_path).unwrap();
        text.push_str("\n[profiles.bad]\ncomponents = [\"gcc-base\"]\n\n[profiles.bad.env]\n\"X; touch pwned; Y\" = \"v\"\n");
        fs::write(&manifest_path, text).unwrap();
        let (manifest, project_dir) = ProfenvManifest::find_and_load(&project).unwrap().unwrap();

        let err = commands::env::run(&manifest, &project_dir, "bad", None).unwrap_err();
        assert!(err.to_string().contains("not a valid shell identifier"));
        commands::env::run(&manifest, &project_dir, "bad", Some("json")).unwrap();
    }
}
