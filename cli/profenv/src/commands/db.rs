//! `profenv db`: register packages and cross suites in the project database.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use profenv_platform::PlatformDescriptor;
use profenv_registry::{PackageEntry, SuiteEntry};

use crate::manifest::ProfenvManifest;

/// Run `profenv db add-package <name> [--target <triple>] [--bin <dir>] [--lib <dir>]...`.
///
/// Without `--target` the entry is the platform-independent fallback.
pub fn add_package(
    manifest: &ProfenvManifest,
    project_dir: &Path,
    name: &str,
    target: Option<&str>,
    bin: Option<String>,
    libs: Vec<String>,
) -> Result<()> {
    let platform = target
        .map(|t| {
            t.parse::<PlatformDescriptor>()
                .with_context(|| format!("parsing triple '{t}'"))
        })
        .transpose()?;

    let database = manifest.database(project_dir);
    let dir = database
        .local()
        .add_package(name, platform.as_ref(), &PackageEntry { bin, libs })
        .with_context(|| format!("registering package '{name}'"))?;

    let scope = platform.map_or_else(|| "any platform".to_string(), |p| p.target_triple());
    println!("Registered package '{name}' for {scope}");
    println!("  {}", dir.display());
    Ok(())
}

/// Arguments of `profenv db add-suite`.
pub struct SuiteArgs {
    pub root: Option<PathBuf>,
    pub compiler: String,
    pub archiver: String,
    pub linker: Option<String>,
}

/// Run `profenv db add-suite <triple> --compiler <path> --archiver <path> ...`.
///
/// `triple` may be given in either form; the suite is stored under the
/// toolchain triple.
pub fn add_suite(
    manifest: &ProfenvManifest,
    project_dir: &Path,
    triple: &str,
    args: SuiteArgs,
) -> Result<()> {
    let platform: PlatformDescriptor = triple
        .parse()
        .with_context(|| format!("parsing triple '{triple}'"))?;
    let toolchain_triple = platform.toolchain_triple();

    let entry = SuiteEntry {
        root: args.root,
        compiler: args.compiler,
        archiver: args.archiver,
        linker: args.linker,
    };
    let database = manifest.database(project_dir);
    let dir = database
        .local()
        .add_suite(&toolchain_triple, &entry)
        .with_context(|| format!("registering cross suite '{toolchain_triple}'"))?;

    println!("Registered cross suite '{toolchain_triple}' for {}", platform.target_triple());
    println!("  {}", dir.display());
    Ok(())
}
