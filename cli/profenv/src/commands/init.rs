//! `profenv init`: project scaffolding.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::manifest::{ProfenvManifest, MANIFEST_FILE};

/// Scaffold a project.
///
/// With a name, a new directory `name` is created under `cwd`; without one,
/// `cwd` itself becomes the project, named after the directory.
pub fn run(cwd: &Path, name: Option<&str>) -> Result<()> {
    match name {
        Some(name) => create_project(&cwd.join(name), name),
        None => {
            let name = cwd
                .file_name()
                .and_then(|n| n.to_str())
                .context("cannot derive a project name from the current directory")?;
            init_in_place(cwd, name)
        }
    }
}

pub(crate) fn create_project(project_dir: &Path, name: &str) -> Result<()> {
    if project_dir.exists() {
        bail!("directory '{}' already exists", project_dir.display());
    }
    fs::create_dir_all(project_dir)
        .with_context(|| format!("creating {}", project_dir.display()))?;
    init_in_place(project_dir, name)
}

fn init_in_place(project_dir: &Path, name: &str) -> Result<()> {
    let manifest_path = project_dir.join(MANIFEST_FILE);
    if manifest_path.exists() {
        bail!("{} already exists", manifest_path.display());
    }

    fs::write(&manifest_path, ProfenvManifest::template(name))
        .context("writing profenv.toml")?;

    let db = project_dir.join(".profenv").join("db");
    fs::create_dir_all(db.join("packages")).context("creating .profenv/db/packages")?;
    fs::create_dir_all(db.join("toolchains")).context("creating .profenv/db/toolchains")?;

    println!("Created project '{name}'");
    println!("  {MANIFEST_FILE}");
    println!("  .profenv/db/packages/");
    println!("  .profenv/db/toolchains/");

    Ok(())
}
