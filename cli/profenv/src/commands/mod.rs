//! CLI command implementations.

pub mod db;
pub mod doctor;
pub mod env;
pub mod init;
pub mod list;
pub mod platform;
pub mod resolve;

use std::path::Path;

use anyhow::{Context, Result};
use profenv_compose::{Compositor, EnvironmentDescriptor};
use tracing::info;

use crate::manifest::ProfenvManifest;

/// Resolve `profile` as configured by the manifest in `project_dir`.
pub(crate) fn resolve_environment(
    manifest: &ProfenvManifest,
    project_dir: &Path,
    profile: &str,
) -> Result<EnvironmentDescriptor> {
    let registry = manifest.registry();
    let database = manifest.database(project_dir);
    let naming = manifest.naming()?;
    let host = manifest.host()?;

    info!(profile, %host, database = %database.local().root().display(), "resolving profile");
    let compositor = Compositor::new(&registry, &database, &database).with_naming(&*naming);
    let environment = compositor
        .resolve_named(&manifest.profiles, profile, &host)
        .map_err(|e| {
            let kind = e.kind();
            anyhow::Error::new(e).context(format!("resolving profile '{profile}' [{kind}]"))
        })?;

    let fingerprint = environment
        .fingerprint()
        .context("fingerprinting environment")?;
    info!(profile, platform = %environment.platform(), fingerprint = fingerprint.short(), "resolved");
    Ok(environment)
}
