//! `profenv resolve`: print a resolved environment.

use std::path::Path;

use anyhow::{bail, Context, Result};
use profenv_compose::EnvironmentDescriptor;

use crate::manifest::ProfenvManifest;

pub fn run(
    manifest: &ProfenvManifest,
    project_dir: &Path,
    profile: &str,
    format: Option<&str>,
) -> Result<()> {
    let environment = super::resolve_environment(manifest, project_dir, profile)?;
    match format.unwrap_or("human") {
        "human" => print!("{}", render_human(&environment)?),
        "json" => println!("{}", environment.to_json().context("serializing environment")?),
        other => bail!("unknown format '{other}' (expected human or json)"),
    }
    Ok(())
}

pub(crate) fn render_human(env: &EnvironmentDescriptor) -> Result<String> {
    let fingerprint = env.fingerprint().context("fingerprinting environment")?;
    let mut out = String::new();
    out.push_str(&format!("=== Profile: {} ===\n", env.profile()));
    out.push_str(&format!("Host:        {}\n", env.host()));
    out.push_str(&format!(
        "Platform:    {}{}\n",
        env.platform(),
        if env.is_cross() { " (cross)" } else { "" }
    ));
    out.push_str(&format!("Fingerprint: {}\n", fingerprint.short()));

    out.push_str("\n--- Toolchains ---\n");
    for (triple, tools) in env.toolchain_summary() {
        out.push_str(&format!("  {triple}\n"));
        out.push_str(&format!("    compiler: {}\n", tools.compiler));
        out.push_str(&format!("    archiver: {}\n", tools.archiver));
        out.push_str(&format!("    linker:   {}\n", tools.linker));
        if !tools.std_supported {
            out.push_str("    std:      not provided by the selected components\n");
        }
    }

    if !env.variables().is_empty() {
        out.push_str("\n--- Variables ---\n");
        for (key, value) in env.variables() {
            out.push_str(&format!("  {key}={value}\n"));
        }
    }

    out.push_str("\n--- Library paths ---\n");
    if env.ordered_library_paths().is_empty() {
        out.push_str("  (none)\n");
    }
    for path in env.ordered_library_paths() {
        out.push_str(&format!("  {path}\n"));
    }

    if !env.ordered_binary_paths().is_empty() {
        out.push_str("\n--- Binary paths ---\n");
        for path in env.ordered_binary_paths() {
            out.push_str(&format!("  {path}\n"));
        }
    }
    Ok(out)
}
