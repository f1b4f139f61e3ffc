//! `profenv doctor`: project and database diagnostics.

use std::path::Path;
use std::process::Command;

use anyhow::Result;
use profenv_registry::ToolchainDatabase;

use crate::manifest::ProfenvManifest;

/// Print diagnostics. Problems are reported, not returned as errors.
pub fn run(project_dir: &Path, profile: Option<&str>) -> Result<()> {
    println!("=== profenv doctor ===");
    println!();
    println!("profenv version: {}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("--- Project ---");
    let (manifest, dir) = match ProfenvManifest::find_and_load(project_dir) {
        Ok(Some(found)) => found,
        Ok(None) => {
            println!("  profenv.toml: not found (run `profenv init`)");
            return Ok(());
        }
        Err(e) => {
            println!("  profenv.toml: error: {e:#}");
            return Ok(());
        }
    };
    println!("  profenv.toml: found at {}", dir.display());
    println!("  Project:      {}", manifest.project.name);
    println!("  Profiles:     {}", manifest.profiles.len());
    match manifest.host() {
        Ok(host) => println!("  Host:         {host}"),
        Err(e) => println!("  Host:         error: {e:#}"),
    }
    if let Err(e) = manifest.naming() {
        println!("  Naming:       error: {e:#}");
    }
    println!();

    println!("--- Database ---");
    let database = manifest.database(&dir);
    let local = database.local();
    println!("  Root: {}", local.root().display());
    if !local.root().is_dir() {
        println!("  warning: database root does not exist");
    }
    match local.package_names() {
        Ok(names) => println!("  Packages: {}", names.len()),
        Err(e) => println!("  Packages: error: {e}"),
    }
    match local.suite_triples() {
        Ok(triples) => {
            for triple in triples {
                match database.resolve_toolchain(&triple) {
                    Ok(Some(suite)) => println!("  Suite {triple}: ok ({})", suite.root.display()),
                    Ok(None) => println!("  Suite {triple}: no suite.toml"),
                    Err(e) => println!("  Suite {triple}: {e}"),
                }
            }
        }
        Err(e) => println!("  Suites: error: {e}"),
    }

    if let Some(name) = profile {
        println!();
        println!("--- Profile: {name} ---");
        match super::resolve_environment(&manifest, &dir, name) {
            Ok(env) => {
                println!("  Platform: {}", env.platform());
                for (triple, tools) in env.toolchain_summary() {
                    if triple == &env.host().target_triple() {
                        print_tool_status(&tools.compiler);
                    }
                    if !tools.std_supported {
                        println!(
                            "  warning: no component provides a standard library for {triple}"
                        );
                    }
                }
                println!("  Library paths: {}", env.ordered_library_paths().len());
            }
            Err(e) => println!("  error: {e:#}"),
        }
    }

    Ok(())
}

fn print_tool_status(name: &str) {
    match Command::new(name).arg("--version").output() {
        Ok(output) => {
            let version = String::from_utf8_lossy(&output.stdout);
            let first_line = version.lines().next().unwrap_or("(unknown version)");
            println!("  {name}: {first_line}");
        }
        Err(_) => {
            println!("  {name}: not found");
        }
    }
}
