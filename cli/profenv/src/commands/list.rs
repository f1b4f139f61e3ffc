//! `profenv list`: profiles, components, and database contents.

use std::path::Path;

use anyhow::{Context, Result};
use profenv_toolchain::AppliesTo;

use crate::manifest::ProfenvManifest;

pub fn run(manifest: &ProfenvManifest, project_dir: &Path) -> Result<()> {
    println!("Profiles:");
    if manifest.profiles.is_empty() {
        println!("  (none)");
    }
    for profile in manifest.profiles.iter() {
        println!(
            "  {:<20} target={:<28} components=[{}]",
            profile.name,
            profile.target.to_string(),
            profile.toolchain_components.join(", ")
        );
    }
    println!();

    println!("Components:");
    let registry = manifest.registry();
    for name in registry.names() {
        let origin = if manifest.components.contains_key(name) {
            "manifest"
        } else {
            "built-in"
        };
        let hosts = match registry.get(name).map(|c| &c.applies_to) {
            Some(AppliesTo::Platforms(set)) => set
                .iter()
                .map(|p| p.target_triple())
                .collect::<Vec<_>>()
                .join(", "),
            _ => "any host".to_string(),
        };
        println!("  {name:<20} {origin:<9} {hosts}");
    }
    println!();

    let database = manifest.database(project_dir);
    let local = database.local();
    let packages = local.package_names().context("listing packages")?;
    let suites = local.suite_triples().context("listing cross suites")?;
    println!("Database: {}", local.root().display());
    println!("  packages:     {}", join_or_none(&packages));
    println!("  cross suites: {}", join_or_none(&suites));
    Ok(())
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}
