//! `profenv platform`: describe the host, a given triple, or a platform file.

use std::path::Path;

use anyhow::{bail, Context, Result};
use profenv_platform::parse::{load_platform_toml, platform_to_toml, validate_platform};
use profenv_platform::PlatformDescriptor;

use crate::manifest::ProfenvManifest;

/// Where the described platform comes from.
pub enum Source<'a> {
    Host,
    Triple(&'a str),
    File(&'a Path),
}

pub fn run(manifest: Option<&ProfenvManifest>, source: Source<'_>, format: Option<&str>) -> Result<()> {
    let (label, platform) = match source {
        Source::Triple(triple) => {
            let platform: PlatformDescriptor = triple
                .parse()
                .with_context(|| format!("parsing triple '{triple}'"))?;
            ("Platform", platform)
        }
        Source::File(path) => {
            let platform = load_platform_toml(path)
                .with_context(|| format!("loading platform file {}", path.display()))?;
            ("Platform", platform)
        }
        Source::Host => match manifest {
            Some(manifest) => ("Host", manifest.host()?),
            None => ("Host", PlatformDescriptor::host().context("detecting host platform")?),
        },
    };

    match format.unwrap_or("human") {
        "human" => print!("{}", describe(label, &platform)),
        "toml" => print!("{}", platform_to_toml(&platform).context("rendering platform")?),
        other => bail!("unknown format '{other}' (expected human or toml)"),
    }
    Ok(())
}

pub(crate) fn describe(label: &str, platform: &PlatformDescriptor) -> String {
    let mut out = format!("=== {label}: {platform} ===\n");
    out.push_str(&format!("  Architecture:      {}\n", platform.arch.as_str()));
    out.push_str(&format!("  OS:                {}\n", platform.os.as_str()));
    out.push_str(&format!(
        "  ABI:               {}\n",
        platform.abi.as_str().unwrap_or("(none)")
    ));
    out.push_str(&format!("  Target triple:     {}\n", platform.target_triple()));
    out.push_str(&format!("  Toolchain triple:  {}\n", platform.toolchain_triple()));
    out.push_str(&format!(
        "  Library path var:  {}\n",
        platform.os.library_path_variable()
    ));
    if let Err(issues) = validate_platform(platform) {
        out.push_str("  Issues:\n");
        for issue in issues {
            out.push_str(&format!("    {}: {}\n", issue.severity, issue.message));
        }
    }
    out
}
