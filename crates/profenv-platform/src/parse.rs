//! Triple parsing, TOML loading, and validation for platform descriptors.
//!
//! Platforms may be written either as triples (`x86_64-pc-windows-gnu`,
//! `x86_64-w64-mingw32`) or as `{ arch, os, abi }` tables in TOML.

use std::path::Path;

use crate::error::{PlatformError, Result};
use crate::platform::{Abi, Arch, Os, PlatformDescriptor};

/// A validation issue found in a platform descriptor.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Severity: "error" or "warning".
    pub severity: &'static str,
    /// Human-readable description.
    pub message: String,
}

/// Parse a target or toolchain triple into a descriptor.
///
/// Vendor fields are ignored. `mingw32` implies Windows with the GNU ABI.
pub fn parse_triple(triple: &str) -> Result<PlatformDescriptor> {
    let invalid = |detail: &str| PlatformError::InvalidTriple {
        triple: triple.to_string(),
        detail: detail.to_string(),
    };

    let parts: Vec<&str> = triple.trim().split('-').collect();
    if parts.len() < 2 || parts.iter().any(|p| p.is_empty()) {
        return Err(invalid("expected at least arch-os"));
    }

    let arch: Arch = parts[0].parse()?;

    let os_index = parts
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, p)| is_os_token(p))
        .map(|(i, _)| i)
        .ok_or_else(|| invalid("no operating system component"))?;

    if parts[os_index] == "mingw32" {
        if os_index + 1 != parts.len() {
            return Err(invalid("unexpected fields after 'mingw32'"));
        }
        return Ok(PlatformDescriptor::new(arch, Os::Windows, Abi::Gnu));
    }

    let os: Os = parts[os_index].parse()?;
    let abi = match &parts[os_index + 1..] {
        [] => Abi::None,
        [abi] => abi.parse()?,
        _ => return Err(invalid("too many fields after the operating system")),
    };

    Ok(PlatformDescriptor::new(arch, os, abi))
}

fn is_os_token(part: &str) -> bool {
    matches!(
        part,
        "linux" | "windows" | "darwin" | "macos" | "wasi" | "wasip1" | "mingw32"
    )
}

/// Load a platform descriptor from a TOML file.
pub fn load_platform_toml(path: &Path) -> Result<PlatformDescriptor> {
    if !path.exists() {
        return Err(PlatformError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    parse_platform_toml(&content)
}

/// Parse a platform descriptor from a TOML string.
pub fn parse_platform_toml(toml_str: &str) -> Result<PlatformDescriptor> {
    let platform: PlatformDescriptor = toml::from_str(toml_str)?;
    Ok(platform)
}

/// Serialize a platform descriptor to pretty TOML.
pub fn platform_to_toml(platform: &PlatformDescriptor) -> Result<String> {
    let toml_str = toml::to_string_pretty(platform)?;
    Ok(toml_str)
}

/// Check a descriptor for field combinations no toolchain can target.
///
/// Returns `Ok(())` if valid, or `Err(issues)` with a list of problems.
pub fn validate_platform(
    platform: &PlatformDescriptor,
) -> std::result::Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    // 1. MSVC only exists on Windows
    if platform.abi == Abi::Msvc && platform.os != Os::Windows {
        issues.push(ValidationIssue {
            severity: "error",
            message: format!("ABI 'msvc' is only valid on windows, not {}", platform.os.as_str()),
        });
    }

    // 2. Hard-float EABI is a 32-bit ARM ABI
    if platform.abi == Abi::Gnueabihf && platform.arch != Arch::Armv7 {
        issues.push(ValidationIssue {
            severity: "error",
            message: format!(
                "ABI 'gnueabihf' requires armv7, not {}",
                platform.arch.as_str()
            ),
        });
    }

    // 3. wasm32 and WASI go together
    if (platform.arch == Arch::Wasm32) != (platform.os == Os::Wasi) {
        issues.push(ValidationIssue {
            severity: "error",
            message: format!(
                "architecture {} cannot target os {}",
                platform.arch.as_str(),
                platform.os.as_str()
            ),
        });
    }

    // 4. Darwin triples carry no ABI field
    if platform.os == Os::Macos && platform.abi != Abi::None {
        issues.push(ValidationIssue {
            severity: "warning",
            message: "macos targets ignore the ABI field".into(),
        });
    }

    // 5. Linux and Windows need an explicit C runtime
    if matches!(platform.os, Os::Linux | Os::Windows) && platform.abi == Abi::None {
        issues.push(ValidationIssue {
            severity: "warning",
            message: format!(
                "{} target has no ABI; toolchain default will be assumed",
                platform.os.as_str()
            ),
        });
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}
