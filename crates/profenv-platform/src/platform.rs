//! Platform descriptor model.
//!
//! A `PlatformDescriptor` is a pure value: equality is structural, and two
//! descriptors are "cross" relative to each other when any field differs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PlatformError, Result};

/// Instruction set architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Arch {
    #[serde(rename = "x86_64")]
    X86_64,
    #[serde(rename = "aarch64")]
    Aarch64,
    #[serde(rename = "i686")]
    I686,
    #[serde(rename = "armv7")]
    Armv7,
    #[serde(rename = "riscv64")]
    Riscv64,
    #[serde(rename = "wasm32")]
    Wasm32,
}

impl Arch {
    /// Architecture name as it appears in a target triple.
    pub fn as_str(self) -> &'static str {
        match self {
            Arch::X86_64 => "x86_64",
            Arch::Aarch64 => "aarch64",
            Arch::I686 => "i686",
            Arch::Armv7 => "armv7",
            Arch::Riscv64 => "riscv64",
            Arch::Wasm32 => "wasm32",
        }
    }

    /// Architecture name as GNU toolchains spell it.
    pub fn gnu_name(self) -> &'static str {
        match self {
            Arch::Armv7 => "arm",
            other => other.as_str(),
        }
    }
}

impl FromStr for Arch {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "x86_64" | "amd64" => Ok(Arch::X86_64),
            "aarch64" | "arm64" => Ok(Arch::Aarch64),
            "i686" | "i386" | "x86" => Ok(Arch::I686),
            "armv7" | "arm" => Ok(Arch::Armv7),
            "riscv64" | "riscv64gc" => Ok(Arch::Riscv64),
            "wasm32" => Ok(Arch::Wasm32),
            other => Err(PlatformError::UnknownField {
                field: "architecture",
                value: other.to_string(),
            }),
        }
    }
}

/// Operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    Linux,
    Windows,
    Macos,
    /// WebAssembly System Interface.
    Wasi,
}

impl Os {
    /// Name as it appears in target triples.
    pub fn as_str(self) -> &'static str {
        match self {
            Os::Linux => "linux",
            Os::Windows => "windows",
            Os::Macos => "macos",
            Os::Wasi => "wasi",
        }
    }

    /// Vendor field used when rendering a target triple.
    fn vendor(self) -> Option<&'static str> {
        match self {
            Os::Linux => Some("unknown"),
            Os::Windows => Some("pc"),
            Os::Macos => Some("apple"),
            Os::Wasi => None,
        }
    }

    /// Separator for path lists on this OS.
    pub fn path_list_separator(self) -> char {
        match self {
            Os::Windows => ';',
            _ => ':',
        }
    }

    /// Variable a dynamic loader on this OS searches for libraries.
    pub fn library_path_variable(self) -> &'static str {
        match self {
            Os::Linux | Os::Wasi => "LD_LIBRARY_PATH",
            Os::Macos => "DYLD_LIBRARY_PATH",
            Os::Windows => "PATH",
        }
    }
}

impl FromStr for Os {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "linux" => Ok(Os::Linux),
            "windows" | "win32" => Ok(Os::Windows),
            "macos" | "darwin" => Ok(Os::Macos),
            "wasi" | "wasip1" => Ok(Os::Wasi),
            other => Err(PlatformError::UnknownField {
                field: "os",
                value: other.to_string(),
            }),
        }
    }
}

/// Application binary interface / C runtime flavor.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Abi {
    Gnu,
    Musl,
    Msvc,
    Gnueabihf,
    /// No ABI component in the triple (e.g. `aarch64-apple-darwin`).
    #[default]
    None,
}

impl Abi {
    /// ABI name, or `None` when the triple carries no ABI field.
    pub fn as_str(self) -> Option<&'static str> {
        match self {
            Abi::Gnu => Some("gnu"),
            Abi::Musl => Some("musl"),
            Abi::Msvc => Some("msvc"),
            Abi::Gnueabihf => Some("gnueabihf"),
            Abi::None => None,
        }
    }
}

impl FromStr for Abi {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "gnu" => Ok(Abi::Gnu),
            "musl" => Ok(Abi::Musl),
            "msvc" => Ok(Abi::Msvc),
            "gnueabihf" => Ok(Abi::Gnueabihf),
            "" | "none" => Ok(Abi::None),
            other => Err(PlatformError::UnknownField {
                field: "abi",
                value: other.to_string(),
            }),
        }
    }
}

/// An (architecture, OS, ABI) triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlatformDescriptor {
    #[serde(alias = "architecture")]
    pub arch: Arch,
    pub os: Os,
    #[serde(default)]
    pub abi: Abi,
}

impl PlatformDescriptor {
    pub const fn new(arch: Arch, os: Os, abi: Abi) -> Self {
        Self { arch, os, abi }
    }

    /// Generic 64-bit x86 Linux with glibc.
    pub const fn linux_x86_64() -> Self {
        Self::new(Arch::X86_64, Os::Linux, Abi::Gnu)
    }

    /// 64-bit Windows using the MinGW-w64 runtime.
    pub const fn windows_gnu_x86_64() -> Self {
        Self::new(Arch::X86_64, Os::Windows, Abi::Gnu)
    }

    /// Detect the platform this binary was compiled for.
    pub fn host() -> Result<Self> {
        let arch = std::env::consts::ARCH;
        let os = std::env::consts::OS;
        let unsupported = || PlatformError::UnsupportedHost {
            arch: arch.to_string(),
            os: os.to_string(),
        };

        let arch: Arch = arch.parse().map_err(|_| unsupported())?;
        let os: Os = os.parse().map_err(|_| unsupported())?;
        let abi = if cfg!(target_env = "musl") {
            Abi::Musl
        } else if cfg!(target_env = "msvc") {
            Abi::Msvc
        } else if os == Os::Macos {
            Abi::None
        } else if arch == Arch::Armv7 {
            Abi::Gnueabihf
        } else {
            Abi::Gnu
        };
        Ok(Self { arch, os, abi })
    }

    /// True when `other` differs from `self` in any field.
    pub fn is_cross(&self, other: &PlatformDescriptor) -> bool {
        self != other
    }

    /// Render the `arch-vendor-os-abi` target triple.
    pub fn target_triple(&self) -> String {
        let mut parts: Vec<&str> = vec![self.arch.as_str()];
        if let Some(vendor) = self.os.vendor() {
            parts.push(vendor);
        }
        parts.push(match self.os {
            Os::Macos => "darwin",
            other => other.as_str(),
        });
        if let Some(abi) = self.abi.as_str() {
            parts.push(abi);
        }
        parts.join("-")
    }

    /// Render the GNU configuration triple a cross suite is published under.
    pub fn toolchain_triple(&self) -> String {
        let arch = self.arch.gnu_name();
        match (self.os, self.abi) {
            (Os::Windows, Abi::Gnu) => format!("{arch}-w64-mingw32"),
            (Os::Windows, _) => self.target_triple(),
            (Os::Macos, _) => format!("{arch}-apple-darwin"),
            (Os::Wasi, _) => format!("{arch}-wasi"),
            (Os::Linux, abi) => match abi.as_str() {
                Some(abi) => format!("{arch}-linux-{abi}"),
                None => format!("{arch}-linux"),
            },
        }
    }
}

impl fmt::Display for PlatformDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.target_triple())
    }
}

impl FromStr for PlatformDescriptor {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self> {
        crate::parse::parse_triple(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_gnu_triples() {
        let p = PlatformDescriptor::windows_gnu_x86_64();
        assert_eq!(p.target_triple(), "x86_64-pc-windows-gnu");
        assert_eq!(p.toolchain_triple(), "x86_64-w64-mingw32");
    }

    #[test]
    fn linux_triples() {
        let p = PlatformDescriptor::linux_x86_64();
        assert_eq!(p.target_triple(), "x86_64-unknown-linux-gnu");
        assert_eq!(p.toolchain_triple(), "x86_64-linux-gnu");

        let arm = PlatformDescriptor::new(Arch::Armv7, Os::Linux, Abi::Gnueabihf);
        assert_eq!(arm.target_triple(), "armv7-unknown-linux-gnueabihf");
        assert_eq!(arm.toolchain_triple(), "arm-linux-gnueabihf");
    }

    #[test]
    fn darwin_and_wasi_triples() {
        let mac = PlatformDescriptor::new(Arch::Aarch64, Os::Macos, Abi::None);
        assert_eq!(mac.target_triple(), "aarch64-apple-darwin");
        assert_eq!(mac.toolchain_triple(), "aarch64-apple-darwin");

        let wasi = PlatformDescriptor::new(Arch::Wasm32, Os::Wasi, Abi::None);
        assert_eq!(wasi.target_triple(), "wasm32-wasi");
    }

    #[test]
    fn cross_is_structural() {
        let host = PlatformDescriptor::linux_x86_64();
        assert!(!host.is_cross(&PlatformDescriptor::linux_x86_64()));
        assert!(host.is_cross(&PlatformDescriptor::windows_gnu_x86_64()));
        let musl = PlatformDescriptor::new(Arch::X86_64, Os::Linux, Abi::Musl);
        assert!(host.is_cross(&musl));
    }

    #[test]
    fn host_detection_round_trips() {
        let host = PlatformDescriptor::host().unwrap();
        let reparsed: PlatformDescriptor = host.target_triple().parse().unwrap();
        assert_eq!(host, reparsed);
    }

    #[test]
    fn path_conventions() {
        assert_eq!(Os::Windows.path_list_separator(), ';');
        assert_eq!(Os::Linux.path_list_separator(), ':');
        assert_eq!(Os::Macos.library_path_variable(), "DYLD_LIBRARY_PATH");
    }
}
