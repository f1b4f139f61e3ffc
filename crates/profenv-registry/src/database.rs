//! Database capability traits and the values they return.
//!
//! Lookups are expected to be idempotent and deterministic for a given
//! (name, platform) or triple. `Ok(None)` means "no such entry"; errors are
//! reserved for a backing store that could not answer.

use std::fmt;
use std::path::{Path, PathBuf};

use profenv_platform::PlatformDescriptor;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Opaque lookup key into a package database.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageRef {
    pub name: String,
}

impl PackageRef {
    /// Reference a package by name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for PackageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for PackageRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Concrete locations of one package built for one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPackage {
    /// Package name.
    pub name: String,
    /// Directory holding the package's executables, if it ships any.
    pub binary_path: Option<PathBuf>,
    /// Library directories, in the package's preferred search order.
    pub lib_paths: Vec<PathBuf>,
}

/// A cross compiler suite: tools that run on the host and emit code for
/// `triple`. All tools are absolute paths and are expected to live under
/// `root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossSuite {
    /// Toolchain triple the suite is published under.
    pub triple: String,
    /// Installation root shared by every tool of the suite.
    pub root: PathBuf,
    /// C compiler driver.
    pub compiler: PathBuf,
    /// Static archiver.
    pub archiver: PathBuf,
    /// Dedicated linker; `None` means link through the compiler driver.
    pub linker: Option<PathBuf>,
}

impl CrossSuite {
    /// The linker to use: the explicit one, else the compiler driver.
    pub fn linker(&self) -> &Path {
        self.linker.as_deref().unwrap_or(&self.compiler)
    }

    /// Every tool of the suite with its role name.
    pub fn tools(&self) -> [(&'static str, &Path); 3] {
        [
            ("compiler", self.compiler.as_path()),
            ("archiver", self.archiver.as_path()),
            ("linker", self.linker()),
        ]
    }
}

/// Supplies concrete binaries and library directories for packages.
pub trait PackageDatabase {
    /// Look up `name` as built for `platform`.
    fn resolve_package(
        &self,
        name: &str,
        platform: &PlatformDescriptor,
    ) -> Result<Option<ResolvedPackage>>;
}

/// Supplies cross compiler suites keyed by toolchain triple.
pub trait ToolchainDatabase {
    /// Look up the suite that targets `triple` (e.g. `x86_64-w64-mingw32`).
    fn resolve_toolchain(&self, triple: &str) -> Result<Option<CrossSuite>>;
}
