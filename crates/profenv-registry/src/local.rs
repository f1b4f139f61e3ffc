//! Filesystem-backed package and toolchain database.
//!
//! Layout:
//! ```text
//! <root>/
//!   packages/
//!     <name>/
//!       <target-triple>/package.toml  : platform-specific build
//!       any/package.toml              : platform-independent fallback
//!   toolchains/
//!     <toolchain-triple>/suite.toml   : cross compiler suite
//! ```
//!
//! `package.toml`:
//! ```toml
//! bin = "bin"
//! libs = ["lib", "lib64"]
//! ```
//!
//! `suite.toml` (tool paths are relative to `root`, which defaults to the
//! directory holding `suite.toml`):
//! ```toml
//! root = "/opt/mingw-w64"
//! compiler = "bin/x86_64-w64-mingw32-gcc"
//! archiver = "bin/x86_64-w64-mingw32-ar"
//! linker = "bin/x86_64-w64-mingw32-ld"   # optional
//! ```

use std::path::{Path, PathBuf};

use profenv_platform::PlatformDescriptor;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::database::{CrossSuite, PackageDatabase, ResolvedPackage, ToolchainDatabase};
use crate::error::{LookupError, Result};

const PLATFORM_INDEPENDENT: &str = "any";

/// On-disk form of a package entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageEntry {
    /// Executable directory, relative to the entry directory.
    #[serde(default)]
    pub bin: Option<String>,
    /// Library directories, relative to the entry directory.
    #[serde(default)]
    pub libs: Vec<String>,
}

/// On-disk form of a cross suite entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuiteEntry {
    /// Installation root; relative roots resolve against the entry directory.
    #[serde(default)]
    pub root: Option<PathBuf>,
    pub compiler: String,
    pub archiver: String,
    #[serde(default)]
    pub linker: Option<String>,
}

/// A database rooted at a directory on disk.
#[derive(Debug, Clone)]
pub struct LocalDatabase {
    root: PathBuf,
}

impl LocalDatabase {
    /// Create a database rooted at the given directory.
    pub fn new(root: PathBuf) -> Self {
        LocalDatabase { root }
    }

    /// Get the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn package_dir(&self, name: &str, key: &str) -> Result<PathBuf> {
        check_key(name)?;
        Ok(self.root.join("packages").join(name).join(key))
    }

    fn suite_dir(&self, triple: &str) -> Result<PathBuf> {
        check_key(triple)?;
        Ok(self.root.join("toolchains").join(triple))
    }

    /// Write a package entry. `platform = None` registers the
    /// platform-independent fallback.
    pub fn add_package(
        &self,
        name: &str,
        platform: Option<&PlatformDescriptor>,
        entry: &PackageEntry,
    ) -> Result<PathBuf> {
        let key = platform
            .map(|p| p.target_triple())
            .unwrap_or_else(|| PLATFORM_INDEPENDENT.to_string());
        let dir = self.package_dir(name, &key)?;
        std::fs::create_dir_all(&dir)?;
        std::fs::write(dir.join("package.toml"), toml::to_string_pretty(entry)?)?;
        Ok(dir)
    }

    /// Write a cross suite entry for `triple`.
    pub fn add_suite(&self, triple: &str, entry: &SuiteEntry) -> Result<PathBuf> {
        let dir = self.suite_dir(triple)?;
        std::fs::create_dir_all(&dir)?;
        std::fs::write(dir.join("suite.toml"), toml::to_string_pretty(entry)?)?;
        Ok(dir)
    }

    /// Names of every package in the database, sorted.
    pub fn package_names(&self) -> Result<Vec<String>> {
        list_dirs(&self.root.join("packages"))
    }

    /// Toolchain triples of every registered cross suite, sorted.
    pub fn suite_triples(&self) -> Result<Vec<String>> {
        list_dirs(&self.root.join("toolchains"))
    }

    fn load_package(&self, name: &str, dir: &Path) -> Result<ResolvedPackage> {
        let path = dir.join("package.toml");
        let content = std::fs::read_to_string(&path)?;
        let entry: PackageEntry = toml::from_str(&content).map_err(|e| LookupError::InvalidEntry {
            path: path.clone(),
            detail: e.to_string(),
        })?;

        Ok(ResolvedPackage {
            name: name.to_string(),
            binary_path: entry.bin.map(|b| dir.join(b)),
            lib_paths: entry.libs.iter().map(|l| dir.join(l)).collect(),
        })
    }
}

impl PackageDatabase for LocalDatabase {
    fn resolve_package(
        &self,
        name: &str,
        platform: &PlatformDescriptor,
    ) -> Result<Option<ResolvedPackage>> {
        for key in [platform.target_triple(), PLATFORM_INDEPENDENT.to_string()] {
            let dir = self.package_dir(name, &key)?;
            if dir.join("package.toml").is_file() {
                debug!(package = name, entry = %dir.display(), "resolved package");
                return self.load_package(name, &dir).map(Some);
            }
        }
        debug!(package = name, %platform, "package not in database");
        Ok(None)
    }
}

impl ToolchainDatabase for LocalDatabase {
    fn resolve_toolchain(&self, triple: &str) -> Result<Option<CrossSuite>> {
        let dir = self.suite_dir(triple)?;
        let path = dir.join("suite.toml");
        if !path.is_file() {
            debug!(triple, "no cross suite registered");
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)?;
        let entry: SuiteEntry = toml::from_str(&content).map_err(|e| LookupError::InvalidEntry {
            path: path.clone(),
            detail: e.to_string(),
        })?;

        let root = match entry.root {
            Some(root) if root.is_absolute() => root,
            Some(root) => dir.join(root),
            None => dir.clone(),
        };
        let suite = CrossSuite {
            triple: triple.to_string(),
            compiler: root.join(&entry.compiler),
            archiver: root.join(&entry.archiver),
            linker: entry.linker.as_ref().map(|l| root.join(l)),
            root,
        };

        for (tool, tool_path) in suite.tools() {
            if !tool_path.is_file() {
                return Err(LookupError::IncompleteSuite {
                    triple: triple.to_string(),
                    tool,
                    path: tool_path.to_path_buf(),
                });
            }
        }

        debug!(triple, root = %suite.root.display(), "resolved cross suite");
        Ok(Some(suite))
    }
}

/// Keys name exactly one directory level below `packages/` or `toolchains/`.
fn check_key(key: &str) -> Result<()> {
    let detail = if key.is_empty() {
        "empty"
    } else if key.contains(['/', '\\']) {
        "contains a path separator"
    } else if key == "." || key == ".." {
        "is a relative directory reference"
    } else {
        return Ok(());
    };
    Err(LookupError::InvalidKey {
        key: key.to_string(),
        detail,
    })
}

fn list_dirs(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.path().is_dir() {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"").unwrap();
    }

    fn mingw_entry() -> SuiteEntry {
        SuiteEntry {
            root: None,
            compiler: "bin/x86_64-w64-mingw32-gcc".into(),
            archiver: "bin/x86_64-w64-mingw32-ar".into(),
            linker: None,
        }
    }

    #[test]
    fn add_and_resolve_package() {
        let dir = tempfile::tempdir().unwrap();
        let db = LocalDatabase::new(dir.path().to_path_buf());
        let win = PlatformDescriptor::windows_gnu_x86_64();

        let entry_dir = db
            .add_package(
                "pthreads",
                Some(&win),
                &PackageEntry {
                    bin: None,
                    libs: vec!["lib".into()],
                },
            )
            .unwrap();

        let pkg = db.resolve_package("pthreads", &win).unwrap().unwrap();
        assert_eq!(pkg.name, "pthreads");
        assert_eq!(pkg.lib_paths, vec![entry_dir.join("lib")]);
        assert!(pkg.binary_path.is_none());
    }

    #[test]
    fn platform_specific_entry_wins_over_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let db = LocalDatabase::new(dir.path().to_path_buf());
        let linux = PlatformDescriptor::linux_x86_64();

        db.add_package("zlib", None, &PackageEntry { bin: None, libs: vec!["generic".into()] })
            .unwrap();
        let specific = db
            .add_package("zlib", Some(&linux), &PackageEntry { bin: None, libs: vec!["lib".into()] })
            .unwrap();

        let pkg = db.resolve_package("zlib", &linux).unwrap().unwrap();
        assert_eq!(pkg.lib_paths, vec![specific.join("lib")]);

        let win = PlatformDescriptor::windows_gnu_x86_64();
        let pkg = db.resolve_package("zlib", &win).unwrap().unwrap();
        assert!(pkg.lib_paths[0].ends_with("any/generic"));
    }

    #[test]
    fn missing_package_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let db = LocalDatabase::new(dir.path().to_path_buf());
        let linux = PlatformDescriptor::linux_x86_64();
        assert!(db.resolve_package("nope", &linux).unwrap().is_none());
    }

    #[test]
    fn malformed_package_entry() {
        let dir = tempfile::tempdir().unwrap();
        let db = LocalDatabase::new(dir.path().to_path_buf());
        let path = dir.path().join("packages/bad/any/package.toml");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "libs = 7\n").unwrap();

        let err = db
            .resolve_package("bad", &PlatformDescriptor::linux_x86_64())
            .unwrap_err();
        assert!(matches!(err, LookupError::InvalidEntry { .. }));
    }

    #[test]
    fn resolve_suite_with_default_root() {
        let dir = tempfile::tempdir().unwrap();
        let db = LocalDatabase::new(dir.path().to_path_buf());
        let suite_dir = db.add_suite("x86_64-w64-mingw32", &mingw_entry()).unwrap();
        touch(&suite_dir.join("bin/x86_64-w64-mingw32-gcc"));
        touch(&suite_dir.join("bin/x86_64-w64-mingw32-ar"));

        let suite = db.resolve_toolchain("x86_64-w64-mingw32").unwrap().unwrap();
        assert_eq!(suite.root, suite_dir);
        assert_eq!(suite.linker(), suite.compiler.as_path());
        assert!(suite.archiver.starts_with(&suite.root));
    }

    #[test]
    fn resolve_suite_with_external_root() {
        let dir = tempfile::tempdir().unwrap();
        let install = tempfile::tempdir().unwrap();
        let db = LocalDatabase::new(dir.path().to_path_buf());
        let mut entry = mingw_entry();
        entry.root = Some(install.path().to_path_buf());
        entry.linker = Some("bin/x86_64-w64-mingw32-ld".into());
        db.add_suite("x86_64-w64-mingw32", &entry).unwrap();
        for tool in ["gcc", "ar", "ld"] {
            touch(&install.path().join(format!("bin/x86_64-w64-mingw32-{tool}")));
        }

        let suite = db.resolve_toolchain("x86_64-w64-mingw32").unwrap().unwrap();
        assert_eq!(suite.root, install.path());
        assert!(suite.linker().ends_with("x86_64-w64-mingw32-ld"));
    }

    #[test]
    fn suite_with_missing_tool_is_incomplete() {
        let dir = tempfile::tempdir().unwrap();
        let db = LocalDatabase::new(dir.path().to_path_buf());
        let suite_dir = db.add_suite("x86_64-w64-mingw32", &mingw_entry()).unwrap();
        touch(&suite_dir.join("bin/x86_64-w64-mingw32-gcc"));

        let err = db.resolve_toolchain("x86_64-w64-mingw32").unwrap_err();
        match err {
            LookupError::IncompleteSuite { tool, .. } => assert_eq!(tool, "archiver"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_suite_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let db = LocalDatabase::new(dir.path().to_path_buf());
        assert!(db.resolve_toolchain("riscv64-linux-gnu").unwrap().is_none());
    }

    #[test]
    fn package_names_cannot_leave_the_database() {
        let dir = tempfile::tempdir().unwrap();
        let db = LocalDatabase::new(dir.path().join("db"));
        let linux = PlatformDescriptor::linux_x86_64();

        for name in ["../x", "..", "a/b", "a\\b", ""] {
            let err = db.resolve_package(name, &linux).unwrap_err();
            assert!(matches!(err, LookupError::InvalidKey { .. }), "{name}");
            assert!(db.add_package(name, None, &PackageEntry::default()).is_err());
        }
        assert!(!dir.path().join("x").exists());
        assert!(db.resolve_toolchain("../x").is_err());
    }

    #[test]
    fn listings_are_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let db = LocalDatabase::new(dir.path().to_path_buf());
        assert!(db.package_names().unwrap().is_empty());

        db.add_package("zlib", None, &PackageEntry::default()).unwrap();
        db.add_package("openssl", None, &PackageEntry::default()).unwrap();
        db.add_suite("x86_64-w64-mingw32", &mingw_entry()).unwrap();

        assert_eq!(db.package_names().unwrap(), vec!["openssl", "zlib"]);
        assert_eq!(db.suite_triples().unwrap(), vec!["x86_64-w64-mingw32"]);
    }
}
