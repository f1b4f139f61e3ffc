//! Dependency set resolution.
//!
//! Resolves every declared package for one platform and merges their
//! library directories into a single search path. Order follows the
//! declaration order of the profile, then each package's own order;
//! duplicates keep their first position.

use indexmap::IndexSet;
use profenv_platform::PlatformDescriptor;

use crate::database::{PackageDatabase, PackageRef, ResolvedPackage};
use crate::error::{LookupError, Result};

/// The merged result of resolving a package list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    /// Library search path, earlier entries take precedence.
    pub library_paths: Vec<String>,
    /// Executable directories, same ordering rule.
    pub binary_paths: Vec<String>,
    /// Each package as resolved, in declaration order.
    pub packages: Vec<ResolvedPackage>,
}

/// Resolve `packages` for `platform` against `database`.
///
/// Fails on the first missing package; nothing is retried.
pub fn resolve_dependencies(
    packages: &[PackageRef],
    platform: &PlatformDescriptor,
    database: &dyn PackageDatabase,
) -> Result<DependencySet> {
    let mut library_paths = IndexSet::new();
    let mut binary_paths = IndexSet::new();
    let mut resolved = Vec::with_capacity(packages.len());

    for package in packages {
        let found = database
            .resolve_package(&package.name, platform)?
            .ok_or_else(|| LookupError::PackageNotFound {
                name: package.name.clone(),
                platform: platform.target_triple(),
            })?;

        for lib in &found.lib_paths {
            library_paths.insert(lib.to_string_lossy().into_owned());
        }
        if let Some(bin) = &found.binary_path {
            binary_paths.insert(bin.to_string_lossy().into_owned());
        }
        resolved.push(found);
    }

    Ok(DependencySet {
        library_paths: library_paths.into_iter().collect(),
        binary_paths: binary_paths.into_iter().collect(),
        packages: resolved,
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::memory::MemoryDatabase;

    fn package(name: &str, bin: Option<&str>, libs: &[&str]) -> ResolvedPackage {
        ResolvedPackage {
            name: name.into(),
            binary_path: bin.map(PathBuf::from),
            lib_paths: libs.iter().map(PathBuf::from).collect(),
        }
    }

    fn refs(names: &[&str]) -> Vec<PackageRef> {
        names.iter().map(|n| PackageRef::new(*n)).collect()
    }

    #[test]
    fn concatenates_in_declaration_order() {
        let db = MemoryDatabase::new()
            .with_package(None, package("openssl", Some("/ssl/bin"), &["/ssl/lib", "/ssl/lib64"]))
            .with_package(None, package("zlib", None, &["/zlib/lib"]));
        let linux = PlatformDescriptor::linux_x86_64();

        let set = resolve_dependencies(&refs(&["zlib", "openssl"]), &linux, &db).unwrap();
        assert_eq!(set.library_paths, vec!["/zlib/lib", "/ssl/lib", "/ssl/lib64"]);
        assert_eq!(set.binary_paths, vec!["/ssl/bin"]);
        assert_eq!(set.packages.len(), 2);
        assert_eq!(set.packages[0].name, "zlib");
    }

    #[test]
    fn shared_directories_appear_once() {
        let db = MemoryDatabase::new()
            .with_package(None, package("libfoo", Some("/usr/bin"), &["/usr/lib"]))
            .with_package(None, package("libbar", Some("/usr/bin"), &["/usr/lib", "/opt/bar/lib"]));
        let linux = PlatformDescriptor::linux_x86_64();

        let set = resolve_dependencies(&refs(&["libfoo", "libbar"]), &linux, &db).unwrap();
        assert_eq!(set.library_paths, vec!["/usr/lib", "/opt/bar/lib"]);
        assert_eq!(set.binary_paths, vec!["/usr/bin"]);
    }

    #[test]
    fn repeated_package_is_harmless() {
        let db = MemoryDatabase::new().with_package(None, package("zlib", None, &["/zlib/lib"]));
        let linux = PlatformDescriptor::linux_x86_64();

        let set = resolve_dependencies(&refs(&["zlib", "zlib"]), &linux, &db).unwrap();
        assert_eq!(set.library_paths, vec!["/zlib/lib"]);
    }

    #[test]
    fn missing_package_fails_immediately() {
        let db = MemoryDatabase::new().with_package(None, package("zlib", None, &["/zlib/lib"]));
        let linux = PlatformDescriptor::linux_x86_64();

        let err = resolve_dependencies(&refs(&["ghost", "zlib"]), &linux, &db).unwrap_err();
        match err {
            LookupError::PackageNotFound { name, platform } => {
                assert_eq!(name, "ghost");
                assert_eq!(platform, "x86_64-unknown-linux-gnu");
            }
            other => panic!("unexpected error: {other}"),
        }
        // Only the failing lookup ran.
        assert_eq!(db.lookups(), 1);
    }

    #[test]
    fn resolves_for_the_requested_platform() {
        let win = PlatformDescriptor::windows_gnu_x86_64();
        let db = MemoryDatabase::new()
            .with_package(Some(win), package("pthreads", None, &["/mingw/pthreads/lib"]));

        let set = resolve_dependencies(&refs(&["pthreads"]), &win, &db).unwrap();
        assert_eq!(set.library_paths, vec!["/mingw/pthreads/lib"]);

        let linux = PlatformDescriptor::linux_x86_64();
        assert!(resolve_dependencies(&refs(&["pthreads"]), &linux, &db).is_err());
    }

    #[test]
    fn empty_package_list() {
        let db = MemoryDatabase::new();
        let set = resolve_dependencies(&[], &PlatformDescriptor::linux_x86_64(), &db).unwrap();
        assert_eq!(set, DependencySet::default());
    }
}
