//! In-process database for embedding and tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use profenv_platform::PlatformDescriptor;

use crate::database::{CrossSuite, PackageDatabase, ResolvedPackage, ToolchainDatabase};
use crate::error::Result;

/// A package and toolchain table held in memory.
///
/// Every lookup is counted so callers can assert that a resolution failed
/// before consulting the database.
#[derive(Debug, Default)]
pub struct MemoryDatabase {
    packages: HashMap<(String, Option<PlatformDescriptor>), ResolvedPackage>,
    suites: HashMap<String, CrossSuite>,
    lookups: AtomicUsize,
}

impl MemoryDatabase {
    /// An empty database with a zeroed lookup counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a package. `platform = None` makes it resolve on every
    /// platform that has no specific entry.
    pub fn insert_package(&mut self, platform: Option<PlatformDescriptor>, package: ResolvedPackage) {
        self.packages
            .insert((package.name.clone(), platform), package);
    }

    /// Builder form of [`insert_package`](Self::insert_package).
    pub fn with_package(mut self, platform: Option<PlatformDescriptor>, package: ResolvedPackage) -> Self {
        self.insert_package(platform, package);
        self
    }

    /// Register a cross suite under its toolchain triple.
    pub fn insert_suite(&mut self, suite: CrossSuite) {
        self.suites.insert(suite.triple.clone(), suite);
    }

    /// Builder form of [`insert_suite`](Self::insert_suite).
    pub fn with_suite(mut self, suite: CrossSuite) -> Self {
        self.insert_suite(suite);
        self
    }

    /// Number of package and toolchain lookups served so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }
}

impl PackageDatabase for MemoryDatabase {
    fn resolve_package(
        &self,
        name: &str,
        platform: &PlatformDescriptor,
    ) -> Result<Option<ResolvedPackage>> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        let specific = self.packages.get(&(name.to_string(), Some(*platform)));
        let fallback = || self.packages.get(&(name.to_string(), None));
        Ok(specific.or_else(fallback).cloned())
    }
}

impl ToolchainDatabase for MemoryDatabase {
    fn resolve_toolchain(&self, triple: &str) -> Result<Option<CrossSuite>> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        Ok(self.suites.get(triple).cloned())
    }
}
