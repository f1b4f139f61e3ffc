//! Package and cross-toolchain database access for profenv.
//!
//! The resolver never owns its data. Concrete binaries and library
//! directories come from a package database, and cross compiler suites come
//! from a toolchain database. Both are capability traits so any backing store
//! can be substituted:
//! - [`LocalDatabase`]: a directory tree on disk
//! - [`MemoryDatabase`]: an in-process table, for embedding and tests
//! - [`Bounded`]: wraps either with a per-lookup timeout
//!
//! [`resolve_dependencies`] turns a declared package list into one ordered,
//! duplicate-free library search path.

pub mod database;
pub mod error;
pub mod local;
pub mod memory;
pub mod resolution;
pub mod timeout;

// Re-exports for convenience.
pub use database::{CrossSuite, PackageDatabase, PackageRef, ResolvedPackage, ToolchainDatabase};
pub use error::{LookupError, Result};
pub use local::{LocalDatabase, PackageEntry, SuiteEntry};
pub use memory::MemoryDatabase;
pub use resolution::{resolve_dependencies, DependencySet};
pub use timeout::Bounded;
