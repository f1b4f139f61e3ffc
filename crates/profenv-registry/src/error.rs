//! Database lookup error types.

use std::path::PathBuf;
use std::time::Duration;

/// Errors that can occur while querying a package or toolchain database.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// No package of this name exists for the requested platform.
    #[error("package not found: {name} (for {platform})")]
    PackageNotFound { name: String, platform: String },

    /// A backing store did not answer within its time budget.
    #[error("lookup of {what} timed out after {}ms", after.as_millis())]
    Timeout { what: String, after: Duration },

    /// A cross suite is registered but one of its tools is missing.
    #[error("cross suite '{triple}' is missing its {tool} at {}", path.display())]
    IncompleteSuite {
        triple: String,
        tool: &'static str,
        path: PathBuf,
    },

    /// A database entry exists but cannot be interpreted.
    #[error("invalid database entry {}: {detail}", path.display())]
    InvalidEntry { path: PathBuf, detail: String },

    /// A package name or triple cannot be used as a database key.
    #[error("invalid database key '{key}': {detail}")]
    InvalidKey { key: String, detail: &'static str },

    /// The lookup worker went away without answering.
    #[error("lookup of {what} failed: worker disconnected")]
    Disconnected { what: String },

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for database operations.
pub type Result<T> = std::result::Result<T, LookupError>;
