//! Error types for platform operations.

use std::path::PathBuf;

/// Errors that can occur while describing or parsing platforms.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// A triple could not be mapped onto an (arch, os, abi) descriptor.
    #[error("invalid target triple '{triple}': {detail}")]
    InvalidTriple {
        /// The offending triple.
        triple: String,
        /// What was wrong with it.
        detail: String,
    },

    /// An architecture, OS, or ABI name is not recognized.
    #[error("unknown {field} '{value}'")]
    UnknownField {
        /// Which descriptor field ("architecture", "os", "abi").
        field: &'static str,
        /// The unrecognized value.
        value: String,
    },

    /// The running host is not one of the supported platforms.
    #[error("unsupported host platform: {arch}-{os}")]
    UnsupportedHost { arch: String, os: String },

    /// TOML deserialization error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// I/O error reading platform files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Platform file not found.
    #[error("platform file not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },
}

/// Result type for platform operations.
pub type Result<T> = std::result::Result<T, PlatformError>;
