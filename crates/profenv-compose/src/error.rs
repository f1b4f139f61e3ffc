//! Resolution error taxonomy.
//!
//! Every failure of a resolution surfaces as one [`ResolveError`] carrying
//! a [`kind`](ResolveError::kind) and, where one exists, the offending
//! component, package, triple, or variable as its
//! [`subject`](ResolveError::subject).

use std::fmt;

use profenv_registry::LookupError;
use profenv_toolchain::ToolchainError;
use serde::Serialize;

/// Machine-readable failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    UnknownProfile,
    UnknownComponent,
    IncompleteToolchain,
    NoCrossSupport,
    PackageNotFound,
    ExternalLookupTimeout,
    VariableNameCollisionUnresolved,
    /// The backing store failed (I/O, malformed entry).
    Database,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A failed resolution. No partial environment accompanies it.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The requested profile is not defined.
    #[error("unknown profile: {name}")]
    UnknownProfile { name: String },

    #[error(transparent)]
    Toolchain(#[from] ToolchainError),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

impl ResolveError {
    /// The category callers branch on.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResolveError::UnknownProfile { .. } => ErrorKind::UnknownProfile,
            ResolveError::Toolchain(e) => match e {
                ToolchainError::UnknownComponent { .. } => ErrorKind::UnknownComponent,
                ToolchainError::IncompleteToolchain { .. } => ErrorKind::IncompleteToolchain,
                ToolchainError::NoCrossSupport { .. } => ErrorKind::NoCrossSupport,
                ToolchainError::VariableNameCollision { .. } => {
                    ErrorKind::VariableNameCollisionUnresolved
                }
                ToolchainError::Lookup(e) => lookup_kind(e),
            },
            ResolveError::Lookup(e) => lookup_kind(e),
        }
    }

    /// The name the failure is about, if it has one.
    pub fn subject(&self) -> Option<&str> {
        match self {
            ResolveError::UnknownProfile { name } => Some(name.as_str()),
            ResolveError::Toolchain(e) => match e {
                ToolchainError::UnknownComponent { name } => Some(name.as_str()),
                ToolchainError::IncompleteToolchain { .. } => None,
                ToolchainError::NoCrossSupport { triple, .. } => Some(triple.as_str()),
                ToolchainError::VariableNameCollision { variable, .. } => Some(variable.as_str()),
                ToolchainError::Lookup(e) => lookup_subject(e),
            },
            ResolveError::Lookup(e) => lookup_subject(e),
        }
    }
}

fn lookup_kind(e: &LookupError) -> ErrorKind {
    match e {
        LookupError::PackageNotFound { .. } => ErrorKind::PackageNotFound,
        LookupError::Timeout { .. } => ErrorKind::ExternalLookupTimeout,
        LookupError::IncompleteSuite { .. } => ErrorKind::NoCrossSupport,
        _ => ErrorKind::Database,
    }
}

fn lookup_subject(e: &LookupError) -> Option<&str> {
    match e {
        LookupError::PackageNotFound { name, .. } => Some(name.as_str()),
        LookupError::Timeout { what, .. } | LookupError::Disconnected { what } => Some(what.as_str()),
        LookupError::IncompleteSuite { triple, .. } => Some(triple.as_str()),
        LookupError::InvalidKey { key, .. } => Some(key.as_str()),
        _ => None,
    }
}

/// Result type alias for resolution.
pub type Result<T> = std::result::Result<T, ResolveError>;
