//! Toolchain error types.

use profenv_registry::LookupError;

/// Errors that can occur while composing or binding a toolchain.
#[derive(Debug, thiserror::Error)]
pub enum ToolchainError {
    /// A profile named a component with no registered definition.
    #[error("unknown toolchain component: {name}")]
    UnknownComponent { name: String },

    /// No applicable component supplied a compiler.
    #[error("toolchain from [{}] provides no compiler", components.join(", "))]
    IncompleteToolchain { components: Vec<String> },

    /// No usable cross compiler suite exists for the target.
    #[error("no cross support for '{triple}': {detail}")]
    NoCrossSupport { triple: String, detail: String },

    /// A naming convention produced the same variable for two tools.
    #[error("variable '{variable}' would be bound to both the {first} and the {second}")]
    VariableNameCollision {
        variable: String,
        first: &'static str,
        second: &'static str,
    },

    /// The toolchain database could not answer.
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

/// Result type alias for toolchain operations.
pub type Result<T> = std::result::Result<T, ToolchainError>;
