//! Toolchain composition and cross-target binding for profenv.
//!
//! - [`ComponentRegistry`] combines named toolchain fragments into one
//!   [`ResolvedToolchain`] using a fixed per-field merge table.
//! - [`CrossTargetBinder`] picks the cross compiler suite for a target
//!   platform and names the variables a build orchestrator reads.
//! - [`VariableNaming`] is the pluggable rule that produces those names.

pub mod binder;
pub mod component;
pub mod error;
pub mod naming;
pub mod registry;

pub use binder::{CrossBinding, CrossTargetBinder, ResolvedBinding, ToolPaths};
pub use component::{AppliesTo, MergeRule, ProvidedTools, ResolvedToolchain, ToolchainComponent};
pub use error::{Result, ToolchainError};
pub use naming::{convention, CargoNaming, GenericNaming, ToolRole, VariableNaming, CONVENTIONS};
pub use registry::ComponentRegistry;
