//! Profile composition for profenv.
//!
//! A [`Profile`] names toolchain components, a target platform, packages,
//! and extra variables. The [`Compositor`] resolves it against a component
//! registry and the injected databases into an immutable
//! [`EnvironmentDescriptor`], in a fixed order:
//!
//! 1. combine toolchain components for the host
//! 2. bind cross tools, only when the target differs from the host
//! 3. resolve packages for the effective platform
//! 4. overlay explicit variables on derived ones
//!
//! Any failure aborts the whole resolution.

pub mod compositor;
pub mod descriptor;
pub mod error;
pub mod fingerprint;
pub mod profile;

pub use compositor::Compositor;
pub use descriptor::EnvironmentDescriptor;
pub use error::{ErrorKind, ResolveError, Result};
pub use fingerprint::Fingerprint;
pub use profile::{Profile, ProfileSet, TargetSpec};
