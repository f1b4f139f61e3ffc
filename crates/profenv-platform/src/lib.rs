//! Platform descriptors for profenv.
//!
//! A platform is an (architecture, OS, ABI) triple. It renders to two
//! string forms:
//! - **Target triple:** `arch-vendor-os-abi`, the form build orchestrators
//!   key their per-target variables by (e.g. `x86_64-pc-windows-gnu`).
//! - **Toolchain triple:** the GNU configuration name a cross compiler suite
//!   is published under (e.g. `x86_64-w64-mingw32`).

pub mod error;
pub mod parse;
pub mod platform;

pub use error::{PlatformError, Result};
pub use platform::{Abi, Arch, Os, PlatformDescriptor};
