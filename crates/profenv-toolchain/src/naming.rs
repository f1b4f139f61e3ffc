//! Variable naming conventions for cross bindings.
//!
//! Build orchestrators look up per-target tools under different variable
//! shapes. A convention maps (tool role, target triple) to a variable name;
//! any `Fn(ToolRole, &str) -> String` closure is a convention too.

use std::fmt;

use serde::Serialize;

/// The tool a binding refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolRole {
    Compiler,
    Archiver,
    Linker,
}

impl ToolRole {
    pub const ALL: [ToolRole; 3] = [ToolRole::Compiler, ToolRole::Archiver, ToolRole::Linker];

    /// Lowercase role name used in messages.
    pub fn as_str(self) -> &'static str {
        match self {
            ToolRole::Compiler => "compiler",
            ToolRole::Archiver => "archiver",
            ToolRole::Linker => "linker",
        }
    }
}

impl fmt::Display for ToolRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a tool role and target triple to an environment variable name.
pub trait VariableNaming {
    fn variable_name(&self, role: ToolRole, target_triple: &str) -> String;
}

impl<F> VariableNaming for F
where
    F: Fn(ToolRole, &str) -> String,
{
    fn variable_name(&self, role: ToolRole, target_triple: &str) -> String {
        self(role, target_triple)
    }
}

/// `x86_64-pc-windows-gnu` → `x86_64_pc_windows_gnu`.
fn underscored(target_triple: &str) -> String {
    target_triple.replace('-', "_")
}

/// The names the `cc` crate and Cargo read:
/// `CC_<T>`, `AR_<T>`, `CARGO_TARGET_<T_UPPER>_LINKER`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CargoNaming;

impl VariableNaming for CargoNaming {
    fn variable_name(&self, role: ToolRole, target_triple: &str) -> String {
        let t = underscored(target_triple);
        match role {
            ToolRole::Compiler => format!("CC_{t}"),
            ToolRole::Archiver => format!("AR_{t}"),
            ToolRole::Linker => format!("CARGO_TARGET_{}_LINKER", t.to_uppercase()),
        }
    }
}

/// Orchestrator-neutral names: `CC_<T>`, `AR_<T>`, `LD_<T>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericNaming;

impl VariableNaming for GenericNaming {
    fn variable_name(&self, role: ToolRole, target_triple: &str) -> String {
        let t = underscored(target_triple);
        match role {
            ToolRole::Compiler => format!("CC_{t}"),
            ToolRole::Archiver => format!("AR_{t}"),
            ToolRole::Linker => format!("LD_{t}"),
        }
    }
}

/// Names accepted by [`convention`].
pub const CONVENTIONS: [&str; 2] = ["cargo", "generic"];

/// Look up a built-in convention by name.
pub fn convention(name: &str) -> Option<Box<dyn VariableNaming + Send + Sync>> {
    match name {
        "cargo" => Some(Box::new(CargoNaming)),
        "generic" => Some(Box::new(GenericNaming)),
        _ => None,
    }
}
