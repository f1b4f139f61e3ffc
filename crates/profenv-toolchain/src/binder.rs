//! Cross-target binding.
//!
//! Given a host and a distinct target, locate the cross compiler suite for
//! the target and produce the variables a build orchestrator needs to find
//! the target's compiler, archiver, and linker. A binding is all-or-nothing:
//! every tool must come from one suite and live under its root, and every
//! variable name must be distinct, or no binding is returned.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use profenv_platform::PlatformDescriptor;
use profenv_registry::{LookupError, ToolchainDatabase};
use serde::Serialize;

use crate::component::ResolvedToolchain;
use crate::error::{Result, ToolchainError};
use crate::naming::{ToolRole, VariableNaming};

/// One tool bound to one variable for one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedBinding {
    pub tool: ToolRole,
    pub target_triple: String,
    pub path: PathBuf,
    pub variable: String,
}

/// The compiler, archiver, and linker used for one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolPaths {
    pub compiler: String,
    pub archiver: String,
    pub linker: String,
    /// Whether the composed toolchain ships a standard library for it.
    pub std_supported: bool,
}

impl ToolPaths {
    /// Tools of the composed base toolchain, used on the host.
    ///
    /// The archiver defaults to `ar` and the linker to the compiler.
    pub fn for_host(toolchain: &ResolvedToolchain) -> Self {
        ToolPaths {
            compiler: toolchain.compiler.clone(),
            archiver: toolchain.archiver.clone().unwrap_or_else(|| "ar".to_string()),
            linker: toolchain
                .linker
                .clone()
                .unwrap_or_else(|| toolchain.compiler.clone()),
            std_supported: true,
        }
    }
}

/// Everything a cross binding contributes to an environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrossBinding {
    pub bindings: Vec<ResolvedBinding>,
    pub variables: BTreeMap<String, String>,
    /// Target triple and tools; `None` when no binding was needed.
    pub target: Option<(String, ToolPaths)>,
}

impl CrossBinding {
    /// True when no tool was bound, i.e. the target is the host.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Binds cross tools using an injected database and naming convention.
pub struct CrossTargetBinder<'a> {
    toolchains: &'a dyn ToolchainDatabase,
    naming: &'a dyn VariableNaming,
}

impl<'a> CrossTargetBinder<'a> {
    /// Create a binder over a toolchain database and naming convention.
    pub fn new(toolchains: &'a dyn ToolchainDatabase, naming: &'a dyn VariableNaming) -> Self {
        Self { toolchains, naming }
    }

    /// Bind the cross tools for `target` as seen from `host`.
    ///
    /// Returns an empty binding when `host == target`.
    pub fn bind(
        &self,
        host: &PlatformDescriptor,
        target: &PlatformDescriptor,
        base: &ResolvedToolchain,
    ) -> Result<CrossBinding> {
        if !host.is_cross(target) {
            return Ok(CrossBinding::default());
        }

        let toolchain_triple = target.toolchain_triple();
        let target_triple = target.target_triple();
        let no_support = |detail: String| ToolchainError::NoCrossSupport {
            triple: toolchain_triple.clone(),
            detail,
        };

        let suite = match self.toolchains.resolve_toolchain(&toolchain_triple) {
            Ok(Some(suite)) => suite,
            Ok(None) => return Err(no_support("no cross suite in the toolchain database".into())),
            Err(LookupError::IncompleteSuite { tool, path, .. }) => {
                return Err(no_support(format!("{tool} missing at {}", path.display())))
            }
            Err(e) => return Err(e.into()),
        };

        for (tool, path) in suite.tools() {
            if !lies_under(path, &suite.root) {
                return Err(no_support(format!(
                    "{tool} {} lies outside suite root {}",
                    path.display(),
                    suite.root.display()
                )));
            }
        }

        let mut bindings: Vec<ResolvedBinding> = Vec::with_capacity(ToolRole::ALL.len());
        for role in ToolRole::ALL {
            let path = match role {
                ToolRole::Compiler => suite.compiler.clone(),
                ToolRole::Archiver => suite.archiver.clone(),
                ToolRole::Linker => suite.linker().to_path_buf(),
            };
            let variable = self.naming.variable_name(role, &target_triple);
            if let Some(earlier) = bindings.iter().find(|b| b.variable == variable) {
                return Err(ToolchainError::VariableNameCollision {
                    variable,
                    first: earlier.tool.as_str(),
                    second: role.as_str(),
                });
            }
            bindings.push(ResolvedBinding {
                tool: role,
                target_triple: target_triple.clone(),
                path,
                variable,
            });
        }

        let variables = bindings
            .iter()
            .map(|b| (b.variable.clone(), b.path.to_string_lossy().into_owned()))
            .collect();

        let tools = ToolPaths {
            compiler: suite.compiler.to_string_lossy().into_owned(),
            archiver: suite.archiver.to_string_lossy().into_owned(),
            linker: suite.linker().to_string_lossy().into_owned(),
            std_supported: base.supports_std(&target_triple),
        };

        Ok(CrossBinding {
            bindings,
            variables,
            target: Some((target_triple, tools)),
        })
    }
}

/// Whether `path` names something inside `root` without leaving it through
/// a `..` component.
fn lies_under(path: &Path, root: &Path) -> bool {
    path.starts_with(root)
        && !path
            .components()
            .any(|c| matches!(c, Component::ParentDir))
}
