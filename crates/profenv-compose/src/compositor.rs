//! Profile resolution.

use std::collections::BTreeMap;

use profenv_platform::PlatformDescriptor;
use profenv_registry::{resolve_dependencies, PackageDatabase, ToolchainDatabase};
use profenv_toolchain::{
    CargoNaming, ComponentRegistry, CrossTargetBinder, ToolPaths, VariableNaming,
};

use crate::descriptor::EnvironmentDescriptor;
use crate::error::{ResolveError, Result};
use crate::profile::{Profile, ProfileSet};

/// Resolves profiles against a component registry and two databases.
///
/// Holds only shared references; a compositor never mutates what it reads,
/// so any number of them may resolve concurrently over the same databases.
pub struct Compositor<'a> {
    registry: &'a ComponentRegistry,
    packages: &'a dyn PackageDatabase,
    toolchains: &'a dyn ToolchainDatabase,
    naming: &'a dyn VariableNaming,
}

impl<'a> Compositor<'a> {
    /// A compositor using the Cargo variable naming convention.
    pub fn new(
        registry: &'a ComponentRegistry,
        packages: &'a dyn PackageDatabase,
        toolchains: &'a dyn ToolchainDatabase,
    ) -> Self {
        Self {
            registry,
            packages,
            toolchains,
            naming: &CargoNaming,
        }
    }

    /// Use `naming` instead of the Cargo convention for cross variables.
    pub fn with_naming(mut self, naming: &'a dyn VariableNaming) -> Self {
        self.naming = naming;
        self
    }

    /// Resolve the profile called `name` from `profiles`.
    pub fn resolve_named(
        &self,
        profiles: &ProfileSet,
        name: &str,
        host: &PlatformDescriptor,
    ) -> Result<EnvironmentDescriptor> {
        let profile = profiles
            .get(name)
            .ok_or_else(|| ResolveError::UnknownProfile {
                name: name.to_string(),
            })?;
        self.resolve_profile(profile, host)
    }

    /// Resolve `profile` on `host` into an environment.
    pub fn resolve_profile(
        &self,
        profile: &Profile,
        host: &PlatformDescriptor,
    ) -> Result<EnvironmentDescriptor> {
        let toolchain = self.registry.combine(&profile.toolchain_components, host)?;

        let mut toolchain_summary = BTreeMap::new();
        toolchain_summary.insert(host.target_triple(), ToolPaths::for_host(&toolchain));

        let mut variables = BTreeMap::new();
        let platform = if profile.target.is_cross_from(host) {
            let target = profile.target.platform_on(host);
            let cross = CrossTargetBinder::new(self.toolchains, self.naming)
                .bind(host, &target, &toolchain)?;
            variables.extend(cross.variables);
            if let Some((triple, tools)) = cross.target {
                toolchain_summary.insert(triple, tools);
            }
            target
        } else {
            *host
        };

        let dependencies = resolve_dependencies(&profile.packages, &platform, self.packages)?;

        for (key, value) in &profile.extra_variables {
            variables.insert(key.clone(), value.clone());
        }

        Ok(EnvironmentDescriptor::new(
            profile.name.clone(),
            *host,
            platform,
            variables,
            dependencies.library_paths,
            dependencies.binary_paths,
            toolchain_summary,
        ))
    }
}
