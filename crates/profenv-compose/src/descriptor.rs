//! The resolved execution environment.

use std::collections::BTreeMap;

use profenv_platform::PlatformDescriptor;
use profenv_toolchain::ToolPaths;
use serde::Serialize;

use crate::fingerprint::Fingerprint;

/// Everything a build session needs, fully resolved.
///
/// Immutable once built: every field is computed by the compositor and only
/// exposed through accessors. Maps are ordered so equal environments
/// serialize identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentDescriptor {
    profile: String,
    host: PlatformDescriptor,
    platform: PlatformDescriptor,
    variables: BTreeMap<String, String>,
    ordered_library_paths: Vec<String>,
    ordered_binary_paths: Vec<String>,
    toolchain_summary: BTreeMap<String, ToolPaths>,
}

impl EnvironmentDescriptor {
    pub(crate) fn new(
        profile: String,
        host: PlatformDescriptor,
        platform: PlatformDescriptor,
        variables: BTreeMap<String, String>,
        ordered_library_paths: Vec<String>,
        ordered_binary_paths: Vec<String>,
        toolchain_summary: BTreeMap<String, ToolPaths>,
    ) -> Self {
        Self {
            profile,
            host,
            platform,
            variables,
            ordered_library_paths,
            ordered_binary_paths,
            toolchain_summary,
        }
    }

    /// Name of the profile this environment was resolved from.
    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// The platform the resolution ran on.
    pub fn host(&self) -> &PlatformDescriptor {
        &self.host
    }

    /// The effective platform: the target when cross, the host otherwise.
    pub fn platform(&self) -> &PlatformDescriptor {
        &self.platform
    }

    /// Whether the effective platform differs from the host.
    pub fn is_cross(&self) -> bool {
        self.host.is_cross(&self.platform)
    }

    /// Derived cross variables overlaid with the profile's explicit ones.
    pub fn variables(&self) -> &BTreeMap<String, String> {
        &self.variables
    }

    /// Value of one variable, if set.
    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    /// Library directories in precedence order, without duplicates.
    pub fn ordered_library_paths(&self) -> &[String] {
        &self.ordered_library_paths
    }

    /// Executable directories in precedence order, without duplicates.
    pub fn ordered_binary_paths(&self) -> &[String] {
        &self.ordered_binary_paths
    }

    /// Tools per resolved platform, keyed by target triple.
    pub fn toolchain_summary(&self) -> &BTreeMap<String, ToolPaths> {
        &self.toolchain_summary
    }

    /// Variables to hand a process launched on the host.
    ///
    /// Binary directories are prepended to `PATH` and library directories
    /// to the host loader's search variable, each ahead of the value
    /// `inherited` reports for that variable. Variables of the environment
    /// itself are applied last and win.
    pub fn launch_variables<F>(&self, inherited: F) -> BTreeMap<String, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let separator = self.host.os.path_list_separator().to_string();
        let library_var = self.host.os.library_path_variable();

        let mut search: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        if !self.ordered_binary_paths.is_empty() {
            search
                .entry("PATH")
                .or_default()
                .extend(self.ordered_binary_paths.iter().map(String::as_str));
        }
        if !self.ordered_library_paths.is_empty() {
            search
                .entry(library_var)
                .or_default()
                .extend(self.ordered_library_paths.iter().map(String::as_str));
        }

        let mut launch: BTreeMap<String, String> = search
            .into_iter()
            .map(|(var, dirs)| {
                let mut value = dirs.join(&separator);
                if let Some(existing) = inherited(var).filter(|v| !v.is_empty()) {
                    value.push_str(&separator);
                    value.push_str(&existing);
                }
                (var.to_string(), value)
            })
            .collect();

        launch.extend(self.variables.iter().map(|(k, v)| (k.clone(), v.clone())));
        launch
    }

    /// Pretty-printed JSON form.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Stable identity of this environment.
    pub fn fingerprint(&self) -> serde_json::Result<Fingerprint> {
        Fingerprint::of(self)
    }
}
