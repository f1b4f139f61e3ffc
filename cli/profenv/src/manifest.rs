//! `profenv.toml` manifest parsing and project configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use profenv_compose::ProfileSet;
use profenv_platform::PlatformDescriptor;
use profenv_registry::{
    Bounded, CrossSuite, LocalDatabase, LookupError, PackageDatabase, ResolvedPackage,
    ToolchainDatabase,
};
use profenv_toolchain::{
    convention, AppliesTo, ComponentRegistry, ProvidedTools, ToolchainComponent, VariableNaming,
    CONVENTIONS,
};
use serde::Deserialize;

pub const MANIFEST_FILE: &str = "profenv.toml";

/// The top-level manifest structure for a profenv project.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfenvManifest {
    pub project: ProjectConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Overrides host detection when set.
    #[serde(default)]
    pub host: Option<PlatformDescriptor>,
    /// Project-local components; a name shared with a built-in replaces it.
    #[serde(default)]
    pub components: BTreeMap<String, ComponentConfig>,
    #[serde(default)]
    pub profiles: ProfileSet,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    pub name: String,
}

/// Database section.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database root, relative to the manifest directory.
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Per-lookup time bound in milliseconds.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Variable naming convention for cross bindings.
    #[serde(default = "default_naming")]
    pub naming: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            timeout_ms: None,
            naming: default_naming(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".profenv/db")
}

fn default_naming() -> String {
    "cargo".to_string()
}

/// A `[components.<name>]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ComponentConfig {
    #[serde(default)]
    pub applies_to: AppliesTo,
    #[serde(flatten)]
    pub tools: ProvidedTools,
}

impl ProfenvManifest {
    /// Search upward from `start_dir` for a `profenv.toml` file, parse and
    /// return it along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(MANIFEST_FILE);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let manifest: ProfenvManifest = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                tracing::debug!(manifest = %candidate.display(), "loaded manifest");
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse a manifest from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing profenv.toml")
    }

    /// Built-in components overlaid with the manifest's own.
    pub fn registry(&self) -> ComponentRegistry {
        let mut registry = ComponentRegistry::builtin();
        for (name, config) in &self.components {
            registry.register(ToolchainComponent {
                name: name.clone(),
                applies_to: config.applies_to.clone(),
                tools: config.tools.clone(),
            });
        }
        registry
    }

    /// The configured host override, or the platform this binary runs on.
    pub fn host(&self) -> Result<PlatformDescriptor> {
        match self.host {
            Some(host) => Ok(host),
            None => PlatformDescriptor::host().context("detecting host platform"),
        }
    }

    /// The configured variable naming convention.
    pub fn naming(&self) -> Result<Box<dyn VariableNaming + Send + Sync>> {
        convention(&self.database.naming).ok_or_else(|| {
            anyhow!(
                "unknown naming convention '{}' (expected one of: {})",
                self.database.naming,
                CONVENTIONS.join(", ")
            )
        })
    }

    /// Absolute database root for a manifest found in `project_dir`.
    pub fn database_root(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.database.root)
    }

    /// Open the configured database.
    pub fn database(&self, project_dir: &Path) -> Database {
        let local = LocalDatabase::new(self.database_root(project_dir));
        match self.database.timeout_ms {
            Some(ms) => Database::Bounded(Bounded::new(local, Duration::from_millis(ms))),
            None => Database::Local(local),
        }
    }

    /// Generate the default template for `profenv init`.
    pub fn template(name: &str) -> String {
        format!(
            r#"[project]
name = "{name}"

[database]
root = ".profenv/db"
naming = "cargo"

[profiles.default]
components = ["rust-base"]
packages = []

# [profiles.win]
# components = ["rust-base", "windows-gnu-std"]
# target = "x86_64-pc-windows-gnu"
# packages = ["pthreads"]
"#
        )
    }
}

/// The project database, optionally time-bounded.
pub enum Database {
    Local(LocalDatabase),
    Bounded(Bounded<LocalDatabase>),
}

impl Database {
    /// The underlying on-disk database.
    pub fn local(&self) -> &LocalDatabase {
        match self {
            Database::Local(db) => db,
            Database::Bounded(db) => db.inner(),
        }
    }
}

impl PackageDatabase for Database {
    fn resolve_package(
        &self,
        name: &str,
        platform: &PlatformDescriptor,
    ) -> Result<Option<ResolvedPackage>, LookupError> {
        match self {
            Database::Local(db) => db.resolve_package(name, platform),
            Database::Bounded(db) => db.resolve_package(name, platform),
        }
    }
}

impl ToolchainDatabase for Database {
    fn resolve_toolchain(&self, triple: &str) -> Result<Option<CrossSuite>, LookupError> {
        match self {
            Database::Local(db) => db.resolve_toolchain(triple),
            Database::Bounded(db) => db.resolve_toolchain(triple),
        }
    }
}
