//! Profile definitions.
//!
//! In `profenv.toml` a profile looks like:
//! ```toml
//! [profiles.win]
//! components = ["rust-base", "windows-gnu-std"]
//! target = "x86_64-pc-windows-gnu"     # or "host", or { arch, os, abi }
//! packages = ["pthreads"]
//!
//! [profiles.win.env]
//! RUSTFLAGS = "-C target-feature=+crt-static"
//! ```

use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use profenv_platform::PlatformDescriptor;
use profenv_registry::PackageRef;
use serde::{Deserialize, Serialize};

/// Which platform a profile builds for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TargetRepr", into = "TargetRepr")]
pub enum TargetSpec {
    /// Whatever the resolving host is; no cross binding is performed.
    #[default]
    Host,
    Platform(PlatformDescriptor),
}

impl TargetSpec {
    /// The platform to build for, given the resolving host.
    pub fn platform_on(&self, host: &PlatformDescriptor) -> PlatformDescriptor {
        match self {
            TargetSpec::Host => *host,
            TargetSpec::Platform(p) => *p,
        }
    }

    /// Whether resolving on `host` requires cross binding.
    pub fn is_cross_from(&self, host: &PlatformDescriptor) -> bool {
        match self {
            TargetSpec::Host => false,
            TargetSpec::Platform(p) => p.is_cross(host),
        }
    }
}

impl fmt::Display for TargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetSpec::Host => f.write_str("host"),
            TargetSpec::Platform(p) => write!(f, "{p}"),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum TargetRepr {
    Name(String),
    Table(PlatformDescriptor),
}

impl TryFrom<TargetRepr> for TargetSpec {
    type Error = String;

    fn try_from(repr: TargetRepr) -> Result<Self, Self::Error> {
        match repr {
            TargetRepr::Name(name) if name == "host" => Ok(TargetSpec::Host),
            TargetRepr::Name(triple) => triple
                .parse()
                .map(TargetSpec::Platform)
                .map_err(|e: profenv_platform::PlatformError| e.to_string()),
            TargetRepr::Table(p) => Ok(TargetSpec::Platform(p)),
        }
    }
}

impl From<TargetSpec> for TargetRepr {
    fn from(spec: TargetSpec) -> Self {
        TargetRepr::Name(spec.to_string())
    }
}

/// A named, declarative environment definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    /// Profile name; filled from the table key when loaded from a manifest.
    #[serde(default, skip_serializing)]
    pub name: String,
    /// Toolchain components, folded in this order.
    #[serde(default, rename = "components")]
    pub toolchain_components: Vec<String>,
    #[serde(default)]
    pub target: TargetSpec,
    /// Packages in precedence order.
    #[serde(default)]
    pub packages: Vec<PackageRef>,
    /// Variables that override anything derived.
    #[serde(default, rename = "env")]
    pub extra_variables: BTreeMap<String, String>,
}

impl Profile {
    /// A host profile with no components, packages, or variables.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the toolchain components, in application order.
    pub fn components<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.toolchain_components = names.into_iter().map(Into::into).collect();
        self
    }

    /// Target `target` instead of the host.
    pub fn target(mut self, target: PlatformDescriptor) -> Self {
        self.target = TargetSpec::Platform(target);
        self
    }

    /// Set the packages, in resolution order.
    pub fn packages<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.packages = names.into_iter().map(PackageRef::new).collect();
        self
    }

    /// Add an explicit variable. Explicit variables override bound ones.
    pub fn var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_variables.insert(key.into(), value.into());
        self
    }
}

/// Profiles by name, in definition order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "IndexMap<String, Profile>")]
pub struct ProfileSet {
    profiles: IndexMap<String, Profile>,
}

impl ProfileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a profile, replacing any profile of the same name.
    pub fn insert(&mut self, profile: Profile) {
        self.profiles.insert(profile.name.clone(), profile);
    }

    /// Look up a profile by name.
    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    /// Profile names in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.values()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl From<IndexMap<String, Profile>> for ProfileSet {
    fn from(map: IndexMap<String, Profile>) -> Self {
        let profiles = map
            .into_iter()
            .map(|(name, mut profile)| {
                profile.name.clone_from(&name);
                (name, profile)
            })
            .collect();
        Self { profiles }
    }
}
