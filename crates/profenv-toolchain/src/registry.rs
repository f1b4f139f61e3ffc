//! Catalog of named toolchain components.

use std::collections::BTreeMap;

use profenv_platform::PlatformDescriptor;

use crate::component::{ProvidedTools, ResolvedToolchain, ToolchainComponent};
use crate::error::{Result, ToolchainError};

/// Named toolchain components, read-only during a resolution.
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    components: BTreeMap<String, ToolchainComponent>,
}

impl ComponentRegistry {
    /// An empty registry. Use [`ComponentRegistry::builtin`] for the stock set.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with the stock components.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for component in builtin_components() {
            registry.register(component);
        }
        registry
    }

    /// Add or replace a component definition.
    pub fn register(&mut self, component: ToolchainComponent) {
        self.components.insert(component.name.clone(), component);
    }

    /// Look up a component by name.
    pub fn get(&self, name: &str) -> Option<&ToolchainComponent> {
        self.components.get(name)
    }

    /// Registered component names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    /// Combine the named components for `host`.
    ///
    /// Every name is checked before anything is folded. Components that do
    /// not apply to `host` are skipped. The result must carry a compiler.
    pub fn combine<S: AsRef<str>>(
        &self,
        names: &[S],
        host: &PlatformDescriptor,
    ) -> Result<ResolvedToolchain> {
        let components = names
            .iter()
            .map(|name| {
                self.get(name.as_ref())
                    .ok_or_else(|| ToolchainError::UnknownComponent {
                        name: name.as_ref().to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut tools = ProvidedTools::default();
        let mut applied = Vec::new();
        let mut skipped = Vec::new();
        for component in components {
            if component.applies_to.includes(host) {
                tools.merge(&component.tools);
                applied.push(component.name.clone());
            } else {
                skipped.push(component.name.clone());
            }
        }

        let compiler = tools.compiler.ok_or_else(|| ToolchainError::IncompleteToolchain {
            components: names.iter().map(|n| n.as_ref().to_string()).collect(),
        })?;

        Ok(ResolvedToolchain {
            compiler,
            archiver: tools.archiver,
            linker: tools.linker,
            std_support: tools.std_support,
            applied,
            skipped,
        })
    }
}

fn builtin_components() -> Vec<ToolchainComponent> {
    let tools = |compiler: Option<&str>, archiver: Option<&str>, std: &[&str]| ProvidedTools {
        compiler: compiler.map(String::from),
        archiver: archiver.map(String::from),
        linker: None,
        std_support: std.iter().map(|s| s.to_string()).collect(),
    };

    vec![
        ToolchainComponent::new("rust-base", tools(Some("rustc"), None, &[])),
        ToolchainComponent::new("gcc-base", tools(Some("gcc"), Some("ar"), &[])),
        ToolchainComponent::new(
            "clang-base",
            ProvidedTools {
                linker: Some("ld.lld".into()),
                ..tools(Some("clang"), Some("llvm-ar"), &[])
            },
        ),
        ToolchainComponent::new(
            "windows-gnu-std",
            tools(None, None, &["x86_64-pc-windows-gnu", "i686-pc-windows-gnu"]),
        ),
        ToolchainComponent::new(
            "aarch64-linux-std",
            tools(None, None, &["aarch64-unknown-linux-gnu", "aarch64-unknown-linux-musl"]),
        ),
        ToolchainComponent::new("wasm32-std", tools(None, None, &["wasm32-wasi"])),
    ]
}
