//! Toolchain components and the rules for combining them.
//!
//! A component supplies some of the tool slots of a toolchain. Components
//! are folded left to right; how a later component's slot interacts with
//! the accumulated value is decided per field by [`FIELD_RULES`].

use std::collections::BTreeSet;

use profenv_platform::PlatformDescriptor;
use serde::{Deserialize, Serialize};

/// How a later component's value for a field combines with the fold so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeRule {
    /// A set value replaces the accumulated one; an unset value keeps it.
    LastWins,
    /// Values are unioned into the accumulated set.
    Accumulate,
}

/// One row of the merge table.
pub struct FieldRule {
    pub field: &'static str,
    pub rule: MergeRule,
    apply: fn(&mut ProvidedTools, &ProvidedTools),
}

/// The merge table. Every field of [`ProvidedTools`] has exactly one row.
pub const FIELD_RULES: [FieldRule; 4] = [
    FieldRule {
        field: "compiler",
        rule: MergeRule::LastWins,
        apply: |acc, next| last_wins(&mut acc.compiler, &next.compiler),
    },
    FieldRule {
        field: "archiver",
        rule: MergeRule::LastWins,
        apply: |acc, next| last_wins(&mut acc.archiver, &next.archiver),
    },
    FieldRule {
        field: "linker",
        rule: MergeRule::LastWins,
        apply: |acc, next| last_wins(&mut acc.linker, &next.linker),
    },
    FieldRule {
        field: "std-support",
        rule: MergeRule::Accumulate,
        apply: |acc, next| acc.std_support.extend(next.std_support.iter().cloned()),
    },
];

fn last_wins(acc: &mut Option<String>, next: &Option<String>) {
    if next.is_some() {
        acc.clone_from(next);
    }
}

/// The tool slots a component may fill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProvidedTools {
    /// Compiler driver command or path.
    #[serde(default)]
    pub compiler: Option<String>,
    /// Static archiver command or path.
    #[serde(default)]
    pub archiver: Option<String>,
    /// Linker override; the compiler driver links when unset.
    #[serde(default)]
    pub linker: Option<String>,
    /// Target triples the component ships a standard library for.
    #[serde(default)]
    pub std_support: BTreeSet<String>,
}

impl ProvidedTools {
    /// Overlay `next` onto `self` following [`FIELD_RULES`].
    pub fn merge(&mut self, next: &ProvidedTools) {
        for rule in &FIELD_RULES {
            (rule.apply)(self, next);
        }
    }
}

/// Which host platforms a component applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AppliesToRepr", into = "AppliesToRepr")]
pub enum AppliesTo {
    #[default]
    Any,
    Platforms(BTreeSet<PlatformDescriptor>),
}

impl AppliesTo {
    /// Whether a component with this scope applies on `host`.
    pub fn includes(&self, host: &PlatformDescriptor) -> bool {
        match self {
            AppliesTo::Any => true,
            AppliesTo::Platforms(set) => set.contains(host),
        }
    }
}

/// Serialized form: the string `"any"` or a list of target triples.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum AppliesToRepr {
    Keyword(String),
    Triples(Vec<String>),
}

impl TryFrom<AppliesToRepr> for AppliesTo {
    type Error = String;

    fn try_from(repr: AppliesToRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            AppliesToRepr::Keyword(k) if k == "any" => Ok(AppliesTo::Any),
            AppliesToRepr::Keyword(k) => Err(format!("expected \"any\" or a list of triples, got \"{k}\"")),
            AppliesToRepr::Triples(triples) => triples
                .iter()
                .map(|t| t.parse::<PlatformDescriptor>().map_err(|e| e.to_string()))
                .collect::<std::result::Result<BTreeSet<_>, _>>()
                .map(AppliesTo::Platforms),
        }
    }
}

impl From<AppliesTo> for AppliesToRepr {
    fn from(applies: AppliesTo) -> Self {
        match applies {
            AppliesTo::Any => AppliesToRepr::Keyword("any".into()),
            AppliesTo::Platforms(set) => {
                AppliesToRepr::Triples(set.iter().map(|p| p.target_triple()).collect())
            }
        }
    }
}

/// A named toolchain fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainComponent {
    pub name: String,
    pub applies_to: AppliesTo,
    pub tools: ProvidedTools,
}

impl ToolchainComponent {
    /// A component that applies on every host.
    pub fn new(name: impl Into<String>, tools: ProvidedTools) -> Self {
        Self {
            name: name.into(),
            applies_to: AppliesTo::Any,
            tools,
        }
    }

    /// Restrict the component to the given hosts.
    pub fn only_on(mut self, hosts: impl IntoIterator<Item = PlatformDescriptor>) -> Self {
        self.applies_to = AppliesTo::Platforms(hosts.into_iter().collect());
        self
    }
}

/// The outcome of combining components for one host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedToolchain {
    pub compiler: String,
    pub archiver: Option<String>,
    pub linker: Option<String>,
    pub std_support: BTreeSet<String>,
    /// Components that were folded in, in order.
    pub applied: Vec<String>,
    /// Components skipped because they do not apply to the host.
    pub skipped: Vec<String>,
}

impl ResolvedToolchain {
    /// Whether a standard library for `target_triple` is available.
    pub fn supports_std(&self, target_triple: &str) -> bool {
        self.std_support.contains(target_triple)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tools(compiler: Option<&str>, std: &[&str]) -> ProvidedTools {
        ProvidedTools {
            compiler: compiler.map(String::from),
            std_support: std.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn merge_table_covers_every_field_once() {
        let fields: Vec<_> = FIELD_RULES.iter().map(|r| r.field).collect();
        assert_eq!(fields, vec!["compiler", "archiver", "linker", "std-support"]);
        let accumulating: Vec<_> = FIELD_RULES
            .iter()
            .filter(|r| r.rule == MergeRule::Accumulate)
            .map(|r| r.field)
            .collect();
        assert_eq!(accumulating, vec!["std-support"]);
    }

    #[test]
    fn later_compiler_wins() {
        let mut acc = tools(Some("gcc"), &[]);
        acc.merge(&tools(Some("clang"), &[]));
        assert_eq!(acc.compiler.as_deref(), Some("clang"));
    }

    #[test]
    fn unset_slot_keeps_earlier_value() {
        let mut acc = ProvidedTools {
            compiler: Some("gcc".into()),
            archiver: Some("ar".into()),
            ..Default::default()
        };
        acc.merge(&tools(None, &["x86_64-pc-windows-gnu"]));
        assert_eq!(acc.compiler.as_deref(), Some("gcc"));
        assert_eq!(acc.archiver.as_deref(), Some("ar"));
    }

    #[test]
    fn std_support_accumulates() {
        let mut acc = tools(None, &["t1"]);
        acc.merge(&tools(None, &["t2"]));
        let expected: BTreeSet<String> = ["t1", "t2"].iter().map(|s| s.to_string()).collect();
        assert_eq!(acc.std_support, expected);
    }

    #[test]
    fn applies_to_parses_from_toml() {
        #[derive(Deserialize)]
        struct Doc {
            applies_to: AppliesTo,
        }
        let any: Doc = toml::from_str("applies_to = \"any\"").unwrap();
        assert_eq!(any.applies_to, AppliesTo::Any);

        let list: Doc =
            toml::from_str("applies_to = [\"x86_64-unknown-linux-gnu\"]").unwrap();
        assert!(list.applies_to.includes(&PlatformDescriptor::linux_x86_64()));
        assert!(!list.applies_to.includes(&PlatformDescriptor::windows_gnu_x86_64()));

        assert!(toml::from_str::<Doc>("applies_to = \"sometimes\"").is_err());
        assert!(toml::from_str::<Doc>("applies_to = [\"x86_64-pc-plan9\"]").is_err());
    }

    #[test]
    fn only_on_restricts_hosts() {
        let c = ToolchainComponent::new("xcode", ProvidedTools::default())
            .only_on([PlatformDescriptor::linux_x86_64()]);
        assert!(c.applies_to.includes(&PlatformDescriptor::linux_x86_64()));
        assert!(!c.applies_to.includes(&PlatformDescriptor::windows_gnu_x86_64()));
    }
}
