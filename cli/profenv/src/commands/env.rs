//! `profenv env`: launch variables for a profile.
//!
//! `eval "$(profenv env win)"` sets up the current shell.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::manifest::ProfenvManifest;

pub fn run(
    manifest: &ProfenvManifest,
    project_dir: &Path,
    profile: &str,
    format: Option<&str>,
) -> Result<()> {
    let environment = super::resolve_environment(manifest, project_dir, profile)?;
    let variables = environment.launch_variables(|name| std::env::var(name).ok());
    match format.unwrap_or("shell") {
        "shell" => print!("{}", render_shell(&variables)?),
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&variables).context("serializing variables")?
        ),
        other => bail!("unknown format '{other}' (expected shell or json)"),
    }
    Ok(())
}

/// POSIX `export` lines, single-quoted.
///
/// Values are quoted; names cannot be, so any name that is not a plain
/// shell identifier is refused.
pub(crate) fn render_shell(variables: &BTreeMap<String, String>) -> Result<String> {
    let mut out = String::new();
    for (key, value) in variables {
        if !is_shell_name(key) {
            bail!("variable name '{key}' is not a valid shell identifier");
        }
        out.push_str(&format!("export {key}='{}'\n", value.replace('\'', r"'\''")));
    }
    Ok(out)
}

/// `[A-Za-z_][A-Za-z0-9_]*`
fn is_shell_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_quoting() {
        let vars: BTreeMap<String, String> = [
            ("CC_x86_64_pc_windows_gnu", "/opt/mingw/bin/gcc"),
            ("RUSTFLAGS", "-C link-arg='-s'"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        assert_eq!(
            render_shell(&vars).unwrap(),
            "export CC_x86_64_pc_windows_gnu='/opt/mingw/bin/gcc'\n\
             export RUSTFLAGS='-C link-arg='\\''-s'\\'''\n"
        );
    }

    #[test]
    fn empty_environment_renders_nothing() {
        assert_eq!(render_shell(&BTreeMap::new()).unwrap(), "");
    }

    #[test]
    fn names_that_would_run_commands_are_refused() {
        let vars: BTreeMap<String, String> =
            [("X; touch /tmp/profenv_pwned; Y".to_string(), "v".to_string())].into();
        let err = render_shell(&vars).unwrap_err();
        assert!(err.to_string().contains("not a valid shell identifier"));
    }

    #[test]
    fn shell_names() {
        assert!(is_shell_name("PATH"));
        assert!(is_shell_name("_x1"));
        assert!(is_shell_name("CC_x86_64_pc_windows_gnu"));
        assert!(!is_shell_name(""));
        assert!(!is_shell_name("1X"));
        assert!(!is_shell_name("A-B"));
        assert!(!is_shell_name("A B"));
        assert!(!is_shell_name("$(id)"));
    }
}
