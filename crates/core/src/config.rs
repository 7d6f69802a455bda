//! Configuration for the scaffold pipeline
//!
//! An optional `skaff.yml` in the invocation directory overrides the built-in
//! template and registry settings. Every field has a default, so the tool
//! works with no configuration at all.

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::types::SkaffResult;

pub const CONFIG_FILE_NAME: &str = "skaff.yml";

/// An install command, either a single string split on whitespace or an
/// explicit argument array. Neither form passes through a shell.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum InstallCommand {
    Single(String),
    Multiple(Vec<String>),
}

impl InstallCommand {
    /// The command as an argument vector (program first).
    pub fn argv(&self) -> Vec<String> {
        match self {
            InstallCommand::Single(line) => {
                line.split_whitespace().map(str::to_string).collect()
            }
            InstallCommand::Multiple(argv) => argv.clone(),
        }
    }
}

/// Whether the registry availability check gates cloning or merely warns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RegistryPolicy {
    /// Skip the check entirely.
    Off,
    /// Check, log a warning when the name is taken, continue.
    Warn,
    /// Check, and require an interactive confirmation when the name is taken.
    Gate,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TemplateConfig {
    /// Git URL of the template repository to clone.
    #[serde(default = "default_repository")]
    pub repository: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    /// `--depth` passed to git clone.
    #[serde(default = "default_depth")]
    pub depth: u32,
    /// Token rewritten to the new project name across the cloned tree.
    #[serde(default = "default_library_placeholder")]
    pub library_placeholder: String,
    /// Token rewritten to `organizationReplacement` across the cloned tree.
    #[serde(default = "default_organization_placeholder")]
    pub organization_placeholder: String,
    #[serde(default = "default_organization_replacement")]
    pub organization_replacement: String,
    /// Dependency install command run inside the cloned project.
    #[serde(default = "default_install")]
    pub install: InstallCommand,
    /// Directory whose `*.sh` files are marked user-executable after cloning.
    #[serde(default = "default_scripts_dir")]
    pub scripts_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegistryConfig {
    #[serde(default = "default_policy")]
    pub policy: RegistryPolicy,
    /// Base URL of a crates.io-compatible registry API.
    #[serde(default = "default_registry_url")]
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SkaffConfig {
    #[serde(default)]
    pub template: TemplateConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
}

fn default_repository() -> String {
    "https://github.com/skaff-dev/library-template.git".to_string()
}

fn default_branch() -> String {
    "master".to_string()
}

fn default_depth() -> u32 {
    3
}

fn default_library_placeholder() -> String {
    "library-template".to_string()
}

fn default_organization_placeholder() -> String {
    "skaff-dev".to_string()
}

fn default_organization_replacement() -> String {
    "your-org".to_string()
}

fn default_install() -> InstallCommand {
    InstallCommand::Single("npm install --silent".to_string())
}

fn default_scripts_dir() -> String {
    "scripts".to_string()
}

fn default_policy() -> RegistryPolicy {
    RegistryPolicy::Warn
}

fn default_registry_url() -> String {
    "https://crates.io".to_string()
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            repository: default_repository(),
            branch: default_branch(),
            depth: default_depth(),
            library_placeholder: default_library_placeholder(),
            organization_placeholder: default_organization_placeholder(),
            organization_replacement: default_organization_replacement(),
            install: default_install(),
            scripts_dir: default_scripts_dir(),
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            policy: default_policy(),
            url: default_registry_url(),
        }
    }
}

impl Default for SkaffConfig {
    fn default() -> Self {
        Self {
            template: TemplateConfig::default(),
            registry: RegistryConfig::default(),
        }
    }
}

pub fn parse_config(yaml_str: &str) -> SkaffResult<SkaffConfig> {
    let config: SkaffConfig = serde_yaml::from_str(yaml_str)?;
    Ok(config)
}

/// Load `skaff.yml` from the given directory, falling back to defaults when
/// the file does not exist.
pub fn load_config(dir: &Path) -> SkaffResult<SkaffConfig> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(SkaffConfig::default());
    }
    let content = std::fs::read_to_string(&path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_mapping_yields_defaults() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config.registry.policy, RegistryPolicy::Warn);
        assert_eq!(config.registry.url, "https://crates.io");
        assert_eq!(config.template.branch, "master");
        assert_eq!(config.template.depth, 3);
        assert_eq!(
            config.template.install.argv(),
            vec!["npm", "install", "--silent"]
        );
    }

    #[test]
    fn full_config_parses() {
        let yaml = r#"
template:
  repository: https://example.com/tmpl.git
  branch: main
  depth: 1
  libraryPlaceholder: tmpl
  organizationPlaceholder: example
  organizationReplacement: me
  install: [cargo, fetch]
  scriptsDir: bin
registry:
  policy: gate
  url: https://registry.example.com
"#;
        let config = parse_config(yaml).unwrap();
        assert_eq!(config.template.repository, "https://example.com/tmpl.git");
        assert_eq!(config.template.branch, "main");
        assert_eq!(config.template.install.argv(), vec!["cargo", "fetch"]);
        assert_eq!(config.template.scripts_dir, "bin");
        assert_eq!(config.registry.policy, RegistryPolicy::Gate);
    }

    #[test]
    fn unknown_policy_is_rejected() {
        assert!(parse_config("registry:\n  policy: maybe\n").is_err());
    }

    #[test]
    fn unknown_top_level_key_is_rejected() {
        assert!(parse_config("templates: {}\n").is_err());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.registry.policy, RegistryPolicy::Warn);
    }

    #[test]
    fn config_file_is_picked_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "registry:\n  policy: \"off\"\n",
        )
        .unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.registry.policy, RegistryPolicy::Off);
    }
}
