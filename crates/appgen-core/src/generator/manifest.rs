//! Generator manifest types and parsing

use crate::dependencies::DependencyRegistry;
use crate::error::ConfigError;
use crate::pipeline::prompt::Question;
use semver::Version;
use serde::{Deserialize, Serialize};

/// File name of the per-generator manifest
pub const MANIFEST_FILE: &str = "generator.yaml";

/// File name of the root manifest listing generators
pub const ROOT_MANIFEST_FILE: &str = "generators.yaml";

/// A file from the root generators directory that gets bundled into every generator's
/// common overlay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedFile {
    /// Source path relative to the generators/ directory
    pub source: String,

    /// Destination path inside the common overlay (defaults to source if not specified)
    #[serde(default)]
    pub dest: Option<String>,
}

impl SharedFile {
    pub fn destination(&self) -> &str {
        self.dest.as_deref().unwrap_or(&self.source)
    }
}

/// Root manifest (generators/generators.yaml)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootManifest {
    /// Generator directory names
    pub generators: Vec<String>,

    #[serde(default)]
    pub shared_files: Vec<SharedFile>,
}

/// A choice accepted during the defaults phase, after the CLI-provided slots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultChoice {
    pub slot: String,
    pub key: String,
}

/// Per-generator manifest (generators/<name>/generator.yaml)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorManifest {
    pub name: String,

    pub description: String,

    /// Semver version of the bundle itself
    pub version: String,

    /// Oldest CLI able to scaffold this bundle correctly
    #[serde(default)]
    pub min_cli_version: Option<String>,

    /// Choices applied on every run, in order
    #[serde(default)]
    pub defaults: Vec<DefaultChoice>,

    /// Dependency key -> package specifiers per bucket
    #[serde(default)]
    pub dependencies: DependencyRegistry,

    #[serde(default)]
    pub prompts: Vec<Question>,
}

impl GeneratorManifest {
    /// Warning text when the running CLI is older than `min_cli_version`.
    /// Unparsable versions skip the check.
    pub fn compatibility_warning(&self, cli_version: &str, upgrade_command: &str) -> Option<String> {
        let required = self.min_cli_version.as_deref()?;
        let required_ver = parse_version(required)?;
        let cli_ver = parse_version(cli_version)?;

        if cli_ver < required_ver {
            Some(format!(
                "Generator '{}' requires CLI version {} or newer.\n\
                 You are running version {}.\n\
                 Consider updating: {}",
                self.name, required, cli_version, upgrade_command
            ))
        } else {
            None
        }
    }

    /// Check that every key the manifest can produce exists in its own registry
    pub fn validate(&self) -> Result<(), ConfigError> {
        let unknown = |slot: &str, key: &str| ConfigError::UnknownDependency {
            slot: slot.to_string(),
            key: key.to_string(),
        };

        for default in &self.defaults {
            if !self.dependencies.contains(&default.key) {
                return Err(unknown(&default.slot, &default.key));
            }
        }

        for question in &self.prompts {
            let Some(slot) = question.dependency_slot() else {
                continue;
            };
            for key in question.choice_values() {
                if !self.dependencies.contains(key) {
                    return Err(unknown(slot, key));
                }
            }
        }

        Ok(())
    }
}

fn parse_version(version: &str) -> Option<Version> {
    Version::parse(version.strip_prefix('v').unwrap_or(version)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependencies::Bucket;

    const MANIFEST: &str = r#"
name: webapp
description: Express application
version: 1.2.0
min_cli_version: 0.2.0
defaults:
  - slot: taskModule
    key: grunt
dependencies:
  grunt:
    npmDev: [grunt, grunt-cli]
  less:
    npm: [construx-less]
prompts:
  - name: appDescription
    message: Description
    kind: input
  - name: dependency:cssModule
    message: CSS preprocessor library?
    kind: select
    skip_if_set: true
    choices:
      - label: LESS
        value: less
      - label: None
        value: null
"#;

    fn manifest() -> GeneratorManifest {
        serde_yaml::from_str(MANIFEST).unwrap()
    }

    #[test]
    fn test_parse_manifest() {
        let manifest = manifest();
        assert_eq!(manifest.name, "webapp");
        assert_eq!(
            manifest.defaults,
            vec![DefaultChoice {
                slot: "taskModule".to_string(),
                key: "grunt".to_string(),
            }]
        );
        assert_eq!(
            manifest
                .dependencies
                .lookup("grunt")
                .unwrap()
                .packages(Bucket::NpmDev),
            ["grunt", "grunt-cli"]
        );
        assert_eq!(manifest.prompts.len(), 2);
        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn test_cli_older_than_required() {
        let warning = manifest().compatibility_warning("0.1.0", "cargo install appgen --force");
        assert!(warning.unwrap().contains("0.2.0"));
    }

    #[test]
    fn test_cli_same_or_newer() {
        let manifest = manifest();
        assert!(manifest.compatibility_warning("0.2.0", "upgrade").is_none());
        assert!(manifest.compatibility_warning("v1.0.0", "upgrade").is_none());
    }

    #[test]
    fn test_unparsable_or_missing_version_skips_check() {
        let mut manifest = manifest();
        assert!(manifest.compatibility_warning("dev", "upgrade").is_none());
        manifest.min_cli_version = None;
        assert!(manifest.compatibility_warning("0.0.1", "upgrade").is_none());
    }

    #[test]
    fn test_validate_rejects_unknown_default() {
        let mut manifest = manifest();
        manifest.defaults.push(DefaultChoice {
            slot: "i18n".to_string(),
            key: "i18n".to_string(),
        });
        assert_eq!(
            manifest.validate(),
            Err(ConfigError::UnknownDependency {
                slot: "i18n".to_string(),
                key: "i18n".to_string(),
            })
        );
    }

    #[test]
    fn test_shared_file_destination_defaults_to_source() {
        let shared: SharedFile = serde_yaml::from_str("source: LICENSE").unwrap();
        assert_eq!(shared.destination(), "LICENSE");
        let renamed: SharedFile =
            serde_yaml::from_str("source: editorconfig\ndest: .editorconfig").unwrap();
        assert_eq!(renamed.destination(), ".editorconfig");
    }
}
