//! Accumulated dependency selection for one run

use super::registry::DependencyRegistry;
use crate::config::{AppConfig, Answer};
use crate::error::ConfigError;
use tracing::debug;

/// Ordered, duplicate-free list of accepted dependency keys
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    keys: Vec<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a choice for `slot`.
    ///
    /// A declined choice (`None` or empty) records the falsy value in the slot and selects
    /// nothing. A key missing from the registry fails with [`ConfigError::UnknownDependency`]
    /// and leaves both the selection and the config untouched. Returns whether the key was
    /// newly added.
    pub fn accept(
        &mut self,
        registry: &DependencyRegistry,
        config: &mut AppConfig,
        slot: &str,
        value: Option<&str>,
    ) -> Result<bool, ConfigError> {
        let key = match value {
            Some(key) if !key.is_empty() => key,
            _ => {
                config.set(slot, Answer::from_choice(value));
                return Ok(false);
            }
        };

        if !registry.contains(key) {
            return Err(ConfigError::UnknownDependency {
                slot: slot.to_string(),
                key: key.to_string(),
            });
        }

        config.set(slot, Answer::Text(key.to_string()));

        if self.contains(key) {
            debug!(slot, key, "dependency already selected");
            return Ok(false);
        }

        debug!(slot, key, "dependency selected");
        self.keys.push(key.to_string());
        Ok(true)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    /// Keys in acceptance order
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependencies::registry::DependencySpec;

    fn registry() -> DependencyRegistry {
        ["dust", "less", "grunt", "i18n"]
            .into_iter()
            .map(|k| (k.to_string(), DependencySpec::default()))
            .collect()
    }

    #[test]
    fn test_accept_known_key_appends_and_sets_slot() {
        let registry = registry();
        let mut config = AppConfig::new();
        let mut selection = Selection::new();

        let added = selection
            .accept(&registry, &mut config, "cssModule", Some("less"))
            .unwrap();

        assert!(added);
        assert_eq!(selection.keys(), ["less"]);
        assert_eq!(config.text("cssModule"), Some("less"));
    }

    #[test]
    fn test_accept_same_key_twice_is_idempotent() {
        let registry = registry();
        let mut config = AppConfig::new();
        let mut selection = Selection::new();

        selection
            .accept(&registry, &mut config, "taskModule", Some("grunt"))
            .unwrap();
        let added = selection
            .accept(&registry, &mut config, "taskModule", Some("grunt"))
            .unwrap();

        assert!(!added);
        assert_eq!(selection.keys(), ["grunt"]);
    }

    #[test]
    fn test_accept_unknown_key_fails_without_mutation() {
        let registry = registry();
        let mut config = AppConfig::new();
        let mut selection = Selection::new();
        selection
            .accept(&registry, &mut config, "templateModule", Some("dust"))
            .unwrap();

        let err = selection
            .accept(&registry, &mut config, "cssModule", Some("scss"))
            .unwrap_err();

        assert_eq!(
            err,
            ConfigError::UnknownDependency {
                slot: "cssModule".to_string(),
                key: "scss".to_string(),
            }
        );
        assert_eq!(selection.keys(), ["dust"]);
        assert!(config.get("cssModule").is_none());
    }

    #[test]
    fn test_accept_declined_choice_is_noop_on_selection() {
        let registry = registry();
        let mut config = AppConfig::new();
        let mut selection = Selection::new();

        assert!(!selection
            .accept(&registry, &mut config, "jsModule", None)
            .unwrap());
        assert!(!selection
            .accept(&registry, &mut config, "cssModule", Some(""))
            .unwrap());

        assert!(selection.is_empty());
        assert_eq!(config.get("jsModule"), Some(&Answer::None));
        assert_eq!(config.get("cssModule"), Some(&Answer::Text(String::new())));
    }

    #[test]
    fn test_selection_preserves_acceptance_order() {
        let registry = registry();
        let mut config = AppConfig::new();
        let mut selection = Selection::new();

        for (slot, key) in [
            ("templateModule", "dust"),
            ("cssModule", "less"),
            ("taskModule", "grunt"),
            ("i18n", "i18n"),
            ("templateModule", "dust"),
        ] {
            selection
                .accept(&registry, &mut config, slot, Some(key))
                .unwrap();
        }

        assert_eq!(selection.keys(), ["dust", "less", "grunt", "i18n"]);
    }
}
