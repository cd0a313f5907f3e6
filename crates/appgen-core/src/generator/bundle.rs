//! In-memory generator bundle: manifest plus every overlay file

use super::manifest::GeneratorManifest;
use crate::dependencies::DependencyRegistry;
use std::collections::BTreeMap;
use std::fmt;

/// Directory holding the overlay copied into every project
pub const COMMON_DIR: &str = "common";

/// Directory holding one overlay per dependency key
pub const DEPENDENCIES_DIR: &str = "dependencies";

/// Directory holding one controller overlay per template engine
pub const CONTROLLERS_DIR: &str = "controllers";

/// Controller overlay used when no template engine was chosen
pub const NO_TEMPLATE_ENGINE: &str = "none";

/// A file-tree fragment inside a bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay<'a> {
    Common,
    Dependency(&'a str),
    Controller(&'a str),
}

impl Overlay<'_> {
    /// Path prefix of the overlay's files inside the bundle
    pub fn prefix(&self) -> String {
        match self {
            Overlay::Common => format!("{}/", COMMON_DIR),
            Overlay::Dependency(key) => format!("{}/{}/", DEPENDENCIES_DIR, key),
            Overlay::Controller(engine) => format!("{}/{}/", CONTROLLERS_DIR, engine),
        }
    }
}

impl fmt::Display for Overlay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix().trim_end_matches('/'))
    }
}

/// A fully loaded generator
#[derive(Debug, Clone)]
pub struct GeneratorBundle {
    manifest: GeneratorManifest,
    /// Bundle-relative path (forward slashes) -> contents
    files: BTreeMap<String, Vec<u8>>,
}

impl GeneratorBundle {
    pub fn new(manifest: GeneratorManifest, files: BTreeMap<String, Vec<u8>>) -> Self {
        Self { manifest, files }
    }

    pub fn manifest(&self) -> &GeneratorManifest {
        &self.manifest
    }

    pub fn registry(&self) -> &DependencyRegistry {
        &self.manifest.dependencies
    }

    pub fn name(&self) -> &str {
        &self.manifest.name
    }

    /// Files of one overlay as (overlay-relative path, contents), in path order
    pub fn overlay_files(&self, overlay: Overlay<'_>) -> Vec<(&str, &[u8])> {
        let prefix = overlay.prefix();
        self.files
            .range(prefix.clone()..)
            .take_while(|(path, _)| path.starts_with(&prefix))
            .map(|(path, contents)| (&path[prefix.len()..], contents.as_slice()))
            .filter(|(relative, _)| !relative.is_empty())
            .collect()
    }

    pub fn has_overlay(&self, overlay: Overlay<'_>) -> bool {
        !self.overlay_files(overlay).is_empty()
    }

    /// Every bundle-relative path, sorted
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle() -> GeneratorBundle {
        let manifest: GeneratorManifest =
            serde_yaml::from_str("name: t\ndescription: d\nversion: 0.1.0").unwrap();
        let files = [
            ("generator.yaml", "name: t"),
            ("common/README.md", "# readme"),
            ("common/config/app.json", "{}"),
            ("dependencies/less/public/css/app.less", "body {}"),
            ("dependencies/lesser/x.txt", "x"),
            ("controllers/dust/controllers/index.js", "module.exports = 1;"),
        ]
        .into_iter()
        .map(|(p, c)| (p.to_string(), c.as_bytes().to_vec()))
        .collect();
        GeneratorBundle::new(manifest, files)
    }

    #[test]
    fn test_overlay_files_strip_prefix() {
        let bundle = bundle();
        let common: Vec<&str> = bundle
            .overlay_files(Overlay::Common)
            .into_iter()
            .map(|(p, _)| p)
            .collect();
        assert_eq!(common, ["README.md", "config/app.json"]);
    }

    #[test]
    fn test_dependency_overlay_does_not_match_longer_key() {
        let bundle = bundle();
        let less = bundle.overlay_files(Overlay::Dependency("less"));
        assert_eq!(less.len(), 1);
        assert_eq!(less[0].0, "public/css/app.less");
    }

    #[test]
    fn test_missing_overlay_is_empty() {
        let bundle = bundle();
        assert!(!bundle.has_overlay(Overlay::Dependency("grunt")));
        assert!(bundle.has_overlay(Overlay::Controller("dust")));
        assert!(!bundle.has_overlay(Overlay::Controller(NO_TEMPLATE_ENGINE)));
    }

    #[test]
    fn test_overlay_display() {
        assert_eq!(Overlay::Dependency("less").to_string(), "dependencies/less");
        assert_eq!(Overlay::Common.to_string(), "common");
    }
}
