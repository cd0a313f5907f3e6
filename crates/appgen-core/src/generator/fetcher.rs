//! Generator fetching from a remote URL or a local directory
//!
//! Both sources go through zip archives:
//! - Remote: fetches pre-built `<generator>.zip` files from the base URL
//! - Local: packs the generator folder into an in-memory zip, then extracts it
//!
//! so that development and published bundles behave identically.

use super::bundle::{GeneratorBundle, COMMON_DIR};
use super::manifest::{GeneratorManifest, RootManifest, SharedFile, MANIFEST_FILE, ROOT_MANIFEST_FILE};
use crate::product::ProductConfig;
use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};
use url::Url;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

/// Generator source - either remote URL or local directory
#[derive(Debug, Clone)]
pub enum GeneratorSource {
    Remote(Url),
    Local(PathBuf),
}

impl GeneratorSource {
    /// Remote source from the product config, honouring its URL override variable
    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self> {
        let url_str = std::env::var(config.generator_url_env())
            .unwrap_or_else(|_| config.default_generator_url().to_string());
        let url =
            Url::parse(&url_str).with_context(|| format!("Invalid generator URL: {}", url_str))?;
        Ok(Self::Remote(url))
    }

    pub fn local(path: PathBuf) -> Self {
        Self::Local(path)
    }
}

/// Retrieves generator bundles and caches them for the process lifetime
pub struct GeneratorFetcher {
    source: GeneratorSource,
    client: reqwest::Client,
    cache: HashMap<String, GeneratorBundle>,
}

impl GeneratorFetcher {
    pub fn new(source: GeneratorSource, user_agent: &str) -> Self {
        Self {
            source,
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            cache: HashMap::new(),
        }
    }

    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self> {
        let source = GeneratorSource::from_config(config)?;
        Ok(Self::new(source, config.user_agent()))
    }

    pub fn from_local(path: PathBuf, user_agent: &str) -> Self {
        Self::new(GeneratorSource::local(path), user_agent)
    }

    pub fn source(&self) -> &GeneratorSource {
        &self.source
    }

    /// Build a URL by appending a path segment, preserving query parameters
    fn build_url(base: &Url, path_segment: &str) -> Result<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("URL cannot have path segments: {}", base))?
            .pop_if_empty()
            .push(path_segment);
        Ok(url)
    }

    async fn fetch_bytes(&self, url: Url, what: &str) -> Result<Vec<u8>> {
        debug!(%url, "fetching {}", what);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to fetch {} from {}", what, url))?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Failed to fetch {} from {}: HTTP {}",
                what,
                url,
                response.status()
            );
        }

        Ok(response.bytes().await?.to_vec())
    }

    /// Fetch the root manifest listing available generators
    pub async fn fetch_root_manifest(&self) -> Result<RootManifest> {
        let content = match &self.source {
            GeneratorSource::Remote(base_url) => {
                let url = Self::build_url(base_url, ROOT_MANIFEST_FILE)?;
                let bytes = self.fetch_bytes(url, "root generator manifest").await?;
                String::from_utf8(bytes).context("Root generator manifest is not valid UTF-8")?
            }
            GeneratorSource::Local(path) => {
                let manifest_path = path.join(ROOT_MANIFEST_FILE);
                fs::read_to_string(&manifest_path)
                    .await
                    .with_context(|| format!("Failed to read {}", manifest_path.display()))?
            }
        };
        serde_yaml::from_str(&content).context("Failed to parse root generator manifest")
    }

    /// Fetch (or build) a generator bundle, caching it by name
    pub async fn fetch_generator(&mut self, name: &str) -> Result<&GeneratorBundle> {
        if !self.cache.contains_key(name) {
            let zip_bytes = match &self.source {
                GeneratorSource::Remote(base_url) => {
                    let url = Self::build_url(base_url, &format!("{}.zip", name))?;
                    self.fetch_bytes(url, &format!("generator '{}'", name))
                        .await?
                }
                GeneratorSource::Local(path) => {
                    let root_manifest = self.fetch_root_manifest().await?;
                    Self::build_local_zip(path, name, &root_manifest.shared_files)?
                }
            };

            let bundle = Self::extract_zip(&zip_bytes, name)?;
            self.cache.insert(name.to_string(), bundle);
        }

        self.cache
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("Generator '{}' not found in cache", name))
    }

    /// Pack a local generator directory into a zip.
    ///
    /// Every file under `<generators_dir>/<name>` is included. Shared files from the root
    /// directory land in the common overlay unless the generator provides its own copy.
    pub fn build_local_zip(
        generators_dir: &Path,
        name: &str,
        shared_files: &[SharedFile],
    ) -> Result<Vec<u8>> {
        let generator_path = generators_dir.join(name);
        let manifest_path = generator_path.join(MANIFEST_FILE);
        if !manifest_path.exists() {
            anyhow::bail!("{} not found in {}", MANIFEST_FILE, generator_path.display());
        }

        let mut entries: BTreeMap<String, PathBuf> = BTreeMap::new();
        for entry in WalkDir::new(&generator_path).sort_by_file_name() {
            let entry = entry
                .with_context(|| format!("Failed to walk {}", generator_path.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&generator_path)
                .with_context(|| format!("Unexpected path {}", entry.path().display()))?;
            entries.insert(to_bundle_path(relative), entry.path().to_path_buf());
        }

        for shared in shared_files {
            let source_path = generators_dir.join(&shared.source);
            let dest = format!("{}/{}", COMMON_DIR, shared.destination());
            if entries.contains_key(&dest) {
                debug!(file = %dest, "generator overrides shared file");
                continue;
            }
            if source_path.exists() {
                entries.insert(dest, source_path);
            } else {
                warn!(
                    "Shared file '{}' not found in {}",
                    shared.source,
                    generators_dir.display()
                );
            }
        }

        let mut zip_buffer = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut zip_buffer));
            let options =
                SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

            for (bundle_path, disk_path) in &entries {
                let content = std::fs::read(disk_path)
                    .with_context(|| format!("Failed to read {}", disk_path.display()))?;
                zip.start_file(format!("{}/{}", name, bundle_path), options)?;
                zip.write_all(&content)?;
            }

            zip.finish()?;
        }

        Ok(zip_buffer)
    }

    /// Extract a generator zip into a bundle
    fn extract_zip(zip_bytes: &[u8], name: &str) -> Result<GeneratorBundle> {
        let mut archive = ZipArchive::new(Cursor::new(zip_bytes))
            .with_context(|| format!("Failed to read zip archive for generator '{}'", name))?;

        let mut files: BTreeMap<String, Vec<u8>> = BTreeMap::new();
        let mut manifest: Option<GeneratorManifest> = None;

        // Entries are stored as {name}/path
        let prefix = format!("{}/", name);

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }

            let full_path = file.name().to_string();
            let relative_path = full_path
                .strip_prefix(&prefix)
                .unwrap_or(&full_path)
                .to_string();

            if !is_safe_relative(&relative_path) {
                warn!(entry = %full_path, "skipping zip entry outside the generator");
                continue;
            }

            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;

            if relative_path == MANIFEST_FILE {
                let text = String::from_utf8_lossy(&contents);
                manifest = Some(serde_yaml::from_str(&text).with_context(|| {
                    format!("Failed to parse generator '{}' manifest", name)
                })?);
            }

            files.insert(relative_path, contents);
        }

        let manifest = manifest
            .ok_or_else(|| anyhow::anyhow!("Generator '{}' zip missing {}", name, MANIFEST_FILE))?;

        Ok(GeneratorBundle::new(manifest, files))
    }
}

/// Convert a relative filesystem path into a forward-slash bundle path
fn to_bundle_path(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// True for a non-empty path made only of normal components
pub(crate) fn is_safe_relative(path: &str) -> bool {
    !path.is_empty()
        && Path::new(path)
            .components()
            .all(|c| matches!(c, std::path::Component::Normal(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::bundle::Overlay;

    const MANIFEST: &str = "name: webapp\ndescription: test\nversion: 0.1.0\n";

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    fn generators_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            ROOT_MANIFEST_FILE,
            "generators: [webapp]\nshared_files:\n  - source: LICENSE\n  - source: editorconfig\n    dest: .editorconfig\n",
        );
        write(dir.path(), "LICENSE", "shared license");
        write(dir.path(), "editorconfig", "root = true");
        write(dir.path(), "webapp/generator.yaml", MANIFEST);
        write(dir.path(), "webapp/common/README.md", "# {{ appName }}");
        write(dir.path(), "webapp/common/LICENSE", "generator license");
        write(dir.path(), "webapp/dependencies/less/public/css/app.less", "body {}");
        dir
    }

    #[tokio::test]
    async fn test_fetch_local_generator() {
        let dir = generators_dir();
        let mut fetcher = GeneratorFetcher::from_local(dir.path().to_path_buf(), "test");

        let root = fetcher.fetch_root_manifest().await.unwrap();
        assert_eq!(root.generators, ["webapp"]);

        let bundle = fetcher.fetch_generator("webapp").await.unwrap();
        assert_eq!(bundle.name(), "webapp");

        let common: BTreeMap<&str, &[u8]> =
            bundle.overlay_files(Overlay::Common).into_iter().collect();
        assert_eq!(common["README.md"], b"# {{ appName }}");
        assert_eq!(common[".editorconfig"], b"root = true");
        // The generator's own file wins over the shared one
        assert_eq!(common["LICENSE"], b"generator license");

        assert!(bundle.has_overlay(Overlay::Dependency("less")));
    }

    #[tokio::test]
    async fn test_missing_generator_fails() {
        let dir = generators_dir();
        let mut fetcher = GeneratorFetcher::from_local(dir.path().to_path_buf(), "test");
        let err = fetcher.fetch_generator("missing").await.unwrap_err();
        assert!(err.to_string().contains(MANIFEST_FILE));
    }

    #[test]
    fn test_build_url_appends_segment() {
        let base = Url::parse("https://example.com/generators?ref=main").unwrap();
        let url = GeneratorFetcher::build_url(&base, "webapp.zip").unwrap();
        assert_eq!(url.as_str(), "https://example.com/generators/webapp.zip?ref=main");
    }

    #[test]
    fn test_safe_relative_paths() {
        assert!(is_safe_relative("common/README.md"));
        assert!(!is_safe_relative("../escape"));
        assert!(!is_safe_relative("/etc/passwd"));
        assert!(!is_safe_relative(""));
    }
}
