//! Overlay copying into the project root

use super::bundle::{GeneratorBundle, Overlay};
use super::fetcher::is_safe_relative;
use super::render::render_file;
use crate::config::AppConfig;
use crate::dependencies::Selection;
use crate::error::FilesystemError;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Copy one overlay into `target_dir`, rendering every file against `context`.
///
/// Existing files are overwritten. Returns the paths written, in copy order.
pub async fn copy_overlay(
    bundle: &GeneratorBundle,
    overlay: Overlay<'_>,
    target_dir: &Path,
    context: &tera::Context,
) -> Result<Vec<PathBuf>, FilesystemError> {
    let files = bundle.overlay_files(overlay);
    if files.is_empty() {
        debug!(%overlay, "overlay has no files");
        return Ok(Vec::new());
    }

    let mut written = Vec::with_capacity(files.len());
    for (relative, contents) in files {
        if !is_safe_relative(relative) {
            warn!(%overlay, file = relative, "skipping file outside the overlay");
            continue;
        }

        let target_path = target_dir.join(relative);
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| FilesystemError::new("create directory", parent, e))?;
        }

        let rendered = render_file(relative, contents, context);
        fs::write(&target_path, &rendered)
            .await
            .map_err(|e| FilesystemError::new("write file", &target_path, e))?;

        written.push(target_path);
    }

    debug!(%overlay, files = written.len(), "overlay copied");
    Ok(written)
}

/// Copy the common overlay, then each selected dependency's overlay in selection order.
///
/// Later overlays overwrite files from earlier ones. `project_root` is created if absent.
pub async fn scaffold(
    bundle: &GeneratorBundle,
    project_root: &Path,
    selection: &Selection,
    config: &AppConfig,
) -> Result<Vec<PathBuf>, FilesystemError> {
    fs::create_dir_all(project_root)
        .await
        .map_err(|e| FilesystemError::new("create directory", project_root, e))?;

    let context = config.render_context();
    let mut written = copy_overlay(bundle, Overlay::Common, project_root, &context).await?;

    for key in selection.iter() {
        let files = copy_overlay(bundle, Overlay::Dependency(key), project_root, &context).await?;
        written.extend(files);
    }

    Ok(written)
}
