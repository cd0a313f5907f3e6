//! Generator bundles: fetching, parsing, rendering and copying
//!
//! This module provides:
//! - Manifest types (RootManifest, GeneratorManifest)
//! - Bundle fetching from remote URLs or local directories
//! - Overlay copying with template rendering
//! - The controller sub-generator

pub mod bundle;
pub mod controller;
pub mod copier;
pub mod fetcher;
pub mod manifest;
pub mod render;

use crate::product::ProductConfig;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

pub use bundle::{GeneratorBundle, Overlay};
pub use controller::ControllerGenerator;
pub use copier::{copy_overlay, scaffold};
pub use fetcher::{GeneratorFetcher, GeneratorSource};
pub use manifest::{DefaultChoice, GeneratorManifest, RootManifest, SharedFile};

/// Pack every generator listed in the root manifest into `<name>.zip` for publishing
pub async fn build_bundles<C: ProductConfig>(
    config: &C,
    generator_dir: &Option<PathBuf>,
) -> Result<()> {
    let dir = generator_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("generators"));

    if !dir.exists() {
        anyhow::bail!("Generator directory not found: {}", dir.display());
    }

    let manifest_path = dir.join(manifest::ROOT_MANIFEST_FILE);
    if !manifest_path.exists() {
        anyhow::bail!(
            "Root {} not found in {}",
            manifest::ROOT_MANIFEST_FILE,
            dir.display()
        );
    }

    let manifest_content = std::fs::read_to_string(&manifest_path)
        .with_context(|| format!("Failed to read {}", manifest_path.display()))?;
    let root_manifest: RootManifest = serde_yaml::from_str(&manifest_content)
        .with_context(|| format!("Failed to parse {}", manifest_path.display()))?;

    println!(
        "{}",
        format!("Bundling {} generators...", config.display_name())
            .cyan()
            .bold()
    );
    println!();

    let mut built = 0;
    for name in &root_manifest.generators {
        let generator_path = dir.join(name);
        if !generator_path.exists() {
            eprintln!(
                "{} Generator directory not found: {}",
                "Warning:".yellow(),
                generator_path.display()
            );
            continue;
        }

        print!("  {} {}...", "->".blue(), name);

        match GeneratorFetcher::build_local_zip(&dir, name, &root_manifest.shared_files) {
            Ok(zip_bytes) => {
                let zip_path = dir.join(format!("{}.zip", name));
                std::fs::write(&zip_path, &zip_bytes)
                    .with_context(|| format!("Failed to write {}", zip_path.display()))?;
                println!(" {} ({} bytes)", "done".green(), zip_bytes.len());
                built += 1;
            }
            Err(e) => {
                println!(" {}", "failed".red());
                eprintln!("    Error: {:#}", e);
            }
        }
    }

    println!();
    println!(
        "{} {} generator bundle(s) in {}",
        "Built".green().bold(),
        built,
        dir.display()
    );

    Ok(())
}
