//! Product configuration trait for CLI binaries
//!
//! A binary implements this trait to brand the scaffolder and point it at its
//! generator bundles.

use crate::pipeline::RunSummary;
use std::path::Path;

/// Configuration trait for a scaffolding CLI
///
/// Implementations define:
/// - Product identity (name, display name)
/// - Generator bundle source URLs
/// - Documentation links
/// - Post-generation instructions
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command, env vars)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Default URL for fetching generator bundles
    fn default_generator_url(&self) -> &'static str;

    /// Environment variable name for overriding the generator URL
    fn generator_url_env(&self) -> &'static str;

    fn docs_url(&self) -> &'static str;

    /// "Next steps" shown once a project has been generated
    fn next_steps(&self, dir: &Path, summary: &RunSummary) -> Vec<String>;

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;

    /// Upgrade/install command shown in version warnings
    fn upgrade_command(&self) -> &'static str;

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        self.name()
    }
}
