//! Appgen Core - Library for scaffolding web application skeletons
//!
//! A generator bundle declares a dependency registry, prompts and file overlays. One run
//! collects choices (CLI flags, generator defaults, prompts), creates the project root,
//! copies the common and per-dependency overlays, then installs the selected packages
//! with bower, npm and npm (dev) in that order.
//!
//! # Architecture
//!
//! - **Core operations** - dependency registry/selection/resolution, bundle fetching, overlay copying
//! - **Orchestration** - the `Pipeline` state machine, driven through collaborator traits
//! - **CLI/TUI interface** - optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use appgen_core::pipeline::{Collaborators, Pipeline, PipelineOptions};
//!
//! let mut fetcher = GeneratorFetcher::from_local("generators".into(), "appgen");
//! let bundle = fetcher.fetch_generator("webapp").await?;
//! let summary = Pipeline::new(bundle, options, collaborators).run().await?;
//! ```

pub mod config;
pub mod dependencies;
pub mod error;
pub mod generator;
pub mod logging;
pub mod pipeline;
pub mod product;
pub mod runtime;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::{AppConfig, Answer};
pub use dependencies::{resolve, Bucket, DependencyRegistry, Selection};
pub use error::{ConfigError, FilesystemError, InstallError, PipelineError};
pub use generator::{GeneratorBundle, GeneratorFetcher, GeneratorManifest, RootManifest};
pub use pipeline::{Phase, Pipeline, PipelineOptions, RunSummary};
pub use product::ProductConfig;

#[cfg(feature = "tui")]
pub use tui::run;

/// CLI version - used for generator compatibility checking
/// Each binary should define its own version, but this provides a fallback
pub const DEFAULT_CLI_VERSION: &str = "0.1.0";
