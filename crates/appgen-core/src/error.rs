//! Error types surfaced by the scaffolding pipeline

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Static configuration errors. Fatal: the run aborts before any further side effect.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A choice named a dependency key the registry does not know about
    #[error("Unable to resolve dependency: {slot}:{key}")]
    UnknownDependency { slot: String, key: String },

    #[error("An application name is required")]
    MissingAppName,

    #[error("Invalid application name '{0}': must be a single directory name")]
    InvalidAppName(String),
}

/// A package installer reported failure
#[derive(Debug, Error)]
#[error("{manager} install failed{}: {message}", code_suffix(.code))]
pub struct InstallError {
    /// Installer that failed (e.g. "npm", "bower")
    pub manager: String,
    /// Machine-readable code (exit status or I/O error kind), when known
    pub code: Option<String>,
    pub message: String,
}

impl InstallError {
    pub fn new(manager: impl Into<String>, code: Option<String>, message: impl Into<String>) -> Self {
        Self {
            manager: manager.into(),
            code,
            message: message.into(),
        }
    }
}

fn code_suffix(code: &Option<String>) -> String {
    code.as_deref()
        .map(|code| format!(" ({})", code))
        .unwrap_or_default()
}

/// Directory creation or file copy failure
#[derive(Debug, Error)]
#[error("Failed to {action} {}: {source}", .path.display())]
pub struct FilesystemError {
    pub action: &'static str,
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl FilesystemError {
    pub fn new(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            action,
            path: path.into(),
            source,
        }
    }
}

/// Anything that can stop a pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Install(#[from] InstallError),

    #[error(transparent)]
    Filesystem(#[from] FilesystemError),

    /// Failure reported by a collaborator (prompt UI, sub-generator)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
