//! External collaborators the pipeline calls into

use super::phase::Phase;
use super::prompt::{Answers, Question};
use super::{InstallOutcome, RunSummary};
use crate::config::AppConfig;
use crate::dependencies::{Bucket, Persist};
use crate::error::{InstallError, PipelineError};
use async_trait::async_trait;
use std::path::Path;

/// Collects answers for the pending questions
#[async_trait]
pub trait Prompter: Send + Sync {
    async fn ask(&self, questions: &[Question]) -> anyhow::Result<Answers>;
}

/// Lays down the template-engine specific project shape
#[async_trait]
pub trait SubGenerator: Send + Sync {
    async fn generate(
        &self,
        template_module: Option<&str>,
        target: &Path,
        config: &AppConfig,
    ) -> anyhow::Result<()>;
}

/// Installs a space-joined list of package specifiers
#[async_trait]
pub trait PackageInstaller: Send + Sync {
    async fn install(&self, packages: &str, persist: Persist, cwd: &Path)
        -> Result<(), InstallError>;
}

/// Receives progress notifications from a run
pub trait PipelineObserver: Send + Sync {
    fn phase_entered(&self, _phase: Phase) {}

    fn install_started(&self, _bucket: Bucket, _packages: &str) {}

    fn install_skipped(&self, _bucket: Bucket, _outcome: &InstallOutcome) {}

    fn failed(&self, _phase: Phase, _error: &PipelineError) {}

    /// Terminal notification once the run reaches `Done`
    fn finished(&self, _summary: &RunSummary) {}
}

/// Observer that ignores every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}
