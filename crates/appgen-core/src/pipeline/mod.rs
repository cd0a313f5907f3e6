//! Scaffolding pipeline
//!
//! Runs the phases of one project generation strictly in sequence:
//!
//! `Init → DefaultsConfigured → Prompted → RootCreated → FilesScaffolded →
//! BowerInstalled → NpmInstalled → NpmDevInstalled → Done`
//!
//! Each phase is awaited before the next begins. Any error aborts the run; nothing is retried.

mod collaborators;
mod phase;
pub mod prompt;

pub use collaborators::{NoopObserver, PackageInstaller, PipelineObserver, Prompter, SubGenerator};
pub use phase::Phase;
pub use prompt::{Answers, Choice, DefaultAnswers, Question, QuestionKind};

use crate::config::AppConfig;
use crate::dependencies::{resolve, Bucket, PackageManager, Selection};
use crate::error::{ConfigError, FilesystemError, PipelineError};
use crate::generator::{scaffold, GeneratorBundle};
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::{debug, error, info};

/// Slot names filled from CLI flags, in acceptance order
pub const TEMPLATE_MODULE_SLOT: &str = "templateModule";
pub const UI_PACKAGE_MANAGER_SLOT: &str = "uiPackageManager";
pub const CSS_MODULE_SLOT: &str = "cssModule";
pub const JS_MODULE_SLOT: &str = "jsModule";

/// Choices supplied non-interactively (CLI flags)
#[derive(Debug, Clone, Default)]
pub struct CliChoices {
    pub template_module: Option<String>,
    pub ui_package_manager: Option<String>,
    pub css_module: Option<String>,
    pub js_module: Option<String>,
}

impl CliChoices {
    fn slots(&self) -> [(&'static str, Option<&str>); 4] {
        [
            (TEMPLATE_MODULE_SLOT, self.template_module.as_deref()),
            (UI_PACKAGE_MANAGER_SLOT, self.ui_package_manager.as_deref()),
            (CSS_MODULE_SLOT, self.css_module.as_deref()),
            (JS_MODULE_SLOT, self.js_module.as_deref()),
        ]
    }
}

/// Install skip flags
#[derive(Debug, Clone, Copy, Default)]
pub struct InstallFlags {
    /// Skip every install step
    pub skip_install: bool,
    pub skip_install_bower: bool,
    pub skip_install_npm: bool,
}

impl InstallFlags {
    pub fn skips(&self, manager: PackageManager) -> bool {
        self.skip_install
            || match manager {
                PackageManager::Bower => self.skip_install_bower,
                PackageManager::Npm => self.skip_install_npm,
            }
    }
}

/// Inputs of one run
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub app_name: Option<String>,
    /// Directory the project root is created in
    pub parent_dir: PathBuf,
    pub choices: CliChoices,
    pub install: InstallFlags,
}

/// The external collaborators a run calls into
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub prompter: &'a dyn Prompter,
    pub sub_generator: &'a dyn SubGenerator,
    pub bower: &'a dyn PackageInstaller,
    pub npm: &'a dyn PackageInstaller,
    pub observer: &'a dyn PipelineObserver,
}

impl<'a> Collaborators<'a> {
    fn installer(&self, manager: PackageManager) -> &'a dyn PackageInstaller {
        match manager {
            PackageManager::Bower => self.bower,
            PackageManager::Npm => self.npm,
        }
    }
}

/// What happened to one install step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The installer ran with this package string
    Installed(String),
    /// No selected key contributes to the bucket; the installer was not invoked
    NothingToInstall,
    /// A skip flag bypassed the step
    SkippedByFlag,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRecord {
    pub bucket: Bucket,
    pub outcome: InstallOutcome,
}

/// Result of a run that reached `Done`
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub project_root: PathBuf,
    pub selection: Selection,
    pub config: AppConfig,
    pub phases: Vec<Phase>,
    pub installs: Vec<InstallRecord>,
}

impl RunSummary {
    pub fn install(&self, bucket: Bucket) -> Option<&InstallOutcome> {
        self.installs
            .iter()
            .find(|r| r.bucket == bucket)
            .map(|r| &r.outcome)
    }
}

/// Mutable state owned by a single run
struct RunState {
    config: AppConfig,
    selection: Selection,
    phases: Vec<Phase>,
    installs: Vec<InstallRecord>,
}

impl RunState {
    fn current(&self) -> Phase {
        self.phases.last().copied().unwrap_or(Phase::Init)
    }
}

/// One project generation
pub struct Pipeline<'a> {
    bundle: &'a GeneratorBundle,
    options: PipelineOptions,
    collaborators: Collaborators<'a>,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        bundle: &'a GeneratorBundle,
        options: PipelineOptions,
        collaborators: Collaborators<'a>,
    ) -> Self {
        Self {
            bundle,
            options,
            collaborators,
        }
    }

    /// Run every phase in order.
    ///
    /// The process working directory is changed to the project root once it is created.
    pub async fn run(&self) -> Result<RunSummary, PipelineError> {
        let mut state = RunState {
            config: AppConfig::with_app_name(self.options.app_name.as_deref()),
            selection: Selection::new(),
            phases: Vec::new(),
            installs: Vec::new(),
        };
        self.enter(&mut state, Phase::Init);

        match self.drive(&mut state).await {
            Ok(summary) => {
                self.collaborators.observer.finished(&summary);
                Ok(summary)
            }
            Err(e) => {
                let phase = state.current();
                error!(%phase, error = %e, "pipeline aborted");
                self.collaborators.observer.failed(phase, &e);
                Err(e)
            }
        }
    }

    async fn drive(&self, state: &mut RunState) -> Result<RunSummary, PipelineError> {
        self.configure_defaults(state)?;
        self.enter(state, Phase::DefaultsConfigured);

        self.prompt(state).await?;
        self.enter(state, Phase::Prompted);

        let project_root = self.create_root(state).await?;
        self.enter(state, Phase::RootCreated);

        scaffold(self.bundle, &project_root, &state.selection, &state.config).await?;
        self.enter(state, Phase::FilesScaffolded);

        for bucket in Bucket::INSTALL_ORDER {
            self.install(state, bucket, &project_root).await?;
            self.enter(state, Phase::installed(bucket));
        }

        self.enter(state, Phase::Done);

        Ok(RunSummary {
            project_root,
            selection: state.selection.clone(),
            config: state.config.clone(),
            phases: state.phases.clone(),
            installs: state.installs.clone(),
        })
    }

    fn enter(&self, state: &mut RunState, phase: Phase) {
        info!(%phase, "entering phase");
        state.phases.push(phase);
        self.collaborators.observer.phase_entered(phase);
    }

    /// CLI-provided slots first, then the generator's own defaults
    fn configure_defaults(&self, state: &mut RunState) -> Result<(), ConfigError> {
        let registry = self.bundle.registry();

        for (slot, value) in self.options.choices.slots() {
            state
                .selection
                .accept(registry, &mut state.config, slot, value)?;
        }

        for default in &self.bundle.manifest().defaults {
            state.selection.accept(
                registry,
                &mut state.config,
                &default.slot,
                Some(default.key.as_str()),
            )?;
        }

        Ok(())
    }

    async fn prompt(&self, state: &mut RunState) -> Result<(), PipelineError> {
        let pending = prompt::pending_questions(&self.bundle.manifest().prompts, &state.config);
        if pending.is_empty() {
            debug!("no questions to ask");
            return Ok(());
        }

        let answers = self.collaborators.prompter.ask(&pending).await?;
        prompt::apply_answers(
            &answers,
            self.bundle.registry(),
            &mut state.config,
            &mut state.selection,
        )?;
        Ok(())
    }

    async fn create_root(&self, state: &mut RunState) -> Result<PathBuf, PipelineError> {
        let app_name = state
            .config
            .app_name()
            .ok_or(ConfigError::MissingAppName)?
            .to_string();
        validate_app_name(&app_name)?;

        // Later steps run after the cwd moves, so the root must not stay relative
        let requested = self.options.parent_dir.join(&app_name);
        let project_root = std::path::absolute(&requested)
            .map_err(|e| FilesystemError::new("resolve directory", &requested, e))?;
        fs::create_dir_all(&project_root)
            .await
            .map_err(|e| FilesystemError::new("create directory", &project_root, e))?;
        std::env::set_current_dir(&project_root)
            .map_err(|e| FilesystemError::new("enter directory", &project_root, e))?;
        state.config.set_project_root(project_root.clone());

        let template_module = state.config.text(TEMPLATE_MODULE_SLOT).map(str::to_string);
        self.collaborators
            .sub_generator
            .generate(template_module.as_deref(), &project_root, &state.config)
            .await?;

        Ok(project_root)
    }

    async fn install(
        &self,
        state: &mut RunState,
        bucket: Bucket,
        project_root: &Path,
    ) -> Result<(), PipelineError> {
        let manager = bucket.manager();

        let outcome = if self.options.install.skips(manager) {
            InstallOutcome::SkippedByFlag
        } else {
            match resolve(self.bundle.registry(), &state.selection, bucket) {
                None => InstallOutcome::NothingToInstall,
                Some(packages) => {
                    info!(%bucket, %packages, "installing");
                    self.collaborators.observer.install_started(bucket, &packages);
                    self.collaborators
                        .installer(manager)
                        .install(&packages, bucket.persist(), project_root)
                        .await
                        .map_err(|e| {
                            debug!(
                                code = e.code.as_deref().unwrap_or("none"),
                                "Error during {} dependency installation", bucket
                            );
                            e
                        })?;
                    InstallOutcome::Installed(packages)
                }
            }
        };

        if !matches!(outcome, InstallOutcome::Installed(_)) {
            debug!(%bucket, ?outcome, "install step skipped");
            self.collaborators.observer.install_skipped(bucket, &outcome);
        }

        state.installs.push(InstallRecord { bucket, outcome });
        Ok(())
    }
}

/// The application name becomes a single directory under the parent
fn validate_app_name(name: &str) -> Result<(), ConfigError> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(ConfigError::InvalidAppName(name.to_string())),
    }
}
