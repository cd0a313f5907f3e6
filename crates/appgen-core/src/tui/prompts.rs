//! Charm-style CLI prompts using cliclack

use crate::config::{Answer, APP_NAME_SLOT};
use crate::dependencies::{Bucket, PackageManager};
use crate::error::PipelineError;
use crate::generator::{ControllerGenerator, GeneratorBundle, GeneratorFetcher};
use crate::pipeline::{
    Answers, CliChoices, Collaborators, DefaultAnswers, InstallFlags, InstallOutcome, Phase,
    Pipeline, PipelineObserver, PipelineOptions, Prompter, Question, QuestionKind, RunSummary,
};
use crate::product::ProductConfig;
use crate::runtime::{check, CommandInstaller};
use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Local directory to use for generators instead of fetching from remote
    pub generator_dir: Option<PathBuf>,

    /// Generator name to use
    pub generator: Option<String>,

    /// Application name (also the project directory name)
    pub app_name: Option<String>,

    /// Dependency choices given as flags
    pub choices: CliChoices,

    pub install: InstallFlags,

    /// Answer every prompt with its default (non-interactive mode)
    pub yes: bool,
}

/// Run the CLI with interactive prompts
pub async fn run<C: ProductConfig>(config: &C, args: CreateArgs, cli_version: &str) -> Result<()> {
    cliclack::intro(config.display_name())?;

    // Step 1: Setup generator fetcher
    let mut fetcher = setup_fetcher(config, &args.generator_dir)?;

    // Step 2: Select generator
    let generator_name = select_generator(&mut fetcher, args.generator.as_deref()).await?;
    let bundle = fetcher.fetch_generator(&generator_name).await?;

    if let Some(warning) = bundle
        .manifest()
        .compatibility_warning(cli_version, config.upgrade_command())
    {
        cliclack::log::warning(format!(
            "Version warning: {}",
            warning.lines().next().unwrap_or(&warning)
        ))?;
    }

    // Step 3: Check package managers that will actually be invoked
    check_package_managers(&args.install)?;

    // Step 4: Generate
    let summary = generate(bundle, &args).await?;

    // Step 5: Show next steps
    print_next_steps(config, &summary)?;

    Ok(())
}

fn setup_fetcher<C: ProductConfig>(
    config: &C,
    generator_dir: &Option<PathBuf>,
) -> Result<GeneratorFetcher> {
    let fetcher = match generator_dir {
        Some(path) => {
            cliclack::log::info(format!("Using local generators from {}", path.display()))?;
            GeneratorFetcher::from_local(path.clone(), config.user_agent())
        }
        None => {
            cliclack::log::info("Using remote generators")?;
            GeneratorFetcher::from_config(config)?
        }
    };

    Ok(fetcher)
}

async fn select_generator(
    fetcher: &mut GeneratorFetcher,
    specified: Option<&str>,
) -> Result<String> {
    let spinner = cliclack::spinner();
    spinner.start("Loading generators...");

    let root_manifest = fetcher.fetch_root_manifest().await?;

    if let Some(name) = specified {
        if !root_manifest.generators.iter().any(|g| g == name) {
            spinner.stop("Failed to load generators");
            anyhow::bail!(
                "Generator '{}' not found. Available generators: {}",
                name,
                root_manifest.generators.join(", ")
            );
        }

        let bundle = fetcher.fetch_generator(name).await?;
        spinner.stop(format!(
            "Generator: {} - {}",
            bundle.manifest().name,
            bundle.manifest().description
        ));
        return Ok(name.to_string());
    }

    // (directory name, display name, description)
    let mut generators: Vec<(String, String, String)> = Vec::new();
    for name in &root_manifest.generators {
        let manifest = fetcher.fetch_generator(name).await?.manifest();
        generators.push((
            name.clone(),
            manifest.name.clone(),
            manifest.description.clone(),
        ));
    }

    spinner.stop("Generators loaded");

    match generators.len() {
        0 => anyhow::bail!("No generators found."),
        1 => {
            let (name, display, description) = generators.swap_remove(0);
            cliclack::log::info(format!("Using generator: {} - {}", display, description))?;
            Ok(name)
        }
        _ => {
            let mut select = cliclack::select("Select a generator");
            for (idx, (_, display, description)) in generators.iter().enumerate() {
                select = select.item(idx, display, description);
            }
            let selected: usize = select.interact()?;
            Ok(generators.swap_remove(selected).0)
        }
    }
}

fn check_package_managers(install: &InstallFlags) -> Result<()> {
    let managers: Vec<PackageManager> = [PackageManager::Bower, PackageManager::Npm]
        .into_iter()
        .filter(|m| !install.skips(*m))
        .collect();

    if managers.is_empty() {
        cliclack::log::info("Skipping package installation")?;
        return Ok(());
    }

    let spinner = cliclack::spinner();
    spinner.start("Checking package managers...");

    let runtimes = check::check_package_managers(&managers);
    let runtime_info: Vec<String> = runtimes
        .iter()
        .map(|r| {
            if r.available {
                format!("{} ({})", r.name, r.version.as_deref().unwrap_or("unknown"))
            } else {
                format!("{} (not installed)", r.name)
            }
        })
        .collect();
    spinner.stop(format!("Package managers: {}", runtime_info.join(", ")));

    for missing in runtimes.iter().filter(|r| !r.available) {
        cliclack::log::warning(format!(
            "{} is not installed; its install step will fail",
            missing.name
        ))?;
    }

    Ok(())
}

async fn generate(bundle: &GeneratorBundle, args: &CreateArgs) -> Result<RunSummary> {
    let options = PipelineOptions {
        app_name: args.app_name.clone(),
        parent_dir: std::env::current_dir()?,
        choices: args.choices.clone(),
        install: args.install,
    };

    let prompter: Box<dyn Prompter> = if args.yes {
        Box::new(DefaultAnswers)
    } else {
        Box::new(ClackPrompter)
    };
    let controller = ControllerGenerator::new(bundle);
    let bower = CommandInstaller::bower();
    let npm = CommandInstaller::npm();
    let observer = ClackObserver;

    let collaborators = Collaborators {
        prompter: prompter.as_ref(),
        sub_generator: &controller,
        bower: &bower,
        npm: &npm,
        observer: &observer,
    };

    Ok(Pipeline::new(bundle, options, collaborators).run().await?)
}

fn print_next_steps<C: ProductConfig>(config: &C, summary: &RunSummary) -> Result<()> {
    let steps = config.next_steps(&summary.project_root, summary);

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Happy coding!")?;

    Ok(())
}

/// Asks each question with the matching cliclack widget
#[derive(Debug, Clone, Copy, Default)]
pub struct ClackPrompter;

impl ClackPrompter {
    fn ask_one(question: &Question) -> Result<Answer> {
        let answer = match &question.kind {
            QuestionKind::Input { default } => {
                let mut input = cliclack::input(&question.message)
                    .required(question.slot() == APP_NAME_SLOT);
                if let Some(default) = default {
                    input = input.placeholder(default).default_input(default);
                }
                let value: String = input.interact()?;
                Answer::Text(value)
            }
            QuestionKind::Confirm { default } => {
                let value: bool = cliclack::confirm(&question.message)
                    .initial_value(*default)
                    .interact()?;
                Answer::Flag(value)
            }
            QuestionKind::Select { choices, default } => {
                if choices.is_empty() {
                    return Ok(Answer::None);
                }
                let mut select = cliclack::select(&question.message);
                for (idx, choice) in choices.iter().enumerate() {
                    select = select.item(idx, &choice.label, choice.value.as_deref().unwrap_or(""));
                }
                let selected: usize = select
                    .initial_value(default.unwrap_or(0).min(choices.len() - 1))
                    .interact()?;
                Answer::from_choice(choices[selected].value.as_deref())
            }
        };
        Ok(answer)
    }
}

#[async_trait]
impl Prompter for ClackPrompter {
    async fn ask(&self, questions: &[Question]) -> Result<Answers> {
        questions
            .iter()
            .map(|q| Ok((q.name.clone(), Self::ask_one(q)?)))
            .collect()
    }
}

/// Reports pipeline progress as cliclack log lines
#[derive(Debug, Clone, Copy, Default)]
pub struct ClackObserver;

impl PipelineObserver for ClackObserver {
    fn phase_entered(&self, phase: Phase) {
        if phase == Phase::FilesScaffolded {
            let _ = cliclack::log::success("Project files created");
        }
    }

    fn install_started(&self, bucket: Bucket, packages: &str) {
        let _ = cliclack::log::step(format!("Installing {} packages: {}", bucket, packages));
    }

    fn install_skipped(&self, bucket: Bucket, outcome: &InstallOutcome) {
        let reason = match outcome {
            InstallOutcome::SkippedByFlag => "skipped by flag",
            _ => "nothing to install",
        };
        let _ = cliclack::log::info(format!("{} packages: {}", bucket, reason));
    }

    fn failed(&self, phase: Phase, error: &PipelineError) {
        let _ = cliclack::log::error(format!("Failed after {}: {}", phase, error));
    }

    fn finished(&self, summary: &RunSummary) {
        let _ = cliclack::log::success(format!(
            "Created {} with {}",
            summary.project_root.display(),
            if summary.selection.is_empty() {
                "no optional dependencies".to_string()
            } else {
                summary.selection.keys().join(", ")
            }
        ));
    }
}
