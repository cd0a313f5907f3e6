//! appgen CLI - Web application scaffolding from generator bundles

use anyhow::Result;
use appgen_core::pipeline::{CliChoices, InstallFlags, RunSummary};
use appgen_core::tui::CreateArgs;
use appgen_core::{logging, Bucket, ProductConfig};
use clap::{CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// appgen product configuration
#[derive(Clone)]
pub struct AppgenConfig;

impl ProductConfig for AppgenConfig {
    fn name(&self) -> &'static str {
        "appgen"
    }

    fn display_name(&self) -> &'static str {
        "appgen"
    }

    fn default_generator_url(&self) -> &'static str {
        "https://raw.githubusercontent.com/appgen/appgen/main/generators"
    }

    fn generator_url_env(&self) -> &'static str {
        "APPGEN_GENERATOR_URL"
    }

    fn docs_url(&self) -> &'static str {
        "https://github.com/appgen/appgen#readme"
    }

    fn cli_description(&self) -> &'static str {
        "CLI for scaffolding web application skeletons"
    }

    fn upgrade_command(&self) -> &'static str {
        "cargo install appgen --force"
    }

    fn next_steps(&self, dir: &Path, summary: &RunSummary) -> Vec<String> {
        let mut steps = Vec::new();

        // The pipeline moved into the project root; point back at it from where the user started
        if let Some(name) = dir.file_name() {
            steps.push(format!("cd {}", name.to_string_lossy()));
        }

        let installed_nothing = Bucket::INSTALL_ORDER.iter().all(|b| {
            matches!(
                summary.install(*b),
                Some(appgen_core::pipeline::InstallOutcome::SkippedByFlag)
            )
        });
        if installed_nothing {
            steps.push("npm install".to_string());
            if summary.selection.contains("bower") {
                steps.push("bower install".to_string());
            }
        }

        steps.push("npm start".to_string());
        steps.push(format!("Read the docs: {}", self.docs_url()));

        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "appgen")]
#[command(about = "CLI for scaffolding web application skeletons")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Without a subcommand, `create` runs with these arguments
    #[command(flatten)]
    pub create: CliCreateArgs,

    /// Increase diagnostic output (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new web application
    Create(CliCreateArgs),
    /// Pack every generator in the generator directory into a zip (for publishing)
    Bundle(BundleArgs),
}

#[derive(clap::Args, Debug, Default)]
pub struct CliCreateArgs {
    /// Application name; the project is created in ./<APP_NAME>
    pub app_name: Option<String>,

    /// Local directory to use for generators instead of fetching from remote (for development use)
    #[arg(long = "generator-dir")]
    pub generator_dir: Option<PathBuf>,

    /// Generator name to use
    #[arg(short, long)]
    pub generator: Option<String>,

    /// Template engine dependency key (e.g. dust, makara)
    #[arg(long = "template-module")]
    pub template_module: Option<String>,

    /// UI package manager dependency key (e.g. bower)
    #[arg(long = "ui-package-manager")]
    pub ui_package_manager: Option<String>,

    /// CSS preprocessor dependency key (e.g. less, sass, stylus)
    #[arg(long = "css-module")]
    pub css_module: Option<String>,

    /// JavaScript module library dependency key (e.g. requirejs, browserify)
    #[arg(long = "js-module")]
    pub js_module: Option<String>,

    /// Skip every package installation step
    #[arg(long = "skip-install")]
    pub skip_install: bool,

    /// Skip the bower installation step
    #[arg(long = "skip-install-bower")]
    pub skip_install_bower: bool,

    /// Skip both npm installation steps
    #[arg(long = "skip-install-npm")]
    pub skip_install_npm: bool,

    /// Answer every prompt with its default (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        CreateArgs {
            generator_dir: args.generator_dir,
            generator: args.generator,
            app_name: args.app_name,
            choices: CliChoices {
                template_module: args.template_module,
                ui_package_manager: args.ui_package_manager,
                css_module: args.css_module,
                js_module: args.js_module,
            },
            install: InstallFlags {
                skip_install: args.skip_install,
                skip_install_bower: args.skip_install_bower,
                skip_install_npm: args.skip_install_npm,
            },
            yes: args.yes,
        }
    }
}

#[derive(Parser, Debug)]
pub struct BundleArgs {
    /// Directory containing generators.yaml and the generator directories
    #[arg(long = "generator-dir")]
    pub generator_dir: Option<PathBuf>,
}

async fn dispatch(config: &AppgenConfig, args: Args) -> Result<()> {
    match args.command {
        Some(Command::Bundle(bundle_args)) => {
            appgen_core::generator::build_bundles(config, &bundle_args.generator_dir).await
        }
        Some(Command::Create(create_args)) => {
            let result = appgen_core::run(config, create_args.into(), CLI_VERSION).await;

            // Ensure cursor is visible on normal exit
            let _ = console::Term::stderr().show_cursor();

            result
        }
        None => {
            // No subcommand provided, default to create behavior
            let result = appgen_core::run(config, args.create.into(), CLI_VERSION).await;
            let _ = console::Term::stderr().show_cursor();
            result
        }
    }
}

#[tokio::main]
async fn main() {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    logging::init(args.verbose);

    if let Err(e) = dispatch(&AppgenConfig, args).await {
        eprintln!("{:#}", e);
        let _ = Args::command().print_help();
        std::process::exit(1);
    }
}
