//! Checks on the generator bundles shipped in the repository

use appgen_core::dependencies::Bucket;
use appgen_core::generator::bundle::{Overlay, CONTROLLERS_DIR, DEPENDENCIES_DIR};
use appgen_core::generator::GeneratorFetcher;
use appgen_core::pipeline::{
    CliChoices, Collaborators, DefaultAnswers, InstallFlags, InstallOutcome, NoopObserver,
    PackageInstaller, Pipeline, PipelineOptions,
};
use appgen_core::{generator::ControllerGenerator, InstallError};
use async_trait::async_trait;
use serial_test::serial;
use std::fs;
use std::path::{Path, PathBuf};

fn generators_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../generators")
}

fn fetcher() -> GeneratorFetcher {
    GeneratorFetcher::from_local(generators_dir(), "appgen-tests")
}

/// Overlay directory names directly under `prefix/`
fn overlay_names<'a>(paths: impl Iterator<Item = &'a str>, prefix: &str) -> Vec<String> {
    let mut names: Vec<String> = paths
        .filter_map(|p| p.strip_prefix(prefix)?.strip_prefix('/'))
        .filter_map(|rest| rest.split_once('/').map(|(name, _)| name.to_string()))
        .collect();
    names.dedup();
    names
}

#[tokio::test]
async fn test_shipped_generators_validate() {
    let mut fetcher = fetcher();
    let root = fetcher.fetch_root_manifest().await.unwrap();
    assert!(!root.generators.is_empty());

    for name in &root.generators {
        let bundle = fetcher.fetch_generator(name).await.unwrap();
        let manifest = bundle.manifest();

        manifest.validate().unwrap();
        assert!(bundle.has_overlay(Overlay::Common), "{name}: no common overlay");

        for key in overlay_names(bundle.paths(), DEPENDENCIES_DIR) {
            assert!(
                bundle.registry().contains(&key),
                "{name}: overlay dependencies/{key} has no registry entry"
            );
        }

        for engine in overlay_names(bundle.paths(), CONTROLLERS_DIR) {
            assert!(
                engine == "none" || bundle.registry().contains(&engine),
                "{name}: controller {engine} is not a dependency key"
            );
        }
    }
}

#[tokio::test]
async fn test_shared_files_land_in_common_overlay() {
    let mut fetcher = fetcher();
    let bundle = fetcher.fetch_generator("webapp").await.unwrap();

    let common: Vec<&str> = bundle
        .overlay_files(Overlay::Common)
        .into_iter()
        .map(|(path, _)| path)
        .collect();
    assert!(common.contains(&".editorconfig"));
    assert!(common.contains(&"package.json"));
}

/// Fails the test if any install is attempted
struct NoInstall;

#[async_trait]
impl PackageInstaller for NoInstall {
    async fn install(
        &self,
        packages: &str,
        _persist: appgen_core::dependencies::Persist,
        _cwd: &Path,
    ) -> Result<(), InstallError> {
        panic!("unexpected install of {packages}");
    }
}

#[tokio::test]
#[serial]
async fn test_webapp_with_defaults_and_skip_install() {
    let parent = tempfile::tempdir().unwrap();
    let previous_dir = std::env::current_dir().unwrap();

    let mut fetcher = fetcher();
    let bundle = fetcher.fetch_generator("webapp").await.unwrap();

    let controller = ControllerGenerator::new(bundle);
    let collaborators = Collaborators {
        prompter: &DefaultAnswers,
        sub_generator: &controller,
        bower: &NoInstall,
        npm: &NoInstall,
        observer: &NoopObserver,
    };
    let options = PipelineOptions {
        app_name: Some("myapp".to_string()),
        parent_dir: parent.path().to_path_buf(),
        choices: CliChoices::default(),
        install: InstallFlags {
            skip_install: true,
            ..Default::default()
        },
    };

    let result = Pipeline::new(bundle, options, collaborators).run().await;
    std::env::set_current_dir(&previous_dir).unwrap();
    let summary = result.unwrap();

    // Generator defaults first, then the first choice of every prompt
    assert_eq!(
        summary.selection.keys(),
        ["grunt", "i18n", "dust", "bower", "less", "requirejs"]
    );
    for bucket in Bucket::INSTALL_ORDER {
        assert_eq!(summary.install(bucket), Some(&InstallOutcome::SkippedByFlag));
    }

    let root = &summary.project_root;
    let package_json = fs::read_to_string(root.join("package.json")).unwrap();
    assert!(package_json.contains(r#""name": "myapp""#));
    assert!(package_json.contains(r#""description": "A web application""#));

    for file in [
        ".editorconfig",
        "Gruntfile.js",
        "bower.json",
        "tasks/less.js",
        "tasks/requirejs.js",
        "controllers/index.js",
        "public/templates/index.dust",
        "locales/US/en/index.properties",
    ] {
        assert!(root.join(file).exists(), "missing {file}");
    }

    let layout = fs::read_to_string(root.join("public/templates/layouts/master.dust")).unwrap();
    assert!(layout.contains("<title>myapp</title>"));
}
