//! Package installers backed by the npm and bower command-line tools

use crate::dependencies::{PackageManager, Persist};
use crate::error::InstallError;
use crate::pipeline::PackageInstaller;
use async_trait::async_trait;
use colored::Colorize;
use std::io;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command as TokioCommand;
use tracing::debug;

/// Runs `<program> install <packages…>` and streams its output
#[derive(Debug, Clone)]
pub struct CommandInstaller {
    manager: PackageManager,
    program: String,
}

impl CommandInstaller {
    pub fn new(manager: PackageManager) -> Self {
        Self::with_program(manager, manager.program())
    }

    /// Use a specific binary (e.g. a project-local bower) for `manager`
    pub fn with_program(manager: PackageManager, program: impl Into<String>) -> Self {
        Self {
            manager,
            program: program.into(),
        }
    }

    pub fn npm() -> Self {
        Self::new(PackageManager::Npm)
    }

    pub fn bower() -> Self {
        Self::new(PackageManager::Bower)
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments for one install invocation
    pub fn install_args(&self, packages: &str, persist: Persist) -> Vec<String> {
        let mut args = vec!["install".to_string()];
        args.extend(packages.split_whitespace().map(str::to_string));

        let flag = match (self.manager, persist) {
            (_, Persist::DoNotPersist) => None,
            (PackageManager::Npm, Persist::Dependency) => Some("--save"),
            (PackageManager::Npm, Persist::DevDependency) => Some("--save-dev"),
            (PackageManager::Bower, Persist::Dependency) => Some("--save"),
            (PackageManager::Bower, Persist::DevDependency) => Some("--save-dev"),
        };
        args.extend(flag.map(str::to_string));
        args
    }

    /// The command line shown to the user
    pub fn command_line(&self, packages: &str, persist: Persist) -> String {
        format!(
            "{} {}",
            self.program,
            self.install_args(packages, persist).join(" ")
        )
    }

    fn error(&self, code: Option<String>, message: impl Into<String>) -> InstallError {
        InstallError::new(self.manager.program(), code, message)
    }

    fn spawn_error(&self, e: io::Error) -> InstallError {
        let code = match e.kind() {
            io::ErrorKind::NotFound => "ENOENT".to_string(),
            io::ErrorKind::PermissionDenied => "EACCES".to_string(),
            other => format!("{:?}", other),
        };
        self.error(
            Some(code),
            format!("failed to run '{}': {}", self.program, e),
        )
    }
}

#[async_trait]
impl PackageInstaller for CommandInstaller {
    async fn install(
        &self,
        packages: &str,
        persist: Persist,
        cwd: &Path,
    ) -> Result<(), InstallError> {
        let args = self.install_args(packages, persist);
        println!();
        println!(
            "{} {}",
            "Running:".dimmed(),
            self.command_line(packages, persist).yellow()
        );
        println!();

        let mut child = TokioCommand::new(&self.program)
            .args(&args)
            .current_dir(cwd)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
            let _ = child.kill().await;
            return Err(self.error(None, "failed to capture installer output"));
        };

        let mut stdout_reader = BufReader::new(stdout).lines();
        let mut stderr_reader = BufReader::new(stderr).lines();
        let mut stdout_open = true;
        let mut stderr_open = true;

        while stdout_open || stderr_open {
            tokio::select! {
                line = stdout_reader.next_line(), if stdout_open => {
                    match line {
                        Ok(Some(line)) => println!("  {}", line),
                        Ok(None) => stdout_open = false,
                        Err(e) => {
                            debug!(error = %e, "error reading installer stdout");
                            stdout_open = false;
                        }
                    }
                }
                line = stderr_reader.next_line(), if stderr_open => {
                    match line {
                        Ok(Some(line)) => eprintln!("  {}", line.yellow()),
                        Ok(None) => stderr_open = false,
                        Err(e) => {
                            debug!(error = %e, "error reading installer stderr");
                            stderr_open = false;
                        }
                    }
                }
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| self.error(None, format!("failed to wait for installer: {}", e)))?;
        println!();

        if status.success() {
            Ok(())
        } else {
            Err(self.error(
                status.code().map(|c| c.to_string()),
                format!("'{}' exited with {}", self.command_line(packages, persist), status),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_npm_args() {
        let npm = CommandInstaller::npm();
        assert_eq!(
            npm.install_args("grunt-cli grunt", Persist::Dependency),
            ["install", "grunt-cli", "grunt", "--save"]
        );
        assert_eq!(
            npm.install_args("grunt-contrib-less", Persist::DevDependency),
            ["install", "grunt-contrib-less", "--save-dev"]
        );
    }

    #[test]
    fn test_bower_args_do_not_persist() {
        let bower = CommandInstaller::bower();
        assert_eq!(
            bower.install_args("requirejs  jquery", Persist::DoNotPersist),
            ["install", "requirejs", "jquery"]
        );
        assert_eq!(
            bower.command_line("requirejs", Persist::DoNotPersist),
            "bower install requirejs"
        );
    }

    #[tokio::test]
    async fn test_missing_binary_reports_enoent() {
        let installer =
            CommandInstaller::with_program(PackageManager::Npm, "appgen-no-such-installer");
        let dir = tempfile::tempdir().unwrap();

        let err = installer
            .install("left-pad", Persist::Dependency, dir.path())
            .await
            .unwrap_err();

        assert_eq!(err.manager, "npm");
        assert_eq!(err.code.as_deref(), Some("ENOENT"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_carries_code() {
        let installer = CommandInstaller::with_program(PackageManager::Bower, "false");
        let dir = tempfile::tempdir().unwrap();

        let err = installer
            .install("requirejs", Persist::DoNotPersist, dir.path())
            .await
            .unwrap_err();

        assert_eq!(err.manager, "bower");
        assert_eq!(err.code.as_deref(), Some("1"));
    }
}
