//! Availability checks for node and the package managers

use crate::dependencies::PackageManager;
use std::process::Command;

/// Tool detection result
#[derive(Debug, Clone)]
pub struct RuntimeInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
}

/// Run `<program> --version` and report what was found
pub fn probe(name: &'static str, program: &str) -> RuntimeInfo {
    let output = Command::new(program).arg("--version").output();

    match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
            RuntimeInfo {
                name,
                version: Some(version),
                available: true,
            }
        }
        _ => RuntimeInfo {
            name,
            version: None,
            available: false,
        },
    }
}

pub fn check_node() -> RuntimeInfo {
    probe("Node.js", "node")
}

pub fn check_manager(manager: PackageManager) -> RuntimeInfo {
    match manager {
        PackageManager::Npm => probe("npm", "npm"),
        PackageManager::Bower => probe("Bower", "bower"),
    }
}

/// Check node plus each package manager that will be invoked. Advisory only: the
/// result lists what is missing, it never fails.
pub fn check_package_managers(managers: &[PackageManager]) -> Vec<RuntimeInfo> {
    if managers.is_empty() {
        return Vec::new();
    }

    let mut results = vec![check_node()];
    results.extend(managers.iter().map(|m| check_manager(*m)));
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_missing_program() {
        let info = probe("Nothing", "appgen-no-such-tool");
        assert!(!info.available);
        assert!(info.version.is_none());
    }

    #[test]
    fn test_no_managers_checks_nothing() {
        assert!(check_package_managers(&[]).is_empty());
    }

    #[test]
    fn test_reports_node_and_each_manager() {
        let results = check_package_managers(&[PackageManager::Npm, PackageManager::Bower]);
        let names: Vec<&str> = results.iter().map(|r| r.name).collect();
        assert_eq!(names, ["Node.js", "npm", "Bower"]);
    }
}
