//! Dependency registry types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Package manager an install bucket is handed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageManager {
    Npm,
    Bower,
}

impl PackageManager {
    /// Binary name
    pub fn program(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Bower => "bower",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

/// How an installer should record the packages it installs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persist {
    Dependency,
    DevDependency,
    DoNotPersist,
}

/// Install category a dependency may contribute packages to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    /// Regular npm dependencies
    Npm,
    /// npm dev dependencies
    NpmDev,
    /// UI package manager (bower) components
    Bower,
}

impl Bucket {
    /// Install order used by the pipeline
    pub const INSTALL_ORDER: [Bucket; 3] = [Bucket::Bower, Bucket::Npm, Bucket::NpmDev];

    pub fn name(&self) -> &'static str {
        match self {
            Bucket::Npm => "npm",
            Bucket::NpmDev => "npmDev",
            Bucket::Bower => "bower",
        }
    }

    pub fn manager(&self) -> PackageManager {
        match self {
            Bucket::Npm | Bucket::NpmDev => PackageManager::Npm,
            Bucket::Bower => PackageManager::Bower,
        }
    }

    pub fn persist(&self) -> Persist {
        match self {
            Bucket::Npm => Persist::Dependency,
            Bucket::NpmDev => Persist::DevDependency,
            Bucket::Bower => Persist::DoNotPersist,
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Bucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "npm" | "regular" => Ok(Bucket::Npm),
            "npmDev" | "dev" => Ok(Bucket::NpmDev),
            "bower" | "uiPackageManager" => Ok(Bucket::Bower),
            other => Err(format!("Unknown install bucket: {}", other)),
        }
    }
}

/// Package specifiers a dependency key requires, per bucket
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencySpec {
    #[serde(default, alias = "regular", skip_serializing_if = "Vec::is_empty")]
    pub npm: Vec<String>,

    #[serde(
        default,
        rename = "npmDev",
        alias = "dev",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub npm_dev: Vec<String>,

    #[serde(
        default,
        alias = "uiPackageManager",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub bower: Vec<String>,
}

impl DependencySpec {
    pub fn packages(&self, bucket: Bucket) -> &[String] {
        match bucket {
            Bucket::Npm => &self.npm,
            Bucket::NpmDev => &self.npm_dev,
            Bucket::Bower => &self.bower,
        }
    }
}

/// Immutable lookup table from dependency key to its spec
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyRegistry {
    specs: BTreeMap<String, DependencySpec>,
}

impl DependencyRegistry {
    pub fn new(specs: BTreeMap<String, DependencySpec>) -> Self {
        Self { specs }
    }

    /// Look up a key; unknown keys are simply absent
    pub fn lookup(&self, key: &str) -> Option<&DependencySpec> {
        self.specs.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.specs.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.specs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl FromIterator<(String, DependencySpec)> for DependencyRegistry {
    fn from_iter<I: IntoIterator<Item = (String, DependencySpec)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
