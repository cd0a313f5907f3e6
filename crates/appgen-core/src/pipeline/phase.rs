//! Pipeline states

use crate::dependencies::Bucket;
use std::fmt;

/// States of a run, entered strictly in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Init,
    DefaultsConfigured,
    Prompted,
    RootCreated,
    FilesScaffolded,
    BowerInstalled,
    NpmInstalled,
    NpmDevInstalled,
    Done,
}

impl Phase {
    /// State entered once the install step for `bucket` has completed or been skipped
    pub fn installed(bucket: Bucket) -> Self {
        match bucket {
            Bucket::Bower => Phase::BowerInstalled,
            Bucket::Npm => Phase::NpmInstalled,
            Bucket::NpmDev => Phase::NpmDevInstalled,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Phase::Init => "init",
            Phase::DefaultsConfigured => "defaults configured",
            Phase::Prompted => "prompted",
            Phase::RootCreated => "root created",
            Phase::FilesScaffolded => "files scaffolded",
            Phase::BowerInstalled => "bower installed",
            Phase::NpmInstalled => "npm installed",
            Phase::NpmDevInstalled => "npm dev installed",
            Phase::Done => "done",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
