//! Package manager integration
//!
//! This module provides:
//! - Availability checks for node, npm and bower
//! - Command-backed installers for the install phases

pub mod check;
pub mod installer;

pub use check::{check_package_managers, RuntimeInfo};
pub use installer::CommandInstaller;
