//! Install list resolution

use super::registry::{Bucket, DependencyRegistry};
use super::selection::Selection;
use std::collections::HashSet;

/// Resolve the space-joined package specifiers `bucket` needs for `selection`.
///
/// Specifiers appear in selection order, then registry order within a key; a specifier
/// contributed by more than one key is kept at its first position only. Returns `None`
/// when no selected key contributes to the bucket, in which case the installer must not
/// be invoked at all.
pub fn resolve(
    registry: &DependencyRegistry,
    selection: &Selection,
    bucket: Bucket,
) -> Option<String> {
    let mut seen = HashSet::new();
    let packages: Vec<&str> = selection
        .iter()
        .filter_map(|key| registry.lookup(key))
        .flat_map(|spec| spec.packages(bucket))
        .map(String::as_str)
        .filter(|package| !package.trim().is_empty())
        .filter(|package| seen.insert(*package))
        .collect();

    if packages.is_empty() {
        None
    } else {
        Some(packages.join(" "))
    }
}
