//! Dependency resolution
//!
//! - `registry`: static lookup from dependency key to package specifiers per bucket
//! - `selection`: the ordered set of keys accepted during a run (fail-fast on unknown keys)
//! - `resolver`: turns a selection into the space-joined install list for one bucket

pub mod registry;
pub mod resolver;
pub mod selection;

pub use registry::{Bucket, DependencyRegistry, DependencySpec, PackageManager, Persist};
pub use resolver::resolve;
pub use selection::Selection;
