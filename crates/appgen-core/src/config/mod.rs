//! Per-run application configuration
//!
//! `AppConfig` holds the application name, the resolved project root and one slot per
//! logical choice. It is the substitution context for every rendered overlay file.

mod app;

pub use app::{AppConfig, Answer, APP_NAME_SLOT};
