//! Template-engine controller sub-generator

use super::bundle::{GeneratorBundle, Overlay, NO_TEMPLATE_ENGINE};
use super::copier::copy_overlay;
use crate::config::AppConfig;
use crate::pipeline::SubGenerator;
use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, info};

/// Lays down the index controller (and its view, if any) for the chosen template engine
/// from the bundle's `controllers/<engine>` overlay.
#[derive(Debug, Clone, Copy)]
pub struct ControllerGenerator<'a> {
    bundle: &'a GeneratorBundle,
}

impl<'a> ControllerGenerator<'a> {
    pub fn new(bundle: &'a GeneratorBundle) -> Self {
        Self { bundle }
    }
}

#[async_trait]
impl SubGenerator for ControllerGenerator<'_> {
    async fn generate(
        &self,
        template_module: Option<&str>,
        target: &Path,
        config: &AppConfig,
    ) -> Result<()> {
        let engine = template_module.unwrap_or(NO_TEMPLATE_ENGINE);
        let overlay = Overlay::Controller(engine);

        if !self.bundle.has_overlay(overlay) {
            debug!(engine, "no controller overlay for template engine");
            return Ok(());
        }

        let written = copy_overlay(self.bundle, overlay, target, &config.render_context()).await?;
        info!(engine, files = written.len(), "controller generated");
        Ok(())
    }
}
