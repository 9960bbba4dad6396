//! Builder pattern for AssistEngine

use crate::config::EngineConfig;
use crate::engine::AssistEngine;
use crate::error::Result;
use crate::source::ModuleSource;
use assist_core::SectionId;
use std::path::PathBuf;
use std::sync::Arc;

/// Builder for AssistEngine
///
/// # Example
///
/// ```rust,ignore
/// use assist_sdk::{EngineBuilder, SectionId};
///
/// let engine = EngineBuilder::new()
///     .with_module_dir("modules")
///     .with_default_sections(vec![SectionId::Findings, SectionId::Impression])
///     .build()?;
///
/// let module = engine.load("thyroid_nodule").await?;
/// ```
pub struct EngineBuilder {
    config: EngineConfig,
    source: Option<Arc<dyn ModuleSource>>,
    module_contents: Vec<String>,
}

impl EngineBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: EngineConfig::new(),
            source: None,
            module_contents: Vec::new(),
        }
    }

    /// Start from an existing configuration
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Read modules from `<dir>/<id>.xml`
    pub fn with_module_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.module_dir = Some(dir.into());
        self
    }

    /// Read modules from a custom source; takes precedence over a module directory
    pub fn with_source(mut self, source: Arc<dyn ModuleSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Add module XML to load at build time
    pub fn add_module_content(mut self, xml: impl Into<String>) -> Self {
        self.module_contents.push(xml.into());
        self
    }

    /// Enable the module cache
    pub fn enable_cache(mut self, enable: bool) -> Self {
        self.config.cache_enabled = enable;
        self
    }

    /// Set the sections rendered when a request names none
    pub fn with_default_sections(mut self, sections: Vec<SectionId>) -> Self {
        self.config.default_sections = sections;
        self
    }

    /// Build the engine.
    ///
    /// Module content added with [`add_module_content`](Self::add_module_content)
    /// is loaded now, so broken modules fail the build.
    pub fn build(self) -> Result<AssistEngine> {
        let engine = match self.source {
            Some(source) => AssistEngine::with_source(self.config, source),
            None => AssistEngine::new(self.config),
        };

        for xml in &self.module_contents {
            engine.load_str(xml)?;
        }

        Ok(engine)
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
