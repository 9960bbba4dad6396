//! Configuration types for AssistEngine

use assist_core::SectionId;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory holding `<id>.xml` module documents
    pub module_dir: Option<PathBuf>,

    /// Keep resolved modules in the module cache
    pub cache_enabled: bool,

    /// Sections rendered when a request names none; empty renders all
    pub default_sections: Vec<SectionId>,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            module_dir: None,
            cache_enabled: true,
            default_sections: Vec::new(),
        }
    }

    /// Set the module directory
    pub fn with_module_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.module_dir = Some(dir.into());
        self
    }

    /// Enable or disable the module cache
    pub fn enable_cache(mut self, enable: bool) -> Self {
        self.cache_enabled = enable;
        self
    }

    /// Set the sections rendered by default
    pub fn with_default_sections(mut self, sections: Vec<SectionId>) -> Self {
        self.default_sections = sections;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_config_builder() {
        let config = EngineConfig::new()
            .with_module_dir("modules")
            .enable_cache(false)
            .with_default_sections(vec![SectionId::Impression]);

        assert_eq!(config.module_dir, Some(PathBuf::from("modules")));
        assert!(!config.cache_enabled);
        assert_eq!(config.default_sections, vec![SectionId::Impression]);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"default_sections": ["findings", "impressionRecommendation"]}"#)
                .unwrap();
        assert!(config.cache_enabled);
        assert!(config.module_dir.is_none());
        assert_eq!(
            config.default_sections,
            vec![SectionId::Findings, SectionId::ImpressionRecommendation]
        );
    }
}
