//! CLI configuration

use crate::output::OutputFormat;
use assist_sdk::{EngineConfig, SectionId};
use serde::{Deserialize, Serialize};

/// Settings layered from `config/assist.*` and `ASSIST_*` variables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Sections rendered when none are given on the command line
    pub default_sections: Vec<SectionId>,

    /// Output format when `--format` is not given
    pub format: OutputFormat,

    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            default_sections: Vec::new(),
            format: OutputFormat::Text,
            log_level: "warn".to_string(),
        }
    }
}

/// Loaded configuration, plus why defaults were used when they were.
///
/// Loading runs before logging is set up, so the reason is handed back for
/// the caller to log.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: CliConfig,
    pub fallback_reason: Option<String>,
}

impl CliConfig {
    /// Load configuration from environment variables and config file
    pub fn load() -> anyhow::Result<LoadedConfig> {
        // Load .env file if exists
        dotenvy::dotenv().ok();

        let config_result = config::Config::builder()
            .add_source(config::File::with_name("config/assist").required(false))
            .add_source(
                config::Environment::with_prefix("ASSIST")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("default_sections"),
            )
            .build();

        Self::from_build_result(config_result)
    }

    fn from_build_result(
        result: Result<config::Config, config::ConfigError>,
    ) -> anyhow::Result<LoadedConfig> {
        match result {
            Ok(cfg) => Ok(LoadedConfig {
                config: cfg
                    .try_deserialize()
                    .map_err(|e| anyhow::anyhow!("Failed to deserialize config: {}", e))?,
                fallback_reason: None,
            }),
            Err(e) => Ok(LoadedConfig {
                config: Self::default(),
                fallback_reason: Some(e.to_string()),
            }),
        }
    }

    /// Engine configuration for a one-shot evaluation
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new()
            .enable_cache(false)
            .with_default_sections(self.default_sections.clone())
    }
}
