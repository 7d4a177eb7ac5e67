//! Application configuration.
//!
//! Loaded from YAML files and environment variables into a single Config
//! struct.

mod timelines;

pub use timelines::{validate_layout, CursorConfig, TimelineConfig};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "cursor-ops.yaml";
/// Environment variable for configuration file path.
pub const CONFIG_ENV_VAR: &str = "CURSOR_CONFIG";
/// Prefix for configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "CURSOR";
/// Environment variable for logging configuration.
pub const LOG_ENV_VAR: &str = "CURSOR_LOG";

use serde::Deserialize;

use crate::storage::InMemoryTimelineDirectory;

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Cursor rendering options.
    pub cursors: CursorConfig,
    /// Retained generations, any order.
    pub timelines: Vec<TimelineConfig>,
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Configuration sources (in order of priority, later overrides earlier):
    /// 1. `cursor-ops.yaml` in current directory (if exists)
    /// 2. File specified by `path` argument (if provided)
    /// 3. File specified by `CONFIG_ENV_VAR` environment variable (if set)
    /// 4. Environment variables with `CONFIG_ENV_PREFIX` prefix
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        use ::config::{Config as ConfigLib, Environment, File, FileFormat};

        let mut builder = ConfigLib::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));

        if let Some(config_path) = path {
            builder = builder.add_source(File::new(config_path, FileFormat::Yaml).required(true));
        }

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::new(&config_path, FileFormat::Yaml).required(true));
        }

        let config: Config = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        validate_layout(&config.timelines)?;
        Ok(config)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        validate_layout(&config.timelines)?;
        Ok(config)
    }

    /// Build a directory holding the configured generations.
    pub async fn build_directory(&self) -> InMemoryTimelineDirectory {
        InMemoryTimelineDirectory::from_timelines(
            self.timelines.iter().map(TimelineConfig::to_timeline),
        )
        .await
    }

    /// Create config for testing.
    pub fn for_test() -> Self {
        Self::default()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Duplicate timeline order {order} for event type '{event_type}'")]
    DuplicateOrder { event_type: String, order: i32 },

    #[error("Event type '{event_type}' has more than one active timeline (orders {first} and {second})")]
    MultipleActive {
        event_type: String,
        first: i32,
        second: i32,
    },
}
