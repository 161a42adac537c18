//! Configuration loading utilities

use crate::Config;
use serde_yaml;
use std::env;
use std::path::Path;
use thiserror::Error;
use validator::Validate;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        /// The environment variable that failed to parse
        var: String,
        /// The underlying parse error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ConfigError> for aniwrap_common::AniwrapError {
    fn from(err: ConfigError) -> Self {
        aniwrap_common::AniwrapError::config(err.to_string())
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config: Config = serde_yaml::from_str(&content)?;

        Self::apply_env_overrides(&mut config)?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from environment variables and files
    ///
    /// Resolution order: `ANIWRAP_CONFIG_PATH`, then `config.yaml` or
    /// `config.yml` in the working directory, then built-in defaults.
    /// Environment overrides apply in every case.
    pub fn load() -> aniwrap_common::Result<Config> {
        let config = if let Ok(config_path) = env::var("ANIWRAP_CONFIG_PATH") {
            Self::load_config(&config_path)?
        } else if Path::new("config.yaml").exists() {
            Self::load_config("config.yaml")?
        } else if Path::new("config.yml").exists() {
            Self::load_config("config.yml")?
        } else {
            // No config file found, use defaults with env overrides
            let mut config = Config::default();
            Self::apply_env_overrides(&mut config)?;
            config.validate().map_err(ConfigError::ValidationError)?;
            config
        };

        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> aniwrap_common::Result<Config> {
        Ok(Self::load_config(path)?)
    }

    /// Validate a configuration after programmatic mutation
    ///
    /// Load paths validate on their own; callers that mutate the loaded
    /// configuration afterwards (command line overrides) run this again.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        config.validate()?;
        Ok(())
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        // AniList configuration overrides
        if let Ok(api_url) = env::var("ANILIST_API_URL") {
            config.anilist.api_url = api_url;
        }

        if let Ok(token) = env::var("ANILIST_TOKEN") {
            config.anilist.token = Some(token);
        }

        if let Ok(timeout) = env::var("ANILIST_TIMEOUT") {
            config.anilist.timeout_seconds =
                timeout.parse().map_err(|e| ConfigError::EnvParseError {
                    var: "ANILIST_TIMEOUT".to_string(),
                    source: Box::new(e),
                })?;
        }

        if let Ok(rate) = env::var("ANILIST_LIST_RATE_LIMIT") {
            config.anilist.list_rate_limit_per_sec =
                rate.parse().map_err(|e| ConfigError::EnvParseError {
                    var: "ANILIST_LIST_RATE_LIMIT".to_string(),
                    source: Box::new(e),
                })?;
        }

        if let Ok(retries) = env::var("ANILIST_MAX_RETRIES") {
            config.anilist.max_retries =
                retries.parse().map_err(|e| ConfigError::EnvParseError {
                    var: "ANILIST_MAX_RETRIES".to_string(),
                    source: Box::new(e),
                })?;
        }

        // Report configuration overrides
        if let Ok(username) = env::var("ANIWRAP_USERNAME") {
            config.report.username = Some(username);
        }

        if let Ok(year) = env::var("ANIWRAP_YEAR") {
            config.report.year = year.parse().map_err(|e| ConfigError::EnvParseError {
                var: "ANIWRAP_YEAR".to_string(),
                source: Box::new(e),
            })?;
        }

        // Chart configuration overrides
        if let Ok(enabled) = env::var("CHARTS_ENABLED") {
            config.charts.enabled = enabled.parse().map_err(|e| ConfigError::EnvParseError {
                var: "CHARTS_ENABLED".to_string(),
                source: Box::new(e),
            })?;
        }

        if let Ok(output_dir) = env::var("CHART_OUTPUT_DIR") {
            config.charts.output_dir = output_dir;
        }

        if let Ok(width) = env::var("CHART_WIDTH") {
            config.charts.width = width.parse().map_err(|e| ConfigError::EnvParseError {
                var: "CHART_WIDTH".to_string(),
                source: Box::new(e),
            })?;
        }

        if let Ok(height) = env::var("CHART_HEIGHT") {
            config.charts.height = height.parse().map_err(|e| ConfigError::EnvParseError {
                var: "CHART_HEIGHT".to_string(),
                source: Box::new(e),
            })?;
        }

        if let Ok(bg_color) = env::var("CHART_BACKGROUND_COLOR") {
            config.charts.background_color = bg_color;
        }

        if let Ok(bar_color) = env::var("CHART_BAR_COLOR") {
            config.charts.bar_color = bar_color;
        }

        if let Ok(font_family) = env::var("CHART_FONT_FAMILY") {
            config.charts.font_family = font_family;
        }

        if let Ok(font_size) = env::var("CHART_FONT_SIZE") {
            config.charts.font_size = font_size.parse().map_err(|e| ConfigError::EnvParseError {
                var: "CHART_FONT_SIZE".to_string(),
                source: Box::new(e),
            })?;
        }

        // Logging configuration overrides
        if let Ok(level) = env::var("LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(file) = env::var("LOG_FILE") {
            config.logging.file = Some(file);
        }

        if let Ok(compact) = env::var("LOG_COMPACT") {
            config.logging.compact = compact.parse().map_err(|e| ConfigError::EnvParseError {
                var: "LOG_COMPACT".to_string(),
                source: Box::new(e),
            })?;
        }

        Ok(())
    }
}
