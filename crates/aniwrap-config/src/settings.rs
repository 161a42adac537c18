//! Application configuration structures

use aniwrap_common::anilist::{AnilistConfig, ANILIST_API_URL};
use aniwrap_common::logging::LoggingConfig;
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    /// AniList API configuration
    #[validate]
    pub anilist: AnilistSettings,

    /// Report generation settings
    #[validate]
    pub report: ReportSettings,

    /// Chart rendering settings
    #[validate]
    pub charts: ChartSettings,

    /// Logging configuration
    #[validate]
    pub logging: LoggingSettings,
}

/// AniList API configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AnilistSettings {
    /// GraphQL endpoint URL
    #[validate(custom(function = "crate::validation::validate_api_url", message = "API URL must be a valid http(s) URL"))]
    pub api_url: String,

    /// Optional bearer token for private lists
    pub token: Option<String>,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300, message = "Timeout must be between 1 and 300 seconds"))]
    pub timeout_seconds: u64,

    /// Rate limit for full media-list pages, in pages per second
    #[validate(range(min = 1, max = 10, message = "List rate limit must be between 1 and 10 pages per second"))]
    pub list_rate_limit_per_sec: u32,

    /// Maximum number of retries for failed requests
    #[validate(range(max = 10, message = "Max retries cannot exceed 10"))]
    pub max_retries: usize,
}

/// Report generation settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ReportSettings {
    /// Default username when the command line does not supply one
    pub username: Option<String>,

    /// Target calendar year for the report
    #[validate(range(min = 2006, max = 2100, message = "Year must be between 2006 and 2100"))]
    pub year: i32,
}

/// Chart rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ChartSettings {
    /// Whether chart files are written at all
    pub enabled: bool,

    /// Directory chart files are written into
    #[validate(custom(function = "crate::validation::validate_file_path", message = "Output directory must be a valid path"))]
    pub output_dir: String,

    /// Chart width in pixels
    #[validate(range(min = 100, max = 4000, message = "Width must be between 100 and 4000 pixels"))]
    pub width: u32,

    /// Chart height in pixels
    #[validate(range(min = 100, max = 4000, message = "Height must be between 100 and 4000 pixels"))]
    pub height: u32,

    /// Background color (hex format)
    #[validate(length(equal = 7, message = "Background color must be 7 characters (e.g., #FFFFFF)"))]
    #[validate(regex(path = "crate::validation::HEX_COLOR_REGEX", message = "Background color must be valid hex color"))]
    pub background_color: String,

    /// Bar fill color (hex format)
    #[validate(length(equal = 7, message = "Bar color must be 7 characters (e.g., #2E51A2)"))]
    #[validate(regex(path = "crate::validation::HEX_COLOR_REGEX", message = "Bar color must be valid hex color"))]
    pub bar_color: String,

    /// Font family for text rendering
    pub font_family: String,

    /// Font size for labels
    #[validate(range(min = 8, max = 72, message = "Font size must be between 8 and 72"))]
    pub font_size: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    #[validate(custom(function = "validate_log_level", message = "Log level must be one of: trace, debug, info, warn, error"))]
    pub level: String,

    /// Optional log file path
    pub file: Option<String>,

    /// Whether to use compact single-line output
    pub compact: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            anilist: AnilistSettings::default(),
            report: ReportSettings::default(),
            charts: ChartSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for AnilistSettings {
    fn default() -> Self {
        Self {
            api_url: ANILIST_API_URL.to_string(),
            token: None,
            timeout_seconds: 30,
            list_rate_limit_per_sec: 1,
            max_retries: 3,
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            username: None,
            year: Utc::now().year(),
        }
    }
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            output_dir: "charts".to_string(),
            width: 1200,
            height: 800,
            background_color: "#FFFFFF".to_string(),
            bar_color: "#2E51A2".to_string(),
            font_family: "sans-serif".to_string(),
            font_size: 13,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            compact: false,
        }
    }
}

impl AnilistSettings {
    /// Build the client configuration these settings describe
    pub fn client_config(&self) -> AnilistConfig {
        let mut config = AnilistConfig::new(&self.api_url)
            .with_timeout(self.timeout_seconds)
            .with_list_rate_limit(self.list_rate_limit_per_sec)
            .with_max_retries(self.max_retries);
        if let Some(token) = &self.token {
            config = config.with_token(token);
        }
        config
    }
}

impl LoggingSettings {
    /// Build the logging configuration these settings describe
    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.level.clone(),
            compact_format: self.compact,
            file_path: self.file.clone(),
            ..LoggingConfig::default()
        }
    }
}

// Custom validation functions

fn validate_log_level(level: &str) -> Result<(), validator::ValidationError> {
    match level {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(validator::ValidationError::new("invalid_log_level")),
    }
}
