//! # Aniwrap Config
//!
//! Configuration management for aniwrap: typed settings with validation,
//! YAML file loading, and environment variable overrides.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod loader;
pub mod settings;
pub mod validation;

pub use loader::{ConfigError, ConfigLoader};
pub use settings::{AnilistSettings, ChartSettings, Config, LoggingSettings, ReportSettings};
