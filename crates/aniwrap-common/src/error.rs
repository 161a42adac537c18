//! Error types and utilities for aniwrap

use thiserror::Error;

/// Result type alias for aniwrap operations
pub type Result<T> = std::result::Result<T, AniwrapError>;

/// Main error type for aniwrap operations
#[derive(Error, Debug)]
pub enum AniwrapError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the failure
        message: String,
        /// Underlying cause, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network related errors (transport failures, timeouts)
    #[error("Network error: {message}")]
    Network {
        /// Human-readable description of the failure
        message: String,
        /// Underlying cause, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// AniList API errors (non-success responses, GraphQL errors)
    #[error("AniList API error: {message}")]
    Api {
        /// Human-readable description of the failure
        message: String,
        /// HTTP or GraphQL status code, when the API supplied one
        status_code: Option<u16>,
    },

    /// The requested username does not exist on AniList.
    ///
    /// Fatal for the whole run: no partial report is produced.
    #[error("AniList user not found: {username}")]
    UserNotFound {
        /// The username that failed to resolve
        username: String,
    },

    /// Activity progress text that is neither a single episode number nor a
    /// `start - end` range. Indicates an upstream format change, so it is a
    /// hard failure rather than a silent skip.
    #[error("Malformed progress {progress:?} on activity for {title:?}")]
    MalformedProgress {
        /// The progress text as received
        progress: String,
        /// Title of the media the activity belongs to
        title: String,
    },

    /// An event needed to contribute watch time but its media carries no
    /// per-episode duration. Never coerced to zero minutes.
    #[error("Missing episode duration for {title:?}")]
    MissingDuration {
        /// Title of the media lacking a duration
        title: String,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Chart generation and plotting errors
    #[error("Chart error: {message}")]
    Chart {
        /// Human-readable description of the failure
        message: String,
        /// Underlying cause, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl AniwrapError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new network error with source
    pub fn network_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new AniList API error
    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api {
            message: msg.into(),
            status_code: None,
        }
    }

    /// Create a new AniList API error with status code
    pub fn api_with_status(msg: impl Into<String>, status: u16) -> Self {
        Self::Api {
            message: msg.into(),
            status_code: Some(status),
        }
    }

    /// Create a new user-not-found error
    pub fn user_not_found(username: impl Into<String>) -> Self {
        Self::UserNotFound {
            username: username.into(),
        }
    }

    /// Create a new malformed-progress error
    pub fn malformed_progress(progress: impl Into<String>, title: impl Into<String>) -> Self {
        Self::MalformedProgress {
            progress: progress.into(),
            title: title.into(),
        }
    }

    /// Create a new missing-duration error
    pub fn missing_duration(title: impl Into<String>) -> Self {
        Self::MissingDuration {
            title: title.into(),
        }
    }

    /// Create a new chart error
    pub fn chart(msg: impl Into<String>) -> Self {
        Self::Chart {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new chart error with source
    pub fn chart_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Chart {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether this error should abort the whole run rather than one request
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound { .. } | Self::MalformedProgress { .. } | Self::MissingDuration { .. }
        )
    }
}

// Error conversion implementations for external types

/// Convert from reqwest::Error to AniwrapError
impl From<reqwest::Error> for AniwrapError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network_with_source("Request timeout", err)
        } else if err.is_connect() {
            Self::network_with_source("Connection failed", err)
        } else if err.is_status() {
            let status_code = err.status().map(|s| s.as_u16()).unwrap_or(0);
            Self::network_with_source(format!("HTTP error: {}", status_code), err)
        } else {
            Self::network_with_source("Network request failed", err)
        }
    }
}

#[cfg(feature = "plotters")]
/// Convert from plotters drawing errors to AniwrapError
impl<T> From<plotters::drawing::DrawingAreaErrorKind<T>> for AniwrapError
where
    T: std::error::Error + Send + Sync + 'static,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        Self::chart_with_source("Chart rendering failed", err)
    }
}
