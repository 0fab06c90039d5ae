//! Error types for VIGIL operations.
//!
//! This module defines [`VigilError`], the error enum covering all error
//! cases across the VIGIL dashboard. Fetch-path errors are deliberately
//! non-fatal: a failed poll is logged and the previous state is retained
//! until the next scheduled tick retries.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`VigilError`].
pub type Result<T> = std::result::Result<T, VigilError>;

/// Error type for all VIGIL operations.
#[derive(Debug, Error)]
pub enum VigilError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration file not found at an explicitly requested path
    #[error("Configuration not found at {path}")]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration file is invalid YAML
    #[error("Invalid configuration at {path}: {message}")]
    ConfigInvalid { path: PathBuf, message: String },

    /// Configuration validation failed
    #[error("Configuration validation failed: {message}")]
    ConfigValidation { message: String },

    // =========================================================================
    // I/O Errors
    // =========================================================================
    /// Generic I/O error with context
    #[error("I/O error {operation}: {path}")]
    Io {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory creation failed
    #[error("Failed to create directory: {path}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // =========================================================================
    // Fetch Errors (non-fatal, retried by the next scheduled tick)
    // =========================================================================
    /// Transport failure or non-success HTTP status
    #[error("HTTP request to {url} failed: {message}")]
    Http { url: String, message: String },

    /// Response body did not match the expected envelope shape
    #[error("Bad response envelope from {url}: {message}")]
    Envelope { url: String, message: String },

    // =========================================================================
    // Cache Errors (best-effort persistence)
    // =========================================================================
    /// History cache read/write failed
    #[error("History cache error at {path}: {message}")]
    Cache { path: PathBuf, message: String },

    // =========================================================================
    // TUI Errors
    // =========================================================================
    /// Terminal initialization failed
    #[error("Terminal initialization failed: {message}")]
    TerminalInit { message: String },

    /// Terminal restore failed
    #[error("Failed to restore terminal: {message}")]
    TerminalRestore { message: String },

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// Internal error (bug in VIGIL)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl VigilError {
    /// Create a ConfigNotFound error.
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ConfigNotFound {
            path: path.into(),
            source: None,
        }
    }

    /// Create an I/O error.
    pub fn io(
        operation: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// Create an HTTP transport error.
    pub fn http(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Http {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an envelope error.
    pub fn envelope(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Envelope {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a cache error.
    pub fn cache(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Cache {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this error came from the fetch path.
    ///
    /// Fetch errors never stop the dashboard; the previous state stays
    /// visible and the next scheduled poll retries naturally.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Http { .. } | Self::Envelope { .. })
    }

    /// Returns true if this error should exit the application.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::TerminalInit { .. }
                | Self::ConfigInvalid { .. }
                | Self::ConfigValidation { .. }
                | Self::Internal { .. }
        )
    }

    /// Returns true if this is a configuration error.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound { .. } | Self::ConfigInvalid { .. } | Self::ConfigValidation { .. }
        )
    }

    /// Returns actionable guidance for the user.
    pub fn guidance(&self) -> Option<&'static str> {
        match self {
            Self::ConfigNotFound { .. } => {
                Some("Create ~/.vigil/config.yaml or pass --config with a valid path")
            }
            Self::ConfigInvalid { .. } => Some("Check YAML syntax in the configuration file"),
            Self::ConfigValidation { .. } => {
                Some("Endpoint URLs must be http(s) and refresh periods at least 1 second")
            }
            Self::Http { .. } => Some("Check network connectivity and the configured endpoint URL"),
            Self::TerminalInit { .. } => Some("Try running in a different terminal"),
            _ => None,
        }
    }
}
