//! Error types for usenet-blackhole
//!
//! This module provides the single error type used across the crate:
//! - Configuration failures surfaced by the client's `test` routine
//! - Transport failures while fetching an NZB payload
//! - Capability errors for operations a watch-folder client cannot perform
//! - Transient scan failures for candidates that vanish mid-poll
//!
//! Every variant maps to a stable machine-readable code via [`Error::error_code`].

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for usenet-blackhole operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for usenet-blackhole
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "watch_folder")
        key: Option<String>,
    },

    /// Fetching the NZB payload failed (bad status, timeout, connection refused)
    #[error("transport error: {0}")]
    Transport(String),

    /// Network error raised by the HTTP client
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Operation not supported by this download client
    #[error("not supported: {0}")]
    NotSupported(String),

    /// A candidate disappeared or became unreadable between enumeration and stat
    #[error("transient scan failure for {path}: {reason}")]
    TransientScan {
        /// The candidate (or constituent file) that could not be read
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Build a [`Error::Config`] for a named setting
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Build a [`Error::TransientScan`] from an I/O failure on `path`
    pub fn transient(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        Error::TransientScan {
            path: path.into(),
            reason: err.to_string(),
        }
    }

    /// Whether the error only affects a single candidate for the current poll
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::TransientScan { .. })
    }

    /// Get the machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Transport(_) => "transport_error",
            Error::Network(_) => "network_error",
            Error::NotSupported(_) => "not_supported",
            Error::TransientScan { .. } => "transient_scan_error",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
        }
    }
}
