//! Error types for the content audit engine.
//!
//! This module provides structured error handling with:
//! - `AuditError`: Domain-specific errors for engine operations
//! - `Result<T>`: Type alias for Results using AuditError
//!
//! Fetch failures are recovered inside the fetcher and never reach callers;
//! what surfaces here are misconfigurations and content-source contract errors.

use thiserror::Error;

// ============================================================================
// DOMAIN ERROR TYPE
// ============================================================================

/// Domain-specific errors for engine operations.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Invalid or malformed URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Network request failed (connect, timeout, body read)
    #[error("Network error: {0}")]
    Network(String),

    /// Origin answered with a non-2xx status
    #[error("Unexpected HTTP status: {0}")]
    HttpStatus(u16),

    /// Configuration rejected during load or validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// External content repository failed or returned unusable data
    #[error("Content source error ({source_name}): {message}")]
    ContentSource {
        source_name: &'static str,
        message: String,
    },

    /// Collection path template cannot produce a URL
    #[error("Invalid path template: {0}")]
    InvalidTemplate(String),

    /// Filesystem access failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AuditError {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a content source error
    pub fn content_source(source_name: &'static str, msg: impl Into<String>) -> Self {
        Self::ContentSource {
            source_name,
            message: msg.into(),
        }
    }
}

impl From<reqwest::Error> for AuditError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Network(format!("request timed out: {}", error))
        } else if let Some(status) = error.status() {
            Self::HttpStatus(status.as_u16())
        } else {
            Self::Network(error.to_string())
        }
    }
}

impl From<url::ParseError> for AuditError {
    fn from(error: url::ParseError) -> Self {
        Self::InvalidUrl(error.to_string())
    }
}

/// Result type alias using AuditError.
pub type Result<T> = std::result::Result<T, AuditError>;
