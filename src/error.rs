//! Error types for the Mermaid Chart companion core
//!
//! This module provides structured error handling using thiserror. Session
//! rejection handling is deliberately asymmetric: the first authorization
//! rejection is absorbed by the session manager's transparent re-auth path,
//! and only a second consecutive rejection surfaces as
//! [`CompanionError::Authorization`].

use thiserror::Error;

/// Main error type for companion operations
#[derive(Error, Debug)]
pub enum CompanionError {
    /// Credential rejected twice in a row, re-authentication exhausted
    #[error("Authorization rejected by the Mermaid Chart API")]
    Authorization,

    /// Transport failure, no usable response
    #[error("Network error: {0}")]
    Network(String),

    /// Referenced diagram or project absent on the server
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed identifier or content rejected by the server
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid document ID format
    #[error("Invalid document ID: {0}")]
    InvalidDocumentId(#[from] uuid::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for companion operations
pub type Result<T> = std::result::Result<T, CompanionError>;
