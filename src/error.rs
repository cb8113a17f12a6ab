//! Error types for build plan resolution.
//!
//! This module defines [`ConfigError`], the fatal error type used throughout
//! resolution, [`EnvironmentError`] for recoverable environment problems, and
//! a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Every `ConfigError` aborts resolution; no partial plan is produced
//! - `EnvironmentError` is always recovered where it is raised (the mode
//!   falls back to development) and only logged
//! - Use `anyhow::Error` (via `ConfigError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Fatal configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Project root does not exist or is not a directory.
    #[error("Project root not found: {path}")]
    MissingRoot { path: PathBuf },

    /// A shared style resource listed in the configuration is missing.
    #[error("Style resource not found: {path}")]
    MissingStyleResource { path: PathBuf },

    /// A field holds a value that violates an invariant.
    #[error("Invalid value for '{field}': {message}")]
    InvalidField { field: String, message: String },

    /// Configuration file named explicitly does not exist.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse a configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// A `BUILDPLAN__*` variable holds a value its field cannot take.
    #[error("Invalid override {variable}: {message}")]
    InvalidOverride { variable: String, message: String },

    /// One or more structural validation rules failed.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ConfigError {
    /// Shorthand for [`ConfigError::InvalidField`].
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Recoverable problem with the process environment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvironmentError {
    /// A mode variable is set to a value that is not a known build mode.
    #[error("{variable}={value:?} is not a recognized build mode")]
    UnrecognizedMode { variable: String, value: String },
}

/// Result type alias for resolution operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
