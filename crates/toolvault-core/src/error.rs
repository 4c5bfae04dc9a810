//! Error types for the ToolVault system.
//!
//! All errors in the system are represented by the [`Error`] enum.
//! This ensures composable error handling across crates.

use crate::models::OutputType;
use std::io;
use thiserror::Error as ThisError;

/// The core error type for all ToolVault operations.
#[derive(ThisError, Debug)]
pub enum Error {
    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Output type name outside the known set
    #[error("Unknown output type: '{name}'")]
    UnknownOutputType { name: String },

    /// Type detection could not run to completion
    #[error("Type detection failed: {reason}")]
    DetectionError { reason: String },

    /// A value could not be normalized for the chosen renderer
    #[error("Failed to render as {output_type}: {reason}")]
    RenderError {
        output_type: OutputType,
        reason: String,
    },

    /// Mutation attempted on a read-only renderer
    #[error("Renderer is read-only: {reason}")]
    ReadOnlyMode { reason: String },

    /// Parse error
    #[error("Parse error: {reason}")]
    ParseError { reason: String },

    /// Invalid configuration
    #[error("Configuration error: {reason}")]
    ConfigError { reason: String },

    /// Record store failure
    #[error("Store error: {reason}")]
    StoreError { reason: String },

    /// Record not found
    #[error("Not found: {key}")]
    NotFound { key: String },
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an IO error
    pub fn io(err: io::Error) -> Self {
        Error::Io(err)
    }

    /// Create an unknown output type error
    pub fn unknown_output_type(name: impl Into<String>) -> Self {
        Error::UnknownOutputType { name: name.into() }
    }

    /// Create a detection error
    pub fn detection_error(reason: impl Into<String>) -> Self {
        Error::DetectionError {
            reason: reason.into(),
        }
    }

    /// Create a render error for the given output type
    pub fn render_error(output_type: OutputType, reason: impl Into<String>) -> Self {
        Error::RenderError {
            output_type,
            reason: reason.into(),
        }
    }

    /// Create a read-only mode error
    pub fn read_only(reason: impl Into<String>) -> Self {
        Error::ReadOnlyMode {
            reason: reason.into(),
        }
    }

    /// Create a parse error
    pub fn parse_error(reason: impl Into<String>) -> Self {
        Error::ParseError {
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(reason: impl Into<String>) -> Self {
        Error::ConfigError {
            reason: reason.into(),
        }
    }

    /// Create a store error
    pub fn store_error(reason: impl Into<String>) -> Self {
        Error::StoreError {
            reason: reason.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(key: impl Into<String>) -> Self {
        Error::NotFound { key: key.into() }
    }
}
