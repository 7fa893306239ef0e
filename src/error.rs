// src/error.rs

//! Error types for recipe loading and source resolution

use thiserror::Error;

/// Errors produced while parsing, validating or resolving recipes
#[derive(Error, Debug)]
pub enum Error {
    /// Recipe document could not be parsed
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Recipe file could not be read
    #[error("I/O error: {0}")]
    IoError(String),

    /// Malformed version identifier
    #[error("Invalid version '{input}': {reason}")]
    InvalidVersion { input: String, reason: String },

    /// Malformed version constraint or dependency spec
    #[error("Invalid constraint '{input}': {reason}")]
    InvalidConstraint { input: String, reason: String },

    /// Malformed content hash
    #[error("Invalid checksum: {0}")]
    InvalidChecksum(String),

    /// Download URL template has no usable version placeholder
    #[error("Template error: {0}")]
    TemplateError(String),

    /// Recipe violates a structural invariant
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Requested item is not declared
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ParseError(err.to_string())
    }
}
