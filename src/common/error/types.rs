//! Unified error types for Slidegraft.
//!
//! Errors here are fatal for a whole document or pipeline run. Problems with a
//! single shape are reported as `transfer::StructuralAnomaly` values instead.
use thiserror::Error;

/// Main error type for Slidegraft operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid file format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Part, slide, or layout not found
    #[error("Component not found: {0}")]
    ComponentNotFound(String),

    /// XML parsing error
    #[error("XML error: {0}")]
    XmlError(String),

    /// Invalid content type
    #[error("Invalid content type: expected {expected}, got {got}")]
    InvalidContentType { expected: String, got: String },

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type for Slidegraft operations.
pub type Result<T> = std::result::Result<T, Error>;
