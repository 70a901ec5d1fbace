/// Error types for PresentationML document operations.
use thiserror::Error;

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, OoxmlError>;

#[derive(Error, Debug)]
pub enum OoxmlError {
    /// OPC package error
    #[error("OPC error: {0}")]
    Opc(#[from] crate::ooxml::opc::error::OpcError),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    #[error("Part not found: {0}")]
    PartNotFound(String),

    /// Slide index out of range
    #[error("Slide not found: index {0}")]
    SlideNotFound(usize),

    #[error("Invalid content type: expected {expected}, got {got}")]
    InvalidContentType { expected: String, got: String },

    #[error("Invalid relationship: {0}")]
    InvalidRelationship(String),

    /// Structurally invalid document, e.g. a presentation without a slide size
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl From<quick_xml::Error> for OoxmlError {
    fn from(err: quick_xml::Error) -> Self {
        OoxmlError::Xml(err.to_string())
    }
}

impl From<crate::common::Error> for OoxmlError {
    fn from(err: crate::common::Error) -> Self {
        match err {
            crate::common::Error::XmlError(s) => OoxmlError::Xml(s),
            crate::common::Error::Io(e) => OoxmlError::Io(e),
            other => OoxmlError::Other(other.to_string()),
        }
    }
}
