//! Parser error types

use thiserror::Error;

/// Parser error
#[derive(Error, Debug)]
pub enum ParseError {
    /// The text is not well-formed XML
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Well-formed XML that does not match the module shape
    #[error("Malformed document at {path}: {message}")]
    MalformedDocument { path: String, message: String },

    /// Missing required attribute or child element
    #[error("Missing required field '{field}' at {path}")]
    MissingField { path: String, field: String },

    /// Field present but its value cannot be used
    #[error("Invalid value for field '{field}' at {path}: {message}")]
    InvalidValue {
        path: String,
        field: String,
        message: String,
    },
}

impl ParseError {
    pub fn malformed(path: impl Into<String>, message: impl Into<String>) -> Self {
        ParseError::MalformedDocument {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Well-formed XML with the wrong shape: `MalformedDocument` or one of its
    /// field-level refinements `MissingField` and `InvalidValue`
    pub fn is_malformed(&self) -> bool {
        !matches!(self, ParseError::Xml(_))
    }

    /// Element path the error points at, when there is one
    pub fn path(&self) -> Option<&str> {
        match self {
            ParseError::Xml(_) => None,
            ParseError::MalformedDocument { path, .. }
            | ParseError::MissingField { path, .. }
            | ParseError::InvalidValue { path, .. } => Some(path),
        }
    }
}

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;
