//! Error types for kempt operations.

use thiserror::Error;

/// Errors that can occur while loading or printing a document.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Invalid XML: {0}")]
    InvalidXml(String),

    #[error("Missing required element: {0}")]
    MissingElement(String),

    #[error("Unsupported character encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<quick_xml::escape::EscapeError> for Error {
    fn from(err: quick_xml::escape::EscapeError) -> Self {
        Error::InvalidXml(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
