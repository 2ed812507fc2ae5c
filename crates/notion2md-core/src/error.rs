//! Error types

use thiserror::Error;

/// Errors that can occur while generating a page
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Template(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed input: {0}")]
    MalformedInput(String),
}

/// Result type for generation
pub type Result<T> = std::result::Result<T, Error>;

impl From<handlebars::TemplateError> for Error {
    fn from(err: handlebars::TemplateError) -> Self {
        Error::Template(format!("error parsing archetype file: {}", err))
    }
}

impl From<handlebars::RenderError> for Error {
    fn from(err: handlebars::RenderError) -> Self {
        Error::Template(format!("error filling archetype file: {}", err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::MalformedInput(err.to_string())
    }
}
