//! Error types for bbtgen

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// bbtgen errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("Tree parse error: {0}")]
    TreeParse(String),

    #[error("Missing required node: {0}")]
    MissingNode(String),

    #[error("Invalid specification: {0}")]
    InvalidSpec(String),

    #[error("Pattern error: {0}")]
    Pattern(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_norway::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}
