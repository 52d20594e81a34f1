use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum FormatError {
    #[error("Invalid snapshot: {0}")]
    Decode(String),
    #[error("Can not load airlines from {path}: {reason}")]
    Airlines { path: String, reason: String },
    #[error("Bad airlines file version {0}")]
    BadFileVersion(usize),
}
