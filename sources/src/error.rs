use thiserror::Error;

use contrail_formats::FormatError;

/// Everything that makes a whole poll fail.
///
#[derive(Clone, Debug, Error, PartialEq)]
pub enum FetchError {
    #[error("HTTP Error({status}) from {url}")]
    Status { status: u16, url: String },
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Bad URL {url}: {reason}")]
    BadUrl { url: String, reason: String },
    #[error("Invalid snapshot: {0}")]
    Decode(String),
    #[error("Can not read {path}: {reason}")]
    File { path: String, reason: String },
}

impl From<FormatError> for FetchError {
    fn from(e: FormatError) -> Self {
        match e {
            FormatError::Decode(s) => FetchError::Decode(s),
            e => FetchError::Decode(e.to_string()),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Transport(e.to_string())
    }
}
