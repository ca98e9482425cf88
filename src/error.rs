use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while resolving and downloading GitHub content
#[derive(Error, Debug)]
pub enum GhdlError {
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("could not get {url}: {status}")]
    Remote { url: String, status: StatusCode },

    #[error("error decoding github api response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("file entry {name} has no download URL")]
    MissingDownloadUrl { name: String },

    #[error("refusing entry with unsafe name {name:?}")]
    InvalidEntry { name: String },

    #[error("failed to download file {name}: {source}")]
    FileDownload {
        name: String,
        #[source]
        source: Box<GhdlError>,
    },

    #[error("failed to list directory {name}: {source}")]
    DirectoryListing {
        name: String,
        #[source]
        source: Box<GhdlError>,
    },

    #[error("failed to create directory {}: {source}", path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GhdlError {
    pub(crate) fn invalid_url(url: &str, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for ghdl operations
pub type Result<T> = std::result::Result<T, GhdlError>;
