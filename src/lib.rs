pub mod config;
pub mod downloader;
pub mod error;
pub mod fetch;
pub mod github;
pub mod location;
pub mod source;
pub mod types;

pub use config::Config;
pub use downloader::TreeDownloader;
pub use error::{GhdlError, Result};
pub use fetch::{download_raw_file, FileFetcher};
pub use github::GitHubSource;
pub use location::{parse_raw_url, parse_repo_url, RepoLocation};
pub use source::ContentSource;
pub use types::{DownloadSummary, EntryKind, RemoteEntry};
