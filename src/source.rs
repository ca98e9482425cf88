use std::path::Path;

use async_trait::async_trait;

use crate::{error::Result, types::RemoteEntry};

/// Core abstraction for a remote repository tree
///
/// Implementors list repository paths and fetch file bytes to disk.
/// The tree downloader only talks to this trait, so tests can swap in
/// an in-memory tree.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// List a repository path in server order
    ///
    /// A file path yields a one-element list describing that file.
    async fn list_contents(&self, path: &str) -> Result<Vec<RemoteEntry>>;

    /// Fetch `download_url` into `destination`, returning the bytes written
    async fn fetch_file(&self, download_url: &str, destination: &Path) -> Result<u64>;

    /// Get a human-readable identifier for this source (for logging/debugging)
    fn identifier(&self) -> String;
}
