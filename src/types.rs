use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A node in the remote file tree, as reported by the contents API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntry {
    /// Type of entry
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Base name, used as the local path segment
    pub name: String,
    /// Path relative to the repository root
    pub path: String,
    /// Raw download URL, only meaningful for files
    #[serde(default)]
    pub download_url: Option<String>,
}

impl RemoteEntry {
    pub fn file(name: &str, path: &str, download_url: &str) -> Self {
        Self {
            kind: EntryKind::File,
            name: name.to_string(),
            path: path.to_string(),
            download_url: Some(download_url.to_string()),
        }
    }

    pub fn dir(name: &str, path: &str) -> Self {
        Self {
            kind: EntryKind::Dir,
            name: name.to_string(),
            path: path.to_string(),
            download_url: None,
        }
    }

    /// The download URL of a file entry, if it is usable.
    ///
    /// Directories never yield one, even if the payload carried a value.
    pub fn download_url(&self) -> Option<&str> {
        match self.kind {
            EntryKind::File => self.download_url.as_deref().filter(|url| !url.is_empty()),
            _ => None,
        }
    }

    /// Whether `name` is exactly one normal path component
    pub fn has_safe_name(&self) -> bool {
        let mut components = Path::new(&self.name).components();
        matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        ) && !self.name.contains(&['/', '\\'][..])
    }
}

/// Type of remote entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    /// Symlinks, submodules and anything else we do not mirror
    #[serde(other)]
    Other,
}

/// Outcome of a tree download
#[derive(Debug, Clone, Default)]
pub struct DownloadSummary {
    /// Local files written, in download order
    pub files_written: Vec<PathBuf>,
    /// Local directories created (or already present) for `dir` entries
    pub directories_created: Vec<PathBuf>,
    /// Repository paths of entries that were neither files nor directories
    pub skipped: Vec<String>,
    /// Sum of bytes written across all files
    pub total_bytes: u64,
}
