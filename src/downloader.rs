use std::path::Path;
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::fs;

use crate::{
    error::{GhdlError, Result},
    source::ContentSource,
    types::{DownloadSummary, EntryKind, RemoteEntry},
};

/// Mirrors a remote repository path into a local directory
///
/// Entries are processed depth-first in listing order: a directory's
/// children are all written before the next sibling of that directory.
pub struct TreeDownloader {
    source: Arc<dyn ContentSource>,
}

impl TreeDownloader {
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        Self { source }
    }

    /// Download `remote_path` into `local_dir`
    ///
    /// `local_dir` must already exist. A file path is written as
    /// `local_dir/<file name>`. The first failure aborts the walk.
    pub async fn download(&self, remote_path: &str, local_dir: &Path) -> Result<DownloadSummary> {
        debug!("downloading {:?} from {}", remote_path, self.source.identifier());

        let mut summary = DownloadSummary::default();
        let root = self.source.list_contents(remote_path).await?;
        let mut stack = vec![(root.into_iter(), local_dir.to_path_buf())];

        loop {
            let Some((entries, dir)) = stack.last_mut() else {
                break;
            };
            let Some(entry) = entries.next() else {
                stack.pop();
                continue;
            };

            if !entry.has_safe_name() {
                return Err(GhdlError::InvalidEntry { name: entry.name });
            }
            let output_path = dir.join(&entry.name);

            match entry.kind {
                EntryKind::File => {
                    let written = self.download_file(&entry, &output_path).await?;
                    summary.total_bytes += written;
                    summary.files_written.push(output_path);
                }
                EntryKind::Dir => {
                    let children = self.enter_directory(&entry, &output_path).await?;
                    summary.directories_created.push(output_path.clone());
                    stack.push((children.into_iter(), output_path));
                }
                EntryKind::Other => {
                    warn!("skipping {} (not a file or directory)", entry.path);
                    summary.skipped.push(entry.path);
                }
            }
        }

        Ok(summary)
    }

    async fn download_file(&self, entry: &RemoteEntry, output_path: &Path) -> Result<u64> {
        let url = entry
            .download_url()
            .ok_or_else(|| GhdlError::MissingDownloadUrl {
                name: entry.name.clone(),
            })?;

        let written = self
            .source
            .fetch_file(url, output_path)
            .await
            .map_err(|e| GhdlError::FileDownload {
                name: entry.name.clone(),
                source: Box::new(e),
            })?;

        info!("{} ({} bytes)", output_path.display(), written);
        Ok(written)
    }

    async fn enter_directory(
        &self,
        entry: &RemoteEntry,
        output_path: &Path,
    ) -> Result<Vec<RemoteEntry>> {
        fs::create_dir_all(output_path)
            .await
            .map_err(|source| GhdlError::CreateDirectory {
                path: output_path.to_path_buf(),
                source,
            })?;
        info!("{}/", output_path.display());

        self.source
            .list_contents(&entry.path)
            .await
            .map_err(|e| GhdlError::DirectoryListing {
                name: entry.name.clone(),
                source: Box::new(e),
            })
    }
}
