use std::ffi::OsString;
use std::path::{Path, PathBuf};

use log::debug;
use reqwest::{Client, Response};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::{
    config::Config,
    error::{GhdlError, Result},
    location::parse_raw_url,
};

/// Downloads a single URL to a local file
///
/// The body is streamed into `<destination>.part` and renamed into place
/// once complete, so `destination` never holds a truncated download.
#[derive(Clone)]
pub struct FileFetcher {
    client: Client,
}

impl FileFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// GET `url` and write the body to `destination`, creating or
    /// replacing it. Returns the number of bytes written.
    pub async fn fetch(&self, url: &str, destination: &Path) -> Result<u64> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GhdlError::Remote {
                url: url.to_string(),
                status,
            });
        }

        let partial = partial_path(destination);
        let written = match write_body(response, &partial).await {
            Ok(written) => written,
            Err(e) => {
                let _ = fs::remove_file(&partial).await;
                return Err(e);
            }
        };

        if let Err(e) = fs::rename(&partial, destination).await {
            let _ = fs::remove_file(&partial).await;
            return Err(e.into());
        }

        debug!("wrote {} bytes to {}", written, destination.display());
        Ok(written)
    }

    /// Like [`FileFetcher::fetch`], creating missing parent directories first
    pub async fn fetch_into(&self, url: &str, destination: &Path) -> Result<u64> {
        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| GhdlError::CreateDirectory {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        self.fetch(url, destination).await
    }
}

/// Download a raw.githubusercontent.com URL to `destination`
///
/// The URL is validated before anything touches the filesystem.
pub async fn download_raw_file(config: &Config, raw_url: &str, destination: &Path) -> Result<u64> {
    let url = parse_raw_url(raw_url)?;

    FileFetcher::new(config.http_client())
        .fetch_into(url.as_str(), destination)
        .await
}

async fn write_body(mut response: Response, path: &Path) -> Result<u64> {
    let mut file = fs::File::create(path).await?;
    let mut written = 0u64;

    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    file.flush().await?;
    Ok(written)
}

fn partial_path(destination: &Path) -> PathBuf {
    let mut name = OsString::from(destination.as_os_str());
    name.push(".part");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_path() {
        assert_eq!(
            partial_path(Path::new("out/a.txt")),
            PathBuf::from("out/a.txt.part")
        );
    }

    #[tokio::test]
    async fn test_fetch_writes_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/acme/widgets/main/a.txt")
            .with_status(200)
            .with_body("hello widgets")
            .create_async()
            .await;

        let temp_dir = TempDir::new().unwrap();
        let destination = temp_dir.path().join("a.txt");
        let fetcher = FileFetcher::new(Client::new());

        let written = fetcher
            .fetch(&format!("{}/acme/widgets/main/a.txt", server.url()), &destination)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(written, 13);
        assert_eq!(std::fs::read_to_string(&destination).unwrap(), "hello widgets");
        assert!(!partial_path(&destination).exists());
    }

    #[tokio::test]
    async fn test_fetch_truncates_existing_file() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/short.txt")
            .with_status(200)
            .with_body("new")
            .create_async()
            .await;

        let temp_dir = TempDir::new().unwrap();
        let destination = temp_dir.path().join("short.txt");
        std::fs::write(&destination, "a much longer previous body").unwrap();

        FileFetcher::new(Client::new())
            .fetch(&format!("{}/short.txt", server.url()), &destination)
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(&destination).unwrap(), "new");
    }

    #[tokio::test]
    async fn test_fetch_non_success_leaves_no_file() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing.txt")
            .with_status(404)
            .with_body("Not Found")
            .create_async()
            .await;

        let temp_dir = TempDir::new().unwrap();
        let destination = temp_dir.path().join("missing.txt");

        let result = FileFetcher::new(Client::new())
            .fetch(&format!("{}/missing.txt", server.url()), &destination)
            .await;

        match result {
            Err(GhdlError::Remote { status, .. }) => assert_eq!(status.as_u16(), 404),
            other => panic!("Expected Remote error, got {:?}", other),
        }
        assert!(!destination.exists());
        assert!(!partial_path(&destination).exists());
    }

    #[tokio::test]
    async fn test_fetch_into_creates_parent_directories() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/acme/widgets/main/docs/guide.md")
            .with_status(200)
            .with_body("# Guide")
            .create_async()
            .await;

        let temp_dir = TempDir::new().unwrap();
        let destination = temp_dir.path().join("nested").join("docs").join("guide.md");

        let written = FileFetcher::new(Client::new())
            .fetch_into(
                &format!("{}/acme/widgets/main/docs/guide.md", server.url()),
                &destination,
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(written, 7);
        assert_eq!(std::fs::read_to_string(&destination).unwrap(), "# Guide");
    }

    #[tokio::test]
    async fn test_download_raw_file_rejects_url_before_writing() {
        let temp_dir = TempDir::new().unwrap();
        let destination = temp_dir.path().join("out").join("a.txt");

        let result = download_raw_file(
            &Config::default(),
            "https://github.com/acme/widgets/blob/main/a.txt",
            &destination,
        )
        .await;

        assert!(matches!(result, Err(GhdlError::InvalidUrl { .. })));
        assert!(!temp_dir.path().join("out").exists());
    }

    #[tokio::test]
    async fn test_fetch_without_parent_directory_is_io_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/a.txt")
            .with_status(200)
            .with_body("bytes")
            .create_async()
            .await;

        let temp_dir = TempDir::new().unwrap();
        let destination = temp_dir.path().join("no-such-dir").join("a.txt");

        let result = FileFetcher::new(Client::new())
            .fetch(&format!("{}/a.txt", server.url()), &destination)
            .await;

        assert!(matches!(result, Err(GhdlError::Io(_))));
        assert!(!destination.exists());
    }
}
